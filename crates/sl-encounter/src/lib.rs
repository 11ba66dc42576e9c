//! Encounter detection for the Spielleiter session core.
//!
//! Each detection pass reads one [`sl_core::EncounterContext`] and reports
//! what the party runs into: enemies sharing its location, NPCs to talk to,
//! and scheduled events firing today. Results are ordered by priority, and
//! the most urgent encounter is handed to the tactical engine when it demands
//! an immediate response.

/// The encounter record produced by detection.
pub mod encounter;
/// Top-level detection pass.
pub mod detector;
/// Stable ordering by priority.
pub mod priority;
/// Encounters from who shares the party's location.
pub mod spatial;
/// Encounters from scheduled events.
pub mod temporal;

pub use detector::{DetectionReport, detect_encounters};
pub use encounter::{EncounterCategory, EncounterInfo, EncounterKey, EncounterSource};
pub use priority::prioritize;
pub use spatial::detect_spatial_collisions;
pub use temporal::detect_temporal_overlaps;
