//! Core types for Spielleiter: the campaign roster, locations, party status,
//! and the immutable encounter context.
//!
//! This crate is the read side of the session core. The [`Roster`] is what the
//! persistence layer hands over; an [`EncounterContext`] is a snapshot built
//! from it for a single detection pass and never mutated afterwards.

/// Immutable per-pass snapshot of who and what is present.
pub mod context;
/// Characters, NPCs, enemies, identifiers, and ability scores.
pub mod entity;
/// Error types used throughout the crate.
pub mod error;
/// Scheduled events bound to a campaign day.
pub mod event;
/// Locations, their tactical features, and weather.
pub mod location;
/// Aggregate party status and signed deltas.
pub mod party;
/// Priority tiers shared by detection and tactics.
pub mod priority;
/// Time-of-day cycle.
pub mod time;
/// The read-only roster supplied by the persistence layer.
pub mod world;

pub use context::EncounterContext;
pub use entity::{
    Ability, AbilityScores, Character, CreatureType, Enemy, EntityId, Npc, Presence, ability_modifier,
};
pub use error::{CoreError, CoreResult};
pub use event::{EventKind, ScheduledEvent};
pub use location::{Location, LocationFeature, Weather};
pub use party::{PartyStatus, StatusChange, StatusDelta, StatusDimension};
pub use priority::Priority;
pub use time::TimeOfDay;
pub use world::{Roster, RosterData};
