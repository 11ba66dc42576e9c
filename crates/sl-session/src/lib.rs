//! Live session state for the Spielleiter core.
//!
//! A [`Session`] owns the single mutable game state: day counter, action
//! economy, party status, combat mode, message log, and encounter history.
//! Every mutation runs an encounter check; high-priority encounters arm the
//! mandatory-dice gate, which only a roll with exactly the required notation
//! can clear.
//!
//! Narrative generation sits behind the async [`NarrativeService`] trait and
//! is polled without blocking the session.

pub mod command;
pub mod config;
pub mod error;
pub mod gate;
pub mod journal;
pub mod narrative;
pub mod session;
pub mod state;
pub mod store;

pub use config::SessionConfig;
pub use error::{NarrativeError, NarrativeResult, SessionError, SessionResult};
pub use gate::{DiceGate, GateOffer, GateOutcome, PendingCheck, Resolution};
pub use journal::{EncounterHistory, EncounterRecord, MessageLog, SenderType, SessionMessage};
pub use narrative::{
    EventSeed, NarrativeClient, NarrativePoll, NarrativeRequest, NarrativeResponse,
    NarrativeService, PendingNarrative, TemplateNarrator,
};
pub use session::Session;
pub use state::{SessionCurrentState, SessionPhase};
pub use store::{JsonFileStore, SessionSnapshot, SessionStore};
