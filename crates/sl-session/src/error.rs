//! Error types for the session core.

use std::time::Duration;

use thiserror::Error;

use crate::state::SessionPhase;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors that can occur while running a session.
///
/// Every variant is user-facing: the session is left unchanged when one is
/// returned.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session has not begun or has been archived.
    #[error("session is not active ({0})")]
    NotActive(SessionPhase),

    /// `begin` was called on a session that already started.
    #[error("session already started")]
    AlreadyStarted,

    /// The roster has no locations to start in.
    #[error("the roster has no locations")]
    NoLocations,

    /// An action needs a selected character.
    #[error("no character selected; use `select <character>` first")]
    NoCharacterSelected,

    /// The per-day action cap is used up.
    #[error("all {max} actions for today are used; advance the day to act again")]
    ActionCapReached {
        /// The cap that was hit.
        max: u32,
    },

    /// No party member matches.
    #[error("unknown character: {0}")]
    UnknownCharacter(String),

    /// No enemy matches.
    #[error("unknown enemy: {0}")]
    UnknownEnemy(String),

    /// No location matches.
    #[error("unknown location: {0}")]
    UnknownLocation(String),

    /// A mandated roll was submitted with no requirement armed.
    #[error("no roll is currently required")]
    NoPendingRequirement,

    /// Combat is already running.
    #[error("already in combat")]
    AlreadyInCombat,

    /// A combat operation outside combat.
    #[error("not in combat")]
    NotInCombat,

    /// A narrative request is still pending.
    #[error("a narrative request is already pending")]
    NarrativeBusy,

    /// There is no narrative request to act on.
    #[error("no narrative request is pending")]
    NoPendingNarrative,

    /// Malformed command input.
    #[error("invalid choice: {0}")]
    InvalidChoice(String),

    /// Unrecognised command.
    #[error("unknown command: {0}; type `help` for a list")]
    UnknownCommand(String),

    /// Reading or writing a file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A config or snapshot file is malformed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Roster error.
    #[error("{0}")]
    Core(#[from] sl_core::CoreError),

    /// Dice or tactics error.
    #[error("{0}")]
    Mechanics(#[from] sl_mechanics::MechError),
}

/// Result type for narrative requests.
pub type NarrativeResult<T> = Result<T, NarrativeError>;

/// Errors from the narrative boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NarrativeError {
    /// The service did not answer in time.
    #[error("narrative request timed out after {0:?}")]
    Timeout(Duration),

    /// The request was cancelled before it finished.
    #[error("narrative request was cancelled")]
    Cancelled,

    /// The service reported a failure.
    #[error("narrative service failed: {0}")]
    Service(String),
}
