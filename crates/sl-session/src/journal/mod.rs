//! The session's message log and encounter history.

pub mod history;
pub mod log;
pub mod message;

pub use history::{EncounterHistory, EncounterRecord};
pub use log::MessageLog;
pub use message::{SenderType, SessionMessage};
