//! Message types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who sent a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SenderType {
    /// A player, speaking for a character.
    Player,
    /// The game master (narration).
    Gm,
    /// The session itself.
    System,
}

impl fmt::Display for SenderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player => write!(f, "player"),
            Self::Gm => write!(f, "gm"),
            Self::System => write!(f, "system"),
        }
    }
}

/// One line in the session log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionMessage {
    /// Display name of the sender.
    pub sender: String,
    /// Kind of sender.
    pub sender_type: SenderType,
    /// Message text.
    pub text: String,
    /// When the message was logged.
    pub timestamp: DateTime<Utc>,
}

impl SessionMessage {
    /// A message from a player character.
    pub fn player(sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(sender.into(), SenderType::Player, text.into())
    }

    /// Narration from the game master.
    pub fn gm(text: impl Into<String>) -> Self {
        Self::new("GM".to_string(), SenderType::Gm, text.into())
    }

    /// A notice from the session.
    pub fn system(text: impl Into<String>) -> Self {
        Self::new("System".to_string(), SenderType::System, text.into())
    }

    fn new(sender: String, sender_type: SenderType, text: String) -> Self {
        Self {
            sender,
            sender_type,
            text,
            timestamp: Utc::now(),
        }
    }
}
