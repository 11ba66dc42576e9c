//! Message log storage and export.

use serde::{Deserialize, Serialize};

use super::message::{SenderType, SessionMessage};

/// Chronological, append-only log of session messages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageLog {
    messages: Vec<SessionMessage>,
}

impl MessageLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message.
    pub fn append(&mut self, message: SessionMessage) {
        self.messages.push(message);
    }

    /// All messages, oldest first.
    pub fn messages(&self) -> &[SessionMessage] {
        &self.messages
    }

    /// The newest message.
    pub fn last(&self) -> Option<&SessionMessage> {
        self.messages.last()
    }

    /// Messages from one kind of sender.
    pub fn by_sender(&self, sender_type: SenderType) -> impl Iterator<Item = &SessionMessage> {
        self.messages
            .iter()
            .filter(move |m| m.sender_type == sender_type)
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Export the log as markdown.
    pub fn export_markdown(&self) -> String {
        let mut out = String::from("# Session Log\n\n");
        for m in &self.messages {
            let time = m.timestamp.format("%H:%M:%S");
            match m.sender_type {
                SenderType::Player => {
                    out.push_str(&format!("**{}** ({time}): {}\n\n", m.sender, m.text));
                }
                SenderType::Gm => out.push_str(&format!("> {}\n\n", m.text)),
                SenderType::System => out.push_str(&format!("*{}*\n\n", m.text)),
            }
        }
        out
    }

    /// Export the log as plain text.
    pub fn export_text(&self) -> String {
        let mut out = String::from("Session Log\n===========\n\n");
        for m in &self.messages {
            out.push_str(&format!(
                "[{}] {}: {}\n",
                m.timestamp.format("%H:%M:%S"),
                m.sender,
                m.text
            ));
        }
        out
    }
}
