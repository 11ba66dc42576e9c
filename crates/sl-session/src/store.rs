//! Persistence port for session snapshots.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sl_encounter::EncounterKey;

use crate::error::SessionResult;
use crate::gate::DiceGate;
use crate::journal::{EncounterHistory, MessageLog};
use crate::state::SessionCurrentState;

/// Everything needed to resume a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Live state.
    pub state: SessionCurrentState,
    /// Message log.
    pub messages: MessageLog,
    /// Resolved encounters.
    pub history: EncounterHistory,
    /// Armed and queued checks.
    pub gate: DiceGate,
    /// Encounters already announced.
    #[serde(default)]
    pub announced: Vec<EncounterKey>,
    /// When the snapshot was taken.
    pub saved_at: DateTime<Utc>,
}

/// Somewhere snapshots can be kept.
pub trait SessionStore {
    /// Persist `snapshot`, replacing any earlier one.
    fn save(&self, snapshot: &SessionSnapshot) -> SessionResult<()>;

    /// Load the stored snapshot.
    fn load(&self) -> SessionResult<SessionSnapshot>;
}

/// Stores one snapshot as pretty-printed JSON.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// A store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for JsonFileStore {
    fn save(&self, snapshot: &SessionSnapshot) -> SessionResult<()> {
        let json = serde_json::to_string_pretty(snapshot)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    fn load(&self) -> SessionResult<SessionSnapshot> {
        let text = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::journal::SessionMessage;

    fn snapshot() -> SessionSnapshot {
        let mut messages = MessageLog::new();
        messages.append(SessionMessage::system("Session started."));
        SessionSnapshot {
            state: SessionCurrentState::new(&SessionConfig::default()),
            messages,
            history: EncounterHistory::new(),
            gate: DiceGate::new(),
            announced: Vec::new(),
            saved_at: Utc::now(),
        }
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("session.json"));
        store.save(&snapshot()).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded.messages.len(), 1);
        assert_eq!(loaded.state, snapshot().state);
    }

    #[test]
    fn unwritable_path_errors() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("missing").join("session.json"));
        assert!(store.save(&snapshot()).is_err());
        assert!(store.load().is_err());
    }
}
