//! Configuration for a session.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sl_core::{EntityId, PartyStatus};

use crate::error::SessionResult;

/// Configuration for a session.
///
/// Loadable from JSON; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// RNG seed for reproducible rolls and trap difficulties.
    pub seed: u64,
    /// Actions each day allows (at least 1).
    pub max_actions_per_day: u32,
    /// Campaign day the session starts on (at least 1).
    pub starting_day: u32,
    /// Where the party starts; the first roster location when absent.
    pub starting_location: Option<EntityId>,
    /// Party status at the start.
    pub party: PartyStatus,
    /// How long a narrative request may run, in milliseconds.
    pub narrative_timeout_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            max_actions_per_day: 5,
            starting_day: 1,
            starting_location: None,
            party: PartyStatus::default(),
            narrative_timeout_ms: 30_000,
        }
    }
}

impl SessionConfig {
    /// Load a config from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> SessionResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the action cap (at least 1).
    pub fn with_max_actions(mut self, max: u32) -> Self {
        self.max_actions_per_day = max.max(1);
        self
    }

    /// Set the starting day (at least 1).
    pub fn with_starting_day(mut self, day: u32) -> Self {
        self.starting_day = day.max(1);
        self
    }

    /// Set the starting location.
    pub fn with_location(mut self, location: impl Into<EntityId>) -> Self {
        self.starting_location = Some(location.into());
        self
    }

    /// Set the starting party status (clamped to 0-100).
    pub fn with_party(mut self, party: PartyStatus) -> Self {
        self.party = PartyStatus::new(party.average_hp, party.resources, party.morale);
        self
    }

    /// Set the narrative timeout.
    pub fn with_narrative_timeout(mut self, timeout: Duration) -> Self {
        self.narrative_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// The narrative timeout as a [`Duration`].
    pub fn narrative_timeout(&self) -> Duration {
        Duration::from_millis(self.narrative_timeout_ms)
    }
}
