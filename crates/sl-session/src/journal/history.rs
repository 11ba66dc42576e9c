//! Append-only record of resolved encounters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sl_core::EntityId;
use sl_encounter::{EncounterCategory, EncounterKey};
use sl_mechanics::{ActionKind, OutcomeTier};

/// One resolved encounter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterRecord {
    /// When it was resolved.
    pub timestamp: DateTime<Utc>,
    /// Campaign day.
    pub day: u32,
    /// Where it happened.
    pub location: EntityId,
    /// Encounter category.
    pub category: EncounterCategory,
    /// Tactical action taken.
    pub action: ActionKind,
    /// Who was involved.
    pub participants: Vec<EntityId>,
    /// Scheduled event behind it, if any.
    #[serde(default)]
    pub event: Option<EntityId>,
    /// Outcome tier of the check.
    pub tier: OutcomeTier,
    /// Outcome text.
    pub description: String,
}

impl EncounterRecord {
    /// Identity of the encounter this record resolved.
    pub fn key(&self) -> EncounterKey {
        let mut participants = self.participants.clone();
        participants.sort();
        EncounterKey {
            day: self.day,
            location: self.location.clone(),
            category: self.category,
            participants,
            event: self.event.clone(),
        }
    }
}

/// Resolved encounters, oldest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EncounterHistory {
    records: Vec<EncounterRecord>,
}

impl EncounterHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record.
    pub fn push(&mut self, record: EncounterRecord) {
        self.records.push(record);
    }

    /// All records.
    pub fn records(&self) -> &[EncounterRecord] {
        &self.records
    }

    /// Whether the encounter identified by `key` was already resolved.
    pub fn has_resolved(&self, key: &EncounterKey) -> bool {
        self.records.iter().any(|r| &r.key() == key)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the history is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// One line per record.
    pub fn summary(&self) -> String {
        if self.records.is_empty() {
            return "No encounters resolved yet.".to_string();
        }
        let mut out = format!("Encounters ({}):\n", self.records.len());
        for (i, r) in self.records.iter().enumerate() {
            out.push_str(&format!(
                "  {}. Day {} at {}: {} ({}) -> {}\n",
                i + 1,
                r.day,
                r.location,
                r.category,
                r.action,
                r.tier
            ));
        }
        out.trim_end().to_string()
    }
}
