use std::fmt;

use serde::{Deserialize, Serialize};
use sl_core::{EntityId, EventKind, Priority};

/// Broad category of an encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncounterCategory {
    /// Hostiles present.
    Combat,
    /// Someone to talk to.
    Social,
    /// A hazard.
    Trap,
    /// A story beat.
    Event,
}

impl From<EventKind> for EncounterCategory {
    fn from(kind: EventKind) -> Self {
        match kind {
            EventKind::Combat => Self::Combat,
            EventKind::Social => Self::Social,
            EventKind::Trap => Self::Trap,
            EventKind::Story => Self::Event,
        }
    }
}

impl fmt::Display for EncounterCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Combat => write!(f, "combat"),
            Self::Social => write!(f, "social"),
            Self::Trap => write!(f, "trap"),
            Self::Event => write!(f, "event"),
        }
    }
}

/// Which detector raised an encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncounterSource {
    /// Shared location.
    Spatial,
    /// Scheduled event.
    Temporal,
}

impl fmt::Display for EncounterSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spatial => write!(f, "spatial"),
            Self::Temporal => write!(f, "temporal"),
        }
    }
}

/// One detected encounter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterInfo {
    /// Broad category.
    pub category: EncounterCategory,
    /// Ids of the NPCs, enemies, or event participants involved.
    pub participants: Vec<EntityId>,
    /// Where the encounter happens.
    pub location: EntityId,
    /// Human-readable reasons, one per participant or event.
    pub triggers: Vec<String>,
    /// How urgently it needs a response.
    pub priority: Priority,
    /// Which detector raised it.
    pub source: EncounterSource,
    /// The scheduled event behind a temporal encounter.
    #[serde(default)]
    pub event: Option<EntityId>,
}

impl EncounterInfo {
    /// Identity of this encounter on `day`, used to avoid raising it twice.
    pub fn key(&self, day: u32) -> EncounterKey {
        let mut participants = self.participants.clone();
        participants.sort();
        EncounterKey {
            day,
            location: self.location.clone(),
            category: self.category,
            participants,
            event: self.event.clone(),
        }
    }
}

/// Identity of an encounter: the same participants in the same place on the
/// same day are the same encounter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EncounterKey {
    /// Campaign day.
    pub day: u32,
    /// Location id.
    pub location: EntityId,
    /// Category.
    pub category: EncounterCategory,
    /// Participant ids, sorted.
    pub participants: Vec<EntityId>,
    /// Scheduled event, if any.
    #[serde(default)]
    pub event: Option<EntityId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(participants: &[&str]) -> EncounterInfo {
        EncounterInfo {
            category: EncounterCategory::Combat,
            participants: participants.iter().map(|p| EntityId::new(*p)).collect(),
            location: EntityId::new("mill"),
            triggers: Vec::new(),
            priority: Priority::High,
            source: EncounterSource::Spatial,
            event: None,
        }
    }

    #[test]
    fn key_ignores_participant_order() {
        assert_eq!(info(&["a", "b"]).key(1), info(&["b", "a"]).key(1));
        assert_ne!(info(&["a", "b"]).key(1), info(&["a", "b"]).key(2));
        assert_ne!(info(&["a"]).key(1), info(&["a", "b"]).key(1));
    }

    #[test]
    fn story_events_are_event_category() {
        assert_eq!(EncounterCategory::from(EventKind::Story), EncounterCategory::Event);
        assert_eq!(EncounterCategory::from(EventKind::Trap), EncounterCategory::Trap);
    }
}
