use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

/// What kind of scheduled event this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A scripted fight.
    Combat,
    /// A meeting, festival, or audience.
    Social,
    /// A scripted hazard.
    Trap,
    /// A plot beat with no mechanical hook.
    #[default]
    Story,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Combat => write!(f, "combat"),
            Self::Social => write!(f, "social"),
            Self::Trap => write!(f, "trap"),
            Self::Story => write!(f, "story"),
        }
    }
}

/// An event bound to a campaign day and optionally a location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledEvent {
    /// Unique id.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Campaign day the event fires on.
    pub day: u32,
    /// Where the event happens. `None` means wherever the party is.
    #[serde(default)]
    pub location: Option<EntityId>,
    /// Event kind.
    #[serde(default)]
    pub kind: EventKind,
    /// Roster entries taking part.
    #[serde(default)]
    pub participants: Vec<EntityId>,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
}

impl ScheduledEvent {
    /// Whether the event fires on `day` at `location`.
    pub fn fires_at(&self, day: u32, location: &EntityId) -> bool {
        self.day == day && self.location.as_ref().is_none_or(|l| l == location)
    }
}
