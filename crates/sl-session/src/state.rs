//! The live session state.

use std::fmt;

use serde::{Deserialize, Serialize};
use sl_core::{EntityId, PartyStatus, TimeOfDay};
use sl_mechanics::CombatTracker;

use crate::config::SessionConfig;

/// Lifecycle phase of a session.
///
/// `Idle` → `Active` ⇄ `Combat` → `Archived`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Created, not yet begun.
    Idle,
    /// Exploring.
    Active,
    /// Fighting.
    Combat,
    /// Ended; read-only.
    Archived,
}

impl SessionPhase {
    /// Whether operations may run in this phase.
    pub fn is_live(self) -> bool {
        matches!(self, Self::Active | Self::Combat)
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Active => write!(f, "active"),
            Self::Combat => write!(f, "combat"),
            Self::Archived => write!(f, "archived"),
        }
    }
}

/// The one mutable game state of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionCurrentState {
    /// Lifecycle phase.
    pub phase: SessionPhase,
    /// Campaign day.
    pub day: u32,
    /// Time of day.
    pub time_of_day: TimeOfDay,
    /// Actions taken today.
    pub action_count: u32,
    /// Actions allowed per day.
    pub max_actions: u32,
    /// Where the party is.
    pub location: Option<EntityId>,
    /// Who acts next.
    pub selected_character: Option<EntityId>,
    /// Running combat, if any.
    pub combat: Option<CombatTracker>,
    /// Aggregate party status.
    pub party: PartyStatus,
}

impl SessionCurrentState {
    /// Idle state seeded from `config`.
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            phase: SessionPhase::Idle,
            day: config.starting_day.max(1),
            time_of_day: TimeOfDay::Morning,
            action_count: 0,
            max_actions: config.max_actions_per_day.max(1),
            location: None,
            selected_character: None,
            combat: None,
            party: config.party,
        }
    }

    /// Whether combat is running.
    pub fn in_combat(&self) -> bool {
        self.combat.is_some()
    }

    /// Turn order of the running combat; empty outside combat.
    pub fn initiative_order(&self) -> Vec<EntityId> {
        self.combat
            .as_ref()
            .map(CombatTracker::order_ids)
            .unwrap_or_default()
    }

    /// Actions left today.
    pub fn actions_remaining(&self) -> u32 {
        self.max_actions.saturating_sub(self.action_count)
    }
}
