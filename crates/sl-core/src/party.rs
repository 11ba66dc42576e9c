//! Aggregate party status.
//!
//! All three dimensions live on a 0-100 scale. Deltas are signed and every
//! application clamps back into range, so the status can never go negative
//! or exceed 100.

use serde::{Deserialize, Serialize};

/// Lower bound of every status dimension.
pub const STATUS_MIN: i32 = 0;
/// Upper bound of every status dimension.
pub const STATUS_MAX: i32 = 100;

/// The party's aggregate condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyStatus {
    /// Average hit points as a percentage.
    pub average_hp: i32,
    /// Supplies, ammunition, spell slots, as a percentage.
    pub resources: i32,
    /// Party morale.
    pub morale: i32,
}

impl Default for PartyStatus {
    fn default() -> Self {
        Self {
            average_hp: STATUS_MAX,
            resources: STATUS_MAX,
            morale: STATUS_MAX,
        }
    }
}

/// Signed changes to apply to a [`PartyStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusDelta {
    /// Change to average HP.
    pub hp: i32,
    /// Change to resources.
    pub resources: i32,
    /// Change to morale.
    pub morale: i32,
}

impl StatusDelta {
    /// A delta touching only HP.
    pub fn hp(hp: i32) -> Self {
        Self {
            hp,
            ..Self::default()
        }
    }

    /// A delta touching only morale.
    pub fn morale(morale: i32) -> Self {
        Self {
            morale,
            ..Self::default()
        }
    }
}

/// One dimension that actually moved after applying a delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    /// Which dimension changed.
    pub dimension: StatusDimension,
    /// Value before the change.
    pub from: i32,
    /// Value after clamping.
    pub to: i32,
}

/// Name of a party status dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusDimension {
    /// Average HP.
    Hp,
    /// Resources.
    Resources,
    /// Morale.
    Morale,
}

impl std::fmt::Display for StatusDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hp => write!(f, "HP"),
            Self::Resources => write!(f, "resources"),
            Self::Morale => write!(f, "morale"),
        }
    }
}

impl PartyStatus {
    /// Build a status, clamping each value into range.
    pub fn new(average_hp: i32, resources: i32, morale: i32) -> Self {
        Self {
            average_hp: clamp(average_hp),
            resources: clamp(resources),
            morale: clamp(morale),
        }
    }

    /// Apply a delta and return the dimensions whose value changed.
    pub fn apply(&mut self, delta: StatusDelta) -> Vec<StatusChange> {
        let mut changes = Vec::new();
        for (dimension, value, d) in [
            (StatusDimension::Hp, &mut self.average_hp, delta.hp),
            (StatusDimension::Resources, &mut self.resources, delta.resources),
            (StatusDimension::Morale, &mut self.morale, delta.morale),
        ] {
            let from = *value;
            let to = clamp(from.saturating_add(d));
            if to != from {
                *value = to;
                changes.push(StatusChange { dimension, from, to });
            }
        }
        changes
    }
}

fn clamp(value: i32) -> i32 {
    value.clamp(STATUS_MIN, STATUS_MAX)
}
