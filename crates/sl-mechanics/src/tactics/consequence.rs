//! What a resolved check does to the party.

use serde::{Deserialize, Serialize};
use sl_core::StatusDelta;

use super::ActionKind;
use crate::resolution::OutcomeTier;

/// The effect of one outcome tier on the party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consequence {
    /// Tier this consequence belongs to.
    pub tier: OutcomeTier,
    /// Change to party status.
    pub delta: StatusDelta,
    /// Whether combat begins with the encounter's enemies.
    pub starts_combat: bool,
    /// Short summary for the message log.
    pub description: String,
}

/// Map an action kind and tier to its consequence.
pub fn consequence_for(kind: ActionKind, tier: OutcomeTier) -> Consequence {
    let delta = match tier {
        OutcomeTier::CriticalSuccess => StatusDelta::morale(10),
        OutcomeTier::Success => StatusDelta::morale(5),
        OutcomeTier::Failure => StatusDelta {
            hp: -10,
            resources: 0,
            morale: -5,
        },
        OutcomeTier::CriticalFailure => StatusDelta {
            hp: -20,
            resources: -10,
            morale: -10,
        },
    };

    let starts_combat = match kind {
        ActionKind::Combat | ActionKind::Ambush => true,
        ActionKind::Escape | ActionKind::Negotiate => !tier.is_success(),
        ActionKind::Trap | ActionKind::Dialogue => false,
    };

    let description = if starts_combat {
        format!("{kind}: {tier}; combat begins")
    } else {
        format!("{kind}: {tier}")
    };

    Consequence {
        tier,
        delta,
        starts_combat,
        description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deltas_per_tier() {
        assert_eq!(
            consequence_for(ActionKind::Trap, OutcomeTier::CriticalSuccess).delta,
            StatusDelta::morale(10)
        );
        assert_eq!(
            consequence_for(ActionKind::Trap, OutcomeTier::Failure).delta,
            StatusDelta {
                hp: -10,
                resources: 0,
                morale: -5
            }
        );
        assert_eq!(
            consequence_for(ActionKind::Trap, OutcomeTier::CriticalFailure)
                .delta
                .resources,
            -10
        );
    }

    #[test]
    fn combat_entry() {
        assert!(consequence_for(ActionKind::Combat, OutcomeTier::Success).starts_combat);
        assert!(consequence_for(ActionKind::Ambush, OutcomeTier::CriticalSuccess).starts_combat);
        assert!(!consequence_for(ActionKind::Escape, OutcomeTier::Success).starts_combat);
        assert!(consequence_for(ActionKind::Escape, OutcomeTier::Failure).starts_combat);
        assert!(consequence_for(ActionKind::Negotiate, OutcomeTier::CriticalFailure).starts_combat);
        assert!(!consequence_for(ActionKind::Trap, OutcomeTier::CriticalFailure).starts_combat);
        assert!(!consequence_for(ActionKind::Dialogue, OutcomeTier::Failure).starts_combat);
    }

    #[test]
    fn description_mentions_combat() {
        let c = consequence_for(ActionKind::Escape, OutcomeTier::Failure);
        assert_eq!(c.description, "escape: Failure; combat begins");
    }
}
