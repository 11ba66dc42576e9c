//! Enemy behaviour profiles for narrative prompts.

use serde::{Deserialize, Serialize};
use sl_core::{CreatureType, EncounterContext, Enemy, Presence};

/// How an enemy is likely to act.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorProfile {
    /// Charges in.
    Aggressive,
    /// Badly hurt; holds back or flees.
    Defensive,
    /// Uses tricks and terrain.
    Cunning,
    /// Guards its ground.
    Territorial,
    /// Hunts the weakest.
    Predatory,
}

impl std::fmt::Display for BehaviorProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Aggressive => write!(f, "aggressive"),
            Self::Defensive => write!(f, "defensive"),
            Self::Cunning => write!(f, "cunning"),
            Self::Territorial => write!(f, "territorial"),
            Self::Predatory => write!(f, "predatory"),
        }
    }
}

/// Classify how `enemy` behaves in this situation. First matching rule wins.
pub fn classify_behavior(enemy: &Enemy, ctx: &EncounterContext) -> BehaviorProfile {
    if enemy.hp_ratio() < 0.25 {
        return BehaviorProfile::Defensive;
    }
    if enemy.abilities.intelligence >= 14 {
        return BehaviorProfile::Cunning;
    }
    match enemy.creature_type {
        CreatureType::Beast => BehaviorProfile::Predatory,
        CreatureType::Construct | CreatureType::Dragon
            if enemy.presence_at(&ctx.location().id) == Some(Presence::Stationed) =>
        {
            BehaviorProfile::Territorial
        }
        _ => BehaviorProfile::Aggressive,
    }
}
