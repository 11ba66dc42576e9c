//! Initiative ordering and turn tracking.
//!
//! Combatants are ordered by initiative score, highest first. Ties keep the
//! order the combatants were supplied in (party first, then enemies as named).

use serde::{Deserialize, Serialize};
use sl_core::{Character, Enemy, EntityId};

/// Which side a combatant fights on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// A party member.
    Party,
    /// An enemy.
    Enemy,
}

/// A participant in combat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    /// Roster id.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Initiative score (higher goes first).
    pub initiative: i32,
    /// Side the combatant fights on.
    pub side: Side,
}

impl Combatant {
    /// A party member, ordered by DEX score.
    pub fn from_character(character: &Character) -> Self {
        Self {
            id: character.id.clone(),
            name: character.name.clone(),
            initiative: character.initiative_score(),
            side: Side::Party,
        }
    }

    /// An enemy, ordered by DEX score.
    pub fn from_enemy(enemy: &Enemy) -> Self {
        Self {
            id: enemy.id.clone(),
            name: enemy.name.clone(),
            initiative: enemy.initiative_score(),
            side: Side::Enemy,
        }
    }
}

/// Ids of `participants`, sorted by initiative descending.
pub fn initiative_order(participants: &[Combatant]) -> Vec<EntityId> {
    let mut sorted: Vec<&Combatant> = participants.iter().collect();
    // sort_by is stable
    sorted.sort_by(|a, b| b.initiative.cmp(&a.initiative));
    sorted.into_iter().map(|c| c.id.clone()).collect()
}

/// Round counter and turn cursor over a fixed initiative order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatTracker {
    order: Vec<Combatant>,
    turn_index: usize,
    /// Current round number (1-based).
    pub round: u32,
}

impl CombatTracker {
    /// Order `participants` by initiative and start round 1.
    pub fn new(participants: Vec<Combatant>) -> Self {
        let mut order = participants;
        order.sort_by(|a, b| b.initiative.cmp(&a.initiative));
        Self {
            order,
            turn_index: 0,
            round: 1,
        }
    }

    /// Whose turn it is, if anyone is fighting.
    pub fn current(&self) -> Option<&Combatant> {
        self.order.get(self.turn_index)
    }

    /// Advance to the next turn. Returns true if a new round started.
    pub fn next_turn(&mut self) -> bool {
        if self.order.is_empty() {
            return false;
        }
        self.turn_index += 1;
        if self.turn_index >= self.order.len() {
            self.turn_index = 0;
            self.round += 1;
            true
        } else {
            false
        }
    }

    /// Combatants in turn order.
    pub fn combatants(&self) -> &[Combatant] {
        &self.order
    }

    /// Ids in turn order.
    pub fn order_ids(&self) -> Vec<EntityId> {
        self.order.iter().map(|c| c.id.clone()).collect()
    }
}
