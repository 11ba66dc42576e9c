//! Difficulty class adjustment.

use sl_core::{EncounterContext, ability_modifier};

/// Lowest difficulty class a check can have.
pub const MIN_DC: i32 = 5;
/// Highest difficulty class a check can have.
pub const MAX_DC: i32 = 30;

/// Extra adjustments supplied by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DifficultyModifiers {
    /// Flat environmental adjustment, e.g. from a GM ruling.
    pub environment: Option<i32>,
}

impl DifficultyModifiers {
    /// Modifiers with an environmental adjustment.
    pub fn with_environment(environment: i32) -> Self {
        Self {
            environment: Some(environment),
        }
    }
}

/// Average INT modifier of the enemies present, or `None` if there are none.
pub(crate) fn average_enemy_int_modifier(ctx: &EncounterContext) -> Option<i32> {
    let enemies = ctx.enemies();
    if enemies.is_empty() {
        return None;
    }
    let total: i32 = enemies.iter().map(|e| e.abilities.intelligence).sum();
    let average = total.div_euclid(enemies.len() as i32);
    Some(ability_modifier(average))
}

/// Adjust `base` for the situation and clamp into `[5, 30]`.
///
/// Adds the environmental modifier, the enemies' average INT modifier, +2
/// when the party's average HP is below 50, and +1 when morale is below 30.
pub fn compute_difficulty_class(
    base: i32,
    ctx: &EncounterContext,
    modifiers: &DifficultyModifiers,
) -> i32 {
    let mut dc = base.saturating_add(modifiers.environment.unwrap_or(0));

    if let Some(int_mod) = average_enemy_int_modifier(ctx) {
        dc = dc.saturating_add(int_mod);
    }

    let party = ctx.party();
    if party.average_hp < 50 {
        dc = dc.saturating_add(2);
    }
    if party.morale < 30 {
        dc = dc.saturating_add(1);
    }

    dc.clamp(MIN_DC, MAX_DC)
}
