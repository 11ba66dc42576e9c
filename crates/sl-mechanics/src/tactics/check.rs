//! Choosing the dice check for a tactical action.

use rand::Rng;
use rand::rngs::StdRng;
use sl_core::{Ability, EncounterContext, ability_modifier};

use super::ActionKind;
use super::difficulty::{DifficultyModifiers, average_enemy_int_modifier, compute_difficulty_class};
use crate::dice::DiceSpecification;

const CHECK_DIE: &str = "1d20";

/// The check a party must roll for `kind`, or `None` for plain dialogue.
pub fn select_check(
    ctx: &EncounterContext,
    kind: ActionKind,
    rng: &mut StdRng,
) -> Option<DiceSpecification> {
    let (base, modifier, skill, reason) = match kind {
        ActionKind::Dialogue => return None,
        ActionKind::Ambush => (
            15 + (ctx.enemies().len() / 2) as i32,
            average_modifier(ctx, Ability::Wisdom),
            "Perception",
            "Spot the ambush before it springs",
        ),
        ActionKind::Trap => (
            12 + rng.random_range(0..=3_i32),
            average_modifier(ctx, Ability::Dexterity),
            "Reflex",
            "Avoid the trap",
        ),
        ActionKind::Negotiate => (
            10 + average_enemy_int_modifier(ctx).unwrap_or(0),
            best_modifier(ctx, Ability::Charisma),
            "Persuasion",
            "Talk your way out of the fight",
        ),
        ActionKind::Combat => (
            10,
            average_modifier(ctx, Ability::Dexterity),
            "Initiative",
            "Act before your enemies",
        ),
        ActionKind::Escape => (
            10,
            average_modifier(ctx, Ability::Dexterity),
            "Initiative",
            "Break away before you are caught",
        ),
    };

    let dc = compute_difficulty_class(base, ctx, &DifficultyModifiers::default());
    Some(
        DiceSpecification::new(CHECK_DIE, reason)
            .with_modifier(modifier)
            .with_skill(skill)
            .with_difficulty(dc),
    )
}

/// Modifier of the party's average score for `ability`; 0 with nobody present.
fn average_modifier(ctx: &EncounterContext, ability: Ability) -> i32 {
    let characters = ctx.characters();
    if characters.is_empty() {
        return 0;
    }
    let total: i32 = characters.iter().map(|c| c.abilities.score(ability)).sum();
    ability_modifier(total.div_euclid(characters.len() as i32))
}

fn best_modifier(ctx: &EncounterContext, ability: Ability) -> i32 {
    ctx.characters()
        .iter()
        .map(|c| c.abilities.modifier(ability))
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use sl_core::{AbilityScores, Character, Enemy, EntityId, Location, PartyStatus, TimeOfDay};

    fn hero(id: &str, wis: i32, dex: i32, cha: i32) -> Character {
        Character {
            id: EntityId::new(id),
            name: id.to_string(),
            level: 2,
            hp: 20,
            max_hp: 20,
            abilities: AbilityScores {
                wisdom: wis,
                dexterity: dex,
                charisma: cha,
                ..Default::default()
            },
        }
    }

    fn goblin(id: &str) -> Enemy {
        Enemy {
            id: EntityId::new(id),
            name: "Goblin".to_string(),
            creature_type: Default::default(),
            challenge_rating: 0.25,
            hp: 7,
            max_hp: 7,
            attack: 4,
            abilities: AbilityScores::default(),
            location: None,
            patrol_route: Vec::new(),
        }
    }

    fn ctx() -> EncounterContext {
        EncounterContext::new(
            Location::new("road", "Road"),
            1,
            TimeOfDay::Morning,
            PartyStatus::default(),
        )
        .with_characters(vec![hero("a", 14, 12, 8), hero("b", 12, 16, 16)])
        .with_enemies(vec![goblin("g1"), goblin("g2"), goblin("g3")])
    }

    #[test]
    fn ambush_uses_perception() {
        let mut rng = StdRng::seed_from_u64(1);
        let check = select_check(&ctx(), ActionKind::Ambush, &mut rng).unwrap();
        assert_eq!(check.notation, "1d20");
        assert_eq!(check.skill.as_deref(), Some("Perception"));
        // average WIS 13 -> +1
        assert_eq!(check.modifier, 1);
        // 15 + 3/2
        assert_eq!(check.difficulty, Some(16));
    }

    #[test]
    fn trap_dc_in_range() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let check = select_check(&ctx(), ActionKind::Trap, &mut rng).unwrap();
            let dc = check.difficulty.unwrap();
            assert!((12..=15).contains(&dc), "dc {dc}");
            assert_eq!(check.skill.as_deref(), Some("Reflex"));
            assert_eq!(check.modifier, 2);
        }
    }

    #[test]
    fn negotiate_uses_best_charisma() {
        let mut rng = StdRng::seed_from_u64(1);
        let check = select_check(&ctx(), ActionKind::Negotiate, &mut rng).unwrap();
        assert_eq!(check.skill.as_deref(), Some("Persuasion"));
        assert_eq!(check.modifier, 3);
        assert_eq!(check.difficulty, Some(10));
    }

    #[test]
    fn combat_and_escape_roll_initiative() {
        let mut rng = StdRng::seed_from_u64(1);
        for kind in [ActionKind::Combat, ActionKind::Escape] {
            let check = select_check(&ctx(), kind, &mut rng).unwrap();
            assert_eq!(check.skill.as_deref(), Some("Initiative"));
            assert_eq!(check.difficulty, Some(10));
        }
    }

    #[test]
    fn dialogue_has_no_check() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(select_check(&ctx(), ActionKind::Dialogue, &mut rng).is_none());
    }
}
