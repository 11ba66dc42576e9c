use sl_core::{EncounterContext, Presence, Priority};

use crate::encounter::{EncounterCategory, EncounterInfo, EncounterSource};

/// Encounters with whoever shares the party's location.
///
/// Nothing is raised while no party member is present. Otherwise all enemies
/// present form one high-priority combat encounter, and all NPCs present form
/// one medium-priority social encounter.
pub fn detect_spatial_collisions(ctx: &EncounterContext) -> Vec<EncounterInfo> {
    let mut encounters = Vec::new();
    if ctx.characters().is_empty() {
        return encounters;
    }

    let location = ctx.location();

    if !ctx.enemies().is_empty() {
        let triggers = ctx
            .enemies()
            .iter()
            .map(|e| match e.presence_at(&location.id) {
                Some(Presence::Patrolling) => {
                    format!("{} patrols through {}", e.name, location.name)
                }
                _ => format!("{} is stationed at {}", e.name, location.name),
            })
            .collect();
        encounters.push(EncounterInfo {
            category: EncounterCategory::Combat,
            participants: ctx.enemies().iter().map(|e| e.id.clone()).collect(),
            location: location.id.clone(),
            triggers,
            priority: Priority::High,
            source: EncounterSource::Spatial,
            event: None,
        });
    }

    if !ctx.npcs().is_empty() {
        let triggers = ctx
            .npcs()
            .iter()
            .map(|n| match &n.role {
                Some(role) => format!("{} ({role}) is at {}", n.name, location.name),
                None => format!("{} is at {}", n.name, location.name),
            })
            .collect();
        encounters.push(EncounterInfo {
            category: EncounterCategory::Social,
            participants: ctx.npcs().iter().map(|n| n.id.clone()).collect(),
            location: location.id.clone(),
            triggers,
            priority: Priority::Medium,
            source: EncounterSource::Spatial,
            event: None,
        });
    }

    encounters
}

#[cfg(test)]
mod tests {
    use super::*;
    use sl_core::{
        AbilityScores, Character, Enemy, EntityId, Location, Npc, PartyStatus, TimeOfDay,
    };

    fn hero() -> Character {
        Character {
            id: EntityId::new("aria"),
            name: "Aria".to_string(),
            level: 1,
            hp: 10,
            max_hp: 10,
            abilities: AbilityScores::default(),
        }
    }

    fn scout() -> Enemy {
        Enemy {
            id: EntityId::new("scout"),
            name: "Goblin Scout".to_string(),
            creature_type: Default::default(),
            challenge_rating: 0.25,
            hp: 7,
            max_hp: 7,
            attack: 4,
            abilities: AbilityScores::default(),
            location: None,
            patrol_route: vec![EntityId::new("mill")],
        }
    }

    fn miller() -> Npc {
        Npc {
            id: EntityId::new("miller"),
            name: "Old Hans".to_string(),
            location: EntityId::new("mill"),
            role: Some("miller".to_string()),
        }
    }

    fn ctx() -> EncounterContext {
        EncounterContext::new(
            Location::new("mill", "Old Mill"),
            1,
            TimeOfDay::Morning,
            PartyStatus::default(),
        )
    }

    #[test]
    fn enemies_and_npcs() {
        let c = ctx()
            .with_characters(vec![hero()])
            .with_enemies(vec![scout()])
            .with_npcs(vec![miller()]);
        let found = detect_spatial_collisions(&c);
        assert_eq!(found.len(), 2);

        assert_eq!(found[0].category, EncounterCategory::Combat);
        assert_eq!(found[0].priority, Priority::High);
        assert_eq!(found[0].participants, vec![EntityId::new("scout")]);
        assert_eq!(found[0].triggers, vec!["Goblin Scout patrols through Old Mill"]);

        assert_eq!(found[1].category, EncounterCategory::Social);
        assert_eq!(found[1].priority, Priority::Medium);
        assert_eq!(found[1].triggers, vec!["Old Hans (miller) is at Old Mill"]);
    }

    #[test]
    fn nothing_without_party() {
        let c = ctx().with_enemies(vec![scout()]).with_npcs(vec![miller()]);
        assert!(detect_spatial_collisions(&c).is_empty());
    }

    #[test]
    fn empty_location() {
        let c = ctx().with_characters(vec![hero()]);
        assert!(detect_spatial_collisions(&c).is_empty());
    }
}
