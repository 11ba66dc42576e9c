//! Tactical decision engine.
//!
//! Given an [`EncounterContext`], weighs enemy strength against the party and
//! the terrain, picks one of six tactical actions, and attaches the exact
//! dice check the party must roll along with what success and failure do.
//!
//! # Policy
//!
//! With no enemies present the encounter is social: `Dialogue` if NPCs are
//! around, otherwise `Negotiate`. With enemies, first match wins:
//!
//! | Condition                           | Action   |
//! |-------------------------------------|----------|
//! | ratio > 2.0 and advantage < 0       | Escape   |
//! | ratio > 1.5 or advantage > 0.5      | Ambush   |
//! | location has traps                  | Trap     |
//! | otherwise                           | Combat   |
//!
//! `ratio` is enemy power over party power.

pub mod behavior;
pub mod check;
pub mod consequence;
pub mod difficulty;

pub use behavior::{BehaviorProfile, classify_behavior};
pub use check::select_check;
pub use consequence::{Consequence, consequence_for};
pub use difficulty::{DifficultyModifiers, compute_difficulty_class};

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use sl_core::{EncounterContext, LocationFeature, Priority};

use crate::dice::DiceSpecification;
use crate::resolution::OutcomeTier;

/// The six tactical actions, without their checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Enemies lie in wait.
    Ambush,
    /// The ground itself is dangerous.
    Trap,
    /// Talk, no roll needed.
    Dialogue,
    /// Straight fight.
    Combat,
    /// Get away.
    Escape,
    /// Talk down a hostile party.
    Negotiate,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ambush => write!(f, "ambush"),
            Self::Trap => write!(f, "trap"),
            Self::Dialogue => write!(f, "dialogue"),
            Self::Combat => write!(f, "combat"),
            Self::Escape => write!(f, "escape"),
            Self::Negotiate => write!(f, "negotiate"),
        }
    }
}

/// A tactical action together with its mandated check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TacticalAction {
    /// Spot the ambush.
    Ambush {
        /// Perception check.
        check: DiceSpecification,
    },
    /// Avoid the trap.
    Trap {
        /// Reflex check.
        check: DiceSpecification,
    },
    /// Talk it out.
    Dialogue,
    /// Fight.
    Combat {
        /// Initiative check.
        check: DiceSpecification,
    },
    /// Flee.
    Escape {
        /// Initiative check.
        check: DiceSpecification,
    },
    /// Parley.
    Negotiate {
        /// Persuasion check.
        check: DiceSpecification,
    },
}

impl TacticalAction {
    /// Pair `kind` with its check. `Dialogue` ignores the check; any other
    /// kind without one is `None`.
    pub fn with_check(kind: ActionKind, check: Option<DiceSpecification>) -> Option<Self> {
        match (kind, check) {
            (ActionKind::Dialogue, _) => Some(Self::Dialogue),
            (ActionKind::Ambush, Some(check)) => Some(Self::Ambush { check }),
            (ActionKind::Trap, Some(check)) => Some(Self::Trap { check }),
            (ActionKind::Combat, Some(check)) => Some(Self::Combat { check }),
            (ActionKind::Escape, Some(check)) => Some(Self::Escape { check }),
            (ActionKind::Negotiate, Some(check)) => Some(Self::Negotiate { check }),
            (_, None) => None,
        }
    }

    /// The kind of action.
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Ambush { .. } => ActionKind::Ambush,
            Self::Trap { .. } => ActionKind::Trap,
            Self::Dialogue => ActionKind::Dialogue,
            Self::Combat { .. } => ActionKind::Combat,
            Self::Escape { .. } => ActionKind::Escape,
            Self::Negotiate { .. } => ActionKind::Negotiate,
        }
    }

    /// The mandated check, if the action has one.
    pub fn check(&self) -> Option<&DiceSpecification> {
        match self {
            Self::Dialogue => None,
            Self::Ambush { check }
            | Self::Trap { check }
            | Self::Combat { check }
            | Self::Escape { check }
            | Self::Negotiate { check } => Some(check),
        }
    }
}

/// The numbers behind a decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    /// Combined enemy strength.
    pub enemy_power: f64,
    /// Combined party strength.
    pub party_power: f64,
    /// Terrain and conditions; positive favours the party.
    pub advantage: f64,
}

impl Assessment {
    /// Enemy power over party power; infinite when the party has none.
    pub fn ratio(&self) -> f64 {
        if self.party_power <= 0.0 {
            f64::INFINITY
        } else {
            self.enemy_power / self.party_power
        }
    }
}

/// The engine's judgement on one encounter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TacticalDecision {
    /// What the party faces, with its check.
    pub action: TacticalAction,
    /// Priority of the encounter judged.
    pub priority: Priority,
    /// Power assessment; absent for social encounters.
    pub assessment: Option<Assessment>,
    /// What a success does.
    pub on_success: Consequence,
    /// What a failure does.
    pub on_failure: Consequence,
}

impl TacticalDecision {
    /// The kind of action decided on.
    pub fn kind(&self) -> ActionKind {
        self.action.kind()
    }

    /// The mandated check, if any.
    pub fn check(&self) -> Option<&DiceSpecification> {
        self.action.check()
    }
}

/// Weigh the enemies present against the party. `None` when no enemies are present.
pub fn assess(ctx: &EncounterContext) -> Option<Assessment> {
    if ctx.enemies().is_empty() {
        return None;
    }

    let enemy_power = ctx
        .enemies()
        .iter()
        .map(|e| e.challenge_rating * 10.0 + e.hp as f64 + e.attack as f64 * 5.0)
        .sum();
    let party_power = ctx
        .characters()
        .iter()
        .map(|c| (c.level * 15) as f64 + c.hp as f64 + 3.0 * c.best_combat_stat() as f64)
        .sum();

    Some(Assessment {
        enemy_power,
        party_power,
        advantage: environmental_advantage(ctx),
    })
}

fn environmental_advantage(ctx: &EncounterContext) -> f64 {
    let location = ctx.location();
    let mut advantage = 0.0;
    if ctx.time_of_day().is_night() {
        advantage -= 0.2;
    }
    if location.weather.is_adverse() {
        advantage -= 0.3;
    }
    if location.has_feature(LocationFeature::DefensivePosition) {
        advantage += 0.5;
    }
    if location.has_feature(LocationFeature::NarrowPassage) {
        advantage += 0.3;
    }
    if location.has_feature(LocationFeature::OpenTerrain) {
        advantage -= 0.2;
    }
    advantage
}

fn choose_kind(ctx: &EncounterContext, assessment: Option<&Assessment>) -> ActionKind {
    let Some(a) = assessment else {
        return if ctx.npcs().is_empty() {
            ActionKind::Negotiate
        } else {
            ActionKind::Dialogue
        };
    };

    let ratio = a.ratio();
    if ratio > 2.0 && a.advantage < 0.0 {
        ActionKind::Escape
    } else if ratio > 1.5 || a.advantage > 0.5 {
        ActionKind::Ambush
    } else if ctx.location().has_feature(LocationFeature::Traps) {
        ActionKind::Trap
    } else {
        ActionKind::Combat
    }
}

/// Decide how the party faces the situation in `ctx`.
pub fn analyze(ctx: &EncounterContext, priority: Priority, rng: &mut StdRng) -> TacticalDecision {
    let assessment = assess(ctx);
    let kind = choose_kind(ctx, assessment.as_ref());
    let check = select_check(ctx, kind, rng);

    tracing::debug!(
        %kind,
        ?assessment,
        dc = check.as_ref().and_then(|c| c.difficulty),
        "tactical assessment"
    );

    let action = TacticalAction::with_check(kind, check).unwrap_or(TacticalAction::Dialogue);
    TacticalDecision {
        action,
        priority,
        assessment,
        on_success: consequence_for(kind, OutcomeTier::Success),
        on_failure: consequence_for(kind, OutcomeTier::Failure),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use sl_core::{
        AbilityScores, Character, Enemy, EntityId, Location, Npc, PartyStatus, TimeOfDay, Weather,
    };

    fn hero() -> Character {
        Character {
            id: EntityId::new("hero"),
            name: "Hero".to_string(),
            level: 3,
            hp: 30,
            max_hp: 30,
            abilities: AbilityScores {
                strength: 16,
                ..Default::default()
            },
        }
    }

    // Power: 3*15 + 30 + 3*16 = 123

    fn enemy(id: &str, hp: i32) -> Enemy {
        Enemy {
            id: EntityId::new(id),
            name: id.to_string(),
            creature_type: Default::default(),
            challenge_rating: 1.0,
            hp,
            max_hp: hp,
            attack: 2,
            abilities: AbilityScores::default(),
            location: Some(EntityId::new("here")),
            patrol_route: Vec::new(),
        }
    }

    fn ctx(location: Location, time: TimeOfDay) -> EncounterContext {
        EncounterContext::new(location, 1, time, PartyStatus::default()).with_characters(vec![hero()])
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn no_enemies_with_npcs_is_dialogue() {
        let c = ctx(Location::new("here", "Here"), TimeOfDay::Morning).with_npcs(vec![Npc {
            id: EntityId::new("bard"),
            name: "Bard".to_string(),
            location: EntityId::new("here"),
            role: None,
        }]);
        let d = analyze(&c, Priority::Medium, &mut rng());
        assert_eq!(d.action, TacticalAction::Dialogue);
        assert!(d.check().is_none());
        assert!(d.assessment.is_none());
    }

    #[test]
    fn no_one_present_is_negotiate() {
        let c = ctx(Location::new("here", "Here"), TimeOfDay::Morning);
        let d = analyze(&c, Priority::Low, &mut rng());
        assert_eq!(d.kind(), ActionKind::Negotiate);
        assert_eq!(d.check().map(|c| c.notation.as_str()), Some("1d20"));
    }

    #[test]
    fn overwhelming_odds_at_night_in_open_terrain_escape() {
        let mut loc = Location::new("here", "Here");
        loc.features.push(LocationFeature::OpenTerrain);
        // 3 * (10 + 100 + 10) = 360 vs 123
        let c = ctx(loc, TimeOfDay::Night).with_enemies(vec![
            enemy("a", 100),
            enemy("b", 100),
            enemy("c", 100),
        ]);
        let d = analyze(&c, Priority::High, &mut rng());
        assert_eq!(d.kind(), ActionKind::Escape);
        let a = d.assessment.unwrap();
        assert!(a.ratio() > 2.0);
        assert!(a.advantage < 0.0);
    }

    #[test]
    fn strong_enemies_in_good_weather_ambush() {
        // 10 + 190 + 10 = 210 vs 123: ratio ~1.7
        let c = ctx(Location::new("here", "Here"), TimeOfDay::Morning)
            .with_enemies(vec![enemy("ogre", 190)]);
        let d = analyze(&c, Priority::High, &mut rng());
        assert_eq!(d.kind(), ActionKind::Ambush);
        assert_eq!(d.check().and_then(|c| c.skill.as_deref()), Some("Perception"));
    }

    #[test]
    fn defensive_position_favours_ambush() {
        let mut loc = Location::new("here", "Here");
        loc.features.push(LocationFeature::DefensivePosition);
        loc.features.push(LocationFeature::NarrowPassage);
        let c = ctx(loc, TimeOfDay::Morning).with_enemies(vec![enemy("rat", 5)]);
        assert_eq!(analyze(&c, Priority::High, &mut rng()).kind(), ActionKind::Ambush);
    }

    #[test]
    fn traps_then_combat() {
        let mut loc = Location::new("here", "Here");
        loc.features.push(LocationFeature::Traps);
        let c = ctx(loc, TimeOfDay::Morning).with_enemies(vec![enemy("rat", 5)]);
        let d = analyze(&c, Priority::High, &mut rng());
        assert_eq!(d.kind(), ActionKind::Trap);
        assert!(!d.on_success.starts_combat);

        let c = ctx(Location::new("here", "Here"), TimeOfDay::Morning)
            .with_enemies(vec![enemy("rat", 5)]);
        let d = analyze(&c, Priority::High, &mut rng());
        assert_eq!(d.kind(), ActionKind::Combat);
        assert!(d.on_success.starts_combat);
        assert_eq!(d.priority, Priority::High);
    }

    #[test]
    fn empty_party_ratio_is_infinite() {
        let mut loc = Location::new("here", "Here");
        loc.weather = Weather::Fog;
        let c = EncounterContext::new(loc, 1, TimeOfDay::Morning, PartyStatus::default())
            .with_enemies(vec![enemy("rat", 5)]);
        let d = analyze(&c, Priority::High, &mut rng());
        assert!(d.assessment.unwrap().ratio().is_infinite());
        assert_eq!(d.kind(), ActionKind::Escape);
    }

    #[test]
    fn action_check_round_trip() {
        let spec = DiceSpecification::new("1d20", "x");
        let action = TacticalAction::with_check(ActionKind::Trap, Some(spec.clone())).unwrap();
        assert_eq!(action.kind(), ActionKind::Trap);
        assert_eq!(action.check(), Some(&spec));
        assert!(TacticalAction::with_check(ActionKind::Combat, None).is_none());
    }
}
