use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier for every roster entry (characters, NPCs, enemies, locations, events).
///
/// Roster files use short human-written slugs such as `"goblin-scout"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    /// Wrap an existing slug.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One of the six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ability {
    /// Strength.
    Strength,
    /// Dexterity.
    Dexterity,
    /// Constitution.
    Constitution,
    /// Intelligence.
    Intelligence,
    /// Wisdom.
    Wisdom,
    /// Charisma.
    Charisma,
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strength => write!(f, "STR"),
            Self::Dexterity => write!(f, "DEX"),
            Self::Constitution => write!(f, "CON"),
            Self::Intelligence => write!(f, "INT"),
            Self::Wisdom => write!(f, "WIS"),
            Self::Charisma => write!(f, "CHA"),
        }
    }
}

/// The six ability scores. Missing scores default to 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityScores {
    /// Strength score.
    pub strength: i32,
    /// Dexterity score.
    pub dexterity: i32,
    /// Constitution score.
    pub constitution: i32,
    /// Intelligence score.
    pub intelligence: i32,
    /// Wisdom score.
    pub wisdom: i32,
    /// Charisma score.
    pub charisma: i32,
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self {
            strength: 10,
            dexterity: 10,
            constitution: 10,
            intelligence: 10,
            wisdom: 10,
            charisma: 10,
        }
    }
}

impl AbilityScores {
    /// The raw score for an ability.
    pub fn score(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    /// The modifier for an ability: `floor((score - 10) / 2)`.
    pub fn modifier(&self, ability: Ability) -> i32 {
        ability_modifier(self.score(ability))
    }
}

/// `floor((score - 10) / 2)`, rounding toward negative infinity.
pub fn ability_modifier(score: i32) -> i32 {
    (score - 10).div_euclid(2)
}

/// A player character in the party.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    /// Unique id.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Character level.
    #[serde(default = "default_level")]
    pub level: u32,
    /// Current hit points.
    pub hp: i32,
    /// Maximum hit points.
    pub max_hp: i32,
    /// Ability scores.
    #[serde(default)]
    pub abilities: AbilityScores,
}

fn default_level() -> u32 {
    1
}

impl Character {
    /// The stat used to order this character in initiative.
    pub fn initiative_score(&self) -> i32 {
        self.abilities.dexterity
    }

    /// Best of STR, DEX, and INT; the character's strongest combat stat.
    pub fn best_combat_stat(&self) -> i32 {
        self.abilities
            .strength
            .max(self.abilities.dexterity)
            .max(self.abilities.intelligence)
    }
}

/// A non-player character registered at a location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Npc {
    /// Unique id.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Where the NPC can be found.
    pub location: EntityId,
    /// Free-text role, e.g. "innkeeper".
    #[serde(default)]
    pub role: Option<String>,
}

/// Broad creature category for an enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreatureType {
    /// Goblins, bandits, cultists.
    #[default]
    Humanoid,
    /// Wolves, bears, giant spiders.
    Beast,
    /// Skeletons, ghouls.
    Undead,
    /// Golems and animated guardians.
    Construct,
    /// Dragons and drakes.
    Dragon,
    /// Anything else.
    Monstrosity,
}

impl fmt::Display for CreatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Humanoid => write!(f, "humanoid"),
            Self::Beast => write!(f, "beast"),
            Self::Undead => write!(f, "undead"),
            Self::Construct => write!(f, "construct"),
            Self::Dragon => write!(f, "dragon"),
            Self::Monstrosity => write!(f, "monstrosity"),
        }
    }
}

/// How an enemy is present at a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Registered at the location.
    Stationed,
    /// Passes through the location on its patrol route.
    Patrolling,
}

/// A hostile creature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    /// Unique id.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Creature category.
    #[serde(default)]
    pub creature_type: CreatureType,
    /// Challenge rating; fractional ratings such as 0.25 are allowed.
    #[serde(default)]
    pub challenge_rating: f64,
    /// Current hit points.
    pub hp: i32,
    /// Maximum hit points.
    pub max_hp: i32,
    /// Attack bonus.
    #[serde(default)]
    pub attack: i32,
    /// Ability scores.
    #[serde(default)]
    pub abilities: AbilityScores,
    /// Location the enemy is stationed at, if any.
    #[serde(default)]
    pub location: Option<EntityId>,
    /// Locations the enemy patrols through, in order.
    #[serde(default)]
    pub patrol_route: Vec<EntityId>,
}

impl Enemy {
    /// How this enemy is present at `location`, if at all.
    pub fn presence_at(&self, location: &EntityId) -> Option<Presence> {
        if self.location.as_ref() == Some(location) {
            Some(Presence::Stationed)
        } else if self.patrol_route.contains(location) {
            Some(Presence::Patrolling)
        } else {
            None
        }
    }

    /// The stat used to order this enemy in initiative.
    pub fn initiative_score(&self) -> i32 {
        self.abilities.dexterity
    }

    /// Current HP as a fraction of maximum, in `[0, 1]`.
    pub fn hp_ratio(&self) -> f64 {
        if self.max_hp <= 0 {
            return 0.0;
        }
        (self.hp as f64 / self.max_hp as f64).clamp(0.0, 1.0)
    }
}
