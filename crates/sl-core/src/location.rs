use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

/// A tactical feature of a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationFeature {
    /// Walls, high ground, or fortifications the party can hold.
    DefensivePosition,
    /// A chokepoint that limits how many foes can engage.
    NarrowPassage,
    /// Open ground with no cover.
    OpenTerrain,
    /// The location is known to be trapped.
    Traps,
}

impl fmt::Display for LocationFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DefensivePosition => write!(f, "defensive position"),
            Self::NarrowPassage => write!(f, "narrow passage"),
            Self::OpenTerrain => write!(f, "open terrain"),
            Self::Traps => write!(f, "traps"),
        }
    }
}

/// Current weather at a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    /// No weather effects.
    #[default]
    Clear,
    /// Rain.
    Rain,
    /// Storm.
    Storm,
    /// Fog.
    Fog,
    /// Snow.
    Snow,
}

impl Weather {
    /// Whether the weather hampers the party.
    pub fn is_adverse(self) -> bool {
        !matches!(self, Self::Clear)
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clear => write!(f, "clear"),
            Self::Rain => write!(f, "rain"),
            Self::Storm => write!(f, "storm"),
            Self::Fog => write!(f, "fog"),
            Self::Snow => write!(f, "snow"),
        }
    }
}

/// A place the party can be.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    /// Unique id.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Tactical features.
    #[serde(default)]
    pub features: Vec<LocationFeature>,
    /// Current weather.
    #[serde(default)]
    pub weather: Weather,
}

impl Location {
    /// Create a featureless location with clear weather.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(id),
            name: name.into(),
            features: Vec::new(),
            weather: Weather::Clear,
        }
    }

    /// Whether the location has the given feature.
    pub fn has_feature(&self, feature: LocationFeature) -> bool {
        self.features.contains(&feature)
    }
}
