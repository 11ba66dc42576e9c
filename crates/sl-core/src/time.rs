use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Part of the in-game day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    /// Dawn until noon. Every new day starts here.
    #[default]
    Morning,
    /// Noon until dusk.
    Afternoon,
    /// Dusk.
    Evening,
    /// Darkness.
    Night,
}

impl TimeOfDay {
    /// The next part of the day. Night wraps to morning.
    pub fn next(self) -> Self {
        match self {
            Self::Morning => Self::Afternoon,
            Self::Afternoon => Self::Evening,
            Self::Evening => Self::Night,
            Self::Night => Self::Morning,
        }
    }

    /// Whether it is dark.
    pub fn is_night(self) -> bool {
        matches!(self, Self::Night)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Morning => write!(f, "morning"),
            Self::Afternoon => write!(f, "afternoon"),
            Self::Evening => write!(f, "evening"),
            Self::Night => write!(f, "night"),
        }
    }
}

impl FromStr for TimeOfDay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "morning" => Ok(Self::Morning),
            "afternoon" => Ok(Self::Afternoon),
            "evening" => Ok(Self::Evening),
            "night" => Ok(Self::Night),
            other => Err(format!("unknown time of day: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_wraps() {
        assert_eq!(TimeOfDay::Morning.next(), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::Night.next(), TimeOfDay::Morning);
    }

    #[test]
    fn parse() {
        assert_eq!("Night".parse::<TimeOfDay>(), Ok(TimeOfDay::Night));
        assert!("noon".parse::<TimeOfDay>().is_err());
    }
}
