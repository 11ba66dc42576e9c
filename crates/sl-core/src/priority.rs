use std::fmt;

use serde::{Deserialize, Serialize};

/// How urgently an encounter or decision demands a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Resolve now; may arm the mandatory-dice gate.
    High,
    /// Surface to the players.
    Medium,
    /// Background.
    Low,
}

impl Priority {
    /// Numeric rank used for ordering: high 3, medium 2, low 1.
    pub fn rank(self) -> u8 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}
