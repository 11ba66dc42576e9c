//! Dice roll results.

use serde::{Deserialize, Serialize};

/// The outcome of rolling one dice expression. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRollResult {
    /// The notation as the roller named it.
    pub notation: String,
    /// Individual die values, in roll order.
    pub rolls: Vec<u32>,
    /// Sum of `rolls` plus `modifier`.
    pub total: i32,
    /// Why the roll was made.
    pub purpose: Option<String>,
    /// Flat modifier from the notation.
    pub modifier: i32,
    /// True when the notation did not parse and the fallback `1d20` was rolled.
    #[serde(default)]
    pub defaulted: bool,
}

impl DiceRollResult {
    /// Value of the first die, or 0 if nothing was rolled.
    pub fn natural(&self) -> u32 {
        self.rolls.first().copied().unwrap_or(0)
    }

    /// Sum of the dice without the modifier.
    pub fn dice_sum(&self) -> i32 {
        self.total - self.modifier
    }
}

impl std::fmt::Display for DiceRollResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values: Vec<String> = self.rolls.iter().map(|v| v.to_string()).collect();
        write!(f, "{}: [{}]", self.notation, values.join(", "))?;
        match self.modifier {
            0 => {}
            m if m > 0 => write!(f, " + {m}")?,
            m => write!(f, " - {}", -m)?,
        }
        write!(f, " = {}", self.total)
    }
}
