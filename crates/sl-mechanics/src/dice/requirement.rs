//! Dice requirements and validation of submitted rolls.

use serde::{Deserialize, Serialize};
use sl_core::EntityId;

use super::roll::DiceRollResult;

/// A request for a specific roll: what to roll, why, and against what.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceSpecification {
    /// Exact notation the roller must use.
    pub notation: String,
    /// Modifier added to the roll total before comparing with the difficulty.
    pub modifier: i32,
    /// Why the check is being made.
    pub reason: String,
    /// Target the modified total must meet or beat.
    pub difficulty: Option<i32>,
    /// Skill being tested.
    pub skill: Option<String>,
    /// Character who must roll.
    pub character: Option<EntityId>,
}

impl DiceSpecification {
    /// A bare requirement with no modifier, difficulty, skill, or owner.
    pub fn new(notation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            notation: notation.into(),
            modifier: 0,
            reason: reason.into(),
            difficulty: None,
            skill: None,
            character: None,
        }
    }

    /// Set the modifier.
    pub fn with_modifier(mut self, modifier: i32) -> Self {
        self.modifier = modifier;
        self
    }

    /// Set the difficulty class.
    pub fn with_difficulty(mut self, difficulty: i32) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    /// Set the skill.
    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.skill = Some(skill.into());
        self
    }

    /// Set the character who must roll.
    pub fn with_character(mut self, character: EntityId) -> Self {
        self.character = Some(character);
        self
    }
}

impl std::fmt::Display for DiceSpecification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.notation)?;
        if self.modifier != 0 {
            write!(f, " ({:+})", self.modifier)?;
        }
        if let Some(skill) = &self.skill {
            write!(f, " {skill}")?;
        }
        if let Some(dc) = self.difficulty {
            write!(f, " vs DC {dc}")?;
        }
        write!(f, ": {}", self.reason)
    }
}

/// Whether a submitted roll satisfies a requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequirementCheck {
    /// The roll used exactly the required notation.
    Satisfied,
    /// The roll used different notation; the roller must roll again.
    Mismatch {
        /// Notation the requirement named.
        expected: String,
        /// Notation that was rolled.
        actual: String,
    },
}

impl RequirementCheck {
    /// True for [`RequirementCheck::Satisfied`].
    pub fn is_satisfied(&self) -> bool {
        matches!(self, Self::Satisfied)
    }
}

/// Check that `result` was rolled with exactly the notation `spec` names.
///
/// Only the notation string is compared. Matching totals do not count, and
/// `d20` does not satisfy a requirement for `1d20`.
pub fn validate_against_requirement(
    result: &DiceRollResult,
    spec: &DiceSpecification,
) -> RequirementCheck {
    if result.notation == spec.notation {
        RequirementCheck::Satisfied
    } else {
        RequirementCheck::Mismatch {
            expected: spec.notation.clone(),
            actual: result.notation.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(notation: &str, total: i32) -> DiceRollResult {
        DiceRollResult {
            notation: notation.to_string(),
            rolls: vec![total as u32],
            total,
            purpose: None,
            modifier: 0,
            defaulted: false,
        }
    }

    #[test]
    fn exact_notation_satisfies() {
        let spec = DiceSpecification::new("1d20", "perception");
        assert!(validate_against_requirement(&result("1d20", 3), &spec).is_satisfied());
    }

    #[test]
    fn different_notation_mismatches_even_with_same_total() {
        let spec = DiceSpecification::new("1d20", "perception");
        assert_eq!(
            validate_against_requirement(&result("2d6", 12), &spec),
            RequirementCheck::Mismatch {
                expected: "1d20".to_string(),
                actual: "2d6".to_string(),
            }
        );
        assert!(!validate_against_requirement(&result("d20", 12), &spec).is_satisfied());
    }

    #[test]
    fn display() {
        let spec = DiceSpecification::new("1d20", "spot the ambush")
            .with_modifier(2)
            .with_skill("Perception")
            .with_difficulty(16);
        assert_eq!(spec.to_string(), "1d20 (+2) Perception vs DC 16: spot the ambush");
    }
}
