//! Dice notation, rolling, and mandated-roll validation.
//!
//! Notation follows the familiar `<count?>d<sides><(+|-)modifier?>` form:
//! `d20`, `2d6+3`, `4d8-1`. [`DiceNotation::parse`] never fails; text that
//! does not match falls back to a plain `1d20`. Callers that need to tell a
//! typo apart from a real d20 use [`DiceNotation::parse_strict`].

pub mod requirement;
pub mod roll;

pub use requirement::{DiceSpecification, RequirementCheck, validate_against_requirement};
pub use roll::DiceRollResult;

use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::error::{MechError, MechResult};

/// Largest number of dice a single notation may roll.
pub const MAX_DICE: u32 = 100;
/// Largest die a notation may name.
pub const MAX_SIDES: u32 = 1000;
/// Largest flat modifier, either sign.
pub const MAX_MODIFIER: i32 = 1000;

/// A parsed dice expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceNotation {
    /// Number of dice rolled.
    pub count: u32,
    /// Sides on each die.
    pub sides: u32,
    /// Flat modifier added to the sum.
    pub modifier: i32,
}

impl Default for DiceNotation {
    /// The fallback die: `1d20+0`.
    fn default() -> Self {
        Self {
            count: 1,
            sides: 20,
            modifier: 0,
        }
    }
}

impl DiceNotation {
    /// Parse notation, falling back to `1d20` when the text does not match.
    pub fn parse(text: &str) -> Self {
        match Self::parse_strict(text) {
            Ok(notation) => notation,
            Err(err) => {
                tracing::warn!(%err, "falling back to 1d20");
                Self::default()
            }
        }
    }

    /// Parse notation, reporting text that does not match as an error.
    pub fn parse_strict(text: &str) -> MechResult<Self> {
        let raw = parse_parts(text).ok_or_else(|| MechError::InvalidNotation(text.to_string()))?;
        if raw.count == 0 || raw.count > MAX_DICE {
            return Err(MechError::InvalidPool(format!(
                "{text}: dice count must be 1-{MAX_DICE}"
            )));
        }
        if raw.sides == 0 || raw.sides > MAX_SIDES {
            return Err(MechError::InvalidPool(format!(
                "{text}: sides must be 1-{MAX_SIDES}"
            )));
        }
        let modifier = i32::try_from(raw.modifier)
            .ok()
            .filter(|m| m.abs() <= MAX_MODIFIER)
            .ok_or_else(|| {
                MechError::InvalidPool(format!(
                    "{text}: modifier must be within -{MAX_MODIFIER}..+{MAX_MODIFIER}"
                ))
            })?;
        Ok(Self {
            count: raw.count,
            sides: raw.sides,
            modifier,
        })
    }
}

impl std::fmt::Display for DiceNotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)?;
        match self.modifier {
            0 => Ok(()),
            m if m > 0 => write!(f, "+{m}"),
            m => write!(f, "{m}"),
        }
    }
}

/// Notation as written, before range checks.
struct RawNotation {
    count: u32,
    sides: u32,
    modifier: i64,
}

fn parse_parts(text: &str) -> Option<RawNotation> {
    let s = text.trim().to_ascii_lowercase();
    let (count_str, rest) = s.split_once('d')?;
    let count = if count_str.is_empty() {
        1
    } else {
        parse_digits(count_str)?
    };

    let split = rest.find(['+', '-']).unwrap_or(rest.len());
    let (sides_str, modifier_str) = rest.split_at(split);
    let sides = parse_digits(sides_str)?;

    let modifier = if modifier_str.is_empty() {
        0
    } else {
        let (sign, digits) = modifier_str.split_at(1);
        let magnitude = i64::from(parse_digits(digits)?);
        if sign == "-" { -magnitude } else { magnitude }
    };

    Some(RawNotation {
        count,
        sides,
        modifier,
    })
}

fn parse_digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Roll `notation` and report every die.
///
/// Malformed notation rolls the fallback `1d20`; the result keeps the text
/// as given and is flagged [`DiceRollResult::defaulted`]. The result's
/// notation is what requirement validation compares, so a typo never
/// satisfies a mandated `1d20`.
pub fn roll(notation: &str, purpose: Option<&str>, rng: &mut StdRng) -> DiceRollResult {
    let (parsed, defaulted) = match DiceNotation::parse_strict(notation) {
        Ok(parsed) => (parsed, false),
        Err(err) => {
            tracing::warn!(%err, "falling back to 1d20");
            (DiceNotation::default(), true)
        }
    };

    let rolls: Vec<u32> = (0..parsed.count)
        .map(|_| rng.random_range(1..=parsed.sides))
        .collect();
    let total = rolls
        .iter()
        .fold(parsed.modifier, |acc, &r| acc.saturating_add_unsigned(r));

    DiceRollResult {
        notation: notation.trim().to_string(),
        rolls,
        total,
        purpose: purpose.map(str::to_string),
        modifier: parsed.modifier,
        defaulted,
    }
}
