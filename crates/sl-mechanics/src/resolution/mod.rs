//! Scoring a check total against a difficulty class.
//!
//! Four tiers, evaluated in order:
//! - **Critical success**: a natural 20, or beating the DC by 10 or more
//! - **Critical failure**: a natural 1, or missing the DC by 10 or more
//! - **Success**: meeting the DC
//! - **Failure**: everything else
//!
//! The natural value is the face of the die before modifiers;
//! [`resolve_roll`] takes it separately from the modified total.

use serde::{Deserialize, Serialize};

use crate::tactics::ActionKind;

/// Die face that always counts as a critical success.
pub const NATURAL_MAX: u32 = 20;
/// Die face that always counts as a critical failure.
pub const NATURAL_MIN: u32 = 1;
/// Margin at which a result becomes critical either way.
pub const CRITICAL_MARGIN: i32 = 10;

/// The outcome tier of a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeTier {
    /// An exceptional success.
    CriticalSuccess,
    /// A standard success.
    Success,
    /// A standard failure.
    Failure,
    /// A catastrophic failure.
    CriticalFailure,
}

impl OutcomeTier {
    /// Whether the tier counts as a success.
    pub fn is_success(self) -> bool {
        matches!(self, Self::CriticalSuccess | Self::Success)
    }
}

impl std::fmt::Display for OutcomeTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CriticalSuccess => write!(f, "Critical Success"),
            Self::Success => write!(f, "Success"),
            Self::Failure => write!(f, "Failure"),
            Self::CriticalFailure => write!(f, "Critical Failure"),
        }
    }
}

/// A scored check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedOutcome {
    /// The tier reached.
    pub tier: OutcomeTier,
    /// Total minus difficulty.
    pub margin: i32,
    /// Narrative text for the tier and action.
    pub description: String,
}

/// Score a bare `total` against `dc`, reading the total as the die face.
pub fn resolve_outcome(total: i32, dc: i32, kind: ActionKind) -> ResolvedOutcome {
    let natural = u32::try_from(total).unwrap_or(0);
    resolve_roll(natural, total, dc, kind)
}

/// Score a modified `total` against `dc`, with crits decided by the
/// `natural` die face.
pub fn resolve_roll(natural: u32, total: i32, dc: i32, kind: ActionKind) -> ResolvedOutcome {
    let margin = total.saturating_sub(dc);
    let tier = if natural == NATURAL_MAX || margin >= CRITICAL_MARGIN {
        OutcomeTier::CriticalSuccess
    } else if natural == NATURAL_MIN || margin <= -CRITICAL_MARGIN {
        OutcomeTier::CriticalFailure
    } else if margin >= 0 {
        OutcomeTier::Success
    } else {
        OutcomeTier::Failure
    };

    ResolvedOutcome {
        tier,
        margin,
        description: outcome_text(kind, tier).to_string(),
    }
}

/// Narrative text for an action kind and tier.
///
/// Kinds without bespoke text share the generic lines.
pub fn outcome_text(kind: ActionKind, tier: OutcomeTier) -> &'static str {
    use ActionKind as A;
    use OutcomeTier as T;

    match (kind, tier) {
        (A::Ambush, T::CriticalSuccess) => {
            "You spot the ambush long before it springs and turn it on your attackers."
        }
        (A::Ambush, T::Success) => "You notice the trap in time; the ambushers lose surprise.",
        (A::Ambush, T::Failure) => "The ambush catches you off guard.",
        (A::Ambush, T::CriticalFailure) => {
            "You walk straight into the ambush and take the full brunt of it."
        }

        (A::Trap, T::CriticalSuccess) => "You leap clear and spot how to disarm the mechanism.",
        (A::Trap, T::Success) => "You dodge the trap just in time.",
        (A::Trap, T::Failure) => "The trap catches you and you take damage.",
        (A::Trap, T::CriticalFailure) => "The trap triggers fully and you are badly hurt.",

        (A::Combat, T::CriticalSuccess) => "You seize the initiative and strike first, hard.",
        (A::Combat, T::Success) => "You react quickly and act before your foes.",
        (A::Combat, T::Failure) => "Your enemies move before you can react.",
        (A::Combat, T::CriticalFailure) => "You are caught flat-footed as the enemy presses in.",

        (A::Escape, T::CriticalSuccess) => "You slip away cleanly and leave no trail.",
        (A::Escape, T::Success) => "You break contact and get away.",
        (A::Escape, T::Failure) => "Your retreat is cut off; you must fight.",
        (A::Escape, T::CriticalFailure) => "You stumble in the retreat and are surrounded.",

        (A::Negotiate, T::CriticalSuccess) => "Your words win them over completely.",
        (A::Negotiate, T::Success) => "They agree to your terms.",
        (A::Negotiate, T::Failure) => "They refuse to listen.",
        (A::Negotiate, T::CriticalFailure) => "Your words give offence and tempers flare.",

        (_, T::CriticalSuccess) => "A resounding success.",
        (_, T::Success) => "You succeed.",
        (_, T::Failure) => "You fail.",
        (_, T::CriticalFailure) => "A disastrous failure.",
    }
}
