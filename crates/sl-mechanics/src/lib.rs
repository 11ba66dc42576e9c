//! Game mechanics for the Spielleiter session core.
//!
//! Provides dice notation parsing and rolling, validation of rolls against a
//! mandated requirement, outcome tiers, the tactical decision engine that
//! turns an encounter into a concrete check, and initiative ordering.

pub mod combat;
pub mod dice;
pub mod error;
pub mod resolution;
pub mod tactics;

pub use combat::{Combatant, CombatTracker, Side, initiative_order};
pub use dice::{
    DiceNotation, DiceRollResult, DiceSpecification, RequirementCheck, roll,
    validate_against_requirement,
};
pub use error::{MechError, MechResult};
pub use resolution::{OutcomeTier, ResolvedOutcome, resolve_outcome, resolve_roll};
pub use tactics::{
    ActionKind, Assessment, BehaviorProfile, Consequence, DifficultyModifiers, TacticalAction,
    TacticalDecision, analyze, assess, classify_behavior, compute_difficulty_class, consequence_for,
    select_check,
};
