//! The mandatory-dice gate.
//!
//! When a high-priority encounter demands a check, the gate is armed with the
//! exact [`DiceSpecification`] the party must roll. Only a roll with that
//! notation clears it. Encounters raised while the gate is armed wait in a
//! queue and are armed one at a time, in the order they arrived.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use sl_encounter::{EncounterInfo, EncounterKey};
use sl_mechanics::{Consequence, DiceSpecification, ResolvedOutcome, TacticalDecision};

use crate::journal::EncounterRecord;

/// An encounter waiting on a mandated roll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingCheck {
    /// Identity of the encounter.
    pub key: EncounterKey,
    /// The encounter itself.
    pub encounter: EncounterInfo,
    /// The engine's decision for it.
    pub decision: TacticalDecision,
    /// The roll that clears it.
    pub requirement: DiceSpecification,
}

/// What happened when a check was offered to the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOffer {
    /// The gate was empty and is now armed with the check.
    Armed,
    /// The gate was busy; the check waits at this queue position (1-based).
    Queued(usize),
}

/// Holds at most one armed requirement plus a queue of waiting ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiceGate {
    pending: Option<PendingCheck>,
    attempts: u32,
    queue: VecDeque<PendingCheck>,
}

impl DiceGate {
    /// An empty gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a requirement is armed.
    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    /// The armed check.
    pub fn pending(&self) -> Option<&PendingCheck> {
        self.pending.as_ref()
    }

    /// The armed requirement.
    pub fn requirement(&self) -> Option<&DiceSpecification> {
        self.pending.as_ref().map(|p| &p.requirement)
    }

    /// Rejected submissions against the armed requirement.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Checks waiting behind the armed one.
    pub fn queued(&self) -> impl Iterator<Item = &PendingCheck> {
        self.queue.iter()
    }

    /// Whether an encounter is armed or queued.
    pub fn contains(&self, key: &EncounterKey) -> bool {
        self.pending.iter().chain(self.queue.iter()).any(|p| &p.key == key)
    }

    /// Arm `check` if the gate is empty, otherwise queue it.
    pub fn offer(&mut self, check: PendingCheck) -> GateOffer {
        if self.pending.is_none() {
            self.pending = Some(check);
            self.attempts = 0;
            GateOffer::Armed
        } else {
            self.queue.push_back(check);
            GateOffer::Queued(self.queue.len())
        }
    }

    /// Count a rejected submission. Returns the new attempt count.
    pub fn record_mismatch(&mut self) -> u32 {
        self.attempts += 1;
        self.attempts
    }

    /// Clear the armed check and arm the next queued one.
    ///
    /// Returns the cleared check; the newly armed one is available through
    /// [`DiceGate::pending`].
    pub fn clear(&mut self) -> Option<PendingCheck> {
        let cleared = self.pending.take();
        self.attempts = 0;
        self.pending = self.queue.pop_front();
        cleared
    }
}

/// The result of submitting a mandated roll.
#[derive(Debug, Clone)]
pub enum GateOutcome {
    /// The notation did not match; the gate stays armed.
    Rejected {
        /// Notation that was required.
        expected: String,
        /// Notation that was rolled.
        actual: String,
        /// Rejected attempts so far.
        attempts: u32,
    },
    /// The roll matched and the encounter was resolved.
    Resolved(Box<Resolution>),
}

/// Everything a successful submission changed.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Modified total compared with the difficulty.
    pub total: i32,
    /// Difficulty class the total was compared with.
    pub difficulty: i32,
    /// Scored outcome.
    pub outcome: ResolvedOutcome,
    /// Consequence applied to the party.
    pub consequence: Consequence,
    /// Whether combat started.
    pub combat_started: bool,
    /// Record appended to the encounter history.
    pub record: EncounterRecord,
    /// Requirement armed next from the queue.
    pub next: Option<DiceSpecification>,
}
