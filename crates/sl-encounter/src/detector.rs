use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use sl_core::{EncounterContext, Priority};
use sl_mechanics::{TacticalDecision, analyze};

use crate::encounter::EncounterInfo;
use crate::priority::prioritize;
use crate::spatial::detect_spatial_collisions;
use crate::temporal::detect_temporal_overlaps;

/// Result of one detection pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionReport {
    /// Everything detected, highest priority first.
    pub encounters: Vec<EncounterInfo>,
    /// Decision for the top encounter, present only when it is high priority.
    pub immediate_action: Option<TacticalDecision>,
}

impl DetectionReport {
    /// The encounter `immediate_action` was decided for.
    pub fn top(&self) -> Option<&EncounterInfo> {
        self.immediate_action
            .as_ref()
            .and_then(|_| self.encounters.first())
    }

    /// True when nothing was detected.
    pub fn is_empty(&self) -> bool {
        self.encounters.is_empty()
    }
}

/// Run spatial and temporal detection, prioritise, and judge the top
/// encounter if it is high priority.
///
/// The tactical engine sees only the top encounter's participants.
pub fn detect_encounters(ctx: &EncounterContext, rng: &mut StdRng) -> DetectionReport {
    let mut found = detect_spatial_collisions(ctx);
    found.extend(detect_temporal_overlaps(ctx));
    let encounters = prioritize(found);

    let immediate_action = encounters
        .first()
        .filter(|top| top.priority == Priority::High)
        .map(|top| analyze(&ctx.focus(&top.participants), top.priority, rng));

    tracing::debug!(
        location = %ctx.location().id,
        day = ctx.day(),
        count = encounters.len(),
        immediate = immediate_action.as_ref().map(|d| d.kind().to_string()),
        "encounter detection"
    );

    DetectionReport {
        encounters,
        immediate_action,
    }
}
