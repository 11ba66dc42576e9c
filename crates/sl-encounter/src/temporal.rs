use sl_core::{EncounterContext, EventKind, Priority};

use crate::encounter::{EncounterCategory, EncounterInfo, EncounterSource};

/// Encounters from scheduled events firing today at the party's location.
///
/// Events without a location fire wherever the party is.
pub fn detect_temporal_overlaps(ctx: &EncounterContext) -> Vec<EncounterInfo> {
    let location = ctx.location();
    ctx.events()
        .iter()
        .filter(|e| e.fires_at(ctx.day(), &location.id))
        .map(|e| {
            let priority = match e.kind {
                EventKind::Combat => Priority::High,
                EventKind::Social | EventKind::Trap => Priority::Medium,
                EventKind::Story => Priority::Low,
            };
            let mut trigger = format!("{} (day {})", e.name, e.day);
            if !e.description.is_empty() {
                trigger.push_str(": ");
                trigger.push_str(&e.description);
            }
            EncounterInfo {
                category: EncounterCategory::from(e.kind),
                participants: e.participants.clone(),
                location: location.id.clone(),
                triggers: vec![trigger],
                priority,
                source: EncounterSource::Temporal,
                event: Some(e.id.clone()),
            }
        })
        .collect()
}
