use std::path::Path;

use comfy_table::{ContentArrangement, Table};
use rand::SeedableRng;
use rand::rngs::StdRng;
use sl_core::{PartyStatus, TimeOfDay};
use sl_encounter::detect_encounters;

pub fn run(world: &Path, location: &str, day: u32, time: &str, seed: u64) -> Result<(), String> {
    let roster = super::load_roster(world)?;
    let time: TimeOfDay = time.parse()?;
    let loc = roster
        .find_location(location)
        .ok_or_else(|| format!("unknown location: {location}"))?;

    let ctx = roster
        .context_at(&loc.id, day, time, PartyStatus::default())
        .map_err(|e| e.to_string())?;
    let report = detect_encounters(&ctx, &mut StdRng::seed_from_u64(seed));

    if report.is_empty() {
        println!("  Nothing stirs at {} on day {day}.", loc.name);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Priority", "Category", "Source", "Participants", "Triggers"]);

    for encounter in &report.encounters {
        let participants: Vec<String> = encounter
            .participants
            .iter()
            .map(|id| roster.display_name(id))
            .collect();
        table.add_row(vec![
            encounter.priority.to_string(),
            encounter.category.to_string(),
            encounter.source.to_string(),
            participants.join(", "),
            encounter.triggers.join("; "),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} encounters at {} ({time}, day {day})", report.encounters.len(), loc.name);

    if let Some(decision) = &report.immediate_action {
        match decision.check() {
            Some(check) => println!("  Immediate action: {} -> {check}", decision.kind()),
            None => println!("  Immediate action: {}", decision.kind()),
        }
    }

    Ok(())
}
