use crate::encounter::EncounterInfo;

/// Order encounters by priority, highest first. Equal priorities keep their
/// detection order.
pub fn prioritize(mut encounters: Vec<EncounterInfo>) -> Vec<EncounterInfo> {
    encounters.sort_by_key(|e| std::cmp::Reverse(e.priority.rank()));
    encounters
}
