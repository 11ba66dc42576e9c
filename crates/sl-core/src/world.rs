use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::context::EncounterContext;
use crate::entity::{Character, Enemy, EntityId, Npc};
use crate::error::{CoreError, CoreResult};
use crate::event::ScheduledEvent;
use crate::location::Location;
use crate::party::PartyStatus;
use crate::time::TimeOfDay;

/// On-disk shape of a roster file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterData {
    /// Campaign name.
    pub name: String,
    /// Party members, in party order.
    pub characters: Vec<Character>,
    /// Non-player characters.
    pub npcs: Vec<Npc>,
    /// Hostile creatures.
    pub enemies: Vec<Enemy>,
    /// Places.
    pub locations: Vec<Location>,
    /// Scheduled events.
    pub events: Vec<ScheduledEvent>,
}

/// The read-only campaign roster handed over by the persistence layer.
///
/// Ids are unique across all entry kinds and every location reference
/// resolves; both are checked on construction.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    data: RosterData,
    ids: HashSet<EntityId>,
}

impl Roster {
    /// Create an empty roster.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            data: RosterData {
                name: name.into(),
                ..RosterData::default()
            },
            ids: HashSet::new(),
        }
    }

    /// Parse and validate a roster from JSON.
    pub fn from_json_str(json: &str) -> CoreResult<Self> {
        let data: RosterData = serde_json::from_str(json)?;
        Self::from_data(data)
    }

    /// Read, parse, and validate a roster file.
    pub fn from_path(path: impl AsRef<Path>) -> CoreResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Validate raw roster data.
    pub fn from_data(data: RosterData) -> CoreResult<Self> {
        let mut roster = Self::new(data.name);
        // Locations first so later references can be checked as they arrive.
        for location in data.locations {
            roster.add_location(location)?;
        }
        for character in data.characters {
            roster.add_character(character)?;
        }
        for npc in data.npcs {
            roster.add_npc(npc)?;
        }
        for enemy in data.enemies {
            roster.add_enemy(enemy)?;
        }
        for event in data.events {
            roster.add_event(event)?;
        }
        Ok(roster)
    }

    /// The raw data, e.g. for serializing back to disk.
    pub fn data(&self) -> &RosterData {
        &self.data
    }

    /// Campaign name.
    pub fn name(&self) -> &str {
        &self.data.name
    }

    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// Add a location.
    pub fn add_location(&mut self, location: Location) -> CoreResult<&mut Self> {
        self.claim(&location.id)?;
        self.data.locations.push(location);
        Ok(self)
    }

    /// Add a party member.
    pub fn add_character(&mut self, character: Character) -> CoreResult<&mut Self> {
        self.claim(&character.id)?;
        self.data.characters.push(character);
        Ok(self)
    }

    /// Add an NPC. Its location must already exist.
    pub fn add_npc(&mut self, npc: Npc) -> CoreResult<&mut Self> {
        self.check_location(&npc.id, &npc.location)?;
        self.claim(&npc.id)?;
        self.data.npcs.push(npc);
        Ok(self)
    }

    /// Add an enemy. Its station and patrol route must already exist.
    pub fn add_enemy(&mut self, enemy: Enemy) -> CoreResult<&mut Self> {
        if let Some(location) = &enemy.location {
            self.check_location(&enemy.id, location)?;
        }
        for location in &enemy.patrol_route {
            self.check_location(&enemy.id, location)?;
        }
        self.claim(&enemy.id)?;
        self.data.enemies.push(enemy);
        Ok(self)
    }

    /// Add a scheduled event. Its location, if any, must already exist.
    pub fn add_event(&mut self, event: ScheduledEvent) -> CoreResult<&mut Self> {
        if let Some(location) = &event.location {
            self.check_location(&event.id, location)?;
        }
        self.claim(&event.id)?;
        self.data.events.push(event);
        Ok(self)
    }

    fn claim(&mut self, id: &EntityId) -> CoreResult<()> {
        if !self.ids.insert(id.clone()) {
            return Err(CoreError::DuplicateId(id.clone()));
        }
        Ok(())
    }

    fn check_location(&self, owner: &EntityId, location: &EntityId) -> CoreResult<()> {
        if self.location(location).is_none() {
            return Err(CoreError::UnknownLocation {
                owner: owner.clone(),
                location: location.clone(),
            });
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    /// All party members, in party order.
    pub fn characters(&self) -> &[Character] {
        &self.data.characters
    }

    /// All NPCs.
    pub fn npcs(&self) -> &[Npc] {
        &self.data.npcs
    }

    /// All enemies.
    pub fn enemies(&self) -> &[Enemy] {
        &self.data.enemies
    }

    /// All locations.
    pub fn locations(&self) -> &[Location] {
        &self.data.locations
    }

    /// All scheduled events.
    pub fn events(&self) -> &[ScheduledEvent] {
        &self.data.events
    }

    /// Look up a location by id.
    pub fn location(&self, id: &EntityId) -> Option<&Location> {
        self.data.locations.iter().find(|l| &l.id == id)
    }

    /// Look up a location by id or case-insensitive name.
    pub fn find_location(&self, key: &str) -> Option<&Location> {
        self.data
            .locations
            .iter()
            .find(|l| l.id.as_str() == key || l.name.eq_ignore_ascii_case(key))
    }

    /// Look up a party member by id.
    pub fn character(&self, id: &EntityId) -> Option<&Character> {
        self.data.characters.iter().find(|c| &c.id == id)
    }

    /// Look up a party member by id or case-insensitive name.
    pub fn find_character(&self, key: &str) -> Option<&Character> {
        self.data
            .characters
            .iter()
            .find(|c| c.id.as_str() == key || c.name.eq_ignore_ascii_case(key))
    }

    /// Look up an enemy by id.
    pub fn enemy(&self, id: &EntityId) -> Option<&Enemy> {
        self.data.enemies.iter().find(|e| &e.id == id)
    }

    /// Look up an NPC by id.
    pub fn npc(&self, id: &EntityId) -> Option<&Npc> {
        self.data.npcs.iter().find(|n| &n.id == id)
    }

    /// Display name for any roster id, falling back to the id itself.
    pub fn display_name(&self, id: &EntityId) -> String {
        self.character(id)
            .map(|c| c.name.clone())
            .or_else(|| self.enemy(id).map(|e| e.name.clone()))
            .or_else(|| self.npc(id).map(|n| n.name.clone()))
            .or_else(|| self.location(id).map(|l| l.name.clone()))
            .unwrap_or_else(|| id.to_string())
    }

    /// Events bound to `day`, in roster order.
    pub fn events_on(&self, day: u32) -> impl Iterator<Item = &ScheduledEvent> {
        self.data.events.iter().filter(move |e| e.day == day)
    }

    /// Build a fresh encounter context for the party at `location`.
    ///
    /// The whole party is considered present. NPCs registered at the
    /// location and enemies stationed at or patrolling through it are
    /// present, along with the events scheduled for `day`.
    pub fn context_at(
        &self,
        location: &EntityId,
        day: u32,
        time_of_day: TimeOfDay,
        party: PartyStatus,
    ) -> CoreResult<EncounterContext> {
        let loc = self
            .location(location)
            .ok_or_else(|| CoreError::EntityNotFound(location.clone()))?;

        let npcs = self
            .data
            .npcs
            .iter()
            .filter(|n| &n.location == location)
            .cloned()
            .collect();
        let enemies = self
            .data
            .enemies
            .iter()
            .filter(|e| e.presence_at(location).is_some())
            .cloned()
            .collect();

        Ok(EncounterContext::new(loc.clone(), day, time_of_day, party)
            .with_characters(self.data.characters.clone())
            .with_npcs(npcs)
            .with_enemies(enemies)
            .with_events(self.events_on(day).cloned().collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::AbilityScores;

    const ROSTER: &str = r#"{
        "name": "Test Campaign",
        "locations": [
            {"id": "mill", "name": "Old Mill"},
            {"id": "square", "name": "Town Square"}
        ],
        "characters": [
            {"id": "aria", "name": "Aria", "level": 3, "hp": 24, "max_hp": 24}
        ],
        "npcs": [
            {"id": "miller", "name": "The Miller", "location": "mill"}
        ],
        "enemies": [
            {"id": "wolf", "name": "Grey Wolf", "creature_type": "beast",
             "challenge_rating": 0.25, "hp": 11, "max_hp": 11, "attack": 4,
             "patrol_route": ["square", "mill"]}
        ],
        "events": [
            {"id": "market", "name": "Market Day", "day": 2, "location": "square", "kind": "social"}
        ]
    }"#;

    #[test]
    fn parse_roster() {
        let roster = Roster::from_json_str(ROSTER).unwrap();
        assert_eq!(roster.name(), "Test Campaign");
        assert_eq!(roster.characters().len(), 1);
        assert_eq!(roster.characters()[0].level, 3);
        assert_eq!(roster.characters()[0].abilities, AbilityScores::default());
        assert_eq!(roster.events_on(2).count(), 1);
        assert_eq!(roster.events_on(1).count(), 0);
    }

    #[test]
    fn unknown_location_rejected() {
        let json = r#"{"npcs": [{"id": "ghost", "name": "Ghost", "location": "nowhere"}]}"#;
        let err = Roster::from_json_str(json).unwrap_err();
        assert!(matches!(err, CoreError::UnknownLocation { .. }));
    }

    #[test]
    fn duplicate_id_rejected() {
        let json = r#"{"locations": [{"id": "a", "name": "A"}, {"id": "a", "name": "B"}]}"#;
        let err = Roster::from_json_str(json).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateId(_)));
    }

    #[test]
    fn context_filters_presence() {
        let roster = Roster::from_json_str(ROSTER).unwrap();
        let ctx = roster
            .context_at(&"mill".into(), 1, TimeOfDay::Morning, PartyStatus::default())
            .unwrap();
        assert_eq!(ctx.npcs().len(), 1);
        assert_eq!(ctx.enemies().len(), 1);
        assert_eq!(ctx.characters().len(), 1);

        let ctx = roster
            .context_at(&"square".into(), 1, TimeOfDay::Morning, PartyStatus::default())
            .unwrap();
        assert!(ctx.npcs().is_empty());
        assert_eq!(ctx.enemies().len(), 1);
    }

    #[test]
    fn context_carries_only_todays_events() {
        let roster = Roster::from_json_str(ROSTER).unwrap();
        let day_one = roster
            .context_at(&"square".into(), 1, TimeOfDay::Morning, PartyStatus::default())
            .unwrap();
        assert!(day_one.events().is_empty());

        let day_two = roster
            .context_at(&"square".into(), 2, TimeOfDay::Morning, PartyStatus::default())
            .unwrap();
        assert_eq!(day_two.events().len(), 1);
        assert_eq!(day_two.events()[0].id.as_str(), "market");
    }

    #[test]
    fn context_at_unknown_location() {
        let roster = Roster::from_json_str(ROSTER).unwrap();
        let err = roster
            .context_at(&"moon".into(), 1, TimeOfDay::Morning, PartyStatus::default())
            .unwrap_err();
        assert!(matches!(err, CoreError::EntityNotFound(_)));
    }

    #[test]
    fn find_by_name_is_case_insensitive() {
        let roster = Roster::from_json_str(ROSTER).unwrap();
        assert_eq!(roster.find_location("old mill").unwrap().id.as_str(), "mill");
        assert_eq!(roster.find_character("ARIA").unwrap().id.as_str(), "aria");
        assert_eq!(roster.display_name(&"wolf".into()), "Grey Wolf");
        assert_eq!(roster.display_name(&"unknown".into()), "unknown");
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("roster.json");
        std::fs::write(&path, ROSTER).unwrap();
        let roster = Roster::from_path(&path).unwrap();
        assert_eq!(roster.locations().len(), 2);
    }
}
