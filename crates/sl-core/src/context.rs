use crate::entity::{Character, Enemy, EntityId, Npc};
use crate::event::ScheduledEvent;
use crate::location::Location;
use crate::party::PartyStatus;
use crate::time::TimeOfDay;

/// Immutable snapshot of the situation for one detection pass.
///
/// Built fresh every time encounters are checked. Consumers only ever read
/// it; narrowing for a single encounter goes through [`EncounterContext::focus`],
/// which returns a new snapshot.
#[derive(Debug, Clone)]
pub struct EncounterContext {
    location: Location,
    day: u32,
    time_of_day: TimeOfDay,
    characters: Vec<Character>,
    npcs: Vec<Npc>,
    enemies: Vec<Enemy>,
    events: Vec<ScheduledEvent>,
    party: PartyStatus,
}

impl EncounterContext {
    /// Start a snapshot with nobody present.
    pub fn new(location: Location, day: u32, time_of_day: TimeOfDay, party: PartyStatus) -> Self {
        Self {
            location,
            day,
            time_of_day,
            characters: Vec::new(),
            npcs: Vec::new(),
            enemies: Vec::new(),
            events: Vec::new(),
            party,
        }
    }

    /// Set the party members present.
    pub fn with_characters(mut self, characters: Vec<Character>) -> Self {
        self.characters = characters;
        self
    }

    /// Set the NPCs present.
    pub fn with_npcs(mut self, npcs: Vec<Npc>) -> Self {
        self.npcs = npcs;
        self
    }

    /// Set the enemies present.
    pub fn with_enemies(mut self, enemies: Vec<Enemy>) -> Self {
        self.enemies = enemies;
        self
    }

    /// Set the scheduled events to consider.
    pub fn with_events(mut self, events: Vec<ScheduledEvent>) -> Self {
        self.events = events;
        self
    }

    /// Current location.
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Current campaign day.
    pub fn day(&self) -> u32 {
        self.day
    }

    /// Current time of day.
    pub fn time_of_day(&self) -> TimeOfDay {
        self.time_of_day
    }

    /// Party members present.
    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    /// NPCs present.
    pub fn npcs(&self) -> &[Npc] {
        &self.npcs
    }

    /// Enemies present.
    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    /// Scheduled events under consideration.
    pub fn events(&self) -> &[ScheduledEvent] {
        &self.events
    }

    /// Aggregate party status at snapshot time.
    pub fn party(&self) -> PartyStatus {
        self.party
    }

    /// A copy narrowed to the NPCs and enemies named in `participants`.
    ///
    /// Party members, location, time, and events are kept as they are.
    pub fn focus(&self, participants: &[EntityId]) -> Self {
        Self {
            npcs: self
                .npcs
                .iter()
                .filter(|n| participants.contains(&n.id))
                .cloned()
                .collect(),
            enemies: self
                .enemies
                .iter()
                .filter(|e| participants.contains(&e.id))
                .cloned()
                .collect(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::AbilityScores;

    fn npc(id: &str) -> Npc {
        Npc {
            id: EntityId::new(id),
            name: id.to_string(),
            location: EntityId::new("inn"),
            role: None,
        }
    }

    fn enemy(id: &str) -> Enemy {
        Enemy {
            id: EntityId::new(id),
            name: id.to_string(),
            creature_type: Default::default(),
            challenge_rating: 1.0,
            hp: 10,
            max_hp: 10,
            attack: 3,
            abilities: AbilityScores::default(),
            location: Some(EntityId::new("inn")),
            patrol_route: Vec::new(),
        }
    }

    #[test]
    fn focus_narrows_npcs_and_enemies() {
        let ctx = EncounterContext::new(
            Location::new("inn", "The Inn"),
            1,
            TimeOfDay::Evening,
            PartyStatus::default(),
        )
        .with_npcs(vec![npc("bard"), npc("cook")])
        .with_enemies(vec![enemy("thug"), enemy("rat")]);

        let focused = ctx.focus(&[EntityId::new("thug"), EntityId::new("cook")]);
        assert_eq!(focused.enemies().len(), 1);
        assert_eq!(focused.enemies()[0].id.as_str(), "thug");
        assert_eq!(focused.npcs().len(), 1);
        assert_eq!(focused.npcs()[0].id.as_str(), "cook");
        assert_eq!(ctx.enemies().len(), 2);
        assert_eq!(focused.time_of_day(), TimeOfDay::Evening);
    }
}
