//! The session controller.
//!
//! `Session` owns the single live [`SessionCurrentState`] and is the only
//! thing that mutates it. Every operation other than [`Session::begin`] and
//! the read accessors fails with [`SessionError::NotActive`] before the
//! session begins and after it is archived.

use std::collections::HashSet;

use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use sl_core::{
    EncounterContext, EntityId, Priority, Roster, StatusChange, StatusDelta, TimeOfDay,
};
use sl_encounter::{DetectionReport, EncounterKey, detect_encounters};
use sl_mechanics::{
    Combatant, CombatTracker, DiceRollResult, RequirementCheck, analyze, classify_behavior,
    consequence_for, resolve_roll, roll, validate_against_requirement,
};

use crate::config::SessionConfig;
use crate::error::{SessionError, SessionResult};
use crate::gate::{DiceGate, GateOffer, GateOutcome, PendingCheck, Resolution};
use crate::journal::{EncounterHistory, EncounterRecord, MessageLog, SessionMessage};
use crate::narrative::{
    NarrativeClient, NarrativePoll, NarrativeRequest, NarrativeResponse, PendingNarrative,
};
use crate::state::{SessionCurrentState, SessionPhase};
use crate::store::{SessionSnapshot, SessionStore};

/// Difficulty used when a requirement carries none.
const DEFAULT_DC: i32 = 10;

/// A running game session.
pub struct Session {
    roster: Roster,
    config: SessionConfig,
    state: SessionCurrentState,
    messages: MessageLog,
    history: EncounterHistory,
    gate: DiceGate,
    announced: HashSet<EncounterKey>,
    last_report: DetectionReport,
    narrative: Option<PendingNarrative>,
    rng: StdRng,
}

impl Session {
    /// Create an idle session over `roster`.
    pub fn new(roster: Roster, config: SessionConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        let state = SessionCurrentState::new(&config);
        Self {
            roster,
            config,
            state,
            messages: MessageLog::new(),
            history: EncounterHistory::new(),
            gate: DiceGate::new(),
            announced: HashSet::new(),
            last_report: DetectionReport::default(),
            narrative: None,
            rng,
        }
    }

    /// Resume a saved session.
    pub fn restore(roster: Roster, config: SessionConfig, snapshot: SessionSnapshot) -> Self {
        let mut session = Self::new(roster, config);
        session.state = snapshot.state;
        session.messages = snapshot.messages;
        session.history = snapshot.history;
        session.gate = snapshot.gate;
        session.announced = snapshot.announced.into_iter().collect();
        session
    }

    /// The live state.
    pub fn state(&self) -> &SessionCurrentState {
        &self.state
    }

    /// The roster.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// The configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The message log.
    pub fn messages(&self) -> &MessageLog {
        &self.messages
    }

    /// Resolved encounters.
    pub fn history(&self) -> &EncounterHistory {
        &self.history
    }

    /// The mandatory-dice gate.
    pub fn gate(&self) -> &DiceGate {
        &self.gate
    }

    /// The most recent detection report.
    pub fn last_report(&self) -> &DetectionReport {
        &self.last_report
    }

    /// Whether a narrative request is in flight.
    pub fn narrative_pending(&self) -> bool {
        self.narrative.is_some()
    }

    /// Start the session: place the party and select the first character.
    pub fn begin(&mut self) -> SessionResult<()> {
        if self.state.phase != SessionPhase::Idle {
            return Err(SessionError::AlreadyStarted);
        }

        let location = match &self.config.starting_location {
            Some(id) => self
                .roster
                .location(id)
                .ok_or_else(|| SessionError::UnknownLocation(id.to_string()))?,
            None => self
                .roster
                .locations()
                .first()
                .ok_or(SessionError::NoLocations)?,
        };
        let location_id = location.id.clone();
        let location_name = location.name.clone();

        self.state.location = Some(location_id);
        self.state.selected_character = self.roster.characters().first().map(|c| c.id.clone());
        self.state.phase = SessionPhase::Active;

        tracing::info!(day = self.state.day, location = %location_name, "session started");
        self.system(format!(
            "Session started on day {} at {}.",
            self.state.day, location_name
        ));
        self.check_encounters()
    }

    /// Move to the next day: reset actions, announce the day's events.
    pub fn advance_day(&mut self) -> SessionResult<()> {
        self.ensure_live()?;
        self.state.day += 1;
        self.state.action_count = 0;
        self.state.time_of_day = TimeOfDay::Morning;

        let day = self.state.day;
        tracing::info!(day, "day advanced");
        self.system(format!("Day {day} begins."));

        let scheduled: Vec<String> = self
            .roster
            .events_on(day)
            .map(|e| {
                if e.description.is_empty() {
                    format!("Scheduled: {}", e.name)
                } else {
                    format!("Scheduled: {}: {}", e.name, e.description)
                }
            })
            .collect();
        for line in scheduled {
            self.system(line);
        }

        self.check_encounters()
    }

    /// Advance the clock one step; night rolls over into the next day.
    pub fn advance_time_of_day(&mut self) -> SessionResult<TimeOfDay> {
        self.ensure_live()?;
        let next = self.state.time_of_day.next();
        if next == TimeOfDay::Morning {
            self.advance_day()?;
        } else {
            self.state.time_of_day = next;
            self.system(format!("It is now {next}."));
            self.check_encounters()?;
        }
        Ok(self.state.time_of_day)
    }

    /// Take one of the day's actions as the selected character.
    pub fn execute_action(&mut self, action: &str, target: Option<&str>) -> SessionResult<()> {
        self.ensure_live()?;
        let Some(character) = self.state.selected_character.clone() else {
            tracing::warn!(action, "action rejected: no character selected");
            return Err(SessionError::NoCharacterSelected);
        };
        if self.state.action_count >= self.state.max_actions {
            tracing::warn!(action, max = self.state.max_actions, "action rejected: cap reached");
            return Err(SessionError::ActionCapReached {
                max: self.state.max_actions,
            });
        }

        let name = self.roster.display_name(&character);
        let text = match target {
            Some(target) => format!("{action} -> {target}"),
            None => action.to_string(),
        };
        self.messages.append(SessionMessage::player(name, text));
        self.state.action_count += 1;

        self.check_encounters()
    }

    /// Move the party to the location with this id or name.
    pub fn move_to(&mut self, location: &str) -> SessionResult<()> {
        self.ensure_live()?;
        let loc = self
            .roster
            .find_location(location)
            .ok_or_else(|| SessionError::UnknownLocation(location.to_string()))?;
        let (id, name) = (loc.id.clone(), loc.name.clone());

        self.state.location = Some(id);
        tracing::info!(location = %name, "party moved");
        self.system(format!("The party travels to {name}."));
        self.check_encounters()
    }

    /// Choose who acts next.
    pub fn select_character(&mut self, character: &str) -> SessionResult<()> {
        self.ensure_live()?;
        let c = self
            .roster
            .find_character(character)
            .ok_or_else(|| SessionError::UnknownCharacter(character.to_string()))?;
        let (id, name) = (c.id.clone(), c.name.clone());

        self.state.selected_character = Some(id);
        self.system(format!("{name} steps forward."));
        Ok(())
    }

    /// Start combat against the named enemies.
    ///
    /// Every id must name a roster enemy; otherwise nothing changes.
    pub fn start_combat(&mut self, enemy_ids: &[EntityId]) -> SessionResult<()> {
        self.ensure_live()?;
        if self.state.in_combat() {
            return Err(SessionError::AlreadyInCombat);
        }
        if enemy_ids.is_empty() {
            return Err(SessionError::InvalidChoice(
                "name at least one enemy".to_string(),
            ));
        }

        let mut combatants: Vec<Combatant> = self
            .roster
            .characters()
            .iter()
            .map(Combatant::from_character)
            .collect();
        for id in enemy_ids {
            let enemy = self
                .roster
                .enemy(id)
                .ok_or_else(|| SessionError::UnknownEnemy(id.to_string()))?;
            combatants.push(Combatant::from_enemy(enemy));
        }

        let tracker = CombatTracker::new(combatants);
        let order: Vec<&str> = tracker
            .combatants()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        let line = format!("Combat begins! Initiative: {}", order.join(", "));

        self.state.combat = Some(tracker);
        self.state.phase = SessionPhase::Combat;
        tracing::info!(enemies = enemy_ids.len(), "combat started");
        self.system(line);
        Ok(())
    }

    /// End the running combat.
    pub fn end_combat(&mut self) -> SessionResult<()> {
        self.ensure_live()?;
        if self.state.combat.take().is_none() {
            return Err(SessionError::NotInCombat);
        }
        self.state.phase = SessionPhase::Active;
        tracing::info!("combat ended");
        self.system("Combat ends.");
        Ok(())
    }

    /// Pass the turn to the next combatant. Returns true if a new round began.
    pub fn next_turn(&mut self) -> SessionResult<bool> {
        self.ensure_live()?;
        let tracker = self.state.combat.as_mut().ok_or(SessionError::NotInCombat)?;
        let new_round = tracker.next_turn();
        let round = tracker.round;
        let who = tracker
            .current()
            .map(|c| c.name.clone())
            .unwrap_or_default();
        self.system(format!("Round {round}: {who}'s turn."));
        Ok(new_round)
    }

    /// Apply a change to party status, clamped to 0-100.
    ///
    /// Logs one message naming only the dimensions that actually changed.
    pub fn update_party_status(&mut self, delta: StatusDelta) -> SessionResult<Vec<StatusChange>> {
        self.ensure_live()?;
        Ok(self.apply_delta(delta))
    }

    /// A voluntary roll. Never blocked by the gate.
    ///
    /// Logged as a player message when a purpose is given.
    pub fn roll(&mut self, notation: &str, purpose: Option<&str>) -> SessionResult<DiceRollResult> {
        self.ensure_live()?;
        let result = roll(notation, purpose, &mut self.rng);
        if let Some(purpose) = purpose {
            let sender = self.acting_name();
            self.messages
                .append(SessionMessage::player(sender, format!("rolls for {purpose}: {result}")));
        }
        Ok(result)
    }

    /// Submit a roll against the armed requirement.
    ///
    /// A roll with different notation is rejected and counted; the gate stays
    /// armed. A matching roll is scored, its consequence applied, the
    /// encounter recorded, and the next queued check armed.
    pub fn submit_mandated_roll(&mut self, result: DiceRollResult) -> SessionResult<GateOutcome> {
        self.ensure_live()?;
        let requirement = self
            .gate
            .requirement()
            .cloned()
            .ok_or(SessionError::NoPendingRequirement)?;

        if let RequirementCheck::Mismatch { expected, actual } =
            validate_against_requirement(&result, &requirement)
        {
            let attempts = self.gate.record_mismatch();
            tracing::warn!(%expected, %actual, attempts, "mandated roll rejected");
            self.system(format!(
                "Roll {expected} is required (you rolled {actual}). Attempt {attempts}; roll again."
            ));
            return Ok(GateOutcome::Rejected {
                expected,
                actual,
                attempts,
            });
        }

        let Some(check) = self.gate.clear() else {
            return Err(SessionError::NoPendingRequirement);
        };
        let resolution = self.resolve(check, &result)?;
        Ok(GateOutcome::Resolved(Box::new(resolution)))
    }

    /// Archive the session and return its final snapshot.
    pub fn end_session(&mut self) -> SessionResult<SessionSnapshot> {
        self.ensure_live()?;
        if let Some(pending) = self.narrative.take() {
            pending.cancel();
        }
        self.state.combat = None;
        self.state.phase = SessionPhase::Archived;
        tracing::info!(day = self.state.day, "session archived");
        self.system("Session ended.");
        Ok(self.snapshot())
    }

    /// A snapshot of everything needed to resume.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state.clone(),
            messages: self.messages.clone(),
            history: self.history.clone(),
            gate: self.gate.clone(),
            announced: self.announced.iter().cloned().collect(),
            saved_at: Utc::now(),
        }
    }

    /// Persist a snapshot. Returns false on failure; in-memory state is kept.
    pub fn save(&mut self, store: &dyn SessionStore) -> bool {
        match store.save(&self.snapshot()) {
            Ok(()) => {
                self.system("Session saved.");
                true
            }
            Err(err) => {
                tracing::error!(%err, "failed to save session");
                self.system(format!("Save failed: {err}"));
                false
            }
        }
    }

    /// Ask for narration. At most one request may be in flight.
    pub fn request_narrative(
        &mut self,
        client: &NarrativeClient,
        prompt: &str,
    ) -> SessionResult<()> {
        self.ensure_live()?;
        if self.narrative.is_some() {
            return Err(SessionError::NarrativeBusy);
        }
        let context = self.narrative_context()?;
        let request = NarrativeRequest::new(prompt).with_context(context);
        tracing::debug!(service = client.service_name(), "narrative requested");
        self.narrative = Some(client.request(request));
        Ok(())
    }

    /// Ask for event seeds.
    pub fn request_event_seeds(
        &mut self,
        client: &NarrativeClient,
        prompt: &str,
    ) -> SessionResult<()> {
        self.ensure_live()?;
        if self.narrative.is_some() {
            return Err(SessionError::NarrativeBusy);
        }
        let context = self.narrative_context()?;
        let request = NarrativeRequest::new(prompt)
            .with_context(context)
            .wanting_events();
        self.narrative = Some(client.request(request));
        Ok(())
    }

    /// Check on the narrative request without blocking.
    ///
    /// A finished answer is logged as GM messages; a failure is logged as a
    /// system message.
    pub fn poll_narrative(&mut self) -> NarrativePoll {
        let Some(pending) = self.narrative.as_mut() else {
            return NarrativePoll::Idle;
        };
        let Some(result) = pending.try_take() else {
            return NarrativePoll::Pending;
        };
        self.narrative = None;

        match result {
            Ok(response) => {
                match &response {
                    NarrativeResponse::Text(text) => {
                        self.messages.append(SessionMessage::gm(text.clone()));
                    }
                    NarrativeResponse::EventSeeds(seeds) => {
                        for seed in seeds {
                            self.messages.append(SessionMessage::gm(format!(
                                "Event seed: {} ({}): {}",
                                seed.name, seed.kind, seed.description
                            )));
                        }
                    }
                }
                NarrativePoll::Delivered(response)
            }
            Err(err) => {
                tracing::warn!(%err, "narrative request failed");
                self.system(format!("Narration unavailable: {err}"));
                NarrativePoll::Failed(err)
            }
        }
    }

    /// Abort the narrative request.
    pub fn cancel_narrative(&mut self) -> SessionResult<()> {
        let pending = self
            .narrative
            .take()
            .ok_or(SessionError::NoPendingNarrative)?;
        pending.cancel();
        self.system("Narration cancelled.");
        Ok(())
    }

    fn ensure_live(&self) -> SessionResult<()> {
        if self.state.phase.is_live() {
            Ok(())
        } else {
            Err(SessionError::NotActive(self.state.phase))
        }
    }

    fn system(&mut self, text: impl Into<String>) {
        self.messages.append(SessionMessage::system(text));
    }

    fn acting_name(&self) -> String {
        self.state
            .selected_character
            .as_ref()
            .map(|id| self.roster.display_name(id))
            .unwrap_or_else(|| "Party".to_string())
    }

    fn context(&self) -> SessionResult<Option<EncounterContext>> {
        let Some(location) = &self.state.location else {
            return Ok(None);
        };
        let ctx = self.roster.context_at(
            location,
            self.state.day,
            self.state.time_of_day,
            self.state.party,
        )?;
        Ok(Some(ctx))
    }

    fn apply_delta(&mut self, delta: StatusDelta) -> Vec<StatusChange> {
        let changes = self.state.party.apply(delta);
        if !changes.is_empty() {
            let parts: Vec<String> = changes
                .iter()
                .map(|c| format!("{} {} -> {}", c.dimension, c.from, c.to))
                .collect();
            self.system(format!("Party status: {}", parts.join(", ")));
        }
        changes
    }

    /// Run detection on a fresh context and gate every high-priority encounter.
    fn check_encounters(&mut self) -> SessionResult<()> {
        let Some(ctx) = self.context()? else {
            return Ok(());
        };
        let report = detect_encounters(&ctx, &mut self.rng);
        let day = self.state.day;

        for encounter in &report.encounters {
            if self.announced.insert(encounter.key(day)) {
                let line = format!(
                    "Encounter ({}, {} priority): {}",
                    encounter.category,
                    encounter.priority,
                    encounter.triggers.join("; ")
                );
                self.system(line);
            }
        }

        // Encounters are sorted by priority, so the high ones lead.
        for (index, encounter) in report.encounters.iter().enumerate() {
            if encounter.priority != Priority::High {
                break;
            }
            let key = encounter.key(day);
            if self.history.has_resolved(&key) || self.gate.contains(&key) {
                continue;
            }
            let decision = match (index, report.immediate_action.as_ref()) {
                (0, Some(decision)) => decision.clone(),
                _ => analyze(
                    &ctx.focus(&encounter.participants),
                    encounter.priority,
                    &mut self.rng,
                ),
            };
            let Some(requirement) = decision.check().cloned() else {
                continue;
            };
            let line = match self.gate.offer(PendingCheck {
                key,
                encounter: encounter.clone(),
                decision: decision.clone(),
                requirement: requirement.clone(),
            }) {
                GateOffer::Armed => format!("The GM requires a roll: {requirement}"),
                GateOffer::Queued(position) => {
                    format!("Another check waits (#{position} in queue): {requirement}")
                }
            };
            tracing::info!(action = %decision.kind(), "mandated roll raised");
            self.system(line);
        }

        self.last_report = report;
        Ok(())
    }

    fn resolve(
        &mut self,
        check: PendingCheck,
        result: &DiceRollResult,
    ) -> SessionResult<Resolution> {
        let kind = check.decision.kind();
        let total = result.total.saturating_add(check.requirement.modifier);
        let difficulty = check.requirement.difficulty.unwrap_or(DEFAULT_DC);
        let outcome = resolve_roll(result.natural(), total, difficulty, kind);
        let consequence = consequence_for(kind, outcome.tier);

        tracing::info!(%kind, total, difficulty, tier = %outcome.tier, "encounter resolved");
        self.system(format!(
            "{} check: {total} vs DC {difficulty}: {}. {}",
            check.requirement.skill.as_deref().unwrap_or("Dice"),
            outcome.tier,
            outcome.description
        ));

        self.apply_delta(consequence.delta);

        let mut combat_started = false;
        if consequence.starts_combat && !self.state.in_combat() {
            let enemies: Vec<EntityId> = check
                .encounter
                .participants
                .iter()
                .filter(|id| self.roster.enemy(id).is_some())
                .cloned()
                .collect();
            if !enemies.is_empty() {
                self.start_combat(&enemies)?;
                combat_started = true;
            }
        }

        let record = EncounterRecord {
            timestamp: Utc::now(),
            day: check.key.day,
            location: check.encounter.location.clone(),
            category: check.encounter.category,
            action: kind,
            participants: check.encounter.participants.clone(),
            event: check.encounter.event.clone(),
            tier: outcome.tier,
            description: outcome.description.clone(),
        };
        self.history.push(record.clone());

        let next = self.gate.requirement().cloned();
        if let Some(next) = &next {
            self.system(format!("Next required roll: {next}"));
        }

        Ok(Resolution {
            total,
            difficulty,
            outcome,
            consequence,
            combat_started,
            record,
            next,
        })
    }

    fn narrative_context(&self) -> SessionResult<Vec<String>> {
        let Some(ctx) = self.context()? else {
            return Ok(Vec::new());
        };
        let mut lines = vec![format!(
            "{}, day {}, {}",
            ctx.location().name,
            ctx.day(),
            ctx.time_of_day()
        )];
        for enemy in ctx.enemies() {
            lines.push(format!(
                "{} ({}) seems {}",
                enemy.name,
                enemy.creature_type,
                classify_behavior(enemy, &ctx)
            ));
        }
        for npc in ctx.npcs() {
            lines.push(format!("{} is here", npc.name));
        }
        Ok(lines)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("roster", &self.roster.name())
            .field("state", &self.state)
            .field("messages", &self.messages.len())
            .field("history", &self.history.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sl_mechanics::ActionKind;

    const WORLD: &str = r#"{
        "name": "Mill Valley",
        "locations": [
            {"id": "road", "name": "Valley Road"},
            {"id": "mill", "name": "Old Mill"},
            {"id": "square", "name": "Town Square"}
        ],
        "characters": [
            {"id": "aria", "name": "Aria", "level": 3, "hp": 24, "max_hp": 24,
             "abilities": {"dexterity": 14}},
            {"id": "bren", "name": "Bren", "level": 3, "hp": 30, "max_hp": 30,
             "abilities": {"strength": 16, "dexterity": 12}}
        ],
        "npcs": [
            {"id": "miller", "name": "The Miller", "location": "square"}
        ],
        "enemies": [
            {"id": "wolf", "name": "Grey Wolf", "creature_type": "beast",
             "challenge_rating": 0.25, "hp": 11, "max_hp": 11, "attack": 4,
             "abilities": {"dexterity": 15}, "location": "mill"}
        ],
        "events": [
            {"id": "market", "name": "Market Day", "day": 2, "location": "square",
             "kind": "social", "description": "Stalls fill the square."}
        ]
    }"#;

    fn session() -> Session {
        let roster = Roster::from_json_str(WORLD).unwrap();
        let mut s = Session::new(roster, SessionConfig::default());
        s.begin().unwrap();
        s
    }

    fn mandated(s: &mut Session) -> DiceRollResult {
        let notation = s.gate().requirement().unwrap().notation.clone();
        s.roll(&notation, None).unwrap()
    }

    #[test]
    fn begin_places_party() {
        let s = session();
        assert_eq!(s.state().phase, SessionPhase::Active);
        assert_eq!(s.state().location, Some(EntityId::new("road")));
        assert_eq!(s.state().selected_character, Some(EntityId::new("aria")));
        assert!(!s.gate().is_armed());
    }

    #[test]
    fn operations_fail_before_begin() {
        let roster = Roster::from_json_str(WORLD).unwrap();
        let mut s = Session::new(roster, SessionConfig::default());
        assert!(matches!(
            s.advance_day(),
            Err(SessionError::NotActive(SessionPhase::Idle))
        ));
        assert!(matches!(s.roll("1d20", None), Err(SessionError::NotActive(_))));
        assert!(s.messages().is_empty());
    }

    #[test]
    fn begin_twice_fails() {
        let mut s = session();
        assert!(matches!(s.begin(), Err(SessionError::AlreadyStarted)));
    }

    #[test]
    fn unknown_starting_location() {
        let roster = Roster::from_json_str(WORLD).unwrap();
        let mut s = Session::new(roster, SessionConfig::default().with_location("moon"));
        assert!(matches!(s.begin(), Err(SessionError::UnknownLocation(_))));
        assert_eq!(s.state().phase, SessionPhase::Idle);
    }

    #[test]
    fn advance_day_resets_actions() {
        let mut s = session();
        s.execute_action("look around", None).unwrap();
        s.advance_time_of_day().unwrap();
        assert_eq!(s.state().action_count, 1);

        s.advance_day().unwrap();
        assert_eq!(s.state().day, 2);
        assert_eq!(s.state().action_count, 0);
        assert_eq!(s.state().time_of_day, TimeOfDay::Morning);
        assert!(
            s.messages()
                .messages()
                .iter()
                .any(|m| m.text == "Scheduled: Market Day: Stalls fill the square.")
        );
    }

    #[test]
    fn night_rolls_over() {
        let mut s = session();
        for _ in 0..3 {
            s.advance_time_of_day().unwrap();
        }
        assert_eq!(s.state().time_of_day, TimeOfDay::Night);
        assert_eq!(s.advance_time_of_day().unwrap(), TimeOfDay::Morning);
        assert_eq!(s.state().day, 2);
    }

    #[test]
    fn action_cap_rejects_without_mutation() {
        let roster = Roster::from_json_str(WORLD).unwrap();
        let mut s = Session::new(roster, SessionConfig::default().with_max_actions(2));
        s.begin().unwrap();
        s.execute_action("a", None).unwrap();
        s.execute_action("b", Some("miller")).unwrap();
        let before = s.messages().len();
        assert!(matches!(
            s.execute_action("c", None),
            Err(SessionError::ActionCapReached { max: 2 })
        ));
        assert_eq!(s.state().action_count, 2);
        assert_eq!(s.messages().len(), before);
    }

    #[test]
    fn player_message_names_target() {
        let mut s = session();
        s.execute_action("greet", Some("miller")).unwrap();
        let last = s
            .messages()
            .by_sender(crate::journal::SenderType::Player)
            .last()
            .unwrap();
        assert_eq!(last.sender, "Aria");
        assert_eq!(last.text, "greet -> miller");
    }

    #[test]
    fn moving_into_enemies_arms_the_gate() {
        let mut s = session();
        s.move_to("Old Mill").unwrap();
        let pending = s.gate().pending().unwrap();
        assert_eq!(pending.requirement.notation, "1d20");
        assert_eq!(pending.decision.kind(), ActionKind::Combat);
        assert_eq!(s.last_report().encounters.len(), 1);
    }

    #[test]
    fn unknown_location_and_character() {
        let mut s = session();
        assert!(matches!(s.move_to("moon"), Err(SessionError::UnknownLocation(_))));
        assert!(matches!(
            s.select_character("nobody"),
            Err(SessionError::UnknownCharacter(_))
        ));
        s.select_character("bren").unwrap();
        assert_eq!(s.state().selected_character, Some(EntityId::new("bren")));
    }

    #[test]
    fn wrong_notation_keeps_gate_armed() {
        let mut s = session();
        s.move_to("mill").unwrap();
        let wrong = s.roll("2d6", None).unwrap();
        match s.submit_mandated_roll(wrong).unwrap() {
            GateOutcome::Rejected {
                expected,
                actual,
                attempts,
            } => {
                assert_eq!(expected, "1d20");
                assert_eq!(actual, "2d6");
                assert_eq!(attempts, 1);
            }
            GateOutcome::Resolved(_) => panic!("2d6 must not satisfy 1d20"),
        }
        assert!(s.gate().is_armed());
        assert_eq!(s.gate().attempts(), 1);
        assert!(s.history().is_empty());
    }

    #[test]
    fn matching_roll_resolves_and_enters_combat() {
        let mut s = session();
        s.move_to("mill").unwrap();
        let result = mandated(&mut s);
        let GateOutcome::Resolved(resolution) = s.submit_mandated_roll(result).unwrap() else {
            panic!("matching notation must resolve");
        };
        assert!(!s.gate().is_armed());
        assert_eq!(s.history().len(), 1);
        assert_eq!(resolution.record.action, ActionKind::Combat);
        assert!(resolution.combat_started);
        assert!(s.state().in_combat());
        assert_eq!(s.state().phase, SessionPhase::Combat);
        assert_eq!(s.state().initiative_order().len(), 3);
    }

    #[test]
    fn resolved_encounter_is_not_raised_again() {
        let mut s = session();
        s.move_to("mill").unwrap();
        let result = mandated(&mut s);
        s.submit_mandated_roll(result).unwrap();
        s.end_combat().unwrap();
        s.execute_action("bandage wounds", None).unwrap();
        assert!(!s.gate().is_armed());
    }

    #[test]
    fn submit_without_gate() {
        let mut s = session();
        let r = s.roll("1d20", None).unwrap();
        assert!(matches!(
            s.submit_mandated_roll(r),
            Err(SessionError::NoPendingRequirement)
        ));
    }

    #[test]
    fn voluntary_roll_not_blocked_by_gate() {
        let mut s = session();
        s.move_to("mill").unwrap();
        assert!(s.gate().is_armed());
        let r = s.roll("2d6+1", Some("damage")).unwrap();
        assert_eq!(r.notation, "2d6+1");
        assert!(s.messages().last().unwrap().text.starts_with("rolls for damage"));
    }

    #[test]
    fn roll_without_purpose_is_not_logged() {
        let mut s = session();
        let before = s.messages().len();
        s.roll("1d20", None).unwrap();
        assert_eq!(s.messages().len(), before);
    }

    #[test]
    fn start_combat_orders_by_dex() {
        let mut s = session();
        s.start_combat(&[EntityId::new("wolf")]).unwrap();
        assert_eq!(
            s.state().initiative_order(),
            vec![EntityId::new("wolf"), EntityId::new("aria"), EntityId::new("bren")]
        );
        assert!(matches!(
            s.start_combat(&[EntityId::new("wolf")]),
            Err(SessionError::AlreadyInCombat)
        ));
        s.end_combat().unwrap();
        assert!(!s.state().in_combat());
        assert!(s.state().initiative_order().is_empty());
        assert_eq!(s.state().phase, SessionPhase::Active);
    }

    #[test]
    fn start_combat_with_unknown_enemy_changes_nothing() {
        let mut s = session();
        let before = s.messages().len();
        assert!(matches!(
            s.start_combat(&[EntityId::new("wolf"), EntityId::new("dragon")]),
            Err(SessionError::UnknownEnemy(_))
        ));
        assert!(!s.state().in_combat());
        assert_eq!(s.state().phase, SessionPhase::Active);
        assert_eq!(s.messages().len(), before);
    }

    #[test]
    fn next_turn_cycles() {
        let mut s = session();
        assert!(matches!(s.next_turn(), Err(SessionError::NotInCombat)));
        s.start_combat(&[EntityId::new("wolf")]).unwrap();
        assert!(!s.next_turn().unwrap());
        assert!(!s.next_turn().unwrap());
        assert!(s.next_turn().unwrap());
        assert_eq!(s.state().combat.as_ref().unwrap().round, 2);
    }

    #[test]
    fn party_status_clamps_and_reports_changes() {
        let mut s = session();
        let changes = s.update_party_status(StatusDelta::hp(-150)).unwrap();
        assert_eq!(s.state().party.average_hp, 0);
        assert_eq!(changes.len(), 1);
        assert_eq!(s.messages().last().unwrap().text, "Party status: HP 100 -> 0");

        let before = s.messages().len();
        let changes = s.update_party_status(StatusDelta::morale(10)).unwrap();
        assert!(changes.is_empty());
        assert_eq!(s.messages().len(), before);
    }

    #[test]
    fn end_session_archives() {
        let mut s = session();
        let snapshot = s.end_session().unwrap();
        assert_eq!(snapshot.state.phase, SessionPhase::Archived);
        assert!(matches!(
            s.execute_action("x", None),
            Err(SessionError::NotActive(SessionPhase::Archived))
        ));
        assert!(matches!(s.end_session(), Err(SessionError::NotActive(_))));
    }

    #[test]
    fn save_failure_keeps_state() {
        let mut s = session();
        let dir = tempfile::TempDir::new().unwrap();
        let store = crate::store::JsonFileStore::new(dir.path().join("no/such/dir.json"));
        let state = s.state().clone();
        assert!(!s.save(&store));
        assert_eq!(s.state(), &state);
        assert!(s.messages().last().unwrap().text.starts_with("Save failed"));
    }

    #[test]
    fn save_and_restore() {
        let mut s = session();
        s.move_to("mill").unwrap();
        let dir = tempfile::TempDir::new().unwrap();
        let store = crate::store::JsonFileStore::new(dir.path().join("session.json"));
        assert!(s.save(&store));

        let roster = Roster::from_json_str(WORLD).unwrap();
        let mut restored = Session::restore(roster, SessionConfig::default(), store.load().unwrap());
        assert_eq!(restored.state().location, Some(EntityId::new("mill")));
        assert!(restored.gate().is_armed());

        // Already announced; the armed check is not queued a second time.
        restored.execute_action("wait", None).unwrap();
        assert_eq!(restored.gate().queued().count(), 0);
    }

    #[test]
    fn cancel_without_pending() {
        let mut s = session();
        assert!(matches!(
            s.cancel_narrative(),
            Err(SessionError::NoPendingNarrative)
        ));
        assert_eq!(s.poll_narrative(), NarrativePoll::Idle);
    }
}
