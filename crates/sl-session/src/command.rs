//! Text commands for driving a session interactively.

use sl_core::{EntityId, StatusDelta};

use crate::error::{SessionError, SessionResult};
use crate::gate::GateOutcome;
use crate::session::Session;
use crate::store::JsonFileStore;

const HELP: &str = "\
Commands:
  status                       Show day, location, party, and any required roll
  go <location>                Travel to a location
  select <character>           Choose who acts
  act <action> [-> target]     Take an action (uses one of today's actions)
  day                          Advance to the next day
  time                         Advance the time of day
  roll <notation> [purpose]    Roll dice freely (e.g. roll 2d6+3 damage)
  answer [notation]            Roll the required check (defaults to the required notation)
  combat start <enemy..>       Start combat against roster enemies
  combat end                   End combat
  next                         Next combatant's turn
  party <hp|res|morale> <n>    Change party status by a signed amount
  journal                      Show the message log
  history                      Show resolved encounters
  export [markdown|text]       Export the message log
  save <path>                  Save the session as JSON
  help                         Show this help
  quit                         End the session";

impl Session {
    /// Process a line of user input and return a response.
    pub fn process(&mut self, input: &str) -> SessionResult<String> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(String::new());
        }

        let parts: Vec<&str> = trimmed.splitn(2, ' ').collect();
        let cmd = parts[0].to_lowercase();
        let rest = parts.get(1).map(|s| s.trim()).unwrap_or("");

        match cmd.as_str() {
            "status" => Ok(self.status_line()),
            "go" | "move" => self.do_move(rest),
            "select" => self.do_select(rest),
            "act" => self.do_act(rest),
            "day" => {
                let before = self.messages().len();
                self.advance_day()?;
                Ok(self.messages_after(before))
            }
            "time" => {
                let now = self.advance_time_of_day()?;
                Ok(format!("It is {now} on day {}.", self.state().day))
            }
            "roll" => self.do_roll(rest),
            "answer" => self.do_answer(rest),
            "combat" => self.do_combat(rest),
            "next" => self.do_next(),
            "party" => self.do_party(rest),
            "journal" => Ok(self.messages().export_text()),
            "history" => Ok(self.history().summary()),
            "export" => match rest {
                "" | "markdown" | "md" => Ok(self.messages().export_markdown()),
                "text" | "txt" => Ok(self.messages().export_text()),
                other => Err(SessionError::InvalidChoice(format!(
                    "unknown export format: {other}"
                ))),
            },
            "save" => self.do_save(rest),
            "help" => Ok(HELP.to_string()),
            "quit" | "q" => {
                self.end_session()?;
                Ok("Session ended. Goodbye!".to_string())
            }
            _ => Err(SessionError::UnknownCommand(cmd)),
        }
    }

    /// Summary of the live state: time, place, party, combat, and any required roll.
    pub fn status_line(&self) -> String {
        let state = self.state();
        let location = state
            .location
            .as_ref()
            .map(|id| self.roster().display_name(id))
            .unwrap_or_else(|| "nowhere".to_string());
        let character = state
            .selected_character
            .as_ref()
            .map(|id| self.roster().display_name(id))
            .unwrap_or_else(|| "nobody".to_string());

        let mut out = format!(
            "Day {}, {} at {} [{}]\nActing: {} | Actions: {}/{}\nParty: HP {} | resources {} | morale {}",
            state.day,
            state.time_of_day,
            location,
            state.phase,
            character,
            state.action_count,
            state.max_actions,
            state.party.average_hp,
            state.party.resources,
            state.party.morale,
        );
        if let Some(combat) = &state.combat {
            let names: Vec<&str> = combat.combatants().iter().map(|c| c.name.as_str()).collect();
            out.push_str(&format!(
                "\nCombat round {}: {}",
                combat.round,
                names.join(", ")
            ));
        }
        if let Some(req) = self.gate().requirement() {
            out.push_str(&format!("\nRequired roll: {req}"));
        }
        out
    }

    fn do_move(&mut self, rest: &str) -> SessionResult<String> {
        if rest.is_empty() {
            return Err(SessionError::InvalidChoice("usage: go <location>".to_string()));
        }
        let before = self.messages().len();
        self.move_to(rest)?;
        Ok(self.messages_after(before))
    }

    fn do_select(&mut self, rest: &str) -> SessionResult<String> {
        if rest.is_empty() {
            return Err(SessionError::InvalidChoice(
                "usage: select <character>".to_string(),
            ));
        }
        let before = self.messages().len();
        self.select_character(rest)?;
        Ok(self.messages_after(before))
    }

    fn do_act(&mut self, rest: &str) -> SessionResult<String> {
        if rest.is_empty() {
            return Err(SessionError::InvalidChoice(
                "usage: act <action> [-> target]".to_string(),
            ));
        }
        let (action, target) = match rest.split_once("->") {
            Some((a, t)) => (a.trim(), Some(t.trim()).filter(|t| !t.is_empty())),
            None => (rest, None),
        };
        let before = self.messages().len();
        self.execute_action(action, target)?;
        let state = self.state();
        let mut out = format!(
            "Done ({} of {} actions today).",
            state.action_count, state.max_actions
        );
        let logged = self.messages_after(before + 1);
        if !logged.is_empty() {
            out.push('\n');
            out.push_str(&logged);
        }
        Ok(out)
    }

    fn do_roll(&mut self, rest: &str) -> SessionResult<String> {
        let (notation, purpose) = match rest.split_once(' ') {
            Some((n, p)) => (n, Some(p.trim()).filter(|p| !p.is_empty())),
            None => (rest, None),
        };
        if notation.is_empty() {
            return Err(SessionError::InvalidChoice(
                "usage: roll <notation> [purpose]".to_string(),
            ));
        }
        let result = self.roll(notation, purpose)?;
        if result.defaulted {
            Ok(format!("{result} (unrecognised notation, rolled 1d20)"))
        } else {
            Ok(result.to_string())
        }
    }

    fn do_answer(&mut self, rest: &str) -> SessionResult<String> {
        let notation = if rest.is_empty() {
            self.gate()
                .requirement()
                .map(|r| r.notation.clone())
                .ok_or(SessionError::NoPendingRequirement)?
        } else {
            rest.to_string()
        };
        let result = self.roll(&notation, None)?;
        let rolled = result.to_string();
        let before = self.messages().len();
        match self.submit_mandated_roll(result)? {
            GateOutcome::Rejected {
                expected, attempts, ..
            } => Ok(format!(
                "{rolled}\nRejected: {expected} is required (attempt {attempts})."
            )),
            GateOutcome::Resolved(_) => Ok(format!("{rolled}\n{}", self.messages_after(before))),
        }
    }

    fn do_combat(&mut self, rest: &str) -> SessionResult<String> {
        let mut words = rest.split_whitespace();
        match words.next() {
            Some("start") => {
                let ids: Vec<EntityId> = words.map(EntityId::new).collect();
                self.start_combat(&ids)?;
                Ok(self.last_message())
            }
            Some("end") => {
                self.end_combat()?;
                Ok("Combat ends.".to_string())
            }
            _ => Err(SessionError::InvalidChoice(
                "usage: combat start <enemy..> | combat end".to_string(),
            )),
        }
    }

    fn do_next(&mut self) -> SessionResult<String> {
        let new_round = self.next_turn()?;
        let line = self.last_message();
        if new_round {
            Ok(format!("New round! {line}"))
        } else {
            Ok(line)
        }
    }

    fn do_party(&mut self, rest: &str) -> SessionResult<String> {
        let usage = || SessionError::InvalidChoice("usage: party <hp|res|morale> <delta>".to_string());
        let (dimension, amount) = rest.split_once(' ').ok_or_else(usage)?;
        let amount: i32 = amount.trim().parse().map_err(|_| usage())?;
        let delta = match dimension.to_lowercase().as_str() {
            "hp" => StatusDelta::hp(amount),
            "res" | "resources" => StatusDelta {
                resources: amount,
                ..StatusDelta::default()
            },
            "morale" => StatusDelta::morale(amount),
            _ => return Err(usage()),
        };
        let changes = self.update_party_status(delta)?;
        if changes.is_empty() {
            Ok("No change.".to_string())
        } else {
            Ok(self.last_message())
        }
    }

    fn do_save(&mut self, rest: &str) -> SessionResult<String> {
        if rest.is_empty() {
            return Err(SessionError::InvalidChoice("usage: save <path>".to_string()));
        }
        let store = JsonFileStore::new(rest);
        if self.save(&store) {
            Ok(format!("Saved to {rest}."))
        } else {
            Ok(self.last_message())
        }
    }

    fn last_message(&self) -> String {
        self.messages()
            .last()
            .map(|m| m.text.clone())
            .unwrap_or_default()
    }

    fn messages_after(&self, index: usize) -> String {
        self.messages()
            .messages()
            .iter()
            .skip(index)
            .map(|m| m.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
