use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;
use sl_session::{
    NarrativeClient, NarrativePoll, Session, SessionConfig, SessionError, TemplateNarrator,
};
use tokio::runtime::Runtime;

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Overrides from the command line.
pub struct PlayOptions {
    pub seed: Option<u64>,
    pub max_actions: Option<u32>,
    pub location: Option<String>,
    pub config: Option<PathBuf>,
}

pub fn run(world: &Path, options: PlayOptions) -> Result<(), String> {
    let roster = super::load_roster(world)?;

    let mut config = match &options.config {
        Some(path) => SessionConfig::from_path(path).map_err(|e| e.to_string())?,
        None => SessionConfig::default(),
    };
    if let Some(seed) = options.seed {
        config = config.with_seed(seed);
    }
    if let Some(max) = options.max_actions {
        config = config.with_max_actions(max);
    }
    if let Some(location) = options.location {
        let id = roster
            .find_location(&location)
            .map(|l| l.id.clone())
            .ok_or_else(|| format!("unknown location: {location}"))?;
        config = config.with_location(id);
    }

    let runtime = Runtime::new().map_err(|e| format!("failed to start runtime: {e}"))?;
    let narrator = NarrativeClient::new(Arc::new(TemplateNarrator::new()), runtime.handle().clone())
        .with_timeout(config.narrative_timeout());

    let seed = config.seed;
    let mut session = Session::new(roster, config);
    session
        .begin()
        .map_err(|e| format!("failed to start session: {e}"))?;

    println!("  {} {}", "Starting".bold(), session.roster().name());
    println!("  Seed: {seed} | Narrator: {}", narrator.service_name());
    println!("  Type 'help' for commands, 'narrate <prompt>' for GM narration, 'quit' to exit.\n");
    print_new(&session, 0);

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break,
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        if let Some(prompt) = narrate_prompt(input) {
            match narrate(&mut session, &runtime, &narrator, prompt) {
                Ok(()) => println!(),
                Err(e) => println!("{}\n", e.to_string().yellow()),
            }
            continue;
        }

        match session.process(input) {
            Ok(output) => {
                if !output.is_empty() {
                    println!("{output}\n");
                }
                if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("q") {
                    break;
                }
            }
            Err(e) => {
                println!("{}\n", e.to_string().yellow());
            }
        }
    }

    Ok(())
}

fn narrate_prompt(input: &str) -> Option<&str> {
    let (cmd, rest) = input.split_once(' ').unwrap_or((input, ""));
    cmd.eq_ignore_ascii_case("narrate").then_some(rest.trim())
}

/// Request narration and wait for it; the session itself never blocks.
fn narrate(
    session: &mut Session,
    runtime: &Runtime,
    client: &NarrativeClient,
    prompt: &str,
) -> Result<(), SessionError> {
    let before = session.messages().len();
    session.request_narrative(client, prompt)?;
    while session.poll_narrative() == NarrativePoll::Pending {
        runtime.block_on(tokio::time::sleep(POLL_INTERVAL));
    }
    print_new(session, before);
    Ok(())
}

fn print_new(session: &Session, from: usize) {
    for message in session.messages().messages().iter().skip(from) {
        println!("  {}", message.text);
    }
}
