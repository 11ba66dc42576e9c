//! CLI frontend for the Spielleiter session engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "sl",
    about = "Spielleiter: encounters, tactics, and mandatory dice for tabletop sessions",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log engine decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive session over a world file
    Play {
        /// World file (JSON roster)
        world: PathBuf,

        /// RNG seed for deterministic dice
        #[arg(short, long)]
        seed: Option<u64>,

        /// Actions allowed per day
        #[arg(long)]
        max_actions: Option<u32>,

        /// Starting location (id or name)
        #[arg(short, long)]
        location: Option<String>,

        /// Session config file (JSON); flags override it
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Roll dice, e.g. `sl roll 2d6+3`
    Roll {
        /// Dice notation
        notation: String,

        /// RNG seed
        #[arg(short, long)]
        seed: Option<u64>,

        /// Reject malformed notation instead of rolling 1d20
        #[arg(long)]
        strict: bool,
    },

    /// Show which encounters a location triggers
    Detect {
        /// World file (JSON roster)
        world: PathBuf,

        /// Location (id or name)
        #[arg(short, long)]
        location: String,

        /// Campaign day
        #[arg(short, long, default_value = "1")]
        day: u32,

        /// Time of day: morning, afternoon, evening, night
        #[arg(short, long, default_value = "morning")]
        time: String,

        /// RNG seed for the tactical engine
        #[arg(short, long, default_value = "42")]
        seed: u64,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Play {
            world,
            seed,
            max_actions,
            location,
            config,
        } => commands::play::run(
            &world,
            commands::play::PlayOptions {
                seed,
                max_actions,
                location,
                config,
            },
        ),
        Commands::Roll {
            notation,
            seed,
            strict,
        } => commands::roll::run(&notation, seed, strict),
        Commands::Detect {
            world,
            location,
            day,
            time,
            seed,
        } => commands::detect::run(&world, &location, day, &time, seed),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
