use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rand::Rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use std::path::PathBuf;

use connect4_arena::board::Color;
use connect4_arena::config::AppConfig;
use connect4_arena::match_runner::MatchRunner;
use connect4_arena::session::{GameSession, Lineup};
use connect4_arena::strategy::Registry;
use connect4_arena::tournament::Tournament;

mod display;
use display::TerminalDisplay;

/// Pit Connect 4 strategies against each other.
#[derive(Parser)]
#[command(name = "connect4-arena", about = "Pit Connect 4 strategies against each other")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, global = true, default_value = "connect4-arena.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the registered strategies
    List,

    /// Play a match between two strategies
    Match {
        /// Strategy id playing black
        black: String,
        /// Strategy id playing red
        red: String,
        /// Override the number of games
        #[arg(long)]
        games: Option<usize>,
        /// Seed for the opening order and fallback moves
        #[arg(long)]
        seed: Option<u64>,
        /// Print the statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run a single elimination tournament
    Tournament {
        /// Strategy ids in bracket order, the configured list when empty
        entrants: Vec<String>,
        /// Override the number of games per pairing
        #[arg(long)]
        games: Option<usize>,
        /// Override the number of worker threads
        #[arg(long)]
        threads: Option<usize>,
        /// Seed for tie-breaks and every match
        #[arg(long)]
        seed: Option<u64>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Play one game, drawing the board after every move
    Watch {
        /// Strategy id playing black
        black: String,
        /// Strategy id playing red
        red: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // only warnings can happen before the configured subscriber is installed
    let bootstrap = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("warn"))
        .with_writer(std::io::stderr)
        .finish();
    let mut config = tracing::subscriber::with_default(bootstrap, || {
        AppConfig::load_or_default(&cli.config)
    })
    .with_context(|| format!("loading config from {}", cli.config.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&config.log.filter))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let registry = Registry::builtin();

    match cli.command {
        Command::List => {
            for id in registry.ids() {
                let name = registry.resolve(id)?.build(Color::Black).name().to_string();
                println!("{:<20} {}", id, name);
            }
        }
        Command::Match {
            black,
            red,
            games,
            seed,
            json,
        } => {
            if let Some(games) = games {
                config.match_.games = games;
            }
            config.validate()?;

            let black = registry.resolve(&black)?;
            let red = registry.resolve(&red)?;
            let games = config.match_.games;
            info!(black = black.id(), red = red.id(), games, "starting match");

            let progress = ProgressBar::new(games as u64);
            progress.set_style(
                ProgressStyle::default_bar()
                    .template("{msg}: {bar:40.cyan/blue} {pos}/{len} games ~{eta} remaining")
                    .progress_chars("█▓▒░  "),
            );
            progress.set_message(&format!("{} vs {}", black.id(), red.id()));

            let mut runner = MatchRunner::new(&black, &red, games).with_progress(progress.clone());
            if let Some(seed) = seed {
                runner = runner.with_seed(seed);
            }
            let stats = runner.spawn()?.join()?;
            progress.finish_and_clear();

            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("{}", stats);
            }
        }
        Command::Tournament {
            entrants,
            games,
            threads,
            seed,
            json,
        } => {
            if !entrants.is_empty() {
                config.tournament.entrants = entrants;
            }
            if let Some(games) = games {
                config.tournament.games_per_match = games;
            }
            if let Some(threads) = threads {
                config.tournament.threads = threads;
            }
            config.validate()?;

            let entrants = registry.resolve_all(&config.tournament.entrants)?;
            let mut tournament = Tournament::new(entrants, config.tournament.games_per_match)
                .with_threads(config.tournament.threads)
                .with_progress(!json);
            if let Some(seed) = seed {
                tournament = tournament.with_seed(seed);
            }
            let report = tournament.run()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for round in &report.rounds {
                    println!("Round: {} ({} matches)", round.round, round.matches.len());
                    for stats in &round.matches {
                        println!("{}", stats);
                    }
                    if let Some(passthrough) = &round.passthrough {
                        println!("Passthrough: {}", passthrough);
                    }
                }
                println!("Champion: {}", report.champion);
            }
        }
        Command::Watch { black, red } => {
            let black = registry.resolve(&black)?;
            let red = registry.resolve(&red)?;
            let mut lineup = Lineup::new(black.build(Color::Black), red.build(Color::Red));
            let first = if rand::thread_rng().gen() {
                Color::Black
            } else {
                Color::Red
            };
            println!(
                "{} (black) vs {} (red), {} opens",
                lineup.black.name(),
                lineup.red.name(),
                first
            );

            let mut display = TerminalDisplay::new();
            let mut session = GameSession::start(first, &mut lineup);
            let outcome = session.play_out(&mut lineup, &mut display)?;
            display.finish()?;
            info!(%outcome, moves = session.moves(), "game finished");
        }
    }

    Ok(())
}
