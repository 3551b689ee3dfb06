//! Single elimination bracket
//!
//! Each round pairs the remaining entrants left to right and plays one match
//! per pair, all pairs of a round in parallel. The match winner advances; a
//! drawn match advances one of the two at random. With an odd number of
//! entrants the last one passes through to the next round unplayed.

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::board::Color;
use crate::match_runner::{MatchRunner, MatchStatistics};
use crate::strategy::Entrant;

/// Results of one bracket round
#[derive(Clone, Debug, Serialize)]
pub struct RoundReport {
    /// 1-based round number
    pub round: usize,
    pub matches: Vec<MatchStatistics>,
    /// Entrant that sat the round out, if the field was odd
    pub passthrough: Option<String>,
    /// Ids moving on to the next round, in bracket order
    pub advanced: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct TournamentReport {
    pub rounds: Vec<RoundReport>,
    pub champion: String,
}

pub struct Tournament {
    entrants: Vec<Entrant>,
    games_per_match: usize,
    threads: usize,
    rng: StdRng,
    show_progress: bool,
}

impl Tournament {
    pub fn new(entrants: Vec<Entrant>, games_per_match: usize) -> Self {
        Self {
            entrants,
            games_per_match,
            threads: 0,
            rng: StdRng::from_entropy(),
            show_progress: false,
        }
    }

    /// Seeds the tie-breaks and every match of the bracket
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Size of the worker pool, 0 for one worker per core
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Draws a progress bar on stderr for every round
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn run(mut self) -> Result<TournamentReport> {
        if self.entrants.is_empty() {
            bail!("a tournament needs at least one entrant");
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .build()
            .context("failed to build the match thread pool")?;

        let mut field = std::mem::take(&mut self.entrants);
        let mut rounds = Vec::new();

        while field.len() > 1 {
            let round = rounds.len() + 1;
            let players = field.len();
            let passthrough = if players % 2 == 1 { field.pop() } else { None };
            info!(
                round,
                players,
                matches = players / 2,
                passthrough = passthrough.is_some(),
                "round started"
            );

            // seeds are drawn up front so the outcome does not depend on scheduling
            let pairings: Vec<(Entrant, Entrant, u64)> = field
                .chunks(2)
                .map(|pair| (pair[0], pair[1], self.rng.gen()))
                .collect();

            let progress = self.round_progress(round, pairings.len());
            let games = self.games_per_match;
            let matches: Vec<MatchStatistics> = pool.install(|| {
                pairings
                    .par_iter()
                    .map_with(progress.clone(), |progress, (black, red, seed)| {
                        MatchRunner::new(black, red, games)
                            .with_seed(*seed)
                            .with_progress(progress.clone())
                            .run()
                    })
                    .collect::<Result<Vec<_>>>()
            })?;
            progress.finish_and_clear();

            let mut next = Vec::with_capacity(pairings.len() + 1);
            for ((black, red, _), stats) in pairings.iter().zip(&matches) {
                let winner = match stats.winner() {
                    Some(Color::Black) => *black,
                    Some(Color::Red) => *red,
                    None if self.rng.gen() => *black,
                    None => *red,
                };
                info!(round, %stats, advances = winner.id(), "match decided");
                next.push(winner);
            }
            next.extend(passthrough);

            rounds.push(RoundReport {
                round,
                matches,
                passthrough: passthrough.map(|entrant| entrant.id().to_string()),
                advanced: next.iter().map(|entrant| entrant.id().to_string()).collect(),
            });
            field = next;
        }

        let champion = field[0].id().to_string();
        info!(%champion, rounds = rounds.len(), "tournament finished");
        Ok(TournamentReport { rounds, champion })
    }

    fn round_progress(&self, round: usize, matches: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let progress = ProgressBar::new((matches * self.games_per_match) as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("Round {msg}: {bar:40.cyan/blue} {pos}/{len} games ~{eta} remaining")
                .progress_chars("█▓▒░  "),
        );
        progress.set_message(&round.to_string());
        progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::Registry;

    fn field(size: usize) -> Result<Vec<Entrant>> {
        let registry = Registry::builtin();
        let ids: Vec<&str> = (0..size)
            .map(|i| if i % 2 == 0 { "immediate-threat" } else { "random" })
            .collect();
        Ok(registry.resolve_all(&ids)?)
    }

    #[test]
    fn test_eight_entrants_take_three_rounds() -> Result<()> {
        let report = Tournament::new(field(8)?, 10).with_seed(1).run()?;
        assert_eq!(report.rounds.len(), 3);
        let sizes: Vec<usize> = report.rounds.iter().map(|r| r.advanced.len()).collect();
        assert_eq!(sizes, vec![4, 2, 1]);
        assert!(report.rounds.iter().all(|r| r.passthrough.is_none()));
        assert_eq!(report.champion, report.rounds[2].advanced[0]);
        Ok(())
    }

    #[test]
    fn test_odd_entrant_passes_through() -> Result<()> {
        let report = Tournament::new(field(5)?, 10)
            .with_seed(2)
            .with_threads(2)
            .run()?;
        let sizes: Vec<usize> = report.rounds.iter().map(|r| r.advanced.len()).collect();
        assert_eq!(sizes, vec![3, 2, 1]);

        let first = &report.rounds[0];
        assert_eq!(first.matches.len(), 2);
        // the fifth entrant sits out and is appended after the winners
        assert_eq!(first.passthrough.as_deref(), Some("immediate-threat"));
        assert_eq!(first.advanced[2], "immediate-threat");
        assert!(first.matches.iter().all(|m| m.games() == 10));
        Ok(())
    }

    #[test]
    fn test_single_entrant_is_champion() -> Result<()> {
        let report = Tournament::new(field(1)?, 10).run()?;
        assert!(report.rounds.is_empty());
        assert_eq!(report.champion, "immediate-threat");
        Ok(())
    }

    #[test]
    fn test_empty_field_is_an_error() {
        assert!(Tournament::new(Vec::new(), 10).run().is_err());
    }
}
