//! Repeated games between one pair of strategies
//!
//! The same two strategy instances play every game of a match, so strategies
//! that learn across games keep their state. The opening player is chosen at
//! random for the first game and alternates after that.

use anyhow::{anyhow, Result};
use indicatif::ProgressBar;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::info;

use std::fmt;
use std::thread::{self, JoinHandle};

use crate::board::Color;
use crate::move_engine::MoveEngine;
use crate::outcome::Outcome;
use crate::session::{GameSession, Lineup};
use crate::strategy::Entrant;

/// Tallies of a finished match
///
/// Only a [`MatchRunner`] fills these in; once handed out they are read only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MatchStatistics {
    black_id: String,
    black_name: String,
    red_id: String,
    red_name: String,
    black_wins: usize,
    red_wins: usize,
    ties: usize,
}

impl MatchStatistics {
    pub(crate) fn new(black_id: &str, black_name: &str, red_id: &str, red_name: &str) -> Self {
        Self {
            black_id: black_id.to_string(),
            black_name: black_name.to_string(),
            red_id: red_id.to_string(),
            red_name: red_name.to_string(),
            black_wins: 0,
            red_wins: 0,
            ties: 0,
        }
    }

    pub(crate) fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Win(Color::Black) => self.black_wins += 1,
            Outcome::Win(Color::Red) => self.red_wins += 1,
            Outcome::Tie => self.ties += 1,
            Outcome::Ongoing => {}
        }
    }

    /// Registry id of the strategy playing black
    pub fn black_id(&self) -> &str {
        &self.black_id
    }

    pub fn black_name(&self) -> &str {
        &self.black_name
    }

    pub fn red_id(&self) -> &str {
        &self.red_id
    }

    pub fn red_name(&self) -> &str {
        &self.red_name
    }

    pub fn black_wins(&self) -> usize {
        self.black_wins
    }

    pub fn red_wins(&self) -> usize {
        self.red_wins
    }

    pub fn ties(&self) -> usize {
        self.ties
    }

    pub fn games(&self) -> usize {
        self.black_wins + self.red_wins + self.ties
    }

    /// The side with strictly more wins, `None` when level
    pub fn winner(&self) -> Option<Color> {
        if self.black_wins > self.red_wins {
            Some(Color::Black)
        } else if self.red_wins > self.black_wins {
            Some(Color::Red)
        } else {
            None
        }
    }

    pub fn black_percent(&self) -> f64 {
        self.percent(self.black_wins)
    }

    pub fn red_percent(&self) -> f64 {
        self.percent(self.red_wins)
    }

    pub fn tie_percent(&self) -> f64 {
        self.percent(self.ties)
    }

    fn percent(&self, count: usize) -> f64 {
        match self.games() {
            0 => 0.0,
            games => count as f64 * 100.0 / games as f64,
        }
    }
}

impl fmt::Display for MatchStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Game: {} vs {}, {:5.2}%, {:5.2}%, {:5.2}%",
            self.black_name,
            self.red_name,
            self.black_percent(),
            self.red_percent(),
            self.tie_percent()
        )
    }
}

/// Plays a fixed number of games between two strategies
pub struct MatchRunner {
    black_id: String,
    red_id: String,
    lineup: Lineup,
    games: usize,
    rng: StdRng,
    progress: Option<ProgressBar>,
}

impl MatchRunner {
    /// Builds a fresh strategy instance for each seat
    pub fn new(black: &Entrant, red: &Entrant, games: usize) -> Self {
        let lineup = Lineup::new(black.build(Color::Black), red.build(Color::Red));
        let mut runner = Self::with_lineup(lineup, games);
        runner.black_id = black.id().to_string();
        runner.red_id = red.id().to_string();
        runner
    }

    /// Uses already constructed strategies, identified by their names
    pub fn with_lineup(lineup: Lineup, games: usize) -> Self {
        Self {
            black_id: lineup.black.name().to_string(),
            red_id: lineup.red.name().to_string(),
            lineup,
            games,
            rng: StdRng::from_entropy(),
            progress: None,
        }
    }

    /// Makes the opening order and fallback moves reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Advances `progress` by one per finished game
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn run(mut self) -> Result<MatchStatistics> {
        let mut stats = MatchStatistics::new(
            &self.black_id,
            self.lineup.black.name(),
            &self.red_id,
            self.lineup.red.name(),
        );

        let mut first = if self.rng.gen() {
            Color::Black
        } else {
            Color::Red
        };
        for _ in 0..self.games {
            first = first.other();
            let engine = MoveEngine::with_seed(self.rng.gen());
            let mut session = GameSession::start_with_engine(first, &mut self.lineup, engine);
            let outcome = session.play_out(&mut self.lineup, &mut ())?;
            stats.record(outcome);

            if let Some(progress) = &self.progress {
                progress.inc(1);
            }
        }

        info!(
            black = %self.black_id,
            red = %self.red_id,
            black_wins = stats.black_wins,
            red_wins = stats.red_wins,
            ties = stats.ties,
            "match finished"
        );
        Ok(stats)
    }

    /// Runs the match on its own named thread
    pub fn spawn(self) -> Result<MatchHandle> {
        let name = format!("{} vs {}", self.black_id, self.red_id);
        let handle = thread::Builder::new()
            .name(name)
            .spawn(move || self.run())?;
        Ok(MatchHandle { handle })
    }
}

/// A match running in the background
pub struct MatchHandle {
    handle: JoinHandle<Result<MatchStatistics>>,
}

impl MatchHandle {
    /// Waits for the match to finish
    pub fn join(self) -> Result<MatchStatistics> {
        self.handle
            .join()
            .map_err(|_| anyhow!("match thread panicked"))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::strategy::{Registry, Strategy};
    use std::sync::{Arc, Mutex};

    struct Recording {
        starts: Arc<Mutex<Vec<bool>>>,
    }

    impl Strategy for Recording {
        fn name(&self) -> &str {
            "Recording"
        }

        fn start_game(&mut self, first_move: bool) {
            self.starts.lock().unwrap().push(first_move);
        }

        fn choose_move(&mut self, board: &Board) -> anyhow::Result<usize> {
            Ok(board.open_columns().next().unwrap_or(0))
        }
    }

    #[test]
    fn test_every_game_is_counted() -> Result<()> {
        let registry = Registry::builtin();
        let random = registry.resolve("random")?;
        let stats = MatchRunner::new(&random, &random, 50).with_seed(1).run()?;
        assert_eq!(stats.games(), 50);
        assert_eq!(stats.black_id(), "random");
        assert_eq!(stats.red_name(), "Random");
        assert_eq!(
            stats.black_wins() + stats.red_wins() + stats.ties(),
            stats.games()
        );
        Ok(())
    }

    #[test]
    fn test_starting_player_alternates() -> Result<()> {
        let starts = Arc::new(Mutex::new(Vec::new()));
        let lineup = Lineup::new(
            Box::new(Recording {
                starts: starts.clone(),
            }),
            Box::new(crate::strategy::RandomStrategy::with_seed(2)),
        );
        MatchRunner::with_lineup(lineup, 10).with_seed(2).run()?;

        let starts = starts.lock().unwrap();
        assert_eq!(starts.len(), 10);
        assert_eq!(starts.iter().filter(|&&first| first).count(), 5);
        for pair in starts.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
        Ok(())
    }

    #[test]
    fn test_threat_aware_strategy_beats_random() -> Result<()> {
        let registry = Registry::builtin();
        let stats = MatchRunner::new(
            &registry.resolve("immediate-threat")?,
            &registry.resolve("random")?,
            200,
        )
        .with_seed(3)
        .run()?;
        assert_eq!(stats.winner(), Some(Color::Black));
        assert!(stats.black_percent() > 75.0);
        Ok(())
    }

    #[test]
    fn test_spawned_match_joins_with_result() -> Result<()> {
        let registry = Registry::builtin();
        let random = registry.resolve("random")?;
        let progress = ProgressBar::hidden();
        let handle = MatchRunner::new(&random, &random, 20)
            .with_progress(progress.clone())
            .spawn()?;
        let stats = handle.join()?;
        assert_eq!(stats.games(), 20);
        assert_eq!(progress.position(), 20);
        Ok(())
    }

    #[test]
    fn test_display_and_winner() {
        let mut stats = MatchStatistics::new("a", "Alpha", "b", "Beta");
        assert_eq!(stats.winner(), None);
        assert_eq!(stats.to_string(), "Game: Alpha vs Beta,  0.00%,  0.00%,  0.00%");

        for &outcome in &[
            Outcome::Win(Color::Black),
            Outcome::Win(Color::Red),
            Outcome::Win(Color::Red),
            Outcome::Tie,
            Outcome::Ongoing,
        ] {
            stats.record(outcome);
        }
        assert_eq!(
            (stats.black_wins(), stats.red_wins(), stats.ties()),
            (1, 2, 1)
        );
        assert_eq!(stats.winner(), Some(Color::Red));
        assert_eq!(stats.to_string(), "Game: Alpha vs Beta, 25.00%, 50.00%, 25.00%");

        stats.record(Outcome::Win(Color::Black));
        assert_eq!(stats.winner(), None);
        assert_eq!(stats.games(), 5);
    }
}
