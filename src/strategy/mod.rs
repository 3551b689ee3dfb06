//! Automated players
//!
//! A [`Strategy`] is told when a new game starts and is asked for a column
//! whenever it is its turn. It only ever sees a copy of the game board.

use anyhow::Result;

use crate::board::Board;

mod immediate_threat;
mod lookahead;
mod random;
mod registry;

pub use immediate_threat::{ImmediateThreatStrategy, ThreatAnalysis};
pub use lookahead::{LookaheadStrategy, ScoreWeights};
pub use random::RandomStrategy;
pub use registry::{Entrant, Registry, StrategyFactory};

/// A player of Connect 4
///
/// Strategies are moved onto match threads, hence `Send`.
pub trait Strategy: Send {
    /// Display name, used in match statistics
    fn name(&self) -> &str;

    /// Called before every game; `first_move` tells whether this strategy
    /// opens the game
    fn start_game(&mut self, _first_move: bool) {}

    /// Returns the column (0-6) to play on `board`
    ///
    /// Returning an unplayable column, or an error when no move can be chosen,
    /// is not fatal: the game replaces it with a fallback move.
    fn choose_move(&mut self, board: &Board) -> Result<usize>;
}
