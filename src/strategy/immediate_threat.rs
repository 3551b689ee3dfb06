use anyhow::{anyhow, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::Strategy;
use crate::board::{Board, Color};
use crate::outcome;
use crate::{CONNECT, HEIGHT, WIDTH};

/// Column sets computed for one decision of [`ImmediateThreatStrategy`]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ThreatAnalysis {
    /// Columns that are not full
    pub open: Vec<usize>,
    /// Columns that win immediately for the strategy
    pub winning: Vec<usize>,
    /// Columns the opponent would win in, so they must be occupied
    pub blocking: Vec<usize>,
    /// Open columns after which the opponent has no immediate win
    pub safe: Vec<usize>,
}

/// Rule based player: win if possible, otherwise block the opponent's
/// immediate win, otherwise play a random column that does not hand the
/// opponent a win on the next move.
pub struct ImmediateThreatStrategy {
    color: Color,
    rng: StdRng,
}

impl ImmediateThreatStrategy {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(color: Color, seed: u64) -> Self {
        Self {
            color,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn analyze(&self, board: &Board) -> ThreatAnalysis {
        let me = self.color;
        let opponent = me.other();
        let open: Vec<usize> = board.open_columns().collect();

        let winning = open
            .iter()
            .copied()
            .filter(|&column| wins_after_drop(board, column, me))
            .collect();

        let blocking = open
            .iter()
            .copied()
            .filter(|&column| wins_after_drop(board, column, opponent))
            .collect();

        let safe = open
            .iter()
            .copied()
            .filter(|&column| {
                let mut after = *board;
                after.place(column, me);
                let loses = after
                    .open_columns()
                    .any(|reply| wins_after_drop(&after, reply, opponent));
                !loses
            })
            .collect();

        ThreatAnalysis {
            open,
            winning,
            blocking,
            safe,
        }
    }
}

impl Strategy for ImmediateThreatStrategy {
    fn name(&self) -> &str {
        "Immediate Threat"
    }

    fn choose_move(&mut self, board: &Board) -> Result<usize> {
        let analysis = self.analyze(board);

        if let Some(&column) = analysis.winning.first() {
            return Ok(column);
        }
        if let Some(&column) = analysis.blocking.first() {
            return Ok(column);
        }
        let pool = if analysis.safe.is_empty() {
            &analysis.open
        } else {
            &analysis.safe
        };
        pool.choose(&mut self.rng)
            .copied()
            .ok_or_else(|| anyhow!("no open column to play"))
    }
}

/// Simulates `color` dropping into `column` on a copy of `board` and reports
/// whether that completes a line. Both the straight-line run count and the
/// full detector are consulted; either one is enough.
fn wins_after_drop(board: &Board, column: usize, color: Color) -> bool {
    let mut after = *board;
    match after.place(column, color) {
        Some(row) => {
            straight_run(&after, row, column, color) || outcome::winner(&after) == Some(color)
        }
        None => false,
    }
}

// horizontal and vertical runs through the landed piece, diagonals are left
// to the full detector
fn straight_run(board: &Board, row: usize, column: usize, color: Color) -> bool {
    let is_mine = |r: usize, c: usize| board.get(r, c).color() == Some(color);

    let below = (row + 1..HEIGHT).take_while(|&r| is_mine(r, column)).count();
    if 1 + below >= CONNECT {
        return true;
    }

    let left = (0..column).rev().take_while(|&c| is_mine(row, c)).count();
    let right = (column + 1..WIDTH).take_while(|&c| is_mine(row, c)).count();
    1 + left + right >= CONNECT
}
