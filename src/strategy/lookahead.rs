//! Fixed depth scoring player
//!
//! Every root column is scored by enumerating all continuations five plies
//! deep, with no pruning, and adding a weighted amount for every simulated
//! board on which a player has a line of four. The weights shrink with depth,
//! so nearer wins and losses dominate.

use anyhow::{anyhow, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::Strategy;
use crate::board::{Board, Color};
use crate::outcome;
use crate::WIDTH;

/// Score contributions of the [`LookaheadStrategy`], one per ply
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ScoreWeights {
    /// Own piece in the root column wins
    pub immediate_win: i64,
    /// An opponent piece in the root column would win
    pub opponent_threat: i64,
    /// Per opponent reply that wins
    pub opponent_reply: i64,
    /// Per own second move that wins
    pub own_reply: i64,
    /// Per opponent second reply that wins
    pub opponent_second_reply: i64,
    /// Per own third move that wins
    pub own_second_reply: i64,
}

impl ScoreWeights {
    /// The stock weights. The opponent threat term is added, which
    /// makes the column the opponent would win in attractive to play.
    pub const LITERAL: ScoreWeights = ScoreWeights {
        immediate_win: 10_000_000,
        opponent_threat: 1_000_000,
        opponent_reply: -10_000,
        own_reply: 100,
        opponent_second_reply: -10,
        own_second_reply: 1,
    };

    /// [`ScoreWeights::LITERAL`] with the opponent threat term subtracted
    pub fn corrected() -> Self {
        Self {
            opponent_threat: -Self::LITERAL.opponent_threat,
            ..Self::LITERAL
        }
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self::LITERAL
    }
}

pub struct LookaheadStrategy {
    color: Color,
    weights: ScoreWeights,
    rng: StdRng,
}

impl LookaheadStrategy {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            weights: ScoreWeights::LITERAL,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(color: Color, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            ..Self::new(color)
        }
    }

    /// Subtract instead of add the opponent threat term
    pub fn with_corrected_threat_sign(mut self, corrected: bool) -> Self {
        self.weights = if corrected {
            ScoreWeights::corrected()
        } else {
            ScoreWeights::LITERAL
        };
        self
    }

    pub fn weights(&self) -> ScoreWeights {
        self.weights
    }

    /// Scores every column, full columns included. A simulated drop into a
    /// full column leaves the board unchanged and the enumeration carries on.
    pub fn scores(&self, board: &Board) -> [i64; WIDTH] {
        let me = self.color;
        let opponent = me.other();
        let w = self.weights;
        let wins = |board: &Board, color: Color| outcome::winner(board) == Some(color);

        let mut scores = [0; WIDTH];
        for (column, score) in scores.iter_mut().enumerate() {
            let ply1 = dropped(board, column, me);
            if wins(&ply1, me) {
                *score += w.immediate_win;
            }
            let threat = dropped(board, column, opponent);
            if wins(&threat, opponent) {
                *score += w.opponent_threat;
            }

            for a in 0..WIDTH {
                let ply2 = dropped(&ply1, a, opponent);
                if wins(&ply2, opponent) {
                    *score += w.opponent_reply;
                }
                for b in 0..WIDTH {
                    let ply3 = dropped(&ply2, b, me);
                    if wins(&ply3, me) {
                        *score += w.own_reply;
                    }
                    for c in 0..WIDTH {
                        let ply4 = dropped(&ply3, c, opponent);
                        if wins(&ply4, opponent) {
                            *score += w.opponent_second_reply;
                        }
                        for d in 0..WIDTH {
                            let ply5 = dropped(&ply4, d, me);
                            if wins(&ply5, me) {
                                *score += w.own_second_reply;
                            }
                        }
                    }
                }
            }
        }
        scores
    }
}

impl Strategy for LookaheadStrategy {
    fn name(&self) -> &str {
        if self.weights == ScoreWeights::LITERAL {
            "Lookahead"
        } else {
            "Lookahead (corrected)"
        }
    }

    fn choose_move(&mut self, board: &Board) -> Result<usize> {
        let scores = self.scores(board);
        let best = board
            .open_columns()
            .map(|column| scores[column])
            .max()
            .ok_or_else(|| anyhow!("no open column to play"))?;

        let tied: Vec<usize> = board
            .open_columns()
            .filter(|&column| scores[column] == best)
            .collect();
        tied.choose(&mut self.rng)
            .copied()
            .ok_or_else(|| anyhow!("no open column to play"))
    }
}

// copy of `board` with the piece dropped, unchanged if the column is full
fn dropped(board: &Board, column: usize, color: Color) -> Board {
    let mut next = *board;
    next.place(column, color);
    next
}
