use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::Strategy;
use crate::board::Board;
use crate::WIDTH;

/// Plays a uniformly random column without looking at the board. Full columns
/// are left to the game's fallback policy.
pub struct RandomStrategy {
    rng: StdRng,
}

impl RandomStrategy {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for RandomStrategy {
    fn name(&self) -> &str {
        "Random"
    }

    fn choose_move(&mut self, _board: &Board) -> Result<usize> {
        Ok(self.rng.gen_range(0..WIDTH))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Color;
    use crate::HEIGHT;

    #[test]
    fn test_random_strategy_stays_in_range() {
        let mut strategy = RandomStrategy::with_seed(42);
        let board = Board::new();
        let mut seen = [false; WIDTH];
        for _ in 0..500 {
            let column = strategy.choose_move(&board).unwrap();
            assert!(column < WIDTH);
            seen[column] = true;
        }
        assert!(seen.iter().all(|&s| s), "every column should come up");
    }

    #[test]
    fn test_random_strategy_ignores_full_columns() {
        // the strategy is board-blind, so full columns may still be chosen
        let mut board = Board::new();
        for column in 0..WIDTH - 1 {
            for _ in 0..HEIGHT {
                board.place(column, Color::Red);
            }
        }
        let mut strategy = RandomStrategy::with_seed(5);
        let picked_full = (0..200)
            .map(|_| strategy.choose_move(&board).unwrap())
            .any(|column| board.is_column_full(column));
        assert!(picked_full);
    }

    #[test]
    fn test_random_strategy_name() {
        assert_eq!(RandomStrategy::new().name(), "Random");
    }
}
