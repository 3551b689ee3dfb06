//! Applies moves to the authoritative board of a game
//!
//! A requested column that is missing, off the board, or full does not end the
//! game: the engine picks a replacement column instead, trying a handful of
//! random columns before falling back to the leftmost open one.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::board::{Board, Color};
use crate::error::MoveError;
use crate::WIDTH;

/// How many random columns are tried before scanning left to right
pub const RANDOM_RETRIES: usize = 10;

/// Where a dropped piece came to rest
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Placement {
    pub column: usize,
    pub row: usize,
    /// Whether the requested column was replaced by the fallback policy
    pub fallback: bool,
}

pub struct MoveEngine {
    rng: StdRng,
}

impl MoveEngine {
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

    /// Drops a `color` piece into the requested column, or into a fallback
    /// column when the request is `None` (a forfeited turn) or not playable.
    ///
    /// Fails only when the board has no open column at all.
    pub fn drop(
        &mut self,
        board: &mut Board,
        requested: Option<usize>,
        color: Color,
    ) -> Result<Placement, MoveError> {
        if board.is_full() {
            return Err(MoveError::BoardFull);
        }

        let (column, fallback) = match requested {
            Some(column) if !board.is_column_full(column) => (column, false),
            _ => {
                let column = self.fallback_column(board)?;
                debug!(?requested, column, %color, "requested column unplayable, using fallback");
                (column, true)
            }
        };

        let row = board.place(column, color).ok_or(MoveError::BoardFull)?;
        Ok(Placement {
            column,
            row,
            fallback,
        })
    }

    fn fallback_column(&mut self, board: &Board) -> Result<usize, MoveError> {
        for _ in 0..RANDOM_RETRIES {
            let column = self.rng.gen_range(0..WIDTH);
            if !board.is_column_full(column) {
                return Ok(column);
            }
        }
        board.open_columns().next().ok_or(MoveError::BoardFull)
    }
}

impl Default for MoveEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;
    use crate::HEIGHT;

    #[test]
    fn test_valid_column_is_used() {
        let mut engine = MoveEngine::with_seed(1);
        let mut board = Board::new();
        let placement = engine.drop(&mut board, Some(4), Color::Red).unwrap();
        assert_eq!(
            placement,
            Placement {
                column: 4,
                row: HEIGHT - 1,
                fallback: false
            }
        );
        assert_eq!(board.get(HEIGHT - 1, 4), Cell::Red);
    }

    #[test]
    fn test_invalid_requests_fall_back_to_open_column() {
        let mut engine = MoveEngine::with_seed(7);
        for requested in [None, Some(WIDTH), Some(usize::MAX)].iter() {
            let mut board = Board::new();
            let placement = engine.drop(&mut board, *requested, Color::Black).unwrap();
            assert!(placement.fallback);
            assert!(placement.column < WIDTH);
            assert_eq!(board.piece_count(), 1);
        }
    }

    #[test]
    fn test_full_column_falls_back() {
        let mut engine = MoveEngine::with_seed(3);
        let mut board = Board::new();
        for _ in 0..HEIGHT {
            board.place(2, Color::Black);
        }
        let placement = engine.drop(&mut board, Some(2), Color::Red).unwrap();
        assert!(placement.fallback);
        assert_ne!(placement.column, 2);
    }

    #[test]
    fn test_linear_scan_finds_last_open_column() {
        // with a single open column the random retries almost always miss,
        // the linear scan must still find it
        for seed in 0..20 {
            let mut engine = MoveEngine::with_seed(seed);
            let mut board = Board::new();
            for column in 0..WIDTH - 1 {
                for _ in 0..HEIGHT {
                    board.place(column, Color::Black);
                }
            }
            let placement = engine.drop(&mut board, None, Color::Red).unwrap();
            assert_eq!(placement.column, WIDTH - 1);
        }
    }

    #[test]
    fn test_full_board_is_a_precondition_violation() {
        let mut engine = MoveEngine::with_seed(0);
        let mut board = Board::new();
        for column in 0..WIDTH {
            for _ in 0..HEIGHT {
                board.place(column, Color::Black);
            }
        }
        let before = board;
        assert_eq!(
            engine.drop(&mut board, Some(0), Color::Red),
            Err(MoveError::BoardFull)
        );
        assert_eq!(board, before);
    }
}
