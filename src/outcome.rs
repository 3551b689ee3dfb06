//! Win and tie detection
//!
//! Lines are scanned in a fixed order: horizontal rows from the bottom up,
//! vertical columns from the left, then `\` and `/` diagonals. Only one line
//! can exist when a game is checked after every move, but consumers that
//! highlight the winning cells rely on the order being stable.

use serde::Serialize;

use std::fmt;

use crate::board::{Board, Color};
use crate::{CONNECT, HEIGHT, WIDTH};

/// The `(row, column)` cells of a winning line
pub type Line = [(usize, usize); CONNECT];

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize)]
pub enum Outcome {
    Ongoing,
    Win(Color),
    Tie,
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        self != Outcome::Ongoing
    }

    pub fn winner(self) -> Option<Color> {
        match self {
            Outcome::Win(color) => Some(color),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Ongoing => f.write_str("ongoing"),
            Outcome::Win(color) => write!(f, "{} wins", color),
            Outcome::Tie => f.write_str("tie"),
        }
    }
}

/// Returns the winning color, if any line of four exists
pub fn winner(board: &Board) -> Option<Color> {
    winning_line(board).map(|(color, _)| color)
}

/// Returns the first line of four found, along with its color
pub fn winning_line(board: &Board) -> Option<(Color, Line)> {
    // horizontal, bottom row first
    for row in (0..HEIGHT).rev() {
        for column in 0..=WIDTH - CONNECT {
            if let Some(found) = check_line(board, row, column, 0, 1) {
                return Some(found);
            }
        }
    }

    // vertical
    for column in 0..WIDTH {
        for row in (0..=HEIGHT - CONNECT).rev() {
            if let Some(found) = check_line(board, row, column, 1, 0) {
                return Some(found);
            }
        }
    }

    // diagonal \
    for row in (0..=HEIGHT - CONNECT).rev() {
        for column in 0..=WIDTH - CONNECT {
            if let Some(found) = check_line(board, row, column, 1, 1) {
                return Some(found);
            }
        }
    }

    // diagonal /
    for row in (0..=HEIGHT - CONNECT).rev() {
        for column in (CONNECT - 1..WIDTH).rev() {
            if let Some(found) = check_line(board, row, column, 1, -1) {
                return Some(found);
            }
        }
    }

    None
}

fn check_line(
    board: &Board,
    row: usize,
    column: usize,
    d_row: usize,
    d_column: isize,
) -> Option<(Color, Line)> {
    let color = board.get(row, column).color()?;
    let mut line = [(row, column); CONNECT];
    for (i, cell) in line.iter_mut().enumerate().skip(1) {
        let r = row + i * d_row;
        let c = (column as isize + i as isize * d_column) as usize;
        if board.get(r, c).color() != Some(color) {
            return None;
        }
        *cell = (r, c);
    }
    Some((color, line))
}

/// A board is tied when every column is full. Only meaningful once
/// [`winner`] has reported nothing, since a full board can also be won.
pub fn is_tie(board: &Board) -> bool {
    board.is_full()
}

/// Classifies the board, a win taking precedence over a full board
pub fn evaluate(board: &Board) -> Outcome {
    match winner(board) {
        Some(color) => Outcome::Win(color),
        None if is_tie(board) => Outcome::Tie,
        None => Outcome::Ongoing,
    }
}
