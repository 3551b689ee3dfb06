use anyhow::{anyhow, Result};
use serde::Serialize;

use std::fmt;
use std::str::FromStr;

use crate::{HEIGHT, WIDTH};

/// The color of a player's pieces
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize)]
pub enum Color {
    Black,
    Red,
}

impl Color {
    /// The opposing color
    pub fn other(self) -> Self {
        match self {
            Color::Black => Color::Red,
            Color::Red => Color::Black,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::Black => "Black",
            Color::Red => "Red",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Cell {
    Empty,
    Black,
    Red,
}

impl Cell {
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    /// The color occupying this cell, if any
    pub fn color(self) -> Option<Color> {
        match self {
            Cell::Empty => None,
            Cell::Black => Some(Color::Black),
            Cell::Red => Some(Color::Red),
        }
    }

    fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Black => 'b',
            Cell::Red => 'r',
        }
    }
}

impl From<Color> for Cell {
    fn from(color: Color) -> Self {
        match color {
            Color::Black => Cell::Black,
            Color::Red => Cell::Red,
        }
    }
}

/// A 6x7 Connect 4 grid
///
/// Row 0 is the top of the board, where new pieces enter, and row `HEIGHT - 1`
/// is the bottom, where they come to rest. Within a column every occupied cell
/// sits on top of another occupied cell or the bottom edge.
///
/// `Board` is `Copy`: handing a board to anything else hands over an
/// independent duplicate, so strategies can simulate freely without touching
/// the board of the game being played.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Board {
    cells: [[Cell; WIDTH]; HEIGHT],
}

impl Board {
    /// Creates a board with every cell empty
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; WIDTH]; HEIGHT],
        }
    }

    /// Returns the cell at `row` (0 = top) and `column` (0 = left)
    ///
    /// # Panics
    ///
    /// Panics if `row >= HEIGHT` or `column >= WIDTH`; use [`Board::cell`]
    /// for coordinates that may be off the board.
    pub fn get(&self, row: usize, column: usize) -> Cell {
        self.cells[row][column]
    }

    /// Returns the cell at `row` and `column`, or `None` off the board
    pub fn cell(&self, row: usize, column: usize) -> Option<Cell> {
        self.cells.get(row)?.get(column).copied()
    }

    /// A column is full when its top cell is occupied. Columns outside the
    /// board count as full so they are never playable.
    pub fn is_column_full(&self, column: usize) -> bool {
        column >= WIDTH || !self.cells[0][column].is_empty()
    }

    pub fn is_full(&self) -> bool {
        (0..WIDTH).all(|column| self.is_column_full(column))
    }

    /// Columns that can still take a piece, left to right
    pub fn open_columns(&self) -> impl Iterator<Item = usize> + '_ {
        (0..WIDTH).filter(move |&column| !self.is_column_full(column))
    }

    pub fn piece_count(&self) -> usize {
        self.cells
            .iter()
            .flat_map(|row| row.iter())
            .filter(|cell| !cell.is_empty())
            .count()
    }

    /// The cells of `column` read from the bottom row upwards
    pub fn column_from_bottom(&self, column: usize) -> [Cell; HEIGHT] {
        let mut cells = [Cell::Empty; HEIGHT];
        for (i, row) in (0..HEIGHT).rev().enumerate() {
            cells[i] = self.cells[row][column];
        }
        cells
    }

    /// Drops a piece into `column` and returns the row it came to rest in, or
    /// `None` when the column is full or off the board (the board is left
    /// untouched).
    ///
    /// The piece is written into the top row and then settled under gravity.
    pub fn place(&mut self, column: usize, color: Color) -> Option<usize> {
        if self.is_column_full(column) {
            return None;
        }
        self.cells[0][column] = color.into();
        Some(self.settle(column))
    }

    // single top-to-bottom pass, enough since only the top piece can float
    fn settle(&mut self, column: usize) -> usize {
        let mut row = 0;
        while row + 1 < HEIGHT && self.cells[row + 1][column].is_empty() {
            self.cells[row + 1][column] = self.cells[row][column];
            self.cells[row][column] = Cell::Empty;
            row += 1;
        }
        row
    }

    /// Checks the gravity invariant: no occupied cell directly above an empty one
    pub fn is_settled(&self) -> bool {
        (0..WIDTH).all(|column| {
            (0..HEIGHT - 1).all(|row| {
                self.cells[row][column].is_empty() || !self.cells[row + 1][column].is_empty()
            })
        })
    }

    /// Parses a board from its rows, top row first, using `b`, `r` and `.`
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        if rows.len() != HEIGHT {
            return Err(anyhow!(
                "expected {} rows, found {}",
                HEIGHT,
                rows.len()
            ));
        }
        let mut board = Self::new();
        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref().trim();
            if line.chars().count() != WIDTH {
                return Err(anyhow!(
                    "row {} has {} cells, expected {}",
                    row,
                    line.chars().count(),
                    WIDTH
                ));
            }
            for (column, symbol) in line.chars().enumerate() {
                board.cells[row][column] = match symbol {
                    '.' | ' ' => Cell::Empty,
                    'b' | 'B' => Cell::Black,
                    'r' | 'R' => Cell::Red,
                    _ => return Err(anyhow!("could not parse '{}' as a cell", symbol)),
                };
            }
        }
        if !board.is_settled() {
            return Err(anyhow!("invalid position, a piece is floating"));
        }
        Ok(board)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for cell in row.iter() {
                write!(f, "{}", cell.symbol())?;
            }
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let rows: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        Self::from_rows(&rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        for row in 0..HEIGHT {
            for column in 0..WIDTH {
                assert_eq!(board.get(row, column), Cell::Empty);
            }
        }
        assert_eq!(board.piece_count(), 0);
        assert_eq!(board.open_columns().count(), WIDTH);
    }

    #[test]
    fn test_cell_is_none_off_the_board() {
        let mut board = Board::new();
        board.place(2, Color::Red);
        assert_eq!(board.cell(HEIGHT - 1, 2), Some(Cell::Red));
        assert_eq!(board.cell(0, 0), Some(Cell::Empty));
        assert_eq!(board.cell(HEIGHT, 0), None);
        assert_eq!(board.cell(0, WIDTH), None);
    }

    #[test]
    #[should_panic]
    fn test_get_panics_off_the_board() {
        Board::new().get(0, WIDTH);
    }

    #[test]
    fn test_place_settles_to_bottom() {
        let mut board = Board::new();
        assert_eq!(board.place(3, Color::Black), Some(HEIGHT - 1));
        assert_eq!(board.get(HEIGHT - 1, 3), Cell::Black);
        assert_eq!(board.get(0, 3), Cell::Empty);

        assert_eq!(board.place(3, Color::Red), Some(HEIGHT - 2));
        assert_eq!(board.get(HEIGHT - 2, 3), Cell::Red);
        assert!(board.is_settled());
    }

    #[test]
    fn test_place_rejects_full_and_out_of_range_columns() {
        let mut board = Board::new();
        for _ in 0..HEIGHT {
            assert!(board.place(0, Color::Red).is_some());
        }
        assert!(board.is_column_full(0));
        let before = board;
        assert_eq!(board.place(0, Color::Black), None);
        assert_eq!(board.place(WIDTH, Color::Black), None);
        assert_eq!(board, before);
    }

    #[test]
    fn test_full_board() {
        let mut board = Board::new();
        for column in 0..WIDTH {
            for _ in 0..HEIGHT {
                board.place(column, Color::Black);
            }
        }
        assert!(board.is_full());
        assert_eq!(board.open_columns().count(), 0);
        assert_eq!(board.piece_count(), WIDTH * HEIGHT);
    }

    #[test]
    fn test_copy_is_independent() {
        let original = Board::new();
        let mut copy = original;
        copy.place(2, Color::Red);
        assert_eq!(original.piece_count(), 0);
        assert_eq!(copy.piece_count(), 1);
    }

    #[test]
    fn test_text_form_round_trip() -> Result<()> {
        let text = "\
            .......
            .......
            .......
            ...r...
            ..bb...
            .rbrb..";
        let board: Board = text.parse()?;
        assert_eq!(board.get(5, 1), Cell::Red);
        assert_eq!(board.get(3, 3), Cell::Red);
        assert_eq!(board.piece_count(), 7);
        assert_eq!(board.to_string().parse::<Board>()?, board);
        Ok(())
    }

    #[test]
    fn test_parse_rejects_floating_piece() {
        let text = "\
            .......
            .......
            .......
            ...r...
            .......
            .......";
        assert!(text.parse::<Board>().is_err());
    }

    #[test]
    fn test_parse_rejects_bad_dimensions_and_symbols() {
        assert!(Board::from_rows(&["......."]).is_err());
        let rows = [".......", ".......", ".......", ".......", ".......", "..x...."];
        assert!(Board::from_rows(&rows).is_err());
        let rows = [".......", ".......", ".......", ".......", ".......", "......"];
        assert!(Board::from_rows(&rows).is_err());
    }

    #[test]
    fn test_column_from_bottom() {
        let mut board = Board::new();
        board.place(4, Color::Black);
        board.place(4, Color::Red);
        let column = board.column_from_bottom(4);
        assert_eq!(column[0], Cell::Black);
        assert_eq!(column[1], Cell::Red);
        assert_eq!(column[2], Cell::Empty);
    }

    #[test]
    fn test_other_color() {
        assert_eq!(Color::Black.other(), Color::Red);
        assert_eq!(Color::Red.other(), Color::Black);
        assert_eq!(Cell::from(Color::Red).color(), Some(Color::Red));
        assert_eq!(Cell::Empty.color(), None);
    }
}
