use anyhow::Result;
use crossterm::{
    style::{style, Attribute, Color as TermColor, PrintStyledContent},
    QueueableCommand,
};

use std::io::{stdout, Write};

use connect4_arena::board::{Board, Cell, Color};
use connect4_arena::move_engine::Placement;
use connect4_arena::outcome::{Line, Outcome};
use connect4_arena::session::GameObserver;
use connect4_arena::{HEIGHT, WIDTH};

/// Prints the board to stdout after every settled piece
#[derive(Default)]
pub struct TerminalDisplay {
    // observer callbacks cannot fail, so the first write error is kept here
    error: Option<anyhow::Error>,
}

impl TerminalDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports any error hit while drawing
    pub fn finish(self) -> Result<()> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn record(&mut self, result: Result<()>) {
        if let Err(err) = result {
            self.error.get_or_insert(err);
        }
    }
}

impl GameObserver for TerminalDisplay {
    fn piece_settled(&mut self, board: &Board, placement: Placement, color: Color) {
        let note = if placement.fallback {
            " (fallback)"
        } else {
            ""
        };
        let heading = format!("{} plays column {}{}", color, placement.column + 1, note);
        let result = draw(board, &heading, None);
        self.record(result);
    }

    fn game_over(&mut self, board: &Board, outcome: Outcome, line: Option<Line>) {
        let heading = match outcome {
            Outcome::Win(_) => format!("{}!", outcome),
            _ => "The game is a tie".to_string(),
        };
        let result = draw(board, &heading, line);
        self.record(result);
    }
}

fn draw(board: &Board, heading: &str, highlight: Option<Line>) -> Result<()> {
    let mut stdout = stdout();

    stdout.queue(PrintStyledContent(style(format!("\n{}\n", heading))))?;
    let cols: String = (1..=WIDTH).map(|x| x.to_string()).collect();
    stdout.queue(PrintStyledContent(style(cols + "\n")))?;

    for row in 0..HEIGHT {
        for column in 0..WIDTH {
            let winning = highlight.map_or(false, |line| line.contains(&(row, column)));
            let background = if winning {
                TermColor::White
            } else {
                TermColor::DarkBlue
            };
            stdout.queue(PrintStyledContent(
                style("O")
                    .attribute(Attribute::Bold)
                    .on(background)
                    .with(match board.get(row, column) {
                        Cell::Black => TermColor::Black,
                        Cell::Red => TermColor::Red,
                        Cell::Empty => background,
                    }),
            ))?;
        }
        stdout.queue(PrintStyledContent(style("\n")))?;
    }
    stdout.flush()?;
    Ok(())
}
