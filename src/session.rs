//! Single game turn loop
//!
//! A [`GameSession`] owns the authoritative board of one game. On each step it
//! asks the strategy whose turn it is for a column, handing it a copy of the
//! board, applies the answer through the [`MoveEngine`], and checks for a win
//! or a tie. A strategy that fails or panics forfeits its choice; the engine
//! then picks the column.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::board::{Board, Color};
use crate::error::SessionError;
use crate::move_engine::{MoveEngine, Placement};
use crate::outcome::{self, Line, Outcome};
use crate::strategy::Strategy;

/// Moves taking longer than this are reported. Strategies cannot be
/// interrupted, so nothing else happens to them.
pub const SLOW_MOVE: Duration = Duration::from_secs(1);

/// The two strategies of a game, by seat
pub struct Lineup {
    pub black: Box<dyn Strategy>,
    pub red: Box<dyn Strategy>,
}

impl Lineup {
    pub fn new(black: Box<dyn Strategy>, red: Box<dyn Strategy>) -> Self {
        Self { black, red }
    }

    pub fn seat(&mut self, color: Color) -> &mut dyn Strategy {
        match color {
            Color::Black => self.black.as_mut(),
            Color::Red => self.red.as_mut(),
        }
    }
}

/// Receives notifications from a running game, e.g. to draw it
pub trait GameObserver {
    /// A piece came to rest; `board` already contains it
    fn piece_settled(&mut self, _board: &Board, _placement: Placement, _color: Color) {}

    /// The game ended; `line` holds the winning cells for a win
    fn game_over(&mut self, _board: &Board, _outcome: Outcome, _line: Option<Line>) {}
}

/// Ignores every notification
impl GameObserver for () {}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum SessionState {
    AwaitingMove(Color),
    Evaluating,
    Terminal(Outcome),
}

pub struct GameSession {
    board: Board,
    state: SessionState,
    first: Color,
    moves: usize,
    forfeits: usize,
    engine: MoveEngine,
}

impl GameSession {
    /// Starts a game on an empty board, telling both strategies who opens
    pub fn start(first: Color, lineup: &mut Lineup) -> Self {
        Self::start_with_engine(first, lineup, MoveEngine::new())
    }

    pub fn start_with_engine(first: Color, lineup: &mut Lineup, engine: MoveEngine) -> Self {
        lineup.black.start_game(first == Color::Black);
        lineup.red.start_game(first == Color::Red);
        Self {
            board: Board::new(),
            state: SessionState::AwaitingMove(first),
            first,
            moves: 0,
            forfeits: 0,
            engine,
        }
    }

    /// The current board, read only
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn first(&self) -> Color {
        self.first
    }

    /// Number of pieces played so far
    pub fn moves(&self) -> usize {
        self.moves
    }

    /// Number of turns where the strategy's own choice was not played
    pub fn forfeits(&self) -> usize {
        self.forfeits
    }

    /// Plays one turn and returns the state that follows it
    ///
    /// A panicking strategy is caught and forfeits the turn, with its panic
    /// message logged through `tracing`. The process panic hook still runs
    /// first, so the default hook also prints that message to stderr.
    pub fn step(
        &mut self,
        lineup: &mut Lineup,
        observer: &mut dyn GameObserver,
    ) -> Result<SessionState, SessionError> {
        let turn = match self.state {
            SessionState::AwaitingMove(turn) => turn,
            SessionState::Terminal(outcome) => return Err(SessionError::GameOver(outcome)),
            // a previous step failed half way
            SessionState::Evaluating => {
                return Err(SessionError::GameOver(outcome::evaluate(&self.board)))
            }
        };

        let requested = request_move(lineup.seat(turn), self.board);

        self.state = SessionState::Evaluating;
        let placement = self.engine.drop(&mut self.board, requested, turn)?;
        self.moves += 1;
        if placement.fallback {
            self.forfeits += 1;
        }
        observer.piece_settled(&self.board, placement, turn);

        self.state = match outcome::winning_line(&self.board) {
            Some((color, line)) => {
                let outcome = Outcome::Win(color);
                observer.game_over(&self.board, outcome, Some(line));
                SessionState::Terminal(outcome)
            }
            None if outcome::is_tie(&self.board) => {
                observer.game_over(&self.board, Outcome::Tie, None);
                SessionState::Terminal(Outcome::Tie)
            }
            None => SessionState::AwaitingMove(turn.other()),
        };
        Ok(self.state)
    }

    /// Steps until the game is over and returns the outcome
    pub fn play_out(
        &mut self,
        lineup: &mut Lineup,
        observer: &mut dyn GameObserver,
    ) -> Result<Outcome, SessionError> {
        loop {
            if let SessionState::Terminal(outcome) = self.step(lineup, observer)? {
                debug!(%outcome, moves = self.moves, forfeits = self.forfeits, "game finished");
                return Ok(outcome);
            }
        }
    }
}

// asks a strategy for its column, turning errors and panics into a forfeit
fn request_move(strategy: &mut dyn Strategy, snapshot: Board) -> Option<usize> {
    let started = Instant::now();
    let result = panic::catch_unwind(AssertUnwindSafe(|| strategy.choose_move(&snapshot)));
    let elapsed = started.elapsed();
    if elapsed > SLOW_MOVE {
        warn!(strategy = strategy.name(), ?elapsed, "strategy was slow to move");
    }

    match result {
        Ok(Ok(column)) => Some(column),
        Ok(Err(err)) => {
            debug!(strategy = strategy.name(), error = %err, "strategy forfeited its move");
            None
        }
        Err(payload) => {
            warn!(
                strategy = strategy.name(),
                panic = panic_message(&*payload),
                "strategy panicked, forfeiting its move"
            );
            None
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic payload"
    }
}
