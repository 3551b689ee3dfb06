//! An arena for pitting automated players of the board game 'Connect 4'
//! against each other
//!
//! Games are played between pluggable [`Strategy`](strategy::Strategy)
//! implementations. Single games are driven by a
//! [`GameSession`](session::GameSession), many games between the same pair by a
//! [`MatchRunner`](match_runner::MatchRunner), and single-elimination brackets
//! of many contenders by a [`Tournament`](tournament::Tournament).
//!
//! # Basic Usage
//!
//! ```
//! use connect4_arena::{match_runner::MatchRunner, strategy::Registry};
//!
//!# fn main() -> anyhow::Result<()> {
//! let registry = Registry::builtin();
//! let black = registry.resolve("immediate-threat")?;
//! let red = registry.resolve("random")?;
//!
//! let stats = MatchRunner::new(&black, &red, 10).run()?;
//!
//! assert_eq!(stats.games(), 10);
//!# Ok(())
//!# }
//! ```

use static_assertions::*;
pub use anyhow;

pub mod board;

pub mod move_engine;

pub mod outcome;

pub mod strategy;

pub mod session;

pub mod match_runner;

pub mod tournament;

pub mod config;

pub mod error;


/// The width of the game board in tiles
pub const WIDTH: usize = 7;

/// The height of the game board in tiles
pub const HEIGHT: usize = 6;

/// The number of aligned tiles needed to win
pub const CONNECT: usize = 4;

// the scan windows in `outcome` assume a line of CONNECT fits both ways
const_assert!(CONNECT <= WIDTH && CONNECT <= HEIGHT);
