use std::path::PathBuf;

use crate::outcome::Outcome;

/// Errors raised when applying a move to a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    /// Dropping a piece needs at least one open column; the caller must check
    /// for a tie first.
    #[error("cannot drop a piece, every column is full")]
    BoardFull,
}

/// Errors raised while stepping a game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("game is already over ({0})")]
    GameOver(Outcome),

    #[error(transparent)]
    Move(#[from] MoveError),
}

/// Errors raised when resolving strategies by name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("unknown strategy '{id}' (known: {})", known.join(", "))]
    UnknownStrategy { id: String, known: Vec<String> },
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_error_display() {
        assert_eq!(
            MoveError::BoardFull.to_string(),
            "cannot drop a piece, every column is full"
        );
    }

    #[test]
    fn test_session_error_wraps_move_error() {
        let err: SessionError = MoveError::BoardFull.into();
        assert_eq!(err, SessionError::Move(MoveError::BoardFull));
        assert_eq!(err.to_string(), MoveError::BoardFull.to_string());
    }

    #[test]
    fn test_unknown_strategy_display() {
        let err = RegistryError::UnknownStrategy {
            id: "minimax".to_string(),
            known: vec!["random".to_string(), "lookahead".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "unknown strategy 'minimax' (known: random, lookahead)"
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("match.games must be > 0".to_string());
        assert_eq!(
            err.to_string(),
            "config validation error: match.games must be > 0"
        );
    }
}
