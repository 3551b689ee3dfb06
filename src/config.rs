use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;

/// Top-level configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub log: LogConfig,
    #[serde(rename = "match")]
    pub match_: MatchConfig,
    pub tournament: TournamentConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directives, used when `RUST_LOG` is unset
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Games played by a standalone match
    pub games: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self { games: 1000 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentConfig {
    /// Games played by every pairing of the bracket
    pub games_per_match: usize,
    /// Worker threads for concurrent matches, 0 for one per core
    pub threads: usize,
    /// Strategy ids in bracket order
    pub entrants: Vec<String>,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            games_per_match: 1000,
            threads: 0,
            entrants: ["immediate-threat", "random"]
                .iter()
                .cycle()
                .take(8)
                .map(|id| id.to_string())
                .collect(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.match_.games == 0 {
            return Err(ConfigError::Validation("match.games must be > 0".into()));
        }
        if self.tournament.games_per_match == 0 {
            return Err(ConfigError::Validation(
                "tournament.games_per_match must be > 0".into(),
            ));
        }
        if self.tournament.entrants.is_empty() {
            return Err(ConfigError::Validation(
                "tournament.entrants must name at least one strategy".into(),
            ));
        }
        Ok(())
    }

    /// A TOML document holding every default value, a starting point for
    /// config files
    pub fn default_toml() -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(&AppConfig::default())?)
    }
}
