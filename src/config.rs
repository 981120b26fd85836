use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Application configuration. Every field has a sensible default, so the
/// struct can be deserialized from a partial config file or built directly.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    db_path: PathBuf,
    recent_votes_limit: u32,
}

impl Config {
    /// Configuration for an election database at the given path.
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            ..Self::default()
        }
    }

    /// Location of the SQLite database file. Created on first open.
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// How many entries the recent-votes feed returns when the caller does
    /// not give an explicit limit.
    pub fn recent_votes_limit(&self) -> u32 {
        self.recent_votes_limit
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("election.db"),
            recent_votes_limit: 10,
        }
    }
}
