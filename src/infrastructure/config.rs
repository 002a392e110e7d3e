//! Configuration management

use crate::error::{MoodError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Number of entries shown by `mood list` unless configured otherwise
pub const DEFAULT_FEED_SIZE: usize = 14;

/// A medication the user takes regularly, used to prefill entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Regimen {
    pub name: String,
    pub dose_mg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_feed_size")]
    pub feed_size: usize,
    pub created: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub meds: Vec<Regimen>,
}

fn default_feed_size() -> usize {
    DEFAULT_FEED_SIZE
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

impl Config {
    /// Create a new config with default values
    pub fn new() -> Self {
        Config {
            feed_size: DEFAULT_FEED_SIZE,
            created: Utc::now(),
            meds: Vec::new(),
        }
    }

    /// Load config from .mood/config.toml in the given directory
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = path.join(".mood").join("config.toml");

        let contents = fs::read_to_string(&config_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                MoodError::NotJournalDirectory(path.to_path_buf())
            } else {
                MoodError::Io(e)
            }
        })?;

        toml::from_str(&contents)
            .map_err(|e| MoodError::Config(format!("Failed to parse config.toml: {}", e)))
    }

    /// Save config to .mood/config.toml in the given directory
    pub fn save_to_dir(&self, path: &Path) -> Result<()> {
        let mood_dir = path.join(".mood");
        let config_path = mood_dir.join("config.toml");

        if !mood_dir.exists() {
            fs::create_dir(&mood_dir)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| MoodError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&config_path, contents)?;

        Ok(())
    }
}
