//! Config management use case

use crate::error::{MoodError, Result};
use crate::infrastructure::{Config, FileSystemRepository, JournalRepository};

/// Service for managing journal configuration
pub struct ConfigService {
    repository: FileSystemRepository,
}

impl ConfigService {
    /// Create a new config service
    pub fn new(repository: FileSystemRepository) -> Self {
        ConfigService { repository }
    }

    /// Get a single config value
    pub fn get(&self, key: &str) -> Result<String> {
        let config = self.repository.load_config()?;

        match key {
            "feed_size" => Ok(config.feed_size.to_string()),
            "created" => Ok(config.created.to_rfc3339()),
            "meds" => Ok(format_regimen(&config)),
            _ => Err(MoodError::Config(format!(
                "Unknown config key: '{}'. Valid keys are: feed_size, created, meds",
                key
            ))),
        }
    }

    /// Set a config value
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut config = self.repository.load_config()?;

        match key {
            "feed_size" => {
                config.feed_size = value
                    .trim()
                    .parse::<usize>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| {
                        MoodError::Config(format!(
                            "Invalid feed_size: '{}'. Expected a positive whole number",
                            value
                        ))
                    })?;
            }
            "created" => {
                return Err(MoodError::Config(
                    "Cannot modify 'created' field (read-only)".to_string(),
                ));
            }
            "meds" => {
                return Err(MoodError::Config(
                    "Edit the [[meds]] tables in .mood/config.toml to change medications"
                        .to_string(),
                ));
            }
            _ => {
                return Err(MoodError::Config(format!(
                    "Unknown config key: '{}'. Valid keys are: feed_size",
                    key
                )));
            }
        }

        self.repository.save_config(&config)?;
        Ok(())
    }

    /// List all config values
    pub fn list(&self) -> Result<Config> {
        self.repository.load_config()
    }
}

/// `name dose` pairs, comma separated
pub fn format_regimen(config: &Config) -> String {
    config
        .meds
        .iter()
        .map(|m| format!("{} {}mg", m.name, m.dose_mg))
        .collect::<Vec<_>>()
        .join(", ")
}
