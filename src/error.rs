//! Error types for moodj

use crate::domain::ValidationError;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the mood journal
#[derive(Debug, Error)]
pub enum MoodError {
    #[error("Not a mood journal directory: {0}")]
    NotJournalDirectory(PathBuf),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to save entries to {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Entry {index} in {} is invalid: {source}", path.display())]
    InvalidEntry {
        path: PathBuf,
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl MoodError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            MoodError::NotJournalDirectory(_) => 2,
            MoodError::Validation(_) => 3,
            MoodError::Persistence { .. } => 4,
            _ => 1,
        }
    }

    /// True when the caller can resubmit corrected input.
    pub fn is_validation(&self) -> bool {
        matches!(self, MoodError::Validation(_))
    }

    /// Get a user-friendly error message with suggestions
    pub fn display_with_suggestions(&self) -> String {
        match self {
            MoodError::NotJournalDirectory(path) => {
                format!(
                    "Not a mood journal directory: {}\n\n\
                    Suggestions:\n\
                    • Run 'mood init' in this directory to create a new journal\n\
                    • Navigate to an existing journal directory\n\
                    • Set MOOD_ROOT environment variable to your journal path",
                    path.display()
                )
            }
            MoodError::Validation(err) if err.field == "mood" => {
                format!(
                    "{}\n\n\
                    Mood is required and must be a whole number from 0 to 10.\n\
                    Example: mood add --mood 6",
                    err
                )
            }
            MoodError::Persistence { .. } => {
                format!(
                    "Error saving.\n{}\n\n\
                    Your entry was not saved. Check that the journal directory \
                    is writable and try again.",
                    self
                )
            }
            MoodError::InvalidEntry { path, .. } => {
                format!(
                    "{}\n\n\
                    The entry log was left unchanged. Fix or remove the entry in {} \
                    and run the command again.",
                    self,
                    path.display()
                )
            }
            MoodError::Config(msg) => {
                if msg.contains("Unknown config key") {
                    format!(
                        "{}\n\n\
                        Example: mood config feed_size 30",
                        msg
                    )
                } else {
                    msg.clone()
                }
            }
            _ => self.to_string(),
        }
    }
}

/// Result type using MoodError
pub type Result<T> = std::result::Result<T, MoodError>;
