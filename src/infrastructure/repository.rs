//! File system repository

use crate::domain::Entry;
use crate::error::{MoodError, Result};
use crate::infrastructure::Config;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Journal metadata directory under the root
pub const JOURNAL_DIR: &str = ".mood";
/// Entry log inside the journal directory
pub const ENTRIES_FILE: &str = "entries.json";

/// Entries read from disk
#[derive(Debug, Clone, Default)]
pub struct LoadedEntries {
    pub entries: Vec<Entry>,
    /// Where an unreadable entry log was moved before starting fresh
    pub recovered_backup: Option<PathBuf>,
}

/// Abstract repository for journal operations
pub trait JournalRepository {
    /// Get the root directory of this repository
    fn root(&self) -> &Path;

    /// Load configuration from .mood/config.toml
    fn load_config(&self) -> Result<Config>;

    /// Save configuration to .mood/config.toml
    fn save_config(&self, config: &Config) -> Result<()>;

    /// Check if .mood directory exists
    fn is_initialized(&self) -> bool;

    /// Create .mood directory structure
    fn initialize(&self) -> Result<()>;
}

/// File system implementation of JournalRepository
#[derive(Debug, Clone)]
pub struct FileSystemRepository {
    pub root: PathBuf,
}

impl FileSystemRepository {
    /// Create a new repository with the given root directory
    pub fn new(root: PathBuf) -> Self {
        FileSystemRepository { root }
    }

    /// Discover journal root by walking up from current directory
    /// First checks MOOD_ROOT environment variable, then falls back to discovery
    pub fn discover() -> Result<Self> {
        if let Ok(root_path) = std::env::var("MOOD_ROOT") {
            let path = PathBuf::from(root_path);
            if Self::has_journal_dir(&path) {
                return Ok(FileSystemRepository::new(path));
            } else {
                return Err(MoodError::Config(format!(
                    "MOOD_ROOT is set to '{}' but no .mood directory found. \
                    Run 'mood init' in that directory or unset MOOD_ROOT.",
                    path.display()
                )));
            }
        }

        let current_dir = std::env::current_dir()?;
        Self::discover_from(&current_dir)
    }

    /// Discover journal root by walking up from a specific starting directory
    pub fn discover_from(start: &Path) -> Result<Self> {
        let mut current = start.to_path_buf();

        loop {
            if Self::has_journal_dir(&current) {
                return Ok(FileSystemRepository::new(current));
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Err(MoodError::NotJournalDirectory(start.to_path_buf())),
            }
        }
    }

    fn has_journal_dir(path: &Path) -> bool {
        path.join(JOURNAL_DIR).is_dir()
    }

    pub fn journal_dir(&self) -> PathBuf {
        self.root.join(JOURNAL_DIR)
    }

    pub fn entries_path(&self) -> PathBuf {
        self.journal_dir().join(ENTRIES_FILE)
    }
}

impl JournalRepository for FileSystemRepository {
    fn root(&self) -> &Path {
        &self.root
    }

    fn load_config(&self) -> Result<Config> {
        Config::load_from_dir(&self.root)
    }

    fn save_config(&self, config: &Config) -> Result<()> {
        config.save_to_dir(&self.root)
    }

    fn is_initialized(&self) -> bool {
        Self::has_journal_dir(&self.root)
    }

    fn initialize(&self) -> Result<()> {
        let journal_dir = self.journal_dir();

        if journal_dir.exists() {
            return Err(MoodError::Config(format!(
                "Directory already initialized: {}",
                self.root.display()
            )));
        }

        fs::create_dir(&journal_dir)?;
        self.save_entries(&[])
    }
}

impl FileSystemRepository {
    /// Read the entry log. A missing log is an empty journal. A log that is
    /// not a JSON array is moved aside and replaced with an empty one; a
    /// readable log with an invalid record is left untouched and reported.
    pub fn load_entries(&self) -> Result<LoadedEntries> {
        let path = self.entries_path();

        if !path.exists() {
            return Ok(LoadedEntries::default());
        }

        let contents = fs::read_to_string(&path)?;
        let Ok(records) = serde_json::from_str::<Vec<serde_json::Value>>(&contents) else {
            let backup = backup_path(&path);
            fs::rename(&path, &backup)?;
            self.save_entries(&[])?;
            return Ok(LoadedEntries {
                entries: Vec::new(),
                recovered_backup: Some(backup),
            });
        };

        let entries = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                serde_json::from_value::<Entry>(record).map_err(|source| MoodError::InvalidEntry {
                    path: path.clone(),
                    index,
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(LoadedEntries {
            entries,
            recovered_backup: None,
        })
    }

    /// Replace the entry log: write to a temp file in the same directory,
    /// then rename into place. The old log is intact until the rename.
    pub fn save_entries(&self, entries: &[Entry]) -> Result<()> {
        let path = self.entries_path();
        let mut contents = serde_json::to_string_pretty(entries)?;
        contents.push('\n');

        write_atomic(&path, contents.as_bytes()).map_err(|source| MoodError::Persistence {
            path: path.clone(),
            source,
        })
    }
}

/// `entries.json.corrupt`, or the first free `entries.json.corrupt.N`
fn backup_path(path: &Path) -> PathBuf {
    let first = path.with_file_name(format!("{}.corrupt", ENTRIES_FILE));
    if !first.exists() {
        return first;
    }

    (1u32..)
        .map(|n| path.with_file_name(format!("{}.corrupt.{}", ENTRIES_FILE, n)))
        .find(|candidate| !candidate.exists())
        .unwrap_or(first)
}

fn write_atomic(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
