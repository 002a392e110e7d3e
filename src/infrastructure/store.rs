//! Append-only entry store with newest-first listing

use crate::domain::{normalize, Entry, EntryInput, NewEntry, ValidationError};
use crate::error::Result;
use crate::infrastructure::clock::{Clock, SystemClock};
use crate::infrastructure::FileSystemRepository;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Owns the journal's entries for as long as the journal is open.
///
/// Appends are serialized behind the write lock and reach disk before they
/// become visible to `list`.
pub struct EntryStore {
    repository: FileSystemRepository,
    clock: Arc<dyn Clock>,
    entries: RwLock<Vec<Entry>>,
    recovered_backup: Option<PathBuf>,
}

impl EntryStore {
    /// Open the store using the local wall clock
    pub fn open(repository: FileSystemRepository) -> Result<Self> {
        Self::open_with_clock(repository, Arc::new(SystemClock))
    }

    pub fn open_with_clock(repository: FileSystemRepository, clock: Arc<dyn Clock>) -> Result<Self> {
        let loaded = repository.load_entries()?;
        tracing::debug!(
            root = %repository.root.display(),
            entries = loaded.entries.len(),
            "opened entry store"
        );

        Ok(EntryStore {
            repository,
            clock,
            entries: RwLock::new(loaded.entries),
            recovered_backup: loaded.recovered_backup,
        })
    }

    /// Validate, persist and append one entry. The entry is stamped with
    /// the clock; a timestamp in `input` is ignored.
    pub fn add(&self, input: EntryInput) -> Result<Entry> {
        let input = EntryInput {
            timestamp: None,
            ..input
        };
        let mut entries = self.write();
        let entry = normalize(input, self.clock.now())?.with_id(next_id(&entries));

        entries.push(entry.clone());
        if let Err(e) = self.repository.save_entries(&entries) {
            entries.pop();
            return Err(e);
        }

        tracing::debug!(id = entry.id, panic = entry.is_panic(), "entry appended");
        Ok(entry)
    }

    /// Append many entries in one write. Nothing is stored unless every
    /// input is valid and the write succeeds.
    pub fn import(&self, inputs: Vec<EntryInput>) -> Result<Vec<Entry>> {
        let mut entries = self.write();
        let now = self.clock.now();

        let normalized = inputs
            .into_iter()
            .enumerate()
            .map(|(i, input)| {
                normalize(input, now).map_err(|e| {
                    ValidationError::new(format!("entries[{}].{}", i, e.field), e.reason)
                })
            })
            .collect::<std::result::Result<Vec<NewEntry>, _>>()?;

        let original_len = entries.len();
        let first_id = next_id(&entries);
        let imported: Vec<Entry> = normalized
            .into_iter()
            .zip(first_id..)
            .map(|(new_entry, id)| new_entry.with_id(id))
            .collect();

        entries.extend(imported.iter().cloned());
        if let Err(e) = self.repository.save_entries(&entries) {
            entries.truncate(original_len);
            return Err(e);
        }

        tracing::debug!(count = imported.len(), "entries imported");
        Ok(imported)
    }

    /// Snapshot of entries, newest first, ties broken by later insertion
    /// first. At most `limit` entries when given.
    pub fn list(&self, limit: Option<usize>) -> Vec<Entry> {
        let mut snapshot = self.read().clone();
        snapshot.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| b.id.cmp(&a.id))
        });

        if let Some(n) = limit {
            snapshot.truncate(n);
        }

        snapshot
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Backup of an unreadable entry log found at open, if any
    pub fn recovered_backup(&self) -> Option<&Path> {
        self.recovered_backup.as_deref()
    }

    pub fn repository(&self) -> &FileSystemRepository {
        &self.repository
    }

    // Entries are only changed after a successful write, so a poisoned
    // lock still guards consistent data.
    fn read(&self) -> RwLockReadGuard<'_, Vec<Entry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Entry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn next_id(entries: &[Entry]) -> u64 {
    entries.iter().map(|e| e.id).max().map_or(1, |id| id + 1)
}
