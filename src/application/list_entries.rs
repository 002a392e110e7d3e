//! List entries use case

use crate::domain::{preview, Entry, Preview};
use crate::infrastructure::EntryStore;

/// One line of the recent-entries feed
#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    pub entry: Entry,
    pub preview: Preview,
}

/// Newest-first entries with their previews, at most `limit` when given.
pub fn list_entries(store: &EntryStore, limit: Option<usize>) -> Vec<FeedItem> {
    store
        .list(limit)
        .into_iter()
        .map(|entry| FeedItem {
            preview: preview(&entry),
            entry,
        })
        .collect()
}
