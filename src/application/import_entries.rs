//! Import entries use case

use crate::domain::{Entry, EntryInput};
use crate::error::Result;
use crate::infrastructure::EntryStore;
use std::io::Read;

/// Import a JSON array of entries. Entries keep their own `timestamp` when
/// they have one; unknown keys such as an old `id` or `date` are ignored.
pub fn import_entries<R: Read>(store: &EntryStore, reader: R) -> Result<Vec<Entry>> {
    let inputs: Vec<EntryInput> = serde_json::from_reader(reader)?;
    store.import(inputs)
}
