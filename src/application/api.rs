//! Boundary exposed to an embedding shell: `add_entry` / `list_entries`

use crate::domain::{Entry, EntryInput};
use crate::error::MoodError;
use crate::infrastructure::EntryStore;
use serde::Serialize;
use serde_json::Value;

/// Result of `add_entry`. On failure the caller keeps the user's input
/// and decides how to report `error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Offending field for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AddResponse {
    fn saved(id: u64) -> Self {
        AddResponse {
            ok: true,
            id: Some(id),
            field: None,
            error: None,
        }
    }

    fn failed(err: &MoodError) -> Self {
        let field = match err {
            MoodError::Validation(e) => Some(e.field.clone()),
            _ => None,
        };
        AddResponse {
            ok: false,
            id: None,
            field,
            error: Some(err.to_string()),
        }
    }
}

/// Journal handle for an embedding shell. Owns the store for as long as
/// the journal is open.
pub struct JournalApi {
    store: EntryStore,
}

impl JournalApi {
    pub fn new(store: EntryStore) -> Self {
        JournalApi { store }
    }

    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    pub fn add_entry(&self, input: EntryInput) -> AddResponse {
        match self.store.add(input) {
            Ok(entry) => AddResponse::saved(entry.id),
            Err(e) => AddResponse::failed(&e),
        }
    }

    /// `add_entry` for a raw JSON document. Malformed JSON and misshapen
    /// fields come back as a failed response, never as an error.
    pub fn add_entry_json(&self, text: &str) -> AddResponse {
        let input = serde_json::from_str::<Value>(text)
            .map_err(MoodError::from)
            .and_then(|value| EntryInput::from_json(value).map_err(MoodError::from));

        match input {
            Ok(input) => self.add_entry(input),
            Err(e) => AddResponse::failed(&e),
        }
    }

    /// All entries, newest first
    pub fn list_entries(&self) -> Vec<Entry> {
        self.store.list(None)
    }

    pub fn list_recent(&self, limit: usize) -> Vec<Entry> {
        self.store.list(Some(limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn api() -> (TempDir, JournalApi) {
        let temp = TempDir::new().unwrap();
        let repo = crate::application::init::init(temp.path()).unwrap();
        (temp, JournalApi::new(EntryStore::open(repo).unwrap()))
    }

    fn input(value: serde_json::Value) -> EntryInput {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_add_entry_ok() {
        let (_temp, api) = api();

        let response = api.add_entry(input(json!({"mood": 0, "panic": true, "panic_text": "can't breathe"})));
        assert!(response.ok);
        assert_eq!(response.id, Some(1));

        let first = &api.list_recent(1)[0];
        assert!(first.is_panic());
        assert_eq!(first.panic_text(), Some("can't breathe"));
    }

    #[test]
    fn test_add_entry_without_mood() {
        let (_temp, api) = api();

        let response = api.add_entry(input(json!({"panic": true, "panic_text": "help"})));
        assert!(!response.ok);
        assert_eq!(response.field.as_deref(), Some("mood"));
        assert!(api.list_entries().is_empty());

        let wire = serde_json::to_value(&response).unwrap();
        assert_eq!(wire["ok"], json!(false));
        assert!(wire.get("id").is_none());
    }

    #[test]
    fn test_add_entry_json_reports_shape_errors() {
        let (_temp, api) = api();

        let response = api.add_entry_json(r#"{"mood": [7]}"#);
        assert!(!response.ok);
        assert_eq!(response.field.as_deref(), Some("mood"));

        let response = api.add_entry_json(r#"{"mood": 5, "checks": {"exercise": "often"}}"#);
        assert_eq!(response.field.as_deref(), Some("checks.exercise"));

        let response = api.add_entry_json(r#"{"mood": 5, "panic": "yes"}"#);
        assert_eq!(response.field.as_deref(), Some("panic"));

        let response = api.add_entry_json("{\"mood\": 5");
        assert!(!response.ok);
        assert_eq!(response.field, None);
        assert!(response.error.is_some());

        assert!(api.list_entries().is_empty());

        let response = api.add_entry_json(
            r#"{"mood": 6, "sleep_hours": {"h": 7}, "checks": {"exercise": 1}, "today_facts": 42}"#,
        );
        assert!(response.ok);
        let saved = &api.list_recent(1)[0];
        assert!(saved.checks.exercise);
        assert_eq!(saved.today_facts(), Some("42"));
    }

    #[test]
    fn test_list_entries_is_idempotent() {
        let (_temp, api) = api();
        api.add_entry(EntryInput::standard(3));
        api.add_entry(EntryInput::standard(8));

        let first = api.list_entries();
        assert_eq!(first.len(), 2);
        assert_eq!(first, api.list_entries());
        assert_eq!(first[0].mood, 8);
    }
}
