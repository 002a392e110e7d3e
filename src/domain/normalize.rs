//! Raw entry input and its validation into a [`NewEntry`]

use crate::domain::entry::{
    Checks, EntryKind, HabitKey, MedicationIntake, NewEntry, PanicDetails, StandardDetails, Taken,
    SCALE_MAX, SCALE_MIN,
};
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Input failed a shape or range rule
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {field}: {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// A loosely-typed value as sent by a form or a hand-written JSON file
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawScalar {
    Number(f64),
    Text(String),
    Flag(bool),
    /// Arrays and objects
    Other(Value),
}

impl RawScalar {
    /// Numeric value, accepting numeric text
    fn numeric(&self) -> Option<f64> {
        let value = match self {
            RawScalar::Number(n) => Some(*n),
            RawScalar::Text(s) => s.trim().parse::<f64>().ok(),
            RawScalar::Flag(_) | RawScalar::Other(_) => None,
        };
        value.filter(|n| n.is_finite())
    }

    /// Numeric value only when given as a number
    fn strict_numeric(&self) -> Option<f64> {
        match self {
            RawScalar::Number(n) if n.is_finite() => Some(*n),
            _ => None,
        }
    }

    fn is_blank(&self) -> bool {
        matches!(self, RawScalar::Text(s) if s.trim().is_empty())
    }

    /// Yes/no value; numbers count as true when non-zero
    fn flag(&self) -> Option<bool> {
        match self {
            RawScalar::Flag(b) => Some(*b),
            RawScalar::Number(n) => Some(*n != 0.0),
            _ => None,
        }
    }
}

impl From<f64> for RawScalar {
    fn from(value: f64) -> Self {
        RawScalar::Number(value)
    }
}

impl From<i64> for RawScalar {
    fn from(value: i64) -> Self {
        RawScalar::Number(value as f64)
    }
}

impl From<&str> for RawScalar {
    fn from(value: &str) -> Self {
        RawScalar::Text(value.to_string())
    }
}

impl From<String> for RawScalar {
    fn from(value: String) -> Self {
        RawScalar::Text(value)
    }
}

impl From<bool> for RawScalar {
    fn from(value: bool) -> Self {
        RawScalar::Flag(value)
    }
}

/// One medication as supplied by the caller
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MedicationInput {
    pub name: Option<String>,
    pub dose_mg: Option<RawScalar>,
    pub taken: Option<RawScalar>,
}

impl MedicationInput {
    pub fn new(name: &str, dose_mg: f64, taken: Option<bool>) -> Self {
        MedicationInput {
            name: Some(name.to_string()),
            dose_mg: Some(RawScalar::Number(dose_mg)),
            taken: taken.map(RawScalar::Flag),
        }
    }
}

/// Entry as supplied by the caller. Omitted and `null` both mean "not supplied".
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EntryInput {
    pub mood: Option<RawScalar>,
    pub panic: Option<bool>,
    pub timestamp: Option<DateTime<FixedOffset>>,
    pub sleep_hours: Option<RawScalar>,
    pub sleep_quality: Option<RawScalar>,
    pub meds: Option<Vec<MedicationInput>>,
    pub checks: Option<BTreeMap<String, Option<RawScalar>>>,
    pub today_facts: Option<RawScalar>,
    pub thinking: Option<RawScalar>,
    pub feeling: Option<RawScalar>,
    pub why: Option<RawScalar>,
    pub anything_else: Option<RawScalar>,
    pub panic_text: Option<RawScalar>,
    pub tags: Option<Vec<String>>,
}

impl EntryInput {
    /// A standard entry with only a mood
    pub fn standard(mood: i64) -> Self {
        EntryInput {
            mood: Some(RawScalar::from(mood)),
            panic: Some(false),
            ..EntryInput::default()
        }
    }

    /// A panic entry with a mood and free text
    pub fn panic(mood: i64, text: &str) -> Self {
        EntryInput {
            mood: Some(RawScalar::from(mood)),
            panic: Some(true),
            panic_text: Some(RawScalar::from(text)),
            ..EntryInput::default()
        }
    }

    /// Parse caller JSON. A field of the wrong shape (a list where a flag
    /// belongs, a malformed timestamp) is reported by name.
    pub fn from_json(value: Value) -> Result<Self, ValidationError> {
        let Value::Object(fields) = value else {
            return Err(ValidationError::new("entry", "must be a JSON object"));
        };

        serde_json::from_value(Value::Object(fields.clone())).map_err(|err| {
            let field = fields
                .iter()
                .find(|(key, raw)| {
                    let single = Map::from_iter([(key.to_string(), (*raw).clone())]);
                    serde_json::from_value::<EntryInput>(Value::Object(single)).is_err()
                })
                .map_or_else(|| "entry".to_string(), |(key, _)| key.clone());
            ValidationError::new(field, err.to_string())
        })
    }

    pub fn check(mut self, key: HabitKey) -> Self {
        self.checks
            .get_or_insert_with(BTreeMap::new)
            .insert(key.as_str().to_string(), Some(RawScalar::Flag(true)));
        self
    }

    pub fn med(mut self, med: MedicationInput) -> Self {
        self.meds.get_or_insert_with(Vec::new).push(med);
        self
    }
}

/// Validate and normalize raw input. `now` becomes the entry timestamp
/// unless the input carries its own.
pub fn normalize(
    input: EntryInput,
    now: DateTime<FixedOffset>,
) -> Result<NewEntry, ValidationError> {
    let panic = input.panic.unwrap_or(false);
    let mood = scale_value("mood", input.mood.as_ref())?
        .ok_or_else(|| ValidationError::new("mood", "is required"))?;
    let meds = normalize_meds(input.meds.unwrap_or_default(), panic)?;
    let checks = normalize_checks(input.checks.unwrap_or_default())?;
    let tags = normalize_tags(input.tags.unwrap_or_default());

    let kind = if panic {
        EntryKind::Panic(PanicDetails {
            panic_text: text("panic_text", input.panic_text)?,
        })
    } else {
        EntryKind::Standard(StandardDetails {
            sleep_hours: sleep_hours(input.sleep_hours.as_ref())?,
            sleep_quality: scale_value(
                "sleep_quality",
                input
                    .sleep_quality
                    .as_ref()
                    .filter(|raw| raw.strict_numeric().is_some()),
            )?,
            today_facts: text("today_facts", input.today_facts)?,
            thinking: text("thinking", input.thinking)?,
            feeling: text("feeling", input.feeling)?,
            why: text("why", input.why)?,
            anything_else: text("anything_else", input.anything_else)?,
        })
    };

    Ok(NewEntry {
        timestamp: input.timestamp.unwrap_or(now),
        mood,
        meds,
        checks,
        tags,
        kind,
    })
}

/// Integer on the 0-10 scale; fractions are truncated toward zero.
/// Missing or blank input is `Ok(None)`.
fn scale_value(field: &str, raw: Option<&RawScalar>) -> Result<Option<u8>, ValidationError> {
    let Some(raw) = raw.filter(|r| !r.is_blank()) else {
        return Ok(None);
    };
    let value = raw
        .numeric()
        .ok_or_else(|| ValidationError::new(field, "must be a number"))?
        .trunc();

    if value < f64::from(SCALE_MIN) || value > f64::from(SCALE_MAX) {
        return Err(ValidationError::new(
            field,
            format!("must be between {} and {}", SCALE_MIN, SCALE_MAX),
        ));
    }

    Ok(Some(value as u8))
}

fn sleep_hours(raw: Option<&RawScalar>) -> Result<Option<f64>, ValidationError> {
    match raw.and_then(RawScalar::strict_numeric) {
        Some(hours) if hours < 0.0 => Err(ValidationError::new(
            "sleep_hours",
            "must not be negative",
        )),
        hours => Ok(hours),
    }
}

fn normalize_meds(
    meds: Vec<MedicationInput>,
    panic: bool,
) -> Result<Vec<MedicationIntake>, ValidationError> {
    meds.into_iter()
        .enumerate()
        .map(|(i, med)| {
            let name = med
                .name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .ok_or_else(|| ValidationError::new(format!("meds[{}].name", i), "is required"))?;

            let dose_mg = med
                .dose_mg
                .as_ref()
                .and_then(RawScalar::numeric)
                .filter(|d| *d > 0.0)
                .ok_or_else(|| {
                    ValidationError::new(format!("meds[{}].dose_mg", i), "must be a positive number")
                })?;

            let taken = match &med.taken {
                None => None,
                Some(raw) => Some(raw.flag().ok_or_else(|| {
                    ValidationError::new(format!("meds[{}].taken", i), "must be true, false or null")
                })?),
            };
            if taken.is_none() && !panic {
                return Err(ValidationError::new(
                    format!("meds[{}].taken", i),
                    "is required on a standard entry; send false if the dose was not taken",
                ));
            }

            Ok(MedicationIntake {
                name,
                dose_mg,
                taken: Taken::from(taken),
            })
        })
        .collect()
}

fn normalize_checks(raw: BTreeMap<String, Option<RawScalar>>) -> Result<Checks, ValidationError> {
    let mut checks = Checks::default();
    for (key, value) in raw {
        let Ok(habit) = key.parse::<HabitKey>() else {
            continue;
        };
        let checked = match value {
            None => false,
            Some(raw) if raw.is_blank() => false,
            Some(raw) => raw.flag().ok_or_else(|| {
                ValidationError::new(format!("checks.{}", habit), "must be true or false")
            })?,
        };
        checks.set(habit, checked);
    }
    Ok(checks)
}

fn normalize_tags(raw: Vec<String>) -> BTreeSet<String> {
    raw.into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Free text; numbers and flags are kept as their text form, blank text
/// is absence.
fn text(field: &str, raw: Option<RawScalar>) -> Result<Option<String>, ValidationError> {
    let text = match raw {
        None => return Ok(None),
        Some(RawScalar::Text(s)) => s,
        Some(RawScalar::Number(n)) => n.to_string(),
        Some(RawScalar::Flag(b)) => b.to_string(),
        Some(RawScalar::Other(_)) => return Err(ValidationError::new(field, "must be text")),
    };
    Ok(Some(text).filter(|t| !t.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn now() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2025-01-17T21:15:00+01:00").unwrap()
    }

    fn from_json(value: serde_json::Value) -> EntryInput {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_standard_entry_defaults() {
        let input = from_json(json!({
            "mood": 7,
            "checks": {"exercise": true},
            "today_facts": "slept well"
        }));

        let entry = normalize(input, now()).unwrap();

        assert_eq!(entry.mood, 7);
        assert_eq!(entry.timestamp, now());
        assert!(entry.checks.exercise);
        assert!(!entry.checks.social);
        assert!(entry.meds.is_empty());
        assert!(entry.tags.is_empty());
        match entry.kind {
            EntryKind::Standard(details) => {
                assert_eq!(details.today_facts.as_deref(), Some("slept well"));
                assert_eq!(details.sleep_hours, None);
            }
            EntryKind::Panic(_) => panic!("Expected standard entry"),
        }
    }

    #[test]
    fn test_mood_is_coerced_to_integer() {
        for (raw, expected) in [(json!(7), 7), (json!(7.9), 7), (json!("4"), 4), (json!(" 10 "), 10)] {
            let entry = normalize(from_json(json!({ "mood": raw })), now()).unwrap();
            assert_eq!(entry.mood, expected);
        }
    }

    #[test]
    fn test_missing_mood_fails() {
        let err = normalize(from_json(json!({"panic": true, "panic_text": "help"})), now())
            .unwrap_err();
        assert_eq!(err.field, "mood");
        assert_eq!(err.reason, "is required");

        let err = normalize(from_json(json!({"mood": null})), now()).unwrap_err();
        assert_eq!(err.field, "mood");

        let err = normalize(from_json(json!({"mood": ""})), now()).unwrap_err();
        assert_eq!(err.field, "mood");
    }

    #[test]
    fn test_mood_out_of_range_fails() {
        for raw in [json!(11), json!(-1), json!("12")] {
            let err = normalize(from_json(json!({ "mood": raw })), now()).unwrap_err();
            assert_eq!(err.field, "mood");
            assert!(err.reason.contains("between 0 and 10"));
        }
    }

    #[test]
    fn test_mood_must_be_numeric() {
        let err = normalize(from_json(json!({"mood": "great"})), now()).unwrap_err();
        assert_eq!(err.field, "mood");
        assert_eq!(err.reason, "must be a number");

        let err = normalize(from_json(json!({"mood": true})), now()).unwrap_err();
        assert_eq!(err.field, "mood");
    }

    #[test]
    fn test_optional_numbers_normalize_to_absence() {
        let input = from_json(json!({
            "mood": 5,
            "sleep_hours": "",
            "sleep_quality": "seven"
        }));

        let entry = normalize(input, now()).unwrap();
        let EntryKind::Standard(details) = entry.kind else {
            panic!("Expected standard entry");
        };
        assert_eq!(details.sleep_hours, None);
        assert_eq!(details.sleep_quality, None);
    }

    #[test]
    fn test_optional_numbers_are_kept() {
        let input = from_json(json!({"mood": 5, "sleep_hours": 7.5, "sleep_quality": 6}));

        let entry = normalize(input, now()).unwrap();
        let EntryKind::Standard(details) = entry.kind else {
            panic!("Expected standard entry");
        };
        assert_eq!(details.sleep_hours, Some(7.5));
        assert_eq!(details.sleep_quality, Some(6));
    }

    #[test]
    fn test_optional_numbers_out_of_range_fail() {
        let err = normalize(from_json(json!({"mood": 5, "sleep_hours": -2})), now()).unwrap_err();
        assert_eq!(err.field, "sleep_hours");

        let err = normalize(from_json(json!({"mood": 5, "sleep_quality": 42})), now()).unwrap_err();
        assert_eq!(err.field, "sleep_quality");
    }

    #[test]
    fn test_panic_entry_keeps_panic_text_only() {
        let input = from_json(json!({
            "mood": 0,
            "panic": true,
            "panic_text": "can't breathe",
            "thinking": "ignored",
            "checks": {},
            "meds": [{"name": "fluoxetine", "dose_mg": 20, "taken": null}]
        }));

        let entry = normalize(input, now()).unwrap();

        assert_eq!(entry.mood, 0);
        assert_eq!(
            entry.kind,
            EntryKind::Panic(PanicDetails {
                panic_text: Some("can't breathe".to_string())
            })
        );
        assert_eq!(entry.meds[0].taken, Taken::Unknown);
        assert_eq!(entry.checks, Checks::default());
    }

    #[test]
    fn test_standard_entry_drops_panic_text() {
        let input = from_json(json!({"mood": 6, "panic": false, "panic_text": "stray"}));

        let entry = normalize(input, now()).unwrap();
        assert!(matches!(entry.kind, EntryKind::Standard(_)));
    }

    #[test]
    fn test_meds_require_name_and_positive_dose() {
        let err = normalize(
            from_json(json!({"mood": 5, "meds": [{"dose_mg": 20, "taken": true}]})),
            now(),
        )
        .unwrap_err();
        assert_eq!(err.field, "meds[0].name");

        let err = normalize(
            from_json(json!({"mood": 5, "meds": [
                {"name": "a", "dose_mg": 10, "taken": true},
                {"name": "b", "dose_mg": 0, "taken": true}
            ]})),
            now(),
        )
        .unwrap_err();
        assert_eq!(err.field, "meds[1].dose_mg");
    }

    #[test]
    fn test_unknown_intake_only_on_panic_entries() {
        let err = normalize(
            from_json(json!({"mood": 5, "meds": [{"name": "fluoxetine", "dose_mg": 20}]})),
            now(),
        )
        .unwrap_err();
        assert_eq!(err.field, "meds[0].taken");
        assert!(err.reason.contains("send false"));

        let entry = normalize(
            from_json(json!({"mood": 5, "panic": true, "meds": [{"name": "fluoxetine", "dose_mg": 20}]})),
            now(),
        )
        .unwrap();
        assert_eq!(entry.meds[0].taken, Taken::Unknown);
    }

    #[test]
    fn test_checks_ignore_unknown_keys() {
        let input = from_json(json!({
            "mood": 5,
            "checks": {"outside": true, "meditation": true, "alcohol": null}
        }));

        let entry = normalize(input, now()).unwrap();
        assert!(entry.checks.outside);
        assert!(!entry.checks.alcohol);
    }

    #[test]
    fn test_blank_text_and_tags_are_dropped() {
        let input = from_json(json!({
            "mood": 5,
            "thinking": "   ",
            "why": "",
            "tags": ["work", " work ", "", "family"]
        }));

        let entry = normalize(input, now()).unwrap();
        let tags: Vec<&str> = entry.tags.iter().map(String::as_str).collect();
        assert_eq!(tags, vec!["family", "work"]);

        let EntryKind::Standard(details) = entry.kind else {
            panic!("Expected standard entry");
        };
        assert_eq!(details.thinking, None);
        assert_eq!(details.why, None);
    }

    #[test]
    fn test_structured_values_do_not_abort_parsing() {
        let input = from_json(json!({"mood": [7]}));
        let err = normalize(input, now()).unwrap_err();
        assert_eq!(err.field, "mood");
        assert_eq!(err.reason, "must be a number");

        let input = from_json(json!({"mood": 5, "sleep_hours": {"h": 7}, "sleep_quality": [3]}));
        let EntryKind::Standard(details) = normalize(input, now()).unwrap().kind else {
            panic!("Expected standard entry");
        };
        assert_eq!(details.sleep_hours, None);
        assert_eq!(details.sleep_quality, None);

        let input = from_json(json!({"mood": 5, "meds": [{"name": "a", "dose_mg": {"mg": 5}, "taken": true}]}));
        assert_eq!(normalize(input, now()).unwrap_err().field, "meds[0].dose_mg");
    }

    #[test]
    fn test_loose_checks_and_intake() {
        let input = from_json(json!({
            "mood": 5,
            "checks": {"exercise": 1, "social": 0, "outside": "", "weed": false},
            "meds": [{"name": "fluoxetine", "dose_mg": 20, "taken": 1}]
        }));

        let entry = normalize(input, now()).unwrap();
        assert!(entry.checks.exercise);
        assert!(!entry.checks.social);
        assert!(!entry.checks.outside);
        assert_eq!(entry.meds[0].taken, Taken::Yes);

        let err = normalize(from_json(json!({"mood": 5, "checks": {"alcohol": "lots"}})), now())
            .unwrap_err();
        assert_eq!(err.field, "checks.alcohol");

        let err = normalize(
            from_json(json!({"mood": 5, "meds": [{"name": "a", "dose_mg": 5, "taken": [true]}]})),
            now(),
        )
        .unwrap_err();
        assert_eq!(err.field, "meds[0].taken");
    }

    #[test]
    fn test_text_fields_accept_scalars() {
        let input = from_json(json!({"mood": 5, "today_facts": 42, "why": true}));

        let EntryKind::Standard(details) = normalize(input, now()).unwrap().kind else {
            panic!("Expected standard entry");
        };
        assert_eq!(details.today_facts.as_deref(), Some("42"));
        assert_eq!(details.why.as_deref(), Some("true"));

        let err = normalize(from_json(json!({"mood": 5, "thinking": ["a", "b"]})), now())
            .unwrap_err();
        assert_eq!(err.field, "thinking");
    }

    #[test]
    fn test_from_json_names_misshapen_field() {
        let err = EntryInput::from_json(json!({"mood": 5, "panic": "yes"})).unwrap_err();
        assert_eq!(err.field, "panic");

        let err = EntryInput::from_json(json!({"mood": 5, "timestamp": "yesterday"})).unwrap_err();
        assert_eq!(err.field, "timestamp");

        let err = EntryInput::from_json(json!({"mood": 5, "meds": {"name": "a"}})).unwrap_err();
        assert_eq!(err.field, "meds");

        let err = EntryInput::from_json(json!([7])).unwrap_err();
        assert_eq!(err.field, "entry");

        let input = EntryInput::from_json(json!({"mood": 5, "unknown": [1]})).unwrap();
        assert_eq!(input.mood, Some(RawScalar::Number(5.0)));
        assert_eq!(input.panic, None);
    }

    #[test]
    fn test_supplied_timestamp_wins() {
        let input = from_json(json!({"mood": 5, "timestamp": "2024-06-01T08:00:00+02:00"}));

        let entry = normalize(input, now()).unwrap();
        assert_eq!(entry.timestamp.to_rfc3339(), "2024-06-01T08:00:00+02:00");
    }

    #[test]
    fn test_builders() {
        let input = EntryInput::standard(8)
            .check(HabitKey::Social)
            .med(MedicationInput::new("fluoxetine", 20.0, Some(true)));

        let entry = normalize(input, now()).unwrap();
        assert!(entry.checks.social);
        assert_eq!(entry.meds[0].taken, Taken::Yes);

        let entry = normalize(EntryInput::panic(1, "help"), now()).unwrap();
        assert!(matches!(entry.kind, EntryKind::Panic(_)));
    }
}
