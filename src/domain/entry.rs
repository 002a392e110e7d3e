//! Journal entry model: standard and panic variants

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Lowest allowed mood (and sleep quality) value
pub const SCALE_MIN: u8 = 0;
/// Highest allowed mood (and sleep quality) value
pub const SCALE_MAX: u8 = 10;

/// Daily habits tracked on every entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HabitKey {
    Exercise,
    Social,
    Outside,
    AteOk,
    Alcohol,
    Nicotine,
    Weed,
}

impl HabitKey {
    pub const ALL: [HabitKey; 7] = [
        HabitKey::Exercise,
        HabitKey::Social,
        HabitKey::Outside,
        HabitKey::AteOk,
        HabitKey::Alcohol,
        HabitKey::Nicotine,
        HabitKey::Weed,
    ];

    /// Key as it appears in the entry log
    pub fn as_str(&self) -> &'static str {
        match self {
            HabitKey::Exercise => "exercise",
            HabitKey::Social => "social",
            HabitKey::Outside => "outside",
            HabitKey::AteOk => "ate_ok",
            HabitKey::Alcohol => "alcohol",
            HabitKey::Nicotine => "nicotine",
            HabitKey::Weed => "weed",
        }
    }
}

impl fmt::Display for HabitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HabitKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        HabitKey::ALL
            .into_iter()
            .find(|key| key.as_str() == normalized)
            .ok_or_else(|| {
                format!(
                    "Invalid habit: '{}'. Valid habits are: exercise, social, outside, ate_ok, alcohol, nicotine, weed",
                    s
                )
            })
    }
}

/// Boolean habit checklist. Every key is always present; unknown means false.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Checks {
    pub exercise: bool,
    pub social: bool,
    pub outside: bool,
    pub ate_ok: bool,
    pub alcohol: bool,
    pub nicotine: bool,
    pub weed: bool,
}

impl Checks {
    pub fn get(&self, key: HabitKey) -> bool {
        match key {
            HabitKey::Exercise => self.exercise,
            HabitKey::Social => self.social,
            HabitKey::Outside => self.outside,
            HabitKey::AteOk => self.ate_ok,
            HabitKey::Alcohol => self.alcohol,
            HabitKey::Nicotine => self.nicotine,
            HabitKey::Weed => self.weed,
        }
    }

    pub fn set(&mut self, key: HabitKey, value: bool) {
        let slot = match key {
            HabitKey::Exercise => &mut self.exercise,
            HabitKey::Social => &mut self.social,
            HabitKey::Outside => &mut self.outside,
            HabitKey::AteOk => &mut self.ate_ok,
            HabitKey::Alcohol => &mut self.alcohol,
            HabitKey::Nicotine => &mut self.nicotine,
            HabitKey::Weed => &mut self.weed,
        };
        *slot = value;
    }

    /// Habits that are checked, in key order
    pub fn checked(&self) -> impl Iterator<Item = HabitKey> + '_ {
        HabitKey::ALL.into_iter().filter(|key| self.get(*key))
    }
}

/// Whether a dose was taken. Panic entries may not know.
///
/// Stored as `true`, `false` or `null`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Taken {
    Yes,
    No,
    #[default]
    Unknown,
}

impl Taken {
    pub fn as_option(self) -> Option<bool> {
        match self {
            Taken::Yes => Some(true),
            Taken::No => Some(false),
            Taken::Unknown => None,
        }
    }
}

impl From<Option<bool>> for Taken {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => Taken::Yes,
            Some(false) => Taken::No,
            None => Taken::Unknown,
        }
    }
}

impl From<bool> for Taken {
    fn from(value: bool) -> Self {
        Taken::from(Some(value))
    }
}

impl Serialize for Taken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_option().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Taken {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<bool>::deserialize(deserializer).map(Taken::from)
    }
}

/// One medication dose recorded on an entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationIntake {
    pub name: String,
    pub dose_mg: f64,
    #[serde(default)]
    pub taken: Taken,
}

/// Fields only a standard (daily) entry carries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StandardDetails {
    pub sleep_hours: Option<f64>,
    pub sleep_quality: Option<u8>,
    pub today_facts: Option<String>,
    pub thinking: Option<String>,
    pub feeling: Option<String>,
    pub why: Option<String>,
    pub anything_else: Option<String>,
}

/// Fields only a panic entry carries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanicDetails {
    pub panic_text: Option<String>,
}

/// Entry variant
#[derive(Debug, Clone, PartialEq)]
pub enum EntryKind {
    Standard(StandardDetails),
    Panic(PanicDetails),
}

/// A validated entry that has not been given an id yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub timestamp: DateTime<FixedOffset>,
    pub mood: u8,
    pub meds: Vec<MedicationIntake>,
    pub checks: Checks,
    pub tags: BTreeSet<String>,
    pub kind: EntryKind,
}

impl NewEntry {
    pub fn with_id(self, id: u64) -> Entry {
        Entry {
            id,
            timestamp: self.timestamp,
            mood: self.mood,
            meds: self.meds,
            checks: self.checks,
            tags: self.tags,
            kind: self.kind,
        }
    }
}

/// One persisted journal record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "EntryRecord", try_from = "EntryRecord")]
pub struct Entry {
    pub id: u64,
    pub timestamp: DateTime<FixedOffset>,
    pub mood: u8,
    pub meds: Vec<MedicationIntake>,
    pub checks: Checks,
    pub tags: BTreeSet<String>,
    pub kind: EntryKind,
}

impl Entry {
    /// Calendar day of the entry, in the offset it was recorded in
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }

    pub fn is_panic(&self) -> bool {
        matches!(self.kind, EntryKind::Panic(_))
    }

    pub fn standard(&self) -> Option<&StandardDetails> {
        match &self.kind {
            EntryKind::Standard(details) => Some(details),
            EntryKind::Panic(_) => None,
        }
    }

    pub fn panic_text(&self) -> Option<&str> {
        match &self.kind {
            EntryKind::Panic(details) => details.panic_text.as_deref(),
            EntryKind::Standard(_) => None,
        }
    }

    pub fn anything_else(&self) -> Option<&str> {
        self.standard().and_then(|d| d.anything_else.as_deref())
    }

    pub fn thinking(&self) -> Option<&str> {
        self.standard().and_then(|d| d.thinking.as_deref())
    }

    pub fn today_facts(&self) -> Option<&str> {
        self.standard().and_then(|d| d.today_facts.as_deref())
    }
}

/// Flat wire shape of an entry in `entries.json`
#[derive(Debug, Serialize, Deserialize)]
struct EntryRecord {
    id: u64,
    timestamp: DateTime<FixedOffset>,
    date: NaiveDate,
    mood: u8,
    #[serde(default)]
    panic: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sleep_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sleep_quality: Option<u8>,
    #[serde(default)]
    meds: Vec<MedicationIntake>,
    #[serde(default)]
    checks: Checks,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    today_facts: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    thinking: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    feeling: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    why: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    anything_else: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    panic_text: Option<String>,
    #[serde(default)]
    tags: BTreeSet<String>,
}

impl From<Entry> for EntryRecord {
    fn from(entry: Entry) -> Self {
        let date = entry.date();
        let mut record = EntryRecord {
            id: entry.id,
            timestamp: entry.timestamp,
            date,
            mood: entry.mood,
            panic: false,
            sleep_hours: None,
            sleep_quality: None,
            meds: entry.meds,
            checks: entry.checks,
            today_facts: None,
            thinking: None,
            feeling: None,
            why: None,
            anything_else: None,
            panic_text: None,
            tags: entry.tags,
        };

        match entry.kind {
            EntryKind::Standard(details) => {
                record.sleep_hours = details.sleep_hours;
                record.sleep_quality = details.sleep_quality;
                record.today_facts = details.today_facts;
                record.thinking = details.thinking;
                record.feeling = details.feeling;
                record.why = details.why;
                record.anything_else = details.anything_else;
            }
            EntryKind::Panic(details) => {
                record.panic = true;
                record.panic_text = details.panic_text;
            }
        }

        record
    }
}

impl TryFrom<EntryRecord> for Entry {
    type Error = String;

    fn try_from(record: EntryRecord) -> Result<Self, Self::Error> {
        if record.mood > SCALE_MAX {
            return Err(format!(
                "entry {} has mood {} outside {}-{}",
                record.id, record.mood, SCALE_MIN, SCALE_MAX
            ));
        }

        let kind = if record.panic {
            EntryKind::Panic(PanicDetails {
                panic_text: record.panic_text,
            })
        } else {
            if record.meds.iter().any(|m| m.taken == Taken::Unknown) {
                return Err(format!(
                    "standard entry {} has a medication with unknown intake",
                    record.id
                ));
            }
            EntryKind::Standard(StandardDetails {
                sleep_hours: record.sleep_hours,
                sleep_quality: record.sleep_quality,
                today_facts: record.today_facts,
                thinking: record.thinking,
                feeling: record.feeling,
                why: record.why,
                anything_else: record.anything_else,
            })
        };

        Ok(Entry {
            id: record.id,
            timestamp: record.timestamp,
            mood: record.mood,
            meds: record.meds,
            checks: record.checks,
            tags: record.tags,
            kind,
        })
    }
}
