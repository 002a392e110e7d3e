//! Record entry use case

use crate::domain::{Entry, EntryInput, MedicationInput};
use crate::error::Result;
use crate::infrastructure::{Config, EntryStore, Regimen};

/// Records entries, prefilling medications from the configured regimen
pub struct RecordEntryService<'a> {
    store: &'a EntryStore,
    regimen: Vec<Regimen>,
}

impl<'a> RecordEntryService<'a> {
    pub fn new(store: &'a EntryStore, config: &Config) -> Self {
        RecordEntryService {
            store,
            regimen: config.meds.clone(),
        }
    }

    /// Record a standard entry. When `meds_taken` is given and the input
    /// lists no medications, every regimen medication is added with it.
    pub fn record(&self, mut input: EntryInput, meds_taken: Option<bool>) -> Result<Entry> {
        if let Some(taken) = meds_taken {
            if input.meds.is_none() {
                input.meds = Some(self.regimen_meds(Some(taken)));
            }
        }
        input.panic = Some(false);

        self.store.add(input)
    }

    /// Record a panic entry. Regimen medications are listed with unknown intake.
    pub fn panic(&self, mood: i64, text: &str) -> Result<Entry> {
        let mut input = EntryInput::panic(mood, text);
        input.meds = Some(self.regimen_meds(None));

        self.store.add(input)
    }

    fn regimen_meds(&self, taken: Option<bool>) -> Vec<MedicationInput> {
        self.regimen
            .iter()
            .map(|m| MedicationInput::new(&m.name, m.dose_mg, taken))
            .collect()
    }
}
