//! Domain layer - Entry model, validation and previews

pub mod entry;
pub mod normalize;
pub mod preview;

pub use entry::{
    Checks, Entry, EntryKind, HabitKey, MedicationIntake, NewEntry, PanicDetails,
    StandardDetails, Taken,
};
pub use normalize::{normalize, EntryInput, MedicationInput, RawScalar, ValidationError};
pub use preview::{preview, Preview, PREVIEW_LIMIT};
