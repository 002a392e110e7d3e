//! Infrastructure layer - External I/O and persistence

pub mod clock;
pub mod config;
pub mod repository;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Config, Regimen};
pub use repository::{FileSystemRepository, JournalRepository, LoadedEntries};
pub use store::EntryStore;
