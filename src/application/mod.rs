//! Application layer - Use cases and orchestration

pub mod api;
pub mod import_entries;
pub mod init;
pub mod list_entries;
pub mod manage_config;
pub mod record_entry;

pub use api::{AddResponse, JournalApi};
pub use import_entries::import_entries;
pub use list_entries::{list_entries, FeedItem};
pub use manage_config::ConfigService;
pub use record_entry::RecordEntryService;
