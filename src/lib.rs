//! moodj - Personal mood journal
//!
//! Records daily mood entries and low-friction panic entries in an
//! append-only log, and lists them newest first with short previews.

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod telemetry;

pub use error::MoodError;
