//! CLI layer - Command-line interface

pub mod commands;
pub mod output;

pub use commands::{AddArgs, Cli, Commands};
pub use output::{format_feed, format_headline, format_saved};
