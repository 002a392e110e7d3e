//! CLI command definitions

use crate::domain::{EntryInput, HabitKey, RawScalar};
use clap::{Args, Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mood")]
#[command(about = "Personal mood journal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new journal
    Init {
        /// Directory to initialize (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Record a daily entry
    Add(AddArgs),

    /// Quickly record how bad it is right now
    Panic {
        /// What is happening
        text: Option<String>,

        /// Mood from 0 to 10
        #[arg(short, long, default_value_t = 0)]
        mood: i64,
    },

    /// Show recent entries, newest first
    List {
        /// Number of entries to show (default: config feed_size)
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Show every entry
        #[arg(long, conflicts_with = "limit")]
        all: bool,

        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },

    /// Import a JSON array of entries from a file (or - for stdin)
    Import {
        #[arg(default_value = "-")]
        file: PathBuf,
    },

    /// View or modify configuration
    Config {
        /// Config key to get or set
        key: Option<String>,

        /// Value to set (if provided, sets the key)
        value: Option<String>,

        /// List all configuration
        #[arg(short, long)]
        list: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct AddArgs {
    /// Mood from 0 to 10
    #[arg(short, long, allow_hyphen_values = true, required_unless_present = "json")]
    pub mood: Option<String>,

    /// Hours slept
    #[arg(long)]
    pub sleep_hours: Option<f64>,

    /// Sleep quality from 0 to 10
    #[arg(long, allow_hyphen_values = true)]
    pub sleep_quality: Option<f64>,

    /// Habit done today (exercise, social, outside, ate_ok, alcohol, nicotine, weed)
    #[arg(short, long = "check", value_name = "HABIT")]
    pub checks: Vec<HabitKey>,

    /// Took the configured medications
    #[arg(long, conflicts_with = "skipped")]
    pub took: bool,

    /// Skipped the configured medications
    #[arg(long)]
    pub skipped: bool,

    #[arg(long)]
    pub today_facts: Option<String>,

    #[arg(long)]
    pub thinking: Option<String>,

    #[arg(long)]
    pub feeling: Option<String>,

    #[arg(long)]
    pub why: Option<String>,

    #[arg(long)]
    pub anything_else: Option<String>,

    #[arg(short, long = "tag")]
    pub tags: Vec<String>,

    /// Raw entry object as JSON (or - for stdin); prints the add_entry response
    #[arg(long, value_name = "JSON", conflicts_with_all = ["mood", "took", "skipped"])]
    pub json: Option<String>,
}

impl AddArgs {
    /// Entry input built from the flags
    pub fn to_input(&self) -> EntryInput {
        let checks = (!self.checks.is_empty()).then(|| {
            self.checks
                .iter()
                .map(|key| (key.as_str().to_string(), Some(RawScalar::from(true))))
                .collect::<BTreeMap<_, _>>()
        });

        EntryInput {
            mood: self.mood.as_deref().map(RawScalar::from),
            panic: Some(false),
            sleep_hours: self.sleep_hours.map(RawScalar::from),
            sleep_quality: self.sleep_quality.map(RawScalar::from),
            checks,
            today_facts: self.today_facts.clone().map(RawScalar::from),
            thinking: self.thinking.clone().map(RawScalar::from),
            feeling: self.feeling.clone().map(RawScalar::from),
            why: self.why.clone().map(RawScalar::from),
            anything_else: self.anything_else.clone().map(RawScalar::from),
            tags: (!self.tags.is_empty()).then(|| self.tags.clone()),
            ..EntryInput::default()
        }
    }

    /// Intake for the configured medications, if the user said
    pub fn meds_taken(&self) -> Option<bool> {
        if self.took {
            Some(true)
        } else if self.skipped {
            Some(false)
        } else {
            None
        }
    }
}
