use clap::Parser;
use moodj::application::{
    import_entries, init::init, list_entries, manage_config::format_regimen, ConfigService,
    JournalApi, RecordEntryService,
};
use moodj::cli::{format_feed, format_saved, AddArgs, Cli, Commands};
use moodj::error::MoodError;
use moodj::infrastructure::{EntryStore, FileSystemRepository, JournalRepository};
use moodj::telemetry;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

fn main() {
    let cli = Cli::parse();
    telemetry::init_subscriber(cli.verbose);

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e.display_with_suggestions());
            std::process::exit(e.exit_code());
        }
    }
}

fn run(cli: Cli) -> Result<i32, MoodError> {
    match cli.command {
        Some(Commands::Init { path }) => {
            init(&path)?;
            println!("Initialized mood journal at {}", path.display());
            Ok(0)
        }
        Some(Commands::Add(args)) => add(&args),
        Some(Commands::Panic { text, mood }) => {
            let (repo, api) = open_journal()?;
            let config = repo.load_config()?;
            let service = RecordEntryService::new(api.store(), &config);

            let entry = service.panic(mood, text.as_deref().unwrap_or(""))?;
            println!("{}", format_saved(&entry));
            Ok(0)
        }
        Some(Commands::List { limit, all, json }) => {
            let (repo, api) = open_journal()?;
            let limit = if all {
                None
            } else {
                Some(limit.unwrap_or(repo.load_config()?.feed_size))
            };

            if json {
                let entries = match limit {
                    Some(n) => api.list_recent(n),
                    None => api.list_entries(),
                };
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                let feed = format_feed(&list_entries(api.store(), limit));
                println!("{}", feed.trim_end());
            }
            Ok(0)
        }
        Some(Commands::Import { file }) => {
            let (_repo, api) = open_journal()?;
            let imported = import_entries(api.store(), open_source(&file)?)?;
            println!("Imported {} entries", imported.len());
            Ok(0)
        }
        Some(Commands::Config { key, value, list }) => {
            let repo = FileSystemRepository::discover()?;
            let service = ConfigService::new(repo);

            if list {
                let config = service.list()?;
                println!("feed_size = {}", config.feed_size);
                println!("created = {}", config.created.to_rfc3339());
                println!("meds = {}", format_regimen(&config));
            } else if let Some(k) = key {
                if let Some(v) = value {
                    service.set(&k, &v)?;
                    println!("Set {} = {}", k, v);
                } else {
                    println!("{}", service.get(&k)?);
                }
            } else {
                println!("Usage: mood config [--list | <key> [<value>]]");
                println!("Valid keys: feed_size, created, meds");
            }
            Ok(0)
        }
        None => {
            println!("mood - Personal mood journal");
            println!("Use --help for usage information");
            Ok(0)
        }
    }
}

fn add(args: &AddArgs) -> Result<i32, MoodError> {
    let (repo, api) = open_journal()?;

    if let Some(raw) = &args.json {
        let text = if raw == "-" {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        } else {
            raw.clone()
        };
        let response = api.add_entry_json(&text);
        println!("{}", serde_json::to_string(&response)?);
        return Ok(if response.ok { 0 } else { 1 });
    }

    let config = repo.load_config()?;
    let service = RecordEntryService::new(api.store(), &config);
    let entry = service.record(args.to_input(), args.meds_taken())?;
    println!("{}", format_saved(&entry));
    Ok(0)
}

fn open_journal() -> Result<(FileSystemRepository, JournalApi), MoodError> {
    let repo = FileSystemRepository::discover()?;
    let store = EntryStore::open(repo.clone())?;

    if let Some(backup) = store.recovered_backup() {
        tracing::warn!(backup = %backup.display(), "entry log was unreadable and has been reset");
        eprintln!(
            "Warning: entries.json could not be read. It was moved to {} and a new log was started.",
            backup.display()
        );
    }

    Ok((repo, JournalApi::new(store)))
}

fn open_source(file: &Path) -> Result<Box<dyn Read>, MoodError> {
    if file == Path::new("-") {
        Ok(Box::new(io::stdin()))
    } else {
        Ok(Box::new(File::open(file)?))
    }
}
