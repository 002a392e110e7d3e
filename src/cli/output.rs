//! Output formatting utilities

use crate::application::FeedItem;
use crate::domain::Entry;

/// Format the recent-entries feed for display
pub fn format_feed(items: &[FeedItem]) -> String {
    if items.is_empty() {
        return "No entries yet".to_string();
    }

    let mut output = String::new();
    for item in items {
        output.push_str(&format_headline(&item.entry));
        output.push('\n');
        if !item.preview.is_empty() {
            output.push_str(&format!(
                "    {}{}\n",
                item.preview.text,
                if item.preview.truncated { "…" } else { "" }
            ));
        }
    }
    output
}

/// `2025-01-17 21:15 · mood 7 · panic`
pub fn format_headline(entry: &Entry) -> String {
    let mut line = format!(
        "{} · mood {}",
        entry.timestamp.format("%Y-%m-%d %H:%M"),
        entry.mood
    );
    if entry.is_panic() {
        line.push_str(" · panic");
    }
    line
}

/// Confirmation printed after an entry is saved
pub fn format_saved(entry: &Entry) -> String {
    format!("Saved. {}", format_headline(entry))
}
