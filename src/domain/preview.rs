//! Feed preview text for an entry

use crate::domain::Entry;
use unicode_segmentation::UnicodeSegmentation;

/// Maximum preview length in user-perceived characters
pub const PREVIEW_LIMIT: usize = 90;

/// Excerpt of an entry's primary free text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub text: String,
    /// The source text was longer than [`PREVIEW_LIMIT`]
    pub truncated: bool,
}

impl Preview {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Preview of the first present field among `anything_else`, `panic_text`,
/// `thinking` and `today_facts`.
pub fn preview(entry: &Entry) -> Preview {
    let source = entry
        .anything_else()
        .or_else(|| entry.panic_text())
        .or_else(|| entry.thinking())
        .or_else(|| entry.today_facts())
        .unwrap_or("");

    truncate(source, PREVIEW_LIMIT)
}

/// Cut `text` to at most `limit` grapheme clusters
pub fn truncate(text: &str, limit: usize) -> Preview {
    match text.grapheme_indices(true).nth(limit) {
        Some((cut, _)) => Preview {
            text: text[..cut].to_string(),
            truncated: true,
        },
        None => Preview {
            text: text.to_string(),
            truncated: false,
        },
    }
}
