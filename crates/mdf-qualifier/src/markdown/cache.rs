//! Process-wide memo for the most recent Markdown parse.
//!
//! Successive scope queries against the same file share one parse. The
//! cache holds a single entry and is overwritten when a different input
//! is seen, so memory stays bounded to one document. Evaluation is
//! single-threaded, but the slot is mutex-guarded so concurrent callers
//! are safe too.

use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;

use super::index::MarkdownIndex;

/// A single-slot parse memo.
#[derive(Default)]
struct ParseCache {
    /// The most recent input and its parsed index.
    slot: Mutex<Option<Slot>>,
}

/// One cache entry.
struct Slot {
    /// The exact input the index was built from.
    text: String,
    /// The parsed index.
    index: Arc<MarkdownIndex>,
}

impl ParseCache {
    /// Returns the parsed index for `text`, reusing the previous parse
    /// when the input is unchanged.
    fn parsed(&self, text: &str) -> Arc<MarkdownIndex> {
        let mut slot = self.slot.lock();
        if let Some(entry) = slot.as_ref() {
            if entry.text == text {
                return Arc::clone(&entry.index);
            }
        }
        let index = Arc::new(MarkdownIndex::parse(text));
        *slot = Some(Slot {
            text: text.to_string(),
            index: Arc::clone(&index),
        });
        index
    }
}

/// The process-wide slot.
static CACHE: Lazy<ParseCache> = Lazy::new(ParseCache::default);

/// Returns the parsed index for `text`, memoizing the most recent parse.
pub fn parsed(text: &str) -> Arc<MarkdownIndex> {
    CACHE.parsed(text)
}
