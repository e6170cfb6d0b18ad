//! The candidate-file record evaluated against a query.

use std::{borrow::Cow, path::PathBuf, time::SystemTime};

/// Stat information, as reported by the directory walker.
#[derive(Debug, Clone, Copy)]
pub struct FileStats {
    /// File size in bytes.
    pub size: u64,
    /// Last modification time.
    pub modified: SystemTime,
}

/// A candidate file produced by the directory walker.
///
/// Records are transient per search call; queries read them but never
/// mutate them.
#[derive(Debug, Clone)]
pub struct FileRecord {
    /// Full path of the file.
    pub path: PathBuf,
    /// File name (final path component).
    pub file: String,
    /// Stat information.
    pub stats: FileStats,
    /// Raw file bytes.
    pub data: Vec<u8>,
}

impl FileRecord {
    /// Returns the file content as text, replacing invalid UTF-8.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.data)
    }

    /// Returns the extension including the leading dot, or an empty
    /// string for names without one.
    pub fn ext(&self) -> String {
        match self.file.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => format!(".{ext}"),
            _ => String::new(),
        }
    }
}
