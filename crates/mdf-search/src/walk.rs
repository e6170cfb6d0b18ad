//! Lazy directory walking.
//!
//! Walks a directory tree depth-first (lexicographic per directory) and
//! yields a [`FileRecord`] per candidate file. Two filter chains decide
//! what counts as a candidate: directory filters prune whole subtrees
//! before descent, file filters drop single files. Both carry defaults
//! for Markdown search and accept user-supplied predicates. File bytes
//! are read only when a record is yielded, so one file is in memory at
//! a time.

use std::{
    ffi::OsStr,
    fs::{self, Metadata},
    path::{Path, PathBuf},
    time::SystemTime,
};

use mdf_qualifier::{FileRecord, FileStats};
use walkdir::WalkDir;

use crate::error::SearchError;

/// Decides whether a file becomes a candidate.
pub type FileFilter = Box<dyn Fn(&Path, &Metadata) -> bool>;

/// Decides whether a directory is descended into.
pub type DirFilter = Box<dyn Fn(&Path) -> bool>;

/// Files at least this large are skipped.
const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Extensions that count as Markdown-ish text; the empty entry keeps
/// extension-less files.
const EXTENSIONS: &[&str] = &[
    "", "md", "markdown", "mdown", "mmd", "text", "txt", "rmarkdown", "mkd", "mdwn", "mdtxt",
    "rmd", "mdtext", "apib",
];

/// Directory names never descended into.
const SKIP_DIRS: &[&str] = &[".git", "node_modules"];

/// A configured directory walk.
pub struct Walker {
    /// Root of the walk.
    root: PathBuf,
    /// File filter chain; all must accept.
    file_filters: Vec<FileFilter>,
    /// Directory filter chain; all must accept.
    dir_filters: Vec<DirFilter>,
}

impl Walker {
    /// Creates a walker over `root` with the default filter chains:
    /// skip dotfiles, oversized files and foreign extensions; skip
    /// dot-directories and the usual vendor directories.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            file_filters: vec![
                Box::new(|path, _| !is_hidden(path)),
                Box::new(|_, metadata| metadata.len() < MAX_FILE_SIZE),
                Box::new(|path, _| has_markdown_extension(path)),
            ],
            dir_filters: vec![
                Box::new(|path| !is_hidden(path)),
                Box::new(|path| {
                    path.file_name()
                        .and_then(OsStr::to_str)
                        .is_none_or(|name| !SKIP_DIRS.contains(&name))
                }),
            ],
        }
    }

    /// Appends a file filter.
    pub fn filter_file(mut self, filter: impl Fn(&Path, &Metadata) -> bool + 'static) -> Self {
        self.file_filters.push(Box::new(filter));
        self
    }

    /// Appends a directory filter.
    pub fn filter_dir(mut self, filter: impl Fn(&Path) -> bool + 'static) -> Self {
        self.dir_filters.push(Box::new(filter));
        self
    }

    /// Starts the walk.
    pub fn records(self) -> Records {
        let inner = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();
        Records {
            inner,
            file_filters: self.file_filters,
            dir_filters: self.dir_filters,
            done: false,
        }
    }
}

/// The lazy record stream produced by [`Walker::records`]. Ends at the
/// first I/O error.
pub struct Records {
    /// Underlying directory iterator.
    inner: walkdir::IntoIter,
    /// File filter chain.
    file_filters: Vec<FileFilter>,
    /// Directory filter chain.
    dir_filters: Vec<DirFilter>,
    /// Set after an error has been yielded.
    done: bool,
}

impl Iterator for Records {
    type Item = Result<FileRecord, SearchError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(err) => {
                    self.done = true;
                    return Some(Err(err.into()));
                }
            };
            if entry.file_type().is_dir() {
                // The root is exempt so explicitly named dot-dirs still work.
                if entry.depth() > 0 && !self.dir_filters.iter().all(|keep| keep(entry.path())) {
                    self.inner.skip_current_dir();
                }
                continue;
            }
            if !entry.file_type().is_file() {
                continue;
            }
            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(_) => continue,
            };
            if !self
                .file_filters
                .iter()
                .all(|keep| keep(entry.path(), &metadata))
            {
                continue;
            }
            let path = entry.path().to_path_buf();
            let data = match fs::read(&path) {
                Ok(data) => data,
                Err(source) => {
                    self.done = true;
                    return Some(Err(SearchError::ReadFile { path, source }));
                }
            };
            let file = entry.file_name().to_string_lossy().into_owned();
            let record = FileRecord {
                path,
                file,
                stats: FileStats {
                    size: metadata.len(),
                    modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
                },
                data,
            };
            return Some(Ok(record));
        }
    }
}

/// Whether the final path component starts with a dot.
fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(OsStr::to_str)
        .is_some_and(|name| name.starts_with('.'))
}

/// Whether the extension (or its absence) is in the allowlist.
fn has_markdown_extension(path: &Path) -> bool {
    let extension = path
        .extension()
        .and_then(OsStr::to_str)
        .map(str::to_lowercase)
        .unwrap_or_default();
    EXTENSIONS.contains(&extension.as_str())
}
