//! Error type for searches.

use std::{io, path::PathBuf};

use mdf_query::QueryError;
use thiserror::Error;

/// Errors surfaced by [`crate::Finder`] and its match streams.
///
/// Query-side errors are raised before any file work begins; walker
/// errors arrive through the stream and terminate it.
#[derive(Debug, Error)]
pub enum SearchError {
    /// `find` was called without a query.
    #[error("query is must")]
    MissingQuery,

    /// `find` was called without a directory.
    #[error("dir is must")]
    MissingDir,

    /// The query failed to compile.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// The directory walk failed.
    #[error("failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// A candidate file could not be read.
    #[error("failed to read file {path}: {source}")]
    ReadFile {
        /// Path of the unreadable file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// An AST leaf names a scope the registry does not know. Only
    /// reachable through `find_by_ast` with a foreign AST.
    #[error("Unknown scope:「{0}」")]
    UnknownScope(String),

    /// An AST leaf has no cast value. Only reachable through
    /// `find_by_ast` with an AST that skipped `parse`.
    #[error("leaf「{0}」has no cast value; parse the query first")]
    UnpreparedLeaf(String),
}
