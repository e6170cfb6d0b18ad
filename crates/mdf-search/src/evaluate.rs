//! The streaming evaluator.
//!
//! Pulls file records from the walker, evaluates the prepared AST
//! against each one and yields the matches. Evaluation short-circuits
//! per file; the stream ends at the first error. Only the record being
//! tested is in flight, so stopping early costs nothing.

use mdf_qualifier::{FileRecord, Registry};
use mdf_query::{Expr, Leaf};

use crate::error::SearchError;

impl<'a, I> std::fmt::Debug for MatchStream<'a, I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchStream")
            .field("case_sensitive", &self.case_sensitive)
            .field("done", &self.done)
            .finish()
    }
}

/// A lazy stream of matching file records.
pub struct MatchStream<'a, I> {
    /// The dispatch table leaves resolve against.
    registry: &'a Registry,
    /// The prepared query.
    ast: Expr,
    /// Whether file-side strings keep their case.
    case_sensitive: bool,
    /// The candidate source.
    files: I,
    /// Set after an error has been yielded.
    done: bool,
}

impl<'a, I> MatchStream<'a, I>
where
    I: Iterator<Item = Result<FileRecord, SearchError>>,
{
    /// Wraps a candidate stream.
    pub(crate) fn new(registry: &'a Registry, ast: Expr, files: I, case_sensitive: bool) -> Self {
        Self {
            registry,
            ast,
            case_sensitive,
            files,
            done: false,
        }
    }

    /// Evaluates the query against one record.
    fn matches(&self, record: &FileRecord) -> Result<bool, SearchError> {
        mdf_query::evaluate(&self.ast, &mut |leaf| self.leaf_matches(leaf, record))
    }

    /// One leaf: extract the scope's fact, fold case, compare.
    fn leaf_matches(&self, leaf: &Leaf, record: &FileRecord) -> Result<bool, SearchError> {
        let qualifier = self
            .registry
            .get(&leaf.scope)
            .ok_or_else(|| SearchError::UnknownScope(leaf.scope.clone()))?;
        let cast = leaf
            .cast
            .as_ref()
            .ok_or_else(|| SearchError::UnpreparedLeaf(leaf.operand.clone()))?;
        let mut value = qualifier.query(record);
        if !self.case_sensitive {
            value.fold_case();
        }
        Ok(qualifier.matches(leaf.kind, &leaf.operator, cast, &value))
    }
}

impl<I> Iterator for MatchStream<'_, I>
where
    I: Iterator<Item = Result<FileRecord, SearchError>>,
{
    type Item = Result<FileRecord, SearchError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            match self.files.next()? {
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
                Ok(record) => match self.matches(&record) {
                    Ok(true) => return Some(Ok(record)),
                    Ok(false) => continue,
                    Err(err) => {
                        self.done = true;
                        return Some(Err(err));
                    }
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{path::PathBuf, time::SystemTime};

    use mdf_qualifier::FileStats;
    use mdf_query::Tokenizer;

    use super::*;

    fn record(file: &str, data: &str) -> FileRecord {
        FileRecord {
            path: PathBuf::from(file),
            file: file.to_string(),
            stats: FileStats {
                size: data.len() as u64,
                modified: SystemTime::UNIX_EPOCH,
            },
            data: data.as_bytes().to_vec(),
        }
    }

    fn matching_files(
        query: &str,
        case_sensitive: bool,
        records: Vec<FileRecord>,
    ) -> Vec<String> {
        let registry = Registry::with_defaults();
        let tokenizer = Tokenizer::new(&registry.scopes(), registry.operators());
        let ast = mdf_query::parse(&registry, &tokenizer, query, case_sensitive).unwrap();
        MatchStream::new(&registry, ast, records.into_iter().map(Ok), case_sensitive)
            .map(|record| record.unwrap().file)
            .collect()
    }

    #[test]
    fn keyword_matches_content_or_path() {
        let records = vec![record("notes/a.md", "hello world"), record("b.md", "nothing")];
        assert_eq!(matching_files("world", false, records.clone()), vec!["notes/a.md"]);
        assert_eq!(matching_files("notes", false, records), vec!["notes/a.md"]);
    }

    #[test]
    fn negation_drops_matches() {
        let records = vec![record("a.md", "hello world"), record("b.md", "world only")];
        assert_eq!(matching_files("world -hello", false, records), vec!["b.md"]);
    }

    #[test]
    fn case_folding_applies_to_file_side() {
        let records = vec![record("a.md", "Hello World")];
        assert_eq!(matching_files("hello", false, records.clone()), vec!["a.md"]);
        assert!(matching_files("hello", true, records).is_empty());
    }

    #[test]
    fn unprepared_leaf_is_an_error() {
        use mdf_qualifier::OperandKind;

        let registry = Registry::with_defaults();
        let ast = Expr::Match(Leaf::new(OperandKind::Keyword, "x"));
        let mut stream =
            MatchStream::new(&registry, ast, vec![Ok(record("a.md", "x"))].into_iter(), false);
        assert!(matches!(
            stream.next(),
            Some(Err(SearchError::UnpreparedLeaf(_)))
        ));
        // The stream terminates after the error.
        assert!(stream.next().is_none());
    }

    #[test]
    fn unknown_scope_is_an_error() {
        use mdf_qualifier::{CastValue, OperandKind};

        let registry = Registry::with_defaults();
        let mut leaf = Leaf::new(OperandKind::Keyword, "x");
        leaf.scope = "nosuch".to_string();
        leaf.cast = Some(CastValue::Str("x".into()));
        let ast = Expr::Match(leaf);
        let mut stream =
            MatchStream::new(&registry, ast, vec![Ok(record("a.md", "x"))].into_iter(), false);
        assert!(matches!(
            stream.next(),
            Some(Err(SearchError::UnknownScope(_)))
        ));
    }
}
