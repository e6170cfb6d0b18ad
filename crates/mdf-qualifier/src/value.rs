//! The heterogeneous value model shared by casts and queries.
//!
//! A *cast value* is a query operand after scope-specific coercion; a
//! *query value* is what a scope extracts from a candidate file. Match
//! functions dispatch on the pair of tags.

use regex::Regex;

/// Syntactic flavour of a match literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    /// A bare word.
    Keyword,
    /// A quoted phrase (quotes stripped).
    Phrase,
    /// A regular expression between slashes (slashes stripped).
    Regexp,
}

/// A query operand after coercion, ready to compare against a file fact.
#[derive(Debug, Clone)]
pub enum CastValue {
    /// Plain string operand.
    Str(String),
    /// Compiled regular expression operand.
    Pattern(Regex),
    /// Numeric operand (counts, byte sizes).
    Num(f64),
    /// Boolean operand.
    Bool(bool),
    /// A calendar day as epoch milliseconds of its local midnight.
    Day(i64),
}

/// A fact extracted from a candidate file.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    /// A single string (content, path, extension, ...).
    Str(String),
    /// A number (size, line count, ...).
    Num(f64),
    /// A boolean probe (crlf, hasimage, ...).
    Bool(bool),
    /// A day as epoch milliseconds of its local midnight.
    Day(i64),
    /// Many strings, matched element-wise (lines, headings, fences, ...).
    List(Vec<String>),
}

impl QueryValue {
    /// Lowercases string content in place; used by case-insensitive search.
    pub fn fold_case(&mut self) {
        match self {
            Self::Str(s) => *s = s.to_lowercase(),
            Self::List(items) => {
                for item in items.iter_mut() {
                    if !item.is_empty() {
                        *item = item.to_lowercase();
                    }
                }
            }
            Self::Num(_) | Self::Bool(_) | Self::Day(_) => {}
        }
    }
}
