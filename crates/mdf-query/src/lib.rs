//! Query compilation for mdf search.
//!
//! Turns a search-box query string into a prepared AST:
//!
//! - **Keywords**: `readme` - bare words
//! - **Phrases**: `"error handling"` - exact text between quotes
//! - **Regexes**: `/[a-z]{3}/` - slash-delimited patterns
//! - **Negation**: `-draft` - files that must NOT match
//! - **OR**: `a | b` or `a OR b` - alternatives
//! - **Grouping**: `(a b) | c` - precedence control
//! - **Qualifiers**: `size>10kb`, `blockcodelang:python` - scoped matches
//!
//! The pipeline is tokenize → validate the stream → recursive-descent
//! parse → per-leaf validate and cast against the qualifier registry.
//!
//! # Example
//!
//! ```
//! use mdf_qualifier::Registry;
//! use mdf_query::{Tokenizer, parse};
//!
//! let registry = Registry::with_defaults();
//! let tokenizer = Tokenizer::new(&registry.scopes(), registry.operators());
//! let expr = parse(&registry, &tokenizer, "size>10kb | content:abc", false).unwrap();
//! assert!(matches!(expr, mdf_query::Expr::Or { .. }));
//! ```

#![warn(missing_docs)]

mod ast;
mod error;
mod lexer;
mod parser;
mod validate;
mod walk;

pub use ast::{DEFAULT_OPERATOR, DEFAULT_SCOPE, Expr, Leaf};
pub use error::QueryError;
pub use lexer::{Token, TokenKind, Tokenizer};
pub use parser::parse;
pub use validate::validate;
pub use walk::{evaluate, traverse, traverse_mut};
