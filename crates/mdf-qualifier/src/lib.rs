//! Qualifier registry and file-fact extraction for mdf search.
//!
//! A *qualifier* binds a scope name (`size`, `h1`, `blockcodelang`, ...)
//! to the four capabilities the search pipeline needs:
//!
//! - **validate**: check the operator/operand pair before any file work
//! - **cast**: coerce the operand into a comparable [`CastValue`]
//! - **query**: extract the scope's fact from a [`FileRecord`]
//! - **match**: compare the two, per operand kind
//!
//! [`Registry::with_defaults`] installs the built-in scopes; extra ones
//! are added through [`QualifierSpec`], with omitted capabilities filled
//! by the defaults in [`validate`], [`cast`] and [`matching`].
//!
//! # Example
//!
//! ```
//! use mdf_qualifier::{OperandKind, Registry};
//!
//! let registry = Registry::with_defaults();
//! let size = registry.get("size").unwrap();
//! assert!(size.validate(">", "10kb", OperandKind::Keyword).is_ok());
//! assert!(size.validate(">", "10", OperandKind::Keyword).is_err());
//! ```

#![warn(missing_docs)]

mod base;
pub mod cast;
mod error;
mod markdown;
pub mod matching;
mod record;
mod registry;
pub mod validate;
mod value;

pub use error::QualifierError;
pub use markdown::{MarkdownIndex, parsed};
pub use record::{FileRecord, FileStats};
pub use registry::{
    CastFn, MatchFn, OPERATORS, Qualifier, QualifierSpec, QueryFn, Registry, ValidateFn,
};
pub use value::{CastValue, OperandKind, QueryValue};
