//! Error types for query compilation.

use mdf_qualifier::QualifierError;
use thiserror::Error;

use crate::lexer::TokenKind;

/// Everything that can go wrong between a query string and a prepared
/// AST. All of these surface before any file work begins.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The query produced no tokens.
    #[error("Parse error. Empty tokens")]
    EmptyQuery,

    /// The token stream starts with an operator or closing paren.
    #[error("Invalid first token:「{0}」")]
    InvalidFirstToken(TokenKind),

    /// The token stream ends with an operator, negation, opening paren
    /// or dangling qualifier.
    #[error("Invalid last token:「{0}」")]
    InvalidLastToken(TokenKind),

    /// Two adjacent tokens that cannot follow each other.
    #[error("Invalid token after「{0}」:「{1}」")]
    InvalidTokenPair(TokenKind, TokenKind),

    /// An opening paren without a matching close.
    #[error("Unmatched「PAREN_OPEN」")]
    UnmatchedParenOpen,

    /// A closing paren without a matching open.
    #[error("Unmatched「PAREN_CLOSE」")]
    UnmatchedParenClose,

    /// The parser hit a token it cannot use here.
    #[error("Unexpected token:「{0}」")]
    UnexpectedToken(TokenKind),

    /// The parser ran out of tokens mid-expression.
    #[error("Unexpected end of query")]
    UnexpectedEnd,

    /// A leaf names a scope the registry does not know.
    #[error("Unknown scope:「{0}」")]
    UnknownScope(String),

    /// A qualifier rejected its operator or operand.
    #[error(transparent)]
    Qualifier(#[from] QualifierError),
}
