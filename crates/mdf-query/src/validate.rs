//! Token stream validation.
//!
//! Structural checks run between the tokenizer and the parser: first
//! and last token constraints, an adjacency FOLLOW table, and paren
//! balance. The parser can then assume a well-formed stream.

use crate::{
    error::QueryError,
    lexer::{Token, TokenKind},
};

/// Token kinds that may not open a query.
const BAD_FIRST: &[TokenKind] = &[TokenKind::Or, TokenKind::And, TokenKind::ParenClose];

/// Token kinds that may not close a query.
const BAD_LAST: &[TokenKind] = &[
    TokenKind::Or,
    TokenKind::And,
    TokenKind::Not,
    TokenKind::ParenOpen,
    TokenKind::Qualifier,
];

/// Checks a token stream for structural validity.
pub fn validate(tokens: &[Token]) -> Result<(), QueryError> {
    let Some(first) = tokens.first() else {
        return Err(QueryError::EmptyQuery);
    };
    if BAD_FIRST.contains(&first.kind()) {
        return Err(QueryError::InvalidFirstToken(first.kind()));
    }
    if let Some(last) = tokens.last() {
        if BAD_LAST.contains(&last.kind()) {
            return Err(QueryError::InvalidLastToken(last.kind()));
        }
    }
    for pair in tokens.windows(2) {
        let (current, next) = (pair[0].kind(), pair[1].kind());
        if forbidden_followers(current).contains(&next) {
            return Err(QueryError::InvalidTokenPair(current, next));
        }
    }
    balanced_parens(tokens)
}

/// The FOLLOW table: token kinds that may not come directly after the
/// given kind.
fn forbidden_followers(kind: TokenKind) -> &'static [TokenKind] {
    match kind {
        TokenKind::Or | TokenKind::And | TokenKind::ParenOpen => {
            &[TokenKind::Or, TokenKind::And, TokenKind::ParenClose]
        }
        TokenKind::Not => &[
            TokenKind::Or,
            TokenKind::And,
            TokenKind::Not,
            TokenKind::ParenClose,
        ],
        TokenKind::Qualifier => &[
            TokenKind::Or,
            TokenKind::And,
            TokenKind::Not,
            TokenKind::ParenClose,
            TokenKind::Qualifier,
        ],
        _ => &[],
    }
}

/// Checks that parens never go negative and end balanced.
fn balanced_parens(tokens: &[Token]) -> Result<(), QueryError> {
    let mut depth: u32 = 0;
    for token in tokens {
        match token.kind() {
            TokenKind::ParenOpen => depth += 1,
            TokenKind::ParenClose => {
                depth = depth
                    .checked_sub(1)
                    .ok_or(QueryError::UnmatchedParenClose)?;
            }
            _ => {}
        }
    }
    if depth > 0 {
        return Err(QueryError::UnmatchedParenOpen);
    }
    Ok(())
}
