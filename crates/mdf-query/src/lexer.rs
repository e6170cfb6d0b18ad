//! Query tokenizer.
//!
//! Converts a query string into a flat sequence of tagged tokens. The
//! scanner tries, at every token start, the same alternation a search
//! box grammar would: whitespace/`AND` runs, negation, quoted phrases,
//! parens, `|`/`OR`, scope qualifiers, `/regex/` literals, and finally
//! bare keywords. Scope and operator literals come from the qualifier
//! registry and are matched longest-first, case-insensitively.
//!
//! Tokenizing never fails: a byte that fits no branch (for example an
//! unterminated quote) is skipped, and grammatically redundant `AND`
//! tokens are dropped afterwards so `a AND OR b` reads as `a OR b`.

use std::fmt;

/// The tag of a token, used by the validator and in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Conjunction (whitespace or the word `AND`).
    And,
    /// Disjunction (`|` or the word `OR`).
    Or,
    /// Negation (`-`).
    Not,
    /// `(`.
    ParenOpen,
    /// `)`.
    ParenClose,
    /// A quoted phrase.
    Phrase,
    /// A `/regex/` literal.
    Regexp,
    /// A bare word.
    Keyword,
    /// A `scope operator` prefix such as `size>=`.
    Qualifier,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::ParenOpen => "PAREN_OPEN",
            Self::ParenClose => "PAREN_CLOSE",
            Self::Phrase => "PHRASE",
            Self::Regexp => "REGEXP",
            Self::Keyword => "KEYWORD",
            Self::Qualifier => "QUALIFIER",
        };
        f.write_str(name)
    }
}

/// A token in the query language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Conjunction; the operand is the matched whitespace/`AND` run.
    And {
        /// The matched run, kept for re-serialization.
        operand: String,
    },
    /// Disjunction.
    Or,
    /// Negation.
    Not,
    /// `(`.
    ParenOpen,
    /// `)`.
    ParenClose,
    /// A quoted phrase (quotes stripped).
    Phrase {
        /// The text between the quotes.
        operand: String,
    },
    /// A regex literal (slashes stripped, escapes preserved).
    Regexp {
        /// The text between the slashes.
        operand: String,
    },
    /// A bare word.
    Keyword {
        /// The word.
        operand: String,
    },
    /// A scope qualifier prefix.
    Qualifier {
        /// The scope, in its registered (lowercase) spelling.
        scope: String,
        /// The operator literal.
        operator: String,
    },
}

impl Token {
    /// The token's tag.
    pub fn kind(&self) -> TokenKind {
        match self {
            Self::And { .. } => TokenKind::And,
            Self::Or => TokenKind::Or,
            Self::Not => TokenKind::Not,
            Self::ParenOpen => TokenKind::ParenOpen,
            Self::ParenClose => TokenKind::ParenClose,
            Self::Phrase { .. } => TokenKind::Phrase,
            Self::Regexp { .. } => TokenKind::Regexp,
            Self::Keyword { .. } => TokenKind::Keyword,
            Self::Qualifier { .. } => TokenKind::Qualifier,
        }
    }
}

/// A tokenizer compiled from the registry's scope and operator
/// catalogues. Rebuilt whenever the registry changes.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    /// Known scopes, longest first so `blockcodelang` wins over
    /// `blockcode`.
    scopes: Vec<String>,
    /// Known operators, longest first so `>=` wins over `>`.
    operators: Vec<String>,
}

impl Tokenizer {
    /// Compiles a tokenizer for the given scope and operator literals.
    pub fn new(scopes: &[String], operators: &[&str]) -> Self {
        let mut scopes = scopes.to_vec();
        scopes.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        let mut operators: Vec<String> = operators.iter().map(|op| (*op).to_string()).collect();
        operators.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        Self { scopes, operators }
    }

    /// Tokenizes a query string. Never fails; unmatched bytes are
    /// skipped and redundant `AND` tokens dropped.
    pub fn tokenize(&self, input: &str) -> Vec<Token> {
        let input = input.trim();
        let mut tokens = Vec::new();
        let mut pos = 0;
        while pos < input.len() {
            let rest = &input[pos..];
            let Some(first) = rest.chars().next() else {
                break;
            };
            if first.is_whitespace() || starts_with_word(rest, "and") {
                let len = and_run_len(rest);
                tokens.push(Token::And {
                    operand: rest[..len].to_string(),
                });
                pos += len;
            } else if first == '-' {
                tokens.push(Token::Not);
                pos += 1;
            } else if first == '"' {
                match rest[1..].find('"') {
                    Some(end) => {
                        tokens.push(Token::Phrase {
                            operand: rest[1..1 + end].to_string(),
                        });
                        pos += end + 2;
                    }
                    // An unterminated quote matches nothing; skip it.
                    None => pos += 1,
                }
            } else if first == '(' {
                tokens.push(Token::ParenOpen);
                pos += 1;
            } else if first == ')' {
                tokens.push(Token::ParenClose);
                pos += 1;
            } else if first == '|' {
                tokens.push(Token::Or);
                pos += 1;
            } else if starts_with_word(rest, "or") {
                tokens.push(Token::Or);
                pos += 2;
            } else if let Some(end) = (first == '/').then(|| regexp_end(rest)).flatten() {
                tokens.push(Token::Regexp {
                    operand: rest[1..end].to_string(),
                });
                pos += end + 1;
            } else if let Some((scope, operator)) = self.qualifier_at(rest) {
                pos += scope.len() + operator.len();
                tokens.push(Token::Qualifier { scope, operator });
            } else {
                let len = keyword_len(rest);
                tokens.push(Token::Keyword {
                    operand: rest[..len].to_string(),
                });
                pos += len;
            }
        }
        strip_redundant_and(tokens)
    }

    /// Tries to read a `scope operator` pair at the start of `rest`.
    fn qualifier_at(&self, rest: &str) -> Option<(String, String)> {
        for scope in &self.scopes {
            if !starts_with_ignore_case(rest, scope) {
                continue;
            }
            let tail = &rest[scope.len()..];
            for operator in &self.operators {
                if tail.starts_with(operator.as_str()) {
                    return Some((scope.clone(), operator.clone()));
                }
            }
        }
        None
    }
}

/// ASCII-case-insensitive prefix check; scope literals are ASCII.
fn starts_with_ignore_case(input: &str, prefix: &str) -> bool {
    input
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Checks for `word` at the start of `input`, followed by a word
/// boundary.
fn starts_with_word(input: &str, word: &str) -> bool {
    if !starts_with_ignore_case(input, word) {
        return false;
    }
    input[word.len()..]
        .chars()
        .next()
        .is_none_or(|next| !next.is_alphanumeric() && next != '_')
}

/// Length of a run of whitespace and `AND` words.
fn and_run_len(input: &str) -> usize {
    let mut len = 0;
    loop {
        let tail = &input[len..];
        if let Some(next) = tail.chars().next() {
            if next.is_whitespace() {
                len += next.len_utf8();
                continue;
            }
        }
        if starts_with_word(tail, "and") {
            len += 3;
            continue;
        }
        return len;
    }
}

/// Index of the closing slash of a regex literal, honouring backslash
/// escapes. `input` starts with the opening slash.
fn regexp_end(input: &str) -> Option<usize> {
    let mut prev = '/';
    for (index, ch) in input.char_indices().skip(1) {
        if ch == '/' && prev != '\\' {
            return Some(index);
        }
        prev = ch;
    }
    None
}

/// Length of a bare keyword: everything up to whitespace, a quote, a
/// paren or a pipe.
fn keyword_len(input: &str) -> usize {
    input
        .char_indices()
        .find(|(_, ch)| ch.is_whitespace() || matches!(ch, '"' | '(' | ')' | '|'))
        .map_or(input.len(), |(index, _)| index)
}

/// Drops `AND` tokens that carry no meaning: whitespace next to an
/// operator, a paren or a qualifier.
fn strip_redundant_and(tokens: Vec<Token>) -> Vec<Token> {
    let kinds: Vec<TokenKind> = tokens.iter().map(Token::kind).collect();
    tokens
        .into_iter()
        .enumerate()
        .filter(|(index, token)| {
            if token.kind() != TokenKind::And {
                return true;
            }
            let prev = index.checked_sub(1).map(|i| kinds[i]);
            let next = kinds.get(index + 1).copied();
            let after_opener = matches!(
                prev,
                Some(
                    TokenKind::Or
                        | TokenKind::And
                        | TokenKind::Not
                        | TokenKind::ParenOpen
                        | TokenKind::Qualifier
                )
            );
            let before_operator = matches!(
                next,
                Some(TokenKind::Or | TokenKind::And | TokenKind::Not | TokenKind::ParenClose)
            );
            !(after_opener || before_operator)
        })
        .map(|(_, token)| token)
        .collect()
}
