//! Query parser.
//!
//! Recursive descent over the validated token stream.
//!
//! # Grammar
//!
//! ```text
//! expression := term (OR term)*            // left-associative
//! term       := factor ((AND|NOT) factor)* // left-associative
//! factor     := QUALIFIER? match
//! match      := PHRASE | KEYWORD | REGEXP | "(" expression ")"
//! ```
//!
//! `NOT` between two factors lowers to a binary node (`a -b` means
//! "a and not b"); a leading `-` lowers to a unary one. A qualifier
//! prefix claims every descendant leaf of its match that no inner
//! qualifier claimed first.
//!
//! After building the tree, [`parse`] walks every leaf and runs the
//! scope's validate and cast, so a returned AST is ready to evaluate.

use mdf_qualifier::{OperandKind, Registry};

use crate::{
    ast::{DEFAULT_SCOPE, Expr, Leaf},
    error::QueryError,
    lexer::{Token, Tokenizer},
    validate::validate,
    walk,
};

/// Recursive descent parser over a validated token stream.
struct Parser {
    /// Token stream to parse.
    tokens: Vec<Token>,
    /// Current position in the stream.
    position: usize,
}

impl Parser {
    /// Creates a parser for the given tokens.
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Parses the whole stream into an expression.
    fn parse(mut self) -> Result<Expr, QueryError> {
        let expr = self.expression()?;
        match self.peek() {
            Some(extra) => Err(QueryError::UnexpectedToken(extra.kind())),
            None => Ok(expr),
        }
    }

    /// expression := term (OR term)*
    fn expression(&mut self) -> Result<Expr, QueryError> {
        let mut left = self.term()?;
        while matches!(self.peek(), Some(Token::Or)) {
            self.advance();
            let right = self.term()?;
            left = Expr::or(left, right);
        }
        Ok(left)
    }

    /// term := factor ((AND|NOT) factor)*
    fn term(&mut self) -> Result<Expr, QueryError> {
        let mut left = if matches!(self.peek(), Some(Token::Not)) {
            self.advance();
            Expr::not(None, self.factor()?)
        } else {
            self.factor()?
        };
        loop {
            match self.peek() {
                Some(Token::And { .. }) => {
                    self.advance();
                    let right = self.factor()?;
                    left = Expr::and(left, right);
                }
                Some(Token::Not) => {
                    self.advance();
                    let right = self.factor()?;
                    left = Expr::not(Some(left), right);
                }
                _ => break,
            }
        }
        Ok(left)
    }

    /// factor := QUALIFIER? match
    fn factor(&mut self) -> Result<Expr, QueryError> {
        if let Some(Token::Qualifier { scope, operator }) = self.peek().cloned() {
            self.advance();
            let mut expr = self.match_expr()?;
            set_qualifier(&mut expr, &scope, &operator);
            return Ok(expr);
        }
        self.match_expr()
    }

    /// match := PHRASE | KEYWORD | REGEXP | "(" expression ")"
    fn match_expr(&mut self) -> Result<Expr, QueryError> {
        match self.peek().cloned() {
            Some(Token::Keyword { operand }) => {
                self.advance();
                Ok(Expr::Match(Leaf::new(OperandKind::Keyword, operand)))
            }
            Some(Token::Phrase { operand }) => {
                self.advance();
                Ok(Expr::Match(Leaf::new(OperandKind::Phrase, operand)))
            }
            Some(Token::Regexp { operand }) => {
                self.advance();
                Ok(Expr::Match(Leaf::new(OperandKind::Regexp, operand)))
            }
            Some(Token::ParenOpen) => {
                self.advance();
                let inner = self.expression()?;
                if !matches!(self.peek(), Some(Token::ParenClose)) {
                    return Err(QueryError::UnmatchedParenOpen);
                }
                self.advance();
                Ok(inner)
            }
            Some(other) => Err(QueryError::UnexpectedToken(other.kind())),
            None => Err(QueryError::UnexpectedEnd),
        }
    }

    /// The current token, if any.
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    /// Moves past the current token.
    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }
}

/// Attaches a qualifier prefix to every leaf of `expr` that is still on
/// the default scope. Leaves claimed by an inner qualifier keep it.
fn set_qualifier(expr: &mut Expr, scope: &str, operator: &str) {
    walk::traverse_mut(expr, &mut |leaf| {
        if leaf.scope == DEFAULT_SCOPE {
            leaf.scope = scope.to_string();
            leaf.operator = operator.to_string();
        }
    });
}

/// Walks every leaf, validating its operator/operand against the
/// registry and populating the cast result.
fn prepare(expr: &mut Expr, registry: &Registry) -> Result<(), QueryError> {
    let mut failure: Option<QueryError> = None;
    walk::traverse_mut(expr, &mut |leaf| {
        if failure.is_some() {
            return;
        }
        let Some(qualifier) = registry.get(&leaf.scope) else {
            failure = Some(QueryError::UnknownScope(leaf.scope.clone()));
            return;
        };
        if let Err(err) = qualifier.validate(&leaf.operator, &leaf.operand, leaf.kind) {
            failure = Some(err.into());
            return;
        }
        match qualifier.cast(&leaf.operand, leaf.kind) {
            Ok(cast) => leaf.cast = Some(cast),
            Err(err) => failure = Some(err.into()),
        }
    });
    failure.map_or(Ok(()), Err)
}

/// Compiles a query string into a prepared AST: tokenize, validate the
/// stream, parse, then validate and cast every leaf.
///
/// When `case_sensitive` is false the whole query is lowercased before
/// tokenizing, literals included; file-side strings are folded the same
/// way at evaluation time.
pub fn parse(
    registry: &Registry,
    tokenizer: &Tokenizer,
    query: &str,
    case_sensitive: bool,
) -> Result<Expr, QueryError> {
    let folded;
    let query = if case_sensitive {
        query
    } else {
        folded = query.to_lowercase();
        &folded
    };
    let tokens = tokenizer.tokenize(query);
    validate(&tokens)?;
    let mut expr = Parser::new(tokens).parse()?;
    prepare(&mut expr, registry)?;
    Ok(expr)
}

#[cfg(test)]
mod tests {
    use mdf_qualifier::CastValue;

    use super::*;

    fn compile(query: &str) -> Result<Expr, QueryError> {
        let registry = Registry::with_defaults();
        let tokenizer = Tokenizer::new(&registry.scopes(), registry.operators());
        parse(&registry, &tokenizer, query, false)
    }

    fn keyword(operand: &str) -> Expr {
        Expr::Match(Leaf::new(OperandKind::Keyword, operand))
    }

    fn scoped(scope: &str, operator: &str, operand: &str) -> Expr {
        let mut leaf = Leaf::new(OperandKind::Keyword, operand);
        leaf.scope = scope.to_string();
        leaf.operator = operator.to_string();
        Expr::Match(leaf)
    }

    #[test]
    fn single_keyword_gets_default_scope() {
        let expr = compile("abc").unwrap();
        let Expr::Match(leaf) = &expr else {
            panic!("expected a leaf");
        };
        assert_eq!(leaf.scope, "default");
        assert_eq!(leaf.operator, ":");
        assert!(matches!(leaf.cast, Some(CastValue::Str(_))));
    }

    #[test]
    fn adjacent_terms_are_conjoined() {
        assert_eq!(
            compile("sour pear").unwrap(),
            Expr::and(keyword("sour"), keyword("pear"))
        );
    }

    #[test]
    fn trailing_negation_is_and_not() {
        // sour pear -apple => NOT(AND(sour, pear), apple)
        assert_eq!(
            compile("sour pear -apple").unwrap(),
            Expr::not(
                Some(Expr::and(keyword("sour"), keyword("pear"))),
                keyword("apple")
            )
        );
    }

    #[test]
    fn leading_negation_is_unary() {
        assert_eq!(compile("-abc").unwrap(), Expr::not(None, keyword("abc")));
    }

    #[test]
    fn or_binds_weaker_than_and() {
        assert_eq!(
            compile("a b | c").unwrap(),
            Expr::or(Expr::and(keyword("a"), keyword("b")), keyword("c"))
        );
    }

    #[test]
    fn groups_override_precedence() {
        assert_eq!(
            compile("a (b | c)").unwrap(),
            Expr::and(keyword("a"), Expr::or(keyword("b"), keyword("c")))
        );
    }

    #[test]
    fn qualifier_claims_its_leaf() {
        assert_eq!(
            compile("content:abc").unwrap(),
            scoped("content", ":", "abc")
        );
    }

    #[test]
    fn qualifier_spreads_over_a_group() {
        // path:(info | warn) -ext:md => NOT(OR(path:info, path:warn), ext:md)
        assert_eq!(
            compile("path:(info | warn) -ext:md").unwrap(),
            Expr::not(
                Some(Expr::or(
                    scoped("path", ":", "info"),
                    scoped("path", ":", "warn")
                )),
                scoped("ext", ":", "md")
            )
        );
    }

    #[test]
    fn inner_qualifier_wins_over_outer() {
        assert_eq!(
            compile("path:(info | content:warn)").unwrap(),
            Expr::or(
                scoped("path", ":", "info"),
                scoped("content", ":", "warn")
            )
        );
    }

    #[test]
    fn every_leaf_is_scoped_and_cast_after_parse() {
        let expr = compile("a \"b c\" /d+/ size>1kb | -time<2020-01-01").unwrap();
        let mut count = 0;
        walk::traverse(&expr, &mut |leaf| {
            count += 1;
            assert!(!leaf.scope.is_empty());
            assert!(!leaf.operator.is_empty());
            assert!(leaf.cast.is_some(), "leaf {} has no cast", leaf.operand);
        });
        assert_eq!(count, 5);
    }

    #[test]
    fn leaves_keep_token_order() {
        let expr = compile("one two | three -four").unwrap();
        let mut seen = Vec::new();
        walk::traverse(&expr, &mut |leaf| seen.push(leaf.operand.clone()));
        assert_eq!(seen, vec!["one", "two", "three", "four"]);
    }

    #[test]
    fn size_cast_is_bytes() {
        let expr = compile("size>10kb").unwrap();
        let Expr::Match(leaf) = &expr else {
            panic!("expected a leaf");
        };
        let Some(CastValue::Num(bytes)) = leaf.cast else {
            panic!("expected a numeric cast");
        };
        assert_eq!(bytes, 10.0 * 1024.0);
    }

    #[test]
    fn size_without_unit_is_rejected() {
        let err = compile("size>10").unwrap_err();
        assert_eq!(
            err.to_string(),
            "In SIZE: Operand must be a number followed by a unit: mb|gb|kb|k|m|g"
        );
    }

    #[test]
    fn time_rejects_inclusion_operator() {
        let err = compile("time:2024-03-12").unwrap_err();
        assert_eq!(err.to_string(), "In TIME: Unsupported operator:「:」");
    }

    #[test]
    fn empty_query_is_rejected() {
        assert_eq!(compile("   ").unwrap_err(), QueryError::EmptyQuery);
    }

    #[test]
    fn case_folding_lowercases_literals() {
        let expr = compile("CONTENT:ABC").unwrap();
        assert_eq!(expr, scoped("content", ":", "abc"));
    }

    #[test]
    fn case_sensitive_mode_keeps_literals() {
        let registry = Registry::with_defaults();
        let tokenizer = Tokenizer::new(&registry.scopes(), registry.operators());
        let expr = parse(&registry, &tokenizer, "content:ABC", true).unwrap();
        assert_eq!(expr, scoped("content", ":", "ABC"));
    }

    #[test]
    fn regexp_operand_keeps_escapes() {
        let expr = compile(r"/ab\/cd/").unwrap();
        let Expr::Match(leaf) = &expr else {
            panic!("expected a leaf");
        };
        assert_eq!(leaf.kind, OperandKind::Regexp);
        assert_eq!(leaf.operand, r"ab\/cd");
    }

    #[test]
    fn de_morgan_over_constant_leaves() {
        let negated_or = compile("-(a | b)").unwrap();
        let and_of_nots = compile("-a -b").unwrap();
        for answer in [false, true] {
            let eval = |expr: &Expr| -> bool {
                walk::evaluate::<std::convert::Infallible, _>(expr, &mut |_| Ok(answer)).unwrap()
            };
            assert_eq!(eval(&negated_or), eval(&and_of_nots));
        }
    }
}
