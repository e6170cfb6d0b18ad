//! Query abstract syntax tree.
//!
//! The parser produces a binary tree: `And`/`Or` carry two children,
//! `Not` carries an optional left side (present for `a -b`, which reads
//! as "a and not b", absent for a leading `-b`), and every leaf is a
//! match literal carrying its scope and operator.

use std::fmt;

use mdf_qualifier::{CastValue, OperandKind};

/// Scope a bare leaf is born with.
pub const DEFAULT_SCOPE: &str = "default";

/// Operator a bare leaf is born with.
pub const DEFAULT_OPERATOR: &str = ":";

/// A match literal: the only node kind that carries a scope.
#[derive(Debug, Clone)]
pub struct Leaf {
    /// Keyword, phrase or regexp.
    pub kind: OperandKind,
    /// The scope this leaf queries; `default` until a qualifier prefix
    /// claims it.
    pub scope: String,
    /// The comparison operator.
    pub operator: String,
    /// The literal text as written.
    pub operand: String,
    /// The coerced operand, populated exactly once after parsing.
    pub cast: Option<CastValue>,
}

impl Leaf {
    /// Creates a bare leaf with the default scope and operator.
    pub fn new(kind: OperandKind, operand: impl Into<String>) -> Self {
        Self {
            kind,
            scope: DEFAULT_SCOPE.to_string(),
            operator: DEFAULT_OPERATOR.to_string(),
            operand: operand.into(),
            cast: None,
        }
    }
}

// The cast is derived from the written parts (and compiled regexes have
// no equality), so leaves compare on what the user wrote.
impl PartialEq for Leaf {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.scope == other.scope
            && self.operator == other.operator
            && self.operand == other.operand
    }
}

impl Eq for Leaf {}

/// A parsed query expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A match literal.
    Match(Leaf),
    /// Conjunction.
    And {
        /// Left operand.
        left: Box<Self>,
        /// Right operand.
        right: Box<Self>,
    },
    /// Disjunction.
    Or {
        /// Left operand.
        left: Box<Self>,
        /// Right operand.
        right: Box<Self>,
    },
    /// Negation of `right`, conjoined with `left` when present.
    Not {
        /// The expression the negation is attached to, if any.
        left: Option<Box<Self>>,
        /// The negated expression.
        right: Box<Self>,
    },
}

impl Expr {
    /// Creates a conjunction node.
    pub fn and(left: Self, right: Self) -> Self {
        Self::And {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Creates a disjunction node.
    pub fn or(left: Self, right: Self) -> Self {
        Self::Or {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Creates a negation node.
    pub fn not(left: Option<Self>, right: Self) -> Self {
        Self::Not {
            left: left.map(Box::new),
            right: Box::new(right),
        }
    }

    /// Formats the expression as an indented tree.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        match self {
            Self::Match(leaf) => {
                let kind = match leaf.kind {
                    OperandKind::Keyword => "Keyword",
                    OperandKind::Phrase => "Phrase",
                    OperandKind::Regexp => "Regexp",
                };
                writeln!(
                    f,
                    "{prefix}{kind}({}{}{})",
                    leaf.scope, leaf.operator, leaf.operand
                )
            }
            Self::And { left, right } => {
                writeln!(f, "{prefix}And")?;
                left.fmt_tree(f, indent + 1)?;
                right.fmt_tree(f, indent + 1)
            }
            Self::Or { left, right } => {
                writeln!(f, "{prefix}Or")?;
                left.fmt_tree(f, indent + 1)?;
                right.fmt_tree(f, indent + 1)
            }
            Self::Not { left, right } => {
                writeln!(f, "{prefix}Not")?;
                if let Some(left) = left {
                    left.fmt_tree(f, indent + 1)?;
                }
                right.fmt_tree(f, indent + 1)
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}
