//! The qualifier registry: scope → {validate, cast, query, match}.
//!
//! Each scope a query can name is backed by one [`Qualifier`] holding
//! the four capabilities the pipeline needs. Registrations go through
//! [`QualifierSpec`], which fills omitted capabilities with defaults:
//! string-or-regex validation and casting, [`matching::primitive`] for
//! keywords, the keyword matcher again for phrases, and
//! [`matching::pattern`] for regex operands.

use std::collections::BTreeMap;

use crate::{
    base,
    cast as casts,
    error::QualifierError,
    markdown, matching,
    record::FileRecord,
    validate,
    value::{CastValue, OperandKind, QueryValue},
};

/// Operators a qualifier may carry, longest first so the tokenizer can
/// match greedily.
pub const OPERATORS: &[&str] = &["!=", ">=", "<=", ":", "=", ">", "<"];

/// Checks an operator/operand pair for a scope.
pub type ValidateFn = fn(&str, &str, &str, OperandKind) -> Result<(), QualifierError>;

/// Coerces a validated operand into a comparable value.
pub type CastFn = fn(&str, &str, OperandKind) -> Result<CastValue, QualifierError>;

/// Extracts the fact a scope compares from a candidate file.
pub type QueryFn = Box<dyn Fn(&FileRecord) -> QueryValue>;

/// Compares a cast value against a query value under an operator.
pub type MatchFn = fn(&str, &CastValue, &QueryValue) -> bool;

/// An immutable scope descriptor.
pub struct Qualifier {
    /// Unique scope key, e.g. `blockcodelang`.
    scope: String,
    /// Human label for catalogues and tooling.
    name: String,
    /// True when the scope reflects file metadata rather than content.
    is_meta: bool,
    /// Operand checker.
    validate: ValidateFn,
    /// Operand coercion.
    cast: CastFn,
    /// Fact extraction.
    query: QueryFn,
    /// Comparator for keyword operands.
    match_keyword: MatchFn,
    /// Comparator for phrase operands.
    match_phrase: MatchFn,
    /// Comparator for regex operands.
    match_regexp: MatchFn,
}

impl Qualifier {
    /// The unique scope key.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// The human-readable label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the scope reflects metadata rather than content.
    pub fn is_meta(&self) -> bool {
        self.is_meta
    }

    /// Validates an operator/operand pair for this scope.
    pub fn validate(
        &self,
        operator: &str,
        operand: &str,
        kind: OperandKind,
    ) -> Result<(), QualifierError> {
        (self.validate)(&self.scope, operator, operand, kind)
    }

    /// Coerces an operand for this scope.
    pub fn cast(&self, operand: &str, kind: OperandKind) -> Result<CastValue, QualifierError> {
        (self.cast)(&self.scope, operand, kind)
    }

    /// Extracts this scope's fact from a file record.
    pub fn query(&self, record: &FileRecord) -> QueryValue {
        (self.query)(record)
    }

    /// Compares a cast value against a query value, dispatching on the
    /// operand kind of the leaf.
    pub fn matches(
        &self,
        kind: OperandKind,
        operator: &str,
        cast: &CastValue,
        query: &QueryValue,
    ) -> bool {
        let matcher = match kind {
            OperandKind::Keyword => self.match_keyword,
            OperandKind::Phrase => self.match_phrase,
            OperandKind::Regexp => self.match_regexp,
        };
        matcher(operator, cast, query)
    }
}

/// A registration request; omitted capabilities get the defaults.
pub struct QualifierSpec {
    /// Unique scope key.
    scope: String,
    /// Human label.
    name: String,
    /// Metadata flag.
    is_meta: bool,
    /// Fact extraction (always required).
    query: QueryFn,
    /// Optional operand checker.
    validate: Option<ValidateFn>,
    /// Optional operand coercion.
    cast: Option<CastFn>,
    /// Optional keyword comparator.
    match_keyword: Option<MatchFn>,
    /// Optional phrase comparator.
    match_phrase: Option<MatchFn>,
    /// Optional regex comparator.
    match_regexp: Option<MatchFn>,
}

impl QualifierSpec {
    /// Starts a spec for `scope` with the given label and query.
    pub fn new(
        scope: impl Into<String>,
        name: impl Into<String>,
        query: impl Fn(&FileRecord) -> QueryValue + 'static,
    ) -> Self {
        Self {
            scope: scope.into(),
            name: name.into(),
            is_meta: false,
            query: Box::new(query),
            validate: None,
            cast: None,
            match_keyword: None,
            match_phrase: None,
            match_regexp: None,
        }
    }

    /// Marks the scope as metadata-backed.
    pub fn meta(mut self) -> Self {
        self.is_meta = true;
        self
    }

    /// Overrides the validator.
    pub fn with_validate(mut self, validate: ValidateFn) -> Self {
        self.validate = Some(validate);
        self
    }

    /// Overrides the cast.
    pub fn with_cast(mut self, cast: CastFn) -> Self {
        self.cast = Some(cast);
        self
    }

    /// Overrides the keyword comparator (phrases follow it unless
    /// overridden separately).
    pub fn with_match_keyword(mut self, matcher: MatchFn) -> Self {
        self.match_keyword = Some(matcher);
        self
    }

    /// Overrides the phrase comparator.
    pub fn with_match_phrase(mut self, matcher: MatchFn) -> Self {
        self.match_phrase = Some(matcher);
        self
    }

    /// Overrides the regex comparator.
    pub fn with_match_regexp(mut self, matcher: MatchFn) -> Self {
        self.match_regexp = Some(matcher);
        self
    }

    /// Fills the omitted capabilities and seals the descriptor.
    fn build(self) -> Qualifier {
        let match_keyword = self.match_keyword.unwrap_or(matching::primitive);
        Qualifier {
            scope: self.scope,
            name: self.name,
            is_meta: self.is_meta,
            validate: self.validate.unwrap_or(validate::string_or_regex),
            cast: self.cast.unwrap_or(casts::string_or_pattern),
            query: self.query,
            // A phrase compares like a keyword unless the scope says otherwise.
            match_phrase: self.match_phrase.unwrap_or(match_keyword),
            match_keyword,
            match_regexp: self.match_regexp.unwrap_or(matching::pattern),
        }
    }
}

/// The scope → qualifier table a [`crate::FileRecord`] search runs against.
pub struct Registry {
    /// Qualifiers keyed by scope.
    entries: BTreeMap<String, Qualifier>,
}

impl Registry {
    /// Builds a registry holding every built-in scope.
    pub fn with_defaults() -> Self {
        let mut registry = Self {
            entries: BTreeMap::new(),
        };
        registry.register(base::scopes());
        registry.register(markdown::scopes());
        registry
    }

    /// Builds an empty registry (tests and special-purpose tooling).
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Registers the given specs, replacing same-scope entries.
    pub fn register(&mut self, specs: Vec<QualifierSpec>) {
        for spec in specs {
            let qualifier = spec.build();
            self.entries.insert(qualifier.scope.clone(), qualifier);
        }
    }

    /// Looks up a scope.
    pub fn get(&self, scope: &str) -> Option<&Qualifier> {
        self.entries.get(scope)
    }

    /// All registered scope keys, in sorted order.
    pub fn scopes(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// The operator catalogue, longest first.
    pub fn operators(&self) -> &'static [&'static str] {
        OPERATORS
    }

    /// Iterates over all qualifiers in scope order.
    pub fn iter(&self) -> impl Iterator<Item = &Qualifier> {
        self.entries.values()
    }

    /// Number of registered scopes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_all_builtin_scopes() {
        let registry = Registry::with_defaults();
        for scope in [
            "default",
            "path",
            "file",
            "ext",
            "content",
            "time",
            "size",
            "linenum",
            "charnum",
            "chinesenum",
            "crlf",
            "hasimage",
            "haschinese",
            "line",
            "blockcode",
            "blockcodelang",
            "blockcodebody",
            "blockcodeline",
            "blockhtml",
            "blockquote",
            "table",
            "thead",
            "tbody",
            "ol",
            "ul",
            "task",
            "taskdone",
            "tasktodo",
            "head",
            "h1",
            "h2",
            "h3",
            "h4",
            "h5",
            "h6",
            "highlight",
            "image",
            "code",
            "link",
            "strong",
            "em",
            "del",
        ] {
            assert!(registry.get(scope).is_some(), "missing scope {scope}");
        }
        assert_eq!(registry.len(), 42);
    }

    #[test]
    fn scope_keys_are_unique_and_sorted() {
        let registry = Registry::with_defaults();
        let scopes = registry.scopes();
        let mut sorted = scopes.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(scopes, sorted);
    }

    #[test]
    fn register_replaces_existing_scope() {
        let mut registry = Registry::with_defaults();
        registry.register(vec![QualifierSpec::new("size", "custom size", |_| {
            QueryValue::Num(0.0)
        })]);
        assert_eq!(registry.get("size").unwrap().name(), "custom size");
        assert_eq!(registry.len(), 42);
    }

    #[test]
    fn spec_defaults_fall_back_to_primitive_matchers() {
        let mut registry = Registry::empty();
        registry.register(vec![QualifierSpec::new("answer", "the answer", |_| {
            QueryValue::Str("forty-two".into())
        })]);
        let qualifier = registry.get("answer").unwrap();
        let record = crate::record::FileRecord {
            path: "x.md".into(),
            file: "x.md".into(),
            stats: crate::record::FileStats {
                size: 0,
                modified: std::time::SystemTime::UNIX_EPOCH,
            },
            data: vec![],
        };
        let value = qualifier.query(&record);
        let cast = qualifier.cast("forty", OperandKind::Keyword).unwrap();
        assert!(qualifier.matches(OperandKind::Keyword, ":", &cast, &value));
        assert!(qualifier.matches(OperandKind::Phrase, ":", &cast, &value));
        assert!(!qualifier.matches(OperandKind::Keyword, "=", &cast, &value));
    }

    #[test]
    fn metadata_flags_follow_the_catalogue() {
        let registry = Registry::with_defaults();
        for scope in ["path", "file", "ext", "size", "time"] {
            assert!(registry.get(scope).unwrap().is_meta(), "{scope} is meta");
        }
        for scope in ["content", "line", "h1", "task", "default"] {
            assert!(!registry.get(scope).unwrap().is_meta(), "{scope} is content");
        }
    }
}
