//! The search façade.

use std::path::Path;

use mdf_qualifier::{QualifierSpec, Registry};
use mdf_query::{Expr, QueryError, Tokenizer};

use crate::{
    error::SearchError,
    evaluate::MatchStream,
    grammar,
    walk::{Records, Walker},
};

/// A configured search handle.
///
/// Owns the qualifier registry and the tokenizer compiled from it; both
/// are immutable between calls to [`Finder::register`], which rebuilds
/// the tokenizer so new scopes lex as qualifiers.
pub struct Finder {
    /// The dispatch table.
    registry: Registry,
    /// Tokenizer compiled from the registry's catalogues.
    tokenizer: Tokenizer,
}

impl Finder {
    /// Creates a finder with the built-in qualifiers.
    pub fn new() -> Self {
        Self::with_qualifiers(vec![])
    }

    /// Creates a finder with the built-in qualifiers plus `extra`.
    pub fn with_qualifiers(extra: Vec<QualifierSpec>) -> Self {
        let mut registry = Registry::with_defaults();
        registry.register(extra);
        let tokenizer = compile_tokenizer(&registry);
        Self {
            registry,
            tokenizer,
        }
    }

    /// Adds or replaces qualifiers and recompiles the tokenizer.
    pub fn register(&mut self, specs: Vec<QualifierSpec>) {
        self.registry.register(specs);
        self.tokenizer = compile_tokenizer(&self.registry);
    }

    /// The registry backing this finder.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The query grammar as BNF, with the live scope and operator
    /// catalogues interpolated.
    pub fn grammar(&self) -> String {
        grammar::bnf(&self.registry)
    }

    /// Compiles a query into a prepared AST.
    pub fn parse(&self, query: &str, case_sensitive: bool) -> Result<Expr, QueryError> {
        mdf_query::parse(&self.registry, &self.tokenizer, query, case_sensitive)
    }

    /// Compiles `query` and lazily streams the files under `dir` that
    /// match it. All compilation errors surface here, before any file
    /// work.
    pub fn find(
        &self,
        query: &str,
        dir: &Path,
        case_sensitive: bool,
    ) -> Result<MatchStream<'_, Records>, SearchError> {
        if query.is_empty() {
            return Err(SearchError::MissingQuery);
        }
        let ast = self.parse(query, case_sensitive)?;
        self.find_by_ast(ast, dir, case_sensitive)
    }

    /// Streams the files under `dir` matching an already-prepared AST.
    pub fn find_by_ast(
        &self,
        ast: Expr,
        dir: &Path,
        case_sensitive: bool,
    ) -> Result<MatchStream<'_, Records>, SearchError> {
        if dir.as_os_str().is_empty() {
            return Err(SearchError::MissingDir);
        }
        let files = Walker::new(dir).records();
        Ok(MatchStream::new(&self.registry, ast, files, case_sensitive))
    }
}

impl Default for Finder {
    fn default() -> Self {
        Self::new()
    }
}

/// Compiles a tokenizer from the registry's scope and operator
/// catalogues.
fn compile_tokenizer(registry: &Registry) -> Tokenizer {
    Tokenizer::new(&registry.scopes(), registry.operators())
}
