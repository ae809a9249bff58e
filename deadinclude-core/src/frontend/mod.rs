//! Front end: tokens, scope table and variable table of one source file.
//!
//! The include analysis only consumes these through [`SourceUnit`]. Hosts
//! with their own lexer or symbol database can build a unit directly with
//! [`SourceUnit::new`]; [`SourceUnit::from_source`] uses the bundled
//! heuristic front end.

pub mod lexer;
pub mod symbols;
pub mod token;

use std::fs;
use std::path::Path;

use crate::error::{DeadincludeResult, IoResultExt};

pub use lexer::tokenize;
pub use symbols::{collect_scopes, collect_variables, Scope, ScopeKind, ScopeTable, Variable, VariableTable};
pub use token::{is_standard_type, Pat, Token, TokenKind, TokenList, STANDARD_TYPES};

/// Everything the extractors need to know about one analyzed file.
#[derive(Debug, Clone, Default)]
pub struct SourceUnit {
    /// Path of the file as given to the analysis; recorded verbatim in dependency sets
    pub path: String,
    pub tokens: TokenList,
    pub variables: VariableTable,
    pub scopes: ScopeTable,
}

impl SourceUnit {
    pub fn new(
        path: impl Into<String>,
        tokens: TokenList,
        variables: VariableTable,
        scopes: ScopeTable,
    ) -> Self {
        Self {
            path: path.into(),
            tokens,
            variables,
            scopes,
        }
    }

    /// Lexes `source` and collects its scope and variable tables.
    pub fn from_source(path: &Path, source: &str) -> DeadincludeResult<Self> {
        let tokens = tokenize(path, source)?;
        let variables = collect_variables(&tokens);
        let scopes = collect_scopes(&tokens);
        Ok(Self::new(path.display().to_string(), tokens, variables, scopes))
    }

    /// Reads and prepares a file from disk.
    pub fn load(path: &Path) -> DeadincludeResult<Self> {
        let source = fs::read_to_string(path).with_path(path)?;
        Self::from_source(path, &source)
    }
}
