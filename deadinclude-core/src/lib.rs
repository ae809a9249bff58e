//! deadinclude-core: unused `#include` detection for C and C++ sources
//!
//! This library scans C/C++ files, records which quoted headers each file
//! includes, which types each file declares and which types it requires,
//! and reports headers whose declarations nobody that includes them uses.
//!
//! # Features
//!
//! - **Include ledger**: one record per header, keyed by lower-cased file name
//! - **Declared symbols**: classes, structs, enums and typedef aliases
//! - **Required symbols**: the type names variables are declared with
//! - **Usage judge**: symbol correlation through transitive includes
//! - **Dependency report**: who includes what, in a stable text format
//! - **Include graph**: petgraph-based reachability and Graphviz output
//! - **Auto-fix**: remove the include lines of unused headers
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use deadinclude_core::prelude::*;
//!
//! let result = Deadinclude::new("/path/to/project").analyze()?;
//!
//! for finding in &result.findings {
//!     println!("{}", finding);
//! }
//! print!("{}", result.ledger.dependency_report());
//! ```
//!
//! # Module Organization
//!
//! - [`frontend`]: Lexer, token list and the scope/variable tables
//! - [`includes`]: Path normalizer, extractors, ledger and judge
//! - [`graph`]: Include graph construction and reachability
//! - [`scan`]: Parallel file discovery
//! - [`builder`]: Fluent builder API running the whole pipeline
//! - [`fix`]: Auto-fix removing unused include lines
//! - [`error`]: Typed error handling
//!
//! # Cargo Features
//!
//! - `fix` (default): Enable auto-fix functionality
//! - `dot` (default): Enable Graphviz DOT output
//! - `full`: Enable all optional features

// Core modules (always available)
pub mod builder;
pub mod common;
pub mod config;
pub mod error;
pub mod frontend;
pub mod graph;
pub mod includes;
pub mod logging;
pub mod prelude;
pub mod report;
pub mod scan;

// Common trait re-exports
pub use common::GraphTraversal;

// Feature-gated modules
#[cfg(feature = "fix")]
pub mod fix;

#[cfg(feature = "dot")]
pub mod visualize;

// ============================================================================
// Explicit Re-exports (avoiding glob imports for clear API surface)
// ============================================================================

// Error types
pub use error::{DeadincludeError, DeadincludeResult, IoResultExt};

// Builder API
pub use builder::{AnalysisResult, Deadinclude};

// Configuration
pub use config::{load_config, AnalysisConfig, DeadincludeConfig, OutputConfig, CONFIG_FILE};

// Front end
pub use frontend::{
    collect_scopes, collect_variables, tokenize, Pat, Scope, ScopeKind, ScopeTable, SourceUnit,
    Token, TokenKind, TokenList, Variable, VariableTable,
};

// Include analysis
pub use includes::{
    extract_declared_symbols, extract_includes, extract_required_symbols, include_spelling,
    is_excluded_name, normalize, Finding, HeaderKey, IncludeAnalysisResult, IncludeJudge,
    IncludeLedger, IncludeStats, IncludeUsage, Location, Severity, UsageMode,
};

// Graph building
pub use graph::{build_include_graph, headers_reachable_from};

// Logging
pub use logging::init_structured_logging;

// Reporting
pub use report::{print_json, print_plain, render_json, render_plain};

// File scanning
pub use scan::{gather_source_files, gather_source_files_with, DEFAULT_EXTENSIONS};

// Feature-gated re-exports
#[cfg(feature = "fix")]
pub use fix::{fix_unused_includes, remove_unused_includes, strip_includes, FixResult};

#[cfg(feature = "dot")]
pub use visualize::generate_dot;
