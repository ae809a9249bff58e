//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use deadinclude_core::prelude::*;
//! ```

// Core analysis types
pub use crate::error::{DeadincludeError, DeadincludeResult};
pub use crate::frontend::SourceUnit;
pub use crate::includes::{Finding, IncludeJudge, IncludeLedger, UsageMode};

// Graph building and traversal
pub use crate::graph::{build_include_graph, headers_reachable_from};

// File scanning
pub use crate::scan::{gather_source_files, gather_source_files_with};

// Configuration
pub use crate::config::{load_config, DeadincludeConfig};

// Builder API
pub use crate::builder::{AnalysisResult, Deadinclude};

// Fix functionality
#[cfg(feature = "fix")]
pub use crate::fix::{fix_unused_includes, FixResult};
