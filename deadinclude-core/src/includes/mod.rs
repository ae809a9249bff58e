//! Unused include analysis.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐ ┌──────────────────────┐ ┌──────────────────────┐
//! │ include_extractor.rs │ │ declared_extractor.rs│ │ required_extractor.rs│
//! │  ──────────────────  │ │  ──────────────────  │ │  ──────────────────  │
//! │  "x.h" -> dependents │ │  classes, enums,     │ │  variable types      │
//! │                      │ │  typedef aliases     │ │  (Foo*, Foo&, Foo)   │
//! └──────────┬───────────┘ └──────────┬───────────┘ └──────────┬───────────┘
//!            │      keyed by path::normalize (header key)      │
//!            └────────────────────────┼────────────────────────┘
//!                                     ▼
//!                          ┌──────────────────────┐
//!                          │      ledger.rs       │
//!                          │  one record per key  │
//!                          └──────────┬───────────┘
//!                                     ▼
//!                          ┌──────────────────────┐
//!                          │       judge.rs       │
//!                          │  unused include      │
//!                          │  findings            │
//!                          └──────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use deadinclude_core::includes::{IncludeJudge, IncludeLedger, UsageMode};
//! use deadinclude_core::frontend::SourceUnit;
//!
//! let mut ledger = IncludeLedger::new();
//! for path in &files {
//!     ledger.process_file(&SourceUnit::load(path)?);
//! }
//!
//! let result = IncludeJudge::new(UsageMode::Correlate).evaluate(&mut ledger);
//! for finding in &result.findings {
//!     println!("{}", finding);
//! }
//! print!("{}", ledger.dependency_report());
//! ```

pub mod declared_extractor;
pub mod include_extractor;
pub mod judge;
pub mod ledger;
pub mod path;
pub mod required_extractor;

pub use declared_extractor::{extract_declared_symbols, extract_typedef_aliases, resolve_typedef_alias};
pub use include_extractor::extract_includes;
pub use judge::{
    is_excluded_name, Finding, IncludeAnalysisResult, IncludeJudge, IncludeStats, Location,
    Severity, UsageMode,
};
pub use ledger::{IncludeLedger, IncludeUsage};
pub use path::{include_spelling, normalize, HeaderKey};
pub use required_extractor::{extract_required_symbols, required_symbol};
