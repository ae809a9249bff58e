//! Unused-include judge.
//!
//! Walks the ledger once and reports every included header that is neither
//! used from another file nor from its own implementation partner. How the
//! `used_*` flags get set depends on [`UsageMode`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::ledger::IncludeLedger;
use crate::error::DeadincludeError;

/// Names that cannot be header keys but may show up in a ledger shared with
/// function-usage bookkeeping. Never reported.
const EXCLUDED_NAMES: &[&str] = &["main", "WinMain", "_tmain", "if"];

/// Location placeholder meaning "used in more than one file".
const MULTI_FILE_SENTINEL: &str = "+";

/// How the judge decides whether a header is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageMode {
    /// Derive the flags from declared/required symbol intersection first
    #[default]
    Correlate,
    /// Trust only flags set through `IncludeLedger::mark_used`
    Flags,
}

impl FromStr for UsageMode {
    type Err = DeadincludeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "correlate" => Ok(Self::Correlate),
            "flags" => Ok(Self::Flags),
            other => Err(DeadincludeError::invalid_argument(format!(
                "unknown usage mode '{}', expected 'correlate' or 'flags'",
                other
            ))),
        }
    }
}

impl fmt::Display for UsageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Correlate => write!(f, "correlate"),
            Self::Flags => write!(f, "flags"),
        }
    }
}

/// Severity of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Style,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Style => write!(f, "style"),
        }
    }
}

/// Where a finding points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub file: String,
    pub line: u32,
}

/// An "include never used" report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub id: &'static str,
    pub severity: Severity,
    /// The header key
    pub header: String,
    pub location: Option<Location>,
    pub message: String,
}

impl Finding {
    pub fn unused_include(header: &str, filename: &str, line: u32) -> Self {
        let location = if filename.is_empty() || filename == MULTI_FILE_SENTINEL {
            None
        } else {
            Some(Location {
                file: filename.to_string(),
                line,
            })
        };
        Self {
            id: "unusedInclude",
            severity: Severity::Style,
            header: header.to_string(),
            location,
            message: format!("The include '{}' is never used.", header),
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(loc) => write!(f, "[{}:{}]: ({}) {}", loc.file, loc.line, self.severity, self.message),
            None => write!(f, "({}) {}", self.severity, self.message),
        }
    }
}

/// Statistics about one judge pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IncludeStats {
    /// Headers reached through at least one include
    pub total_headers: usize,
    /// Included headers whose own file was processed
    pub analyzed_headers: usize,
    pub used_other_file_count: usize,
    /// Used only by their implementation partner
    pub used_same_file_count: usize,
    /// Left unjudged because their contents are unknown (correlate mode)
    pub unjudged_count: usize,
    pub unused_count: usize,
    /// Unused headers that declare no class, struct, enum or typedef
    pub no_declarations_count: usize,
}

/// Result of a judge pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IncludeAnalysisResult {
    /// Findings sorted by header key
    pub findings: Vec<Finding>,
    pub stats: IncludeStats,
}

/// `operator+`, `operator==`, ... but not `operatorx`.
fn is_operator_name(name: &str) -> bool {
    name.strip_prefix("operator")
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| !c.is_alphanumeric())
}

/// Returns true for keys that are never reported.
pub fn is_excluded_name(name: &str) -> bool {
    EXCLUDED_NAMES.contains(&name) || is_operator_name(name)
}

/// The judge itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct IncludeJudge {
    mode: UsageMode,
}

impl IncludeJudge {
    pub fn new(mode: UsageMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> UsageMode {
        self.mode
    }

    /// Settles the usage flags (correlate mode) and reports unused includes.
    pub fn evaluate(&self, ledger: &mut IncludeLedger) -> IncludeAnalysisResult {
        if self.mode == UsageMode::Correlate {
            ledger.correlate_usage();
        }

        let mut findings = Vec::new();
        let mut stats = IncludeStats::default();

        for (key, record) in ledger.iter() {
            if record.filename.is_empty() {
                continue;
            }
            stats.total_headers += 1;
            if record.analyzed {
                stats.analyzed_headers += 1;
            }

            if record.used_other_file {
                stats.used_other_file_count += 1;
                continue;
            }
            if is_excluded_name(key.as_str()) {
                continue;
            }
            if self.mode == UsageMode::Correlate && !record.analyzed && !record.used_same_file {
                debug!(header = %key, "header not analyzed in this run, skipping");
                stats.unjudged_count += 1;
                continue;
            }

            if record.used_same_file {
                stats.used_same_file_count += 1;
            } else {
                if record.declared_symbols.is_empty() {
                    stats.no_declarations_count += 1;
                }
                findings.push(Finding::unused_include(
                    key.as_str(),
                    &record.filename,
                    record.line_number,
                ));
            }
        }

        stats.unused_count = findings.len();
        info!(
            mode = %self.mode,
            headers = stats.total_headers,
            unused = stats.unused_count,
            "include judge finished"
        );

        IncludeAnalysisResult { findings, stats }
    }
}
