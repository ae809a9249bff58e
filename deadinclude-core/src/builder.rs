//! Builder pattern API for unused include analysis.
//!
//! ```rust,ignore
//! use deadinclude_core::prelude::*;
//!
//! let result = Deadinclude::new("/path/to/project")
//!     .mode(UsageMode::Correlate)
//!     .exclude_dirs(["third_party"])
//!     .ignore_patterns(["*_generated.h"])
//!     .analyze()?;
//!
//! for finding in &result.findings {
//!     println!("{}", finding);
//! }
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::config::DeadincludeConfig;
use crate::frontend::SourceUnit;
use crate::includes::{Finding, IncludeJudge, IncludeLedger, IncludeStats, UsageMode};
use crate::scan::{gather_source_files_with, DEFAULT_EXTENSIONS};

/// Builder for configuring unused include analysis.
#[derive(Debug, Clone)]
pub struct Deadinclude {
    /// File or directory to analyze
    root: PathBuf,

    mode: UsageMode,

    /// File extensions to scan, without the dot
    extensions: Vec<String>,

    /// Custom excluded directories
    excluded_dirs: Vec<String>,

    /// Header key patterns never reported
    ignored_patterns: Vec<String>,

    /// Dry-run mode (don't modify files)
    dry_run: bool,
}

impl Deadinclude {
    /// Create a new analysis builder for the given path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            mode: UsageMode::default(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            excluded_dirs: Vec::new(),
            ignored_patterns: Vec::new(),
            dry_run: false,
        }
    }

    /// Apply the settings of a loaded `deadinclude.toml`.
    pub fn with_config(mut self, config: &DeadincludeConfig) -> Self {
        self.ignored_patterns
            .extend(config.ignore_patterns().iter().cloned());
        if let Some(mode) = config.mode() {
            self.mode = mode;
        }
        if let Some(analysis) = &config.analysis {
            if let Some(extensions) = &analysis.extensions {
                self.extensions = extensions.clone();
            }
            if let Some(dirs) = &analysis.exclude_dirs {
                self.excluded_dirs.extend(dirs.iter().cloned());
            }
        }
        self
    }

    /// Select how usage is decided.
    pub fn mode(mut self, mode: UsageMode) -> Self {
        self.mode = mode;
        self
    }

    /// Replace the scanned file extensions.
    pub fn extensions(mut self, exts: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.extensions = exts.into_iter().map(Into::into).collect();
        self
    }

    /// Add directories to exclude from scanning.
    pub fn exclude_dirs(mut self, dirs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.excluded_dirs.extend(dirs.into_iter().map(Into::into));
        self
    }

    /// Add patterns for headers to ignore.
    pub fn ignore_patterns(mut self, patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.ignored_patterns.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Enable dry-run mode (no file modifications).
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Run the analysis and return results.
    ///
    /// Files are lexed and extracted in parallel, each into its own ledger.
    /// The per-file ledgers are merged in path order, so the result does not
    /// depend on scheduling. Unreadable or unlexable files are logged and
    /// listed in [`AnalysisResult::skipped`].
    pub fn analyze(&self) -> Result<AnalysisResult> {
        // 1. Gather files
        let excludes: Vec<&str> = self.excluded_dirs.iter().map(String::as_str).collect();
        let files = gather_source_files_with(&self.root, &self.extensions, &excludes)
            .context("Failed to gather source files")?;

        // 2. Extract per file
        let per_file: Vec<_> = files
            .par_iter()
            .map(|path| {
                SourceUnit::load(path).map(|unit| {
                    let mut ledger = IncludeLedger::new();
                    ledger.process_file(&unit);
                    ledger
                })
            })
            .collect();

        // 3. Merge in path order
        let mut ledger = IncludeLedger::new();
        let mut skipped = Vec::new();
        let mut files_analyzed = 0;
        for (path, outcome) in files.iter().zip(per_file) {
            match outcome {
                Ok(file_ledger) => {
                    ledger.merge(file_ledger);
                    files_analyzed += 1;
                }
                Err(e) if e.is_recoverable() => {
                    warn!(path = %path.display(), error = %e, "skipping file");
                    skipped.push(path.display().to_string());
                }
                Err(e) => return Err(e.into()),
            }
        }

        // 4. Judge
        let analysis = IncludeJudge::new(self.mode).evaluate(&mut ledger);
        let findings: Vec<Finding> = analysis
            .findings
            .into_iter()
            .filter(|f| !self.is_ignored(&f.header))
            .collect();

        info!(
            root = %self.root.display(),
            files = files_analyzed,
            skipped = skipped.len(),
            unused = findings.len(),
            "analysis complete"
        );

        Ok(AnalysisResult {
            root: self.root.clone(),
            files_analyzed,
            skipped,
            ledger,
            findings,
            stats: analysis.stats,
        })
    }

    /// Check if a header key matches any ignored pattern.
    ///
    /// `foo*` matches by prefix, `*foo` by suffix, anything else by
    /// substring.
    fn is_ignored(&self, name: &str) -> bool {
        self.ignored_patterns.iter().any(|pattern| {
            let pattern = pattern.to_ascii_lowercase();
            if let Some(prefix) = pattern.strip_suffix('*') {
                name.starts_with(prefix)
            } else if let Some(suffix) = pattern.strip_prefix('*') {
                name.ends_with(suffix)
            } else {
                name.contains(pattern.as_str())
            }
        })
    }

    /// Remove the includes of every reported header.
    #[cfg(feature = "fix")]
    pub fn fix(&self, result: &AnalysisResult) -> Result<crate::fix::FixResult> {
        Ok(crate::fix::fix_unused_includes(
            &result.ledger,
            &result.findings,
            self.dry_run,
        )?)
    }
}

/// Result of running unused include analysis.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    /// Path that was analyzed
    pub root: PathBuf,

    /// Files whose contents made it into the ledger
    pub files_analyzed: usize,

    /// Files that could not be read or lexed
    pub skipped: Vec<String>,

    /// The merged ledger (for reports, graph and fix operations)
    pub ledger: IncludeLedger,

    /// Unused includes, sorted by header key, ignore patterns applied
    pub findings: Vec<Finding>,

    pub stats: IncludeStats,
}

impl AnalysisResult {
    /// Check if any unused include was found.
    pub fn has_unused(&self) -> bool {
        !self.findings.is_empty()
    }

    /// Percentage of included headers reported as unused.
    pub fn unused_percentage(&self) -> f64 {
        if self.stats.total_headers == 0 {
            0.0
        } else {
            (self.findings.len() as f64 / self.stats.total_headers as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn create_project(name: &str, files: &[(&str, &str)]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "deadinclude_builder_{}_{}",
            name,
            std::process::id()
        ));
        if dir.exists() {
            fs::remove_dir_all(&dir).ok();
        }
        for (path, content) in files {
            let full = dir.join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, content).unwrap();
        }
        dir
    }

    #[test]
    fn test_builder_defaults() {
        let builder = Deadinclude::new("/tmp/project");
        assert_eq!(builder.mode, UsageMode::Correlate);
        assert!(builder.extensions.iter().any(|e| e == "hpp"));
        assert!(!builder.dry_run);
    }

    #[test]
    fn test_is_ignored_patterns() {
        let builder = Deadinclude::new(".").ignore_patterns(["gen_*", "*_fwd.h", "Legacy"]);
        assert!(builder.is_ignored("gen_tables.h"));
        assert!(builder.is_ignored("widget_fwd.h"));
        assert!(builder.is_ignored("legacy_api.h"));
        assert!(!builder.is_ignored("widget.h"));
    }

    #[test]
    fn test_with_config() {
        let config: DeadincludeConfig = toml::from_str(
            "ignore = [\"x.h\"]\n[analysis]\nmode = \"flags\"\nextensions = [\"cc\"]\nexclude_dirs = [\"vendor\"]\n",
        )
        .unwrap();
        let builder = Deadinclude::new(".").with_config(&config);
        assert_eq!(builder.mode, UsageMode::Flags);
        assert_eq!(builder.extensions, vec!["cc".to_string()]);
        assert_eq!(builder.excluded_dirs, vec!["vendor".to_string()]);
        assert_eq!(builder.ignored_patterns, vec!["x.h".to_string()]);
    }

    #[test]
    fn test_analyze_project() {
        let dir = create_project(
            "analyze",
            &[
                ("src/main.cpp", "#include \"widget.h\"\n#include \"dead.h\"\nWidget w;\n"),
                ("src/widget.h", "class Widget {};\n"),
                ("src/dead.h", "class Dead {};\n"),
            ],
        );

        let result = Deadinclude::new(&dir).analyze().unwrap();
        assert_eq!(result.files_analyzed, 3);
        assert!(result.skipped.is_empty());
        assert!(result.has_unused());
        let headers: Vec<_> = result.findings.iter().map(|f| f.header.as_str()).collect();
        assert_eq!(headers, vec!["dead.h"]);
        assert_eq!(result.stats.total_headers, 2);
        assert!((result.unused_percentage() - 50.0).abs() < f64::EPSILON);

        let ignored = Deadinclude::new(&dir).ignore_patterns(["dead*"]).analyze().unwrap();
        assert!(!ignored.has_unused());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unlexable_file_is_skipped() {
        let dir = create_project(
            "skip",
            &[
                ("broken.cpp", "int x; /* never closed\n"),
                ("ok.cpp", "#include \"a.h\"\n"),
            ],
        );

        let result = Deadinclude::new(&dir).analyze().unwrap();
        assert_eq!(result.files_analyzed, 1);
        assert_eq!(result.skipped.len(), 1);
        assert!(result.skipped[0].ends_with("broken.cpp"));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_analyze_missing_root() {
        assert!(Deadinclude::new("/no/such/project").analyze().is_err());
    }
}
