//! Auto-fix: removes `#include "..."` lines naming unused headers.
//!
//! Never panics. Errors on individual files are collected into
//! [`FixResult::errors`] and the remaining files are still processed.
//!
//! Only quoted includes are touched, and only in the files the ledger lists
//! as dependents of an unused header. An include matches when the
//! normalized key of its spelling equals the header key, so
//! `#include "ui/Widget.H"` matches the finding for `widget.h`.
//!
//! Headers that declare no type are reported but never removed: they may
//! still provide functions, variables or macros the analysis does not track.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{DeadincludeError, DeadincludeResult, IoResultExt};
use crate::includes::{normalize, Finding, IncludeLedger};

/// Result of a fix operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixResult {
    /// `"<header> from <file>"`, one entry per removed include line
    pub removed_includes: Vec<String>,
    pub modified_files: Vec<String>,
    /// Reported headers left in place because they declare no type
    pub kept_headers: Vec<String>,
    pub errors: Vec<String>,
}

/// Matches a whole quoted include line, newline included.
fn include_line_regex() -> Option<&'static Regex> {
    static REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    REGEX
        .get_or_init(|| Regex::new(r#"(?m)^[ \t]*#[ \t]*include[ \t]*"([^"\r\n]*)"[^\r\n]*(\r?\n)?"#).ok())
        .as_ref()
}

/// Removes quoted include lines whose key is in `unused` from `content`.
///
/// Returns the new content and the spellings that were removed, or `None`
/// when nothing matched.
pub fn strip_includes(content: &str, unused: &HashSet<&str>) -> Option<(String, Vec<String>)> {
    let regex = include_line_regex()?;
    let mut removed = Vec::new();

    let stripped = regex.replace_all(content, |caps: &Captures| {
        let spelling = caps.get(1).map_or("", |m| m.as_str());
        if unused.contains(normalize(spelling).as_str()) {
            removed.push(spelling.to_string());
            String::new()
        } else {
            caps.get(0).map_or(String::new(), |m| m.as_str().to_string())
        }
    });

    if removed.is_empty() {
        None
    } else {
        Some((stripped.into_owned(), removed))
    }
}

/// Strips unused includes from one file.
///
/// Refuses to touch symlinks and anything that is not a regular file.
/// Returns the removed spellings (empty when nothing matched).
pub fn remove_unused_includes(
    path: &Path,
    unused: &HashSet<&str>,
    dry_run: bool,
) -> DeadincludeResult<Vec<String>> {
    let metadata = path.symlink_metadata().with_path(path)?;
    if metadata.file_type().is_symlink() {
        warn!(path = %path.display(), "refusing to modify symlink");
        return Ok(Vec::new());
    }
    if !metadata.is_file() {
        warn!(path = %path.display(), "not a regular file");
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path).with_path(path)?;
    let Some((new_content, removed)) = strip_includes(&content, unused) else {
        return Ok(Vec::new());
    };

    if dry_run {
        info!(path = %path.display(), includes = ?removed, "dry run: would remove includes");
        return Ok(removed);
    }

    fs::write(path, new_content).with_path(path)?;
    info!(path = %path.display(), includes = ?removed, "removed includes");
    Ok(removed)
}

/// Removes every include of every reported header from the files that include it.
///
/// Files are processed in lexical order. A failing file is recorded in
/// [`FixResult::errors`] and does not stop the run.
pub fn fix_unused_includes(
    ledger: &IncludeLedger,
    findings: &[Finding],
    dry_run: bool,
) -> DeadincludeResult<FixResult> {
    let mut result = FixResult::default();
    if findings.is_empty() {
        return Ok(result);
    }

    let mut targets: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for finding in findings {
        let Some(record) = ledger.get(&finding.header) else {
            result.errors.push(format!("{}: not in ledger", finding.header));
            continue;
        };
        if record.declared_symbols.is_empty() {
            debug!(header = %finding.header, "header declares no type, keeping its includes");
            result.kept_headers.push(finding.header.clone());
            continue;
        }
        for path in &record.dependency_set {
            targets
                .entry(path.as_str())
                .or_default()
                .insert(finding.header.as_str());
        }
    }

    for (path, headers) in targets {
        let wanted: HashSet<&str> = headers.into_iter().collect();
        match remove_unused_includes(Path::new(path), &wanted, dry_run) {
            Ok(removed) if removed.is_empty() => {}
            Ok(removed) => {
                for spelling in removed {
                    result.removed_includes.push(format!("{} from {}", spelling, path));
                }
                result.modified_files.push(path.to_string());
            }
            Err(e) => result.errors.push(format!("{}: {}", path, e)),
        }
    }

    info!(
        dry_run,
        removed = result.removed_includes.len(),
        files = result.modified_files.len(),
        errors = result.errors.len(),
        "fix finished"
    );

    if result.modified_files.is_empty() && !result.errors.is_empty() {
        return Err(DeadincludeError::fix(result.errors.join("; ")));
    }
    Ok(result)
}
