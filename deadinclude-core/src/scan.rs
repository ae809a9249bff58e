//! Parallel, deterministic source file discovery with directory pruning.
//!
//! Performance notes:
//! - Early directory pruning via `WalkDir::filter_entry` (whole subtree skipped)
//! - Parallel extension filtering via Rayon's `par_bridge`
//! - Results sorted so downstream merging is reproducible

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use walkdir::WalkDir;

/// Extensions scanned when none are configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &["c", "cc", "cpp", "cxx", "h", "hh", "hpp", "hxx"];

/// Directories always pruned (build output and VCS metadata).
const EXCLUDED_DIRS: &[&str] = &[".git", ".svn", ".hg", "build", "node_modules", "CMakeFiles"];

#[inline]
fn is_excluded_dir(entry: &walkdir::DirEntry, excludes: &HashSet<&str>) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| excludes.contains(name))
}

fn has_extension(path: &Path, extensions: &HashSet<String>) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.contains(&ext.to_ascii_lowercase()))
}

/// Gathers every C/C++ source file under `root` with the default settings.
pub fn gather_source_files(root: &Path) -> Result<Vec<PathBuf>> {
    gather_source_files_with(root, DEFAULT_EXTENSIONS, &[])
}

/// Gathers source files with the given extensions, pruning `excludes` in
/// addition to the default excluded directories.
///
/// `root` may also be a single file, which is returned as-is when its
/// extension matches. Extensions compare case-insensitively.
pub fn gather_source_files_with<E: AsRef<str>>(
    root: &Path,
    extensions: &[E],
    excludes: &[&str],
) -> Result<Vec<PathBuf>> {
    let extensions: HashSet<String> = extensions
        .iter()
        .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
        .collect();

    if !root.exists() {
        bail!("Path does not exist: {}", root.display());
    }
    if root.is_file() {
        return Ok(if has_extension(root, &extensions) {
            vec![root.to_path_buf()]
        } else {
            Vec::new()
        });
    }

    let all_excludes: HashSet<&str> = EXCLUDED_DIRS
        .iter()
        .copied()
        .chain(excludes.iter().copied())
        .collect();

    let mut files = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !is_excluded_dir(e, &all_excludes))
        .par_bridge()
        .filter_map(|entry| match entry {
            Ok(e) => {
                let path = e.path();
                if e.file_type().is_file() && has_extension(path, &extensions) {
                    Some(Ok(path.to_path_buf()))
                } else {
                    None
                }
            }
            Err(e) => Some(Err(e.into())),
        })
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("Failed to gather source files from {}", root.display()))?;

    files.sort();
    Ok(files)
}
