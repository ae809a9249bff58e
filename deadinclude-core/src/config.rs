//! Configuration loading from deadinclude.toml.
//!
//! ```toml
//! ignore = ["generated_*", "*_fwd.h"]
//!
//! [analysis]
//! mode = "correlate"
//! extensions = ["cpp", "h"]
//! exclude_dirs = ["third_party"]
//!
//! [output]
//! format = "json"
//! ```

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::DeadincludeError;
use crate::includes::UsageMode;

pub const CONFIG_FILE: &str = "deadinclude.toml";

/// Main configuration structure for deadinclude.toml.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct DeadincludeConfig {
    /// Header keys or patterns never reported.
    pub ignore: Option<Vec<String>>,
    /// Analysis configuration.
    pub analysis: Option<AnalysisConfig>,
    /// Output configuration.
    pub output: Option<OutputConfig>,
}

/// Analysis configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    pub mode: Option<UsageMode>,
    /// File extensions to scan, without the dot. Replaces the defaults.
    pub extensions: Option<Vec<String>>,
    /// Directory names pruned in addition to the defaults.
    pub exclude_dirs: Option<Vec<String>>,
}

/// Output format configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Output format: "plain" or "json".
    pub format: Option<String>,
}

impl DeadincludeConfig {
    pub fn ignore_patterns(&self) -> &[String] {
        self.ignore.as_deref().unwrap_or_default()
    }

    pub fn mode(&self) -> Option<UsageMode> {
        self.analysis.as_ref().and_then(|a| a.mode)
    }

    pub fn wants_json(&self) -> bool {
        self.output
            .as_ref()
            .and_then(|o| o.format.as_deref())
            .is_some_and(|f| f.eq_ignore_ascii_case("json"))
    }
}

/// Loads configuration from deadinclude.toml if it exists.
pub fn load_config(root: &Path) -> Result<Option<DeadincludeConfig>> {
    let path = root.join(CONFIG_FILE);
    if !path.is_file() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let cfg = toml::from_str(&content)
        .map_err(|e| DeadincludeError::config(&path, e.to_string()))?;
    Ok(Some(cfg))
}
