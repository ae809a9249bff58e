//! Header key normalization.
//!
//! Every ledger record is keyed by the last path component of a file name,
//! lower-cased. `"a/b/C.H"`, `"x\\y\\c.h"` and `"c.h"` all map to `c.h`.

use serde::Serialize;
use std::borrow::Borrow;
use std::fmt;

/// Canonical, path-stripped, lower-cased header name.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct HeaderKey(String);

impl HeaderKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// File name without its extension: `widget.h` -> `widget`.
    pub fn stem(&self) -> &str {
        match self.0.rfind('.') {
            Some(dot) if dot > 0 => &self.0[..dot],
            _ => &self.0,
        }
    }
}

impl Borrow<str> for HeaderKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HeaderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strips directories (`/` or `\`, whichever comes last) and lower-cases.
pub fn normalize(raw: &str) -> HeaderKey {
    let base = match raw.rfind(|c: char| c == '/' || c == '\\') {
        Some(sep) => &raw[sep + 1..],
        None => raw,
    };
    HeaderKey(base.to_ascii_lowercase())
}

/// Extracts the file part of a quoted include literal such as `"dir/name.h"`.
///
/// The last `/` wins; without one, the last `\` is used. Returns `None` for
/// anything that is not a double-quoted literal.
pub fn include_spelling(literal: &str) -> Option<&str> {
    if literal.len() < 2 || !literal.starts_with('"') {
        return None;
    }
    let end = literal.rfind('"').filter(|&end| end > 0)?;
    let start = match literal.rfind('/') {
        Some(slash) => slash + 1,
        None => literal.rfind('\\').map_or(1, |back| back + 1),
    };
    literal.get(start..end)
}
