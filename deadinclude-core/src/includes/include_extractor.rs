//! Include directive extraction.
//!
//! Only quoted includes of the primary file are recorded. Angle-bracket
//! (system) includes and malformed directives are skipped without touching
//! the ledger. Every occurrence is processed, including duplicates under
//! different conditional-compilation branches; the dependency set absorbs them.

use tracing::debug;

use super::ledger::IncludeLedger;
use super::path::{include_spelling, normalize};
use crate::frontend::{Pat, SourceUnit};

const QUOTED_INCLUDE: &[Pat] = &[Pat::Lit("#include"), Pat::Str];

/// Records a dependency edge `unit.path -> header` for every quoted include.
///
/// Returns the number of include occurrences recorded.
pub fn extract_includes(unit: &SourceUnit, ledger: &mut IncludeLedger) -> usize {
    let tokens = &unit.tokens;
    let mut recorded = 0;

    for (index, tok) in tokens.iter().enumerate() {
        if tok.file_index != 0 || !tok.is("#include") {
            continue;
        }
        if !tokens.matches(index, QUOTED_INCLUDE) {
            debug!(file = %unit.path, line = tok.line, "skipping non-quoted include");
            continue;
        }

        let Some(spelling) = tokens.text(index + 1).and_then(include_spelling) else {
            continue;
        };
        let key = normalize(spelling);
        if key.is_empty() {
            continue;
        }

        ledger.record_include(&key, &unit.path);
        recorded += 1;
    }

    recorded
}
