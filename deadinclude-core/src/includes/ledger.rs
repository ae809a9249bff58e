//! Include usage ledger.
//!
//! One [`IncludeUsage`] record per header key, holding who includes the
//! file, what it declares and what it requires. The extractors write into
//! the ledger eagerly; the judge reads it once extraction is complete.
//!
//! Parallel hosts give each file its own ledger and fold them together with
//! [`IncludeLedger::merge`], so a file's writes become visible only after its
//! extraction finished.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;
use tracing::debug;

use super::declared_extractor::extract_declared_symbols;
use super::include_extractor::extract_includes;
use super::path::{normalize, HeaderKey};
use super::required_extractor::extract_required_symbols;
use crate::common::GraphTraversal;
use crate::frontend::SourceUnit;

/// Everything known about one header key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IncludeUsage {
    /// The header key; empty when the file was never reached through an include
    pub filename: String,
    /// Line of the first declaration recorded for this file, 0 if unknown
    pub line_number: u32,
    pub used_same_file: bool,
    pub used_other_file: bool,
    /// The file itself was processed during this run
    pub analyzed: bool,
    /// Paths of the files that include this header, verbatim
    pub dependency_set: BTreeSet<String>,
    pub declared_symbols: BTreeSet<String>,
    pub required_symbols: BTreeSet<String>,
}

/// The aggregate store of one analysis run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IncludeLedger {
    records: BTreeMap<HeaderKey, IncludeUsage>,
}

impl IncludeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs the declared-symbol, required-symbol and include extractors for one file.
    pub fn process_file(&mut self, unit: &SourceUnit) {
        let key = normalize(&unit.path);
        self.entry(&key).analyzed = true;

        extract_declared_symbols(unit, self);
        extract_required_symbols(unit, self);
        let includes = extract_includes(unit, self);

        debug!(file = %unit.path, key = %key, includes, "processed file");
    }

    /// Fetches the record for `key`, creating it on first reference.
    pub fn entry(&mut self, key: &HeaderKey) -> &mut IncludeUsage {
        self.records.entry(key.clone()).or_default()
    }

    pub fn get(&self, key: &str) -> Option<&IncludeUsage> {
        self.records.get(key)
    }

    /// The ledger's own key for a file path, if the file has a record.
    pub fn key_for(&self, path: &str) -> Option<&HeaderKey> {
        let key = normalize(path);
        self.records.get_key_value(key.as_str()).map(|(k, _)| k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&HeaderKey, &IncludeUsage)> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records that `including_path` includes the header `key`.
    pub fn record_include(&mut self, key: &HeaderKey, including_path: &str) {
        let record = self.entry(key);
        record.filename = key.to_string();
        record.dependency_set.insert(including_path.to_string());
    }

    /// Attributes a declared symbol to the file `key`.
    pub fn record_declared(&mut self, key: &HeaderKey, symbol: &str, line: u32) {
        let record = self.entry(key);
        if record.line_number == 0 {
            record.line_number = line;
        }
        record.declared_symbols.insert(symbol.to_string());
    }

    /// Attributes a required symbol to the file `key`.
    pub fn record_required(&mut self, key: &HeaderKey, symbol: &str) {
        self.entry(key).required_symbols.insert(symbol.to_string());
    }

    /// Marks a header as used from outside the symbol correlation.
    pub fn mark_used(&mut self, key: &HeaderKey, same_file: bool) {
        let record = self.entry(key);
        if same_file {
            record.used_same_file = true;
        } else {
            record.used_other_file = true;
        }
    }

    /// Folds another ledger into this one.
    pub fn merge(&mut self, other: IncludeLedger) {
        for (key, incoming) in other.records {
            let record = self.entry(&key);
            if record.filename.is_empty() {
                record.filename = incoming.filename;
            }
            if record.line_number == 0 {
                record.line_number = incoming.line_number;
            }
            record.used_same_file |= incoming.used_same_file;
            record.used_other_file |= incoming.used_other_file;
            record.analyzed |= incoming.analyzed;
            record.dependency_set.extend(incoming.dependency_set);
            record.declared_symbols.extend(incoming.declared_symbols);
            record.required_symbols.extend(incoming.required_symbols);
        }
    }

    /// Sets the usage flags from the symbol sets.
    ///
    /// A header is used when a file that includes it, directly or through
    /// other headers, requires one of its declared symbols. Use by the
    /// header's implementation partner (same stem) sets `used_same_file`,
    /// use by any other file sets `used_other_file`. Headers that were not
    /// analyzed in this run are left alone.
    pub fn correlate_usage(&mut self) {
        let dependents = DependentsView(self);
        let mut decisions = Vec::new();

        for (key, record) in &self.records {
            if record.filename.is_empty() || !record.analyzed || record.declared_symbols.is_empty()
            {
                continue;
            }

            let mut same_file = false;
            let mut other_file = false;
            for user in dependents.reachable_from_single(key.clone()) {
                if user == *key {
                    continue;
                }
                let uses = self.records.get(&user).is_some_and(|r| {
                    !r.required_symbols.is_disjoint(&record.declared_symbols)
                });
                if uses {
                    if user.stem() == key.stem() {
                        same_file = true;
                    } else {
                        other_file = true;
                    }
                }
            }
            decisions.push((key.clone(), same_file, other_file));
        }

        for (key, same_file, other_file) in decisions {
            let record = self.entry(&key);
            record.used_same_file |= same_file;
            record.used_other_file |= other_file;
        }
    }

    /// Human-readable dump of every record: dependents, required and declared symbols.
    pub fn dump(&self) -> String {
        let mut out = String::from("IncludeMap\n");
        for (key, record) in &self.records {
            out.push_str(&format!("\n{}:", key));
            for path in &record.dependency_set {
                out.push_str(&format!("\n{}", path));
            }
            out.push('\n');
            out.push_str("RequiredSymbolsSet\n");
            for symbol in &record.required_symbols {
                out.push_str(&format!("{}\n", symbol));
            }
            out.push_str("DeclaredSymbolsSet\n");
            for symbol in &record.declared_symbols {
                out.push_str(&format!("{}\n", symbol));
            }
        }
        out.push('\n');
        out
    }

    /// `"<key> (<count>) :"` per included header, then one tab-indented line
    /// per dependent path in lexical order.
    pub fn dependency_report(&self) -> String {
        let mut out = String::new();
        for record in self.records.values().filter(|r| !r.filename.is_empty()) {
            out.push_str(&format!(
                "{} ({}) :\n",
                record.filename,
                record.dependency_set.len()
            ));
            for path in &record.dependency_set {
                out.push_str(&format!("\t{}\n", path));
            }
        }
        out
    }
}

/// Reverse include edges: from a header to the files that include it.
struct DependentsView<'a>(&'a IncludeLedger);

impl GraphTraversal for DependentsView<'_> {
    type Node = HeaderKey;

    fn neighbors(&self, node: &HeaderKey) -> Vec<HeaderKey> {
        let mut seen = HashSet::new();
        self.0
            .records
            .get(node)
            .map(|r| {
                r.dependency_set
                    .iter()
                    .map(|path| normalize(path))
                    .filter(|key| seen.insert(key.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn contains_node(&self, node: &HeaderKey) -> bool {
        self.0.records.contains_key(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str) -> HeaderKey {
        normalize(name)
    }

    #[test]
    fn test_one_record_per_key() {
        let mut ledger = IncludeLedger::new();
        ledger.record_include(&key("inc/Foo.h"), "a.cpp");
        ledger.record_include(&key("FOO.H"), "b.cpp");
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.get("foo.h").unwrap().dependency_set.len(), 2);
    }

    #[test]
    fn test_dependency_paths_kept_verbatim() {
        let mut ledger = IncludeLedger::new();
        ledger.record_include(&key("foo.h"), "src/A.cpp");
        ledger.record_include(&key("foo.h"), "src/a.cpp");
        ledger.record_include(&key("foo.h"), "src/a.cpp");
        let deps: Vec<_> = ledger.get("foo.h").unwrap().dependency_set.iter().cloned().collect();
        assert_eq!(deps, vec!["src/A.cpp", "src/a.cpp"]);
    }

    #[test]
    fn test_first_declaration_line_sticks() {
        let mut ledger = IncludeLedger::new();
        ledger.record_declared(&key("foo.h"), "Foo", 7);
        ledger.record_declared(&key("foo.h"), "Bar", 3);
        assert_eq!(ledger.get("foo.h").unwrap().line_number, 7);
    }

    #[test]
    fn test_merge_unions_sets() {
        let mut left = IncludeLedger::new();
        left.record_include(&key("foo.h"), "a.cpp");
        left.record_declared(&key("foo.h"), "Foo", 2);

        let mut right = IncludeLedger::new();
        right.record_include(&key("foo.h"), "b.cpp");
        right.record_include(&key("foo.h"), "a.cpp");
        right.record_declared(&key("foo.h"), "Foo", 9);
        right.mark_used(&key("foo.h"), false);

        left.merge(right);
        let record = left.get("foo.h").unwrap();
        assert_eq!(record.dependency_set.len(), 2);
        assert_eq!(record.declared_symbols.len(), 1);
        assert_eq!(record.line_number, 2);
        assert!(record.used_other_file);
    }

    #[test]
    fn test_correlate_other_file() {
        let mut ledger = IncludeLedger::new();
        ledger.entry(&key("foo.h")).analyzed = true;
        ledger.record_declared(&key("foo.h"), "Foo", 1);
        ledger.record_include(&key("foo.h"), "src/main.cpp");
        ledger.record_required(&key("main.cpp"), "Foo");

        ledger.correlate_usage();
        let record = ledger.get("foo.h").unwrap();
        assert!(record.used_other_file);
        assert!(!record.used_same_file);
    }

    #[test]
    fn test_correlate_same_file_partner() {
        let mut ledger = IncludeLedger::new();
        ledger.entry(&key("foo.h")).analyzed = true;
        ledger.record_declared(&key("foo.h"), "Foo", 1);
        ledger.record_include(&key("foo.h"), "foo.cpp");
        ledger.record_required(&key("foo.cpp"), "Foo");

        ledger.correlate_usage();
        let record = ledger.get("foo.h").unwrap();
        assert!(record.used_same_file);
        assert!(!record.used_other_file);
    }

    #[test]
    fn test_correlate_through_intermediate_header() {
        // app.cpp -> wrapper.h -> core.h, app.cpp uses Core
        let mut ledger = IncludeLedger::new();
        ledger.entry(&key("core.h")).analyzed = true;
        ledger.record_declared(&key("core.h"), "Core", 1);
        ledger.record_include(&key("core.h"), "wrapper.h");
        ledger.record_include(&key("wrapper.h"), "app.cpp");
        ledger.record_required(&key("app.cpp"), "Core");

        ledger.correlate_usage();
        assert!(ledger.get("core.h").unwrap().used_other_file);
    }

    #[test]
    fn test_correlate_skips_unanalyzed_headers() {
        let mut ledger = IncludeLedger::new();
        ledger.record_declared(&key("foo.h"), "Foo", 1);
        ledger.record_include(&key("foo.h"), "main.cpp");
        ledger.record_required(&key("main.cpp"), "Foo");

        ledger.correlate_usage();
        let record = ledger.get("foo.h").unwrap();
        assert!(!record.used_other_file && !record.used_same_file);
    }

    #[test]
    fn test_dump_format() {
        let mut ledger = IncludeLedger::new();
        ledger.record_include(&key("foo.h"), "a.cpp");
        ledger.record_declared(&key("foo.h"), "Foo", 1);
        ledger.record_required(&key("foo.h"), "Bar");
        assert_eq!(
            ledger.dump(),
            "IncludeMap\n\nfoo.h:\na.cpp\nRequiredSymbolsSet\nBar\nDeclaredSymbolsSet\nFoo\n\n"
        );
    }

    #[test]
    fn test_dependency_report_skips_unreached_files() {
        let mut ledger = IncludeLedger::new();
        ledger.record_include(&key("foo.h"), "b.cpp");
        ledger.record_include(&key("foo.h"), "a.cpp");
        ledger.record_required(&key("a.cpp"), "Foo");
        assert_eq!(ledger.dependency_report(), "foo.h (2) :\n\ta.cpp\n\tb.cpp\n");
    }

    #[test]
    fn test_key_for_normalizes_path() {
        let mut ledger = IncludeLedger::new();
        ledger.entry(&key("widget.h")).analyzed = true;
        assert_eq!(ledger.key_for("src/ui/Widget.H").map(|k| k.as_str()), Some("widget.h"));
        assert!(ledger.key_for("other.h").is_none());
    }
}
