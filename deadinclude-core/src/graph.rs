//! Include graph construction and reachability.
//!
//! Nodes are header keys borrowed from the ledger, edges point from the
//! including file to the included header. Only files with a ledger record
//! become nodes, so edges from files outside the run are dropped.
//!
//! Performance characteristics:
//! - Graph build: O(|V| + |E|)
//! - Multi-source reachability: O(|V| + |E|) single traversal

use std::collections::{HashSet, VecDeque};

use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use tracing::{debug, warn};

use crate::includes::IncludeLedger;

/// Builds the include graph (`includer -> header`) from the ledger.
pub fn build_include_graph(ledger: &IncludeLedger) -> DiGraphMap<&str, ()> {
    let mut g = DiGraphMap::new();

    for (key, _) in ledger.iter() {
        g.add_node(key.as_str());
    }

    for (key, record) in ledger.iter() {
        for path in &record.dependency_set {
            match ledger.key_for(path) {
                Some(includer) => {
                    g.add_edge(includer.as_str(), key.as_str(), ());
                }
                None => debug!(includer = %path, header = %key, "includer has no record, edge dropped"),
            }
        }
    }

    g
}

/// Multi-source BFS over include edges.
///
/// Returns every header reachable from any of `roots`, roots included.
/// Roots missing from the graph are logged and skipped.
pub fn headers_reachable_from<'a>(
    g: &DiGraphMap<&'a str, ()>,
    roots: impl IntoIterator<Item = &'a str>,
) -> HashSet<&'a str> {
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();

    for root in roots {
        if g.contains_node(root) {
            if visited.insert(root) {
                queue.push_back(root);
            }
        } else {
            warn!(root = %root, "root file not found in include graph");
        }
    }

    while let Some(node) = queue.pop_front() {
        for n in g.neighbors_directed(node, Direction::Outgoing) {
            if visited.insert(n) {
                queue.push_back(n);
            }
        }
    }

    visited
}
