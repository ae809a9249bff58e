//! Shared graph traversal abstraction.
//!
//! Used for both directions of the include relation: what a file pulls in
//! (include graph) and who depends on a header (ledger dependents).

use std::collections::{HashSet, VecDeque};
use std::hash::Hash;

/// Trait for graph traversal operations.
///
/// # Example
/// ```ignore
/// impl GraphTraversal for DependentsView<'_> {
///     type Node = HeaderKey;
///
///     fn neighbors(&self, node: &HeaderKey) -> Vec<HeaderKey> { /* includers of node */ }
///     fn contains_node(&self, node: &HeaderKey) -> bool { /* node has a record */ }
/// }
///
/// let users = view.reachable_from_single(header_key);
/// ```
pub trait GraphTraversal {
    /// The type used to identify nodes in the graph.
    type Node: Clone + Eq + Hash;

    /// Returns all neighbors (outgoing edges) of a node.
    fn neighbors(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// Checks if the graph contains a node.
    fn contains_node(&self, node: &Self::Node) -> bool;

    /// Multi-source BFS: every node reachable from any of `roots`, roots included.
    ///
    /// Roots missing from the graph are ignored. Cycles (mutually including
    /// headers) terminate because each node is visited at most once.
    fn reachable_from<I>(&self, roots: I) -> HashSet<Self::Node>
    where
        I: IntoIterator<Item = Self::Node>,
    {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();

        for root in roots {
            if self.contains_node(&root) && !visited.contains(&root) {
                visited.insert(root.clone());
                queue.push_back(root);
            }
        }

        while let Some(node) = queue.pop_front() {
            for neighbor in self.neighbors(&node) {
                if !visited.contains(&neighbor) {
                    visited.insert(neighbor.clone());
                    queue.push_back(neighbor);
                }
            }
        }

        visited
    }

    /// Convenience wrapper around `reachable_from` for a single root.
    fn reachable_from_single(&self, root: Self::Node) -> HashSet<Self::Node> {
        self.reachable_from(std::iter::once(root))
    }
}
