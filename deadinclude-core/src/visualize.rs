//! Graphviz DOT visualization of the include graph.

use std::collections::HashSet;
use std::fmt::Write;

use tracing::error;

use crate::graph::build_include_graph;
use crate::includes::{Finding, IncludeLedger};

/// Generate a Graphviz DOT representation of the include graph.
///
/// - headers reported as unused are lightcoral
/// - every other file is lightgreen
/// - edges point from the including file to the included header
pub fn generate_dot(ledger: &IncludeLedger, findings: &[Finding]) -> String {
    let unused: HashSet<&str> = findings.iter().map(|f| f.header.as_str()).collect();

    let mut dot = String::with_capacity(ledger.len() * 80 + 150);
    if let Err(e) = write_dot_content(&mut dot, ledger, &unused) {
        error!(error = %e, "failed to generate DOT string");
        return "digraph deadinclude {\n}\n".to_string();
    }
    dot
}

fn write_dot_content(
    dot: &mut String,
    ledger: &IncludeLedger,
    unused: &HashSet<&str>,
) -> std::fmt::Result {
    let g = build_include_graph(ledger);

    writeln!(dot, "digraph deadinclude {{")?;
    writeln!(dot, "  rankdir=LR;")?;
    writeln!(
        dot,
        "  node [shape=box, style=filled, fontname=\"JetBrains Mono\"];"
    )?;
    writeln!(dot)?;

    let mut nodes: Vec<&str> = g.nodes().collect();
    nodes.sort_unstable();
    for name in &nodes {
        let color = if unused.contains(name) {
            "lightcoral"
        } else {
            "lightgreen"
        };
        writeln!(dot, "  \"{}\" [fillcolor={}];", escape(name), color)?;
    }

    writeln!(dot)?;

    let mut edges: Vec<(&str, &str)> = g.all_edges().map(|(from, to, _)| (from, to)).collect();
    edges.sort_unstable();
    for (from, to) in edges {
        writeln!(dot, "  \"{}\" -> \"{}\";", escape(from), escape(to))?;
    }

    writeln!(dot, "}}")?;
    Ok(())
}

fn escape(name: &str) -> String {
    name.replace('\\', "\\\\").replace('"', "\\\"")
}
