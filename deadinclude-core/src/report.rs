//! Output formatting - plaintext and JSON.

use serde_json::json;
use tracing::warn;

use crate::includes::{Finding, IncludeStats};

/// Renders findings as plain text, one per line.
pub fn render_plain(findings: &[Finding]) -> String {
    if findings.is_empty() {
        return "No unused includes found.\n".to_string();
    }
    let mut out = format!("UNUSED INCLUDES ({}):\n", findings.len());
    for finding in findings {
        out.push_str(&finding.to_string());
        out.push('\n');
    }
    out
}

/// Renders findings and run statistics as a JSON document.
pub fn render_json(findings: &[Finding], stats: &IncludeStats) -> serde_json::Value {
    json!({
        "unused": findings,
        "stats": stats,
    })
}

/// Prints findings in plain text format.
pub fn print_plain(findings: &[Finding]) {
    print!("{}", render_plain(findings));
}

/// Prints findings in JSON format.
///
/// Falls back to one message per line if serialization fails.
pub fn print_json(findings: &[Finding], stats: &IncludeStats) {
    match serde_json::to_string_pretty(&render_json(findings, stats)) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            warn!(error = %e, "JSON serialization failed");
            for finding in findings {
                println!("{}", finding);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_plain_empty() {
        assert_eq!(render_plain(&[]), "No unused includes found.\n");
    }

    #[test]
    fn test_render_plain_findings() {
        let findings = vec![
            Finding::unused_include("a.h", "a.h", 3),
            Finding::unused_include("b.h", "+", 0),
        ];
        assert_eq!(
            render_plain(&findings),
            "UNUSED INCLUDES (2):\n\
             [a.h:3]: (style) The include 'a.h' is never used.\n\
             (style) The include 'b.h' is never used.\n"
        );
    }

    #[test]
    fn test_render_json_shape() {
        let findings = vec![Finding::unused_include("a.h", "a.h", 3)];
        let stats = IncludeStats {
            total_headers: 2,
            unused_count: 1,
            ..Default::default()
        };
        let value = render_json(&findings, &stats);

        let unused = value["unused"].as_array().unwrap();
        assert_eq!(unused.len(), 1);
        assert_eq!(unused[0]["id"], "unusedInclude");
        assert_eq!(unused[0]["severity"], "style");
        assert_eq!(unused[0]["header"], "a.h");
        assert_eq!(unused[0]["location"]["file"], "a.h");
        assert_eq!(unused[0]["location"]["line"], 3);
        assert_eq!(value["stats"]["total_headers"], 2);
        assert_eq!(value["stats"]["unused_count"], 1);
    }
}
