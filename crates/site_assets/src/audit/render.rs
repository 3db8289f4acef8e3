use std::fmt::Write;

use serde_json::Value;

use super::AuditReport;

fn cell(value: &Value) -> String {
    match value {
        Value::String(text) => text.replace('|', "\\|"),
        Value::Bool(true) => "yes".to_string(),
        Value::Bool(false) => "no".to_string(),
        other => other.to_string().replace('|', "\\|"),
    }
}

/// Markdown twin of the JSON report; carries exactly the same data.
pub fn render_markdown(report: &AuditReport) -> String {
    let mut out = String::new();
    let summary = &report.summary;

    // Writing into a String cannot fail.
    let _ = writeln!(out, "# {}\n", report.title);
    let _ = writeln!(out, "**Generated:** {}  ", report.generated_at);
    let _ = writeln!(
        out,
        "**Overall status:** {}\n",
        summary.overall_status.label()
    );

    let _ = writeln!(out, "## Summary\n");
    let _ = writeln!(out, "| Files reviewed | Files missing | Total issues |");
    let _ = writeln!(out, "|---|---|---|");
    let _ = writeln!(
        out,
        "| {} | {} | {} |\n",
        summary.files_reviewed, summary.files_missing, summary.total_issues
    );

    let _ = writeln!(out, "## Files\n");
    for file in &report.files {
        let _ = writeln!(
            out,
            "### `{}` ({}) - {}\n",
            file.file,
            file.kind,
            file.status.label()
        );
        if !file.metrics.is_empty() {
            let _ = writeln!(out, "| Metric | Value |");
            let _ = writeln!(out, "|---|---|");
            for (key, value) in &file.metrics {
                let _ = writeln!(out, "| {key} | {} |", cell(value));
            }
            out.push('\n');
        }
        if file.issues.is_empty() {
            let _ = writeln!(out, "No issues found.\n");
        } else {
            let _ = writeln!(out, "Issues:\n");
            for issue in &file.issues {
                let _ = writeln!(out, "- {issue}");
            }
            out.push('\n');
        }
    }

    if !report.recommendations.is_empty() {
        let _ = writeln!(out, "## Recommendations\n");
        for recommendation in &report.recommendations {
            let _ = writeln!(out, "- {recommendation}");
        }
    }

    out
}
