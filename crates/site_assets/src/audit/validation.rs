use super::Findings;
use crate::asset::{AssetKind, SiteFile};

pub(super) fn check(file: &SiteFile, content: &str, size_bytes: u64) -> Findings {
    let mut findings = Findings::default();
    findings.metric("size_bytes", size_bytes);

    if file.kind == AssetKind::Css {
        let responsive = content.contains("@media");
        findings.metric("has_responsive", responsive);
        if !responsive {
            findings.critical("No @media queries; stylesheet is not responsive");
        }
        return findings;
    }

    let checks = [
        ("has_doctype", content.contains("<!DOCTYPE html>"), "Missing <!DOCTYPE html>"),
        (
            "has_semantic_html",
            ["<header", "<main", "<footer"]
                .iter()
                .all(|tag| content.contains(tag)),
            "Missing one of <header>, <main>, <footer>",
        ),
        ("has_navigation", content.contains("<nav"), "Missing <nav>"),
        ("has_aria_labels", content.contains("aria-"), "No aria- attributes"),
        ("has_h1", content.contains("<h1"), "Missing <h1>"),
    ];

    for (metric, passed, message) in checks {
        findings.metric(metric, passed);
        if !passed {
            findings.critical(message);
        }
    }

    findings
}
