use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;

use super::markup;
use super::Findings;
use crate::asset::{AssetKind, SiteFile};

static MEDIA_WIDTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@media[^{]*?(?:min|max)-width\s*:\s*(\d+)px").expect("media width pattern")
});
static FLEXBOX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"display\s*:\s*(?:inline-)?flex").expect("flexbox pattern"));
static GRID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"display\s*:\s*(?:inline-)?grid").expect("grid pattern"));
static RELATIVE_UNITS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    ["rem", "em", "%", "vw", "vh"]
        .into_iter()
        .map(|unit| {
            let pattern = format!(r"\d(?:\.\d+)?{}", regex::escape(unit));
            (unit, Regex::new(&pattern).expect("unit pattern"))
        })
        .collect()
});

pub(super) fn check(file: &SiteFile, content: &str) -> Findings {
    match file.kind {
        AssetKind::Css => check_css(content),
        _ => check_html(content),
    }
}

fn check_css(content: &str) -> Findings {
    let mut findings = Findings::default();

    let media_queries = content.matches("@media").count();
    findings.metric("media_queries", media_queries);
    if media_queries == 0 {
        findings.critical("No @media queries found");
    }

    let breakpoints: BTreeSet<u32> = MEDIA_WIDTH
        .captures_iter(content)
        .filter_map(|caps| caps.get(1)?.as_str().parse().ok())
        .collect();
    findings.metric(
        "breakpoints_px",
        breakpoints.into_iter().collect::<Vec<_>>(),
    );

    let units: Vec<&str> = RELATIVE_UNITS
        .iter()
        .filter(|(_, pattern)| pattern.is_match(content))
        .map(|(unit, _)| *unit)
        .collect();
    if units.is_empty() {
        findings.issue("No relative units (rem, em, %, vw, vh); layout is fixed-size");
    }
    findings.metric("relative_units", units);

    findings.metric("uses_flexbox", FLEXBOX.is_match(content));
    findings.metric("uses_grid", GRID.is_match(content));

    findings
}

fn check_html(content: &str) -> Findings {
    let doc = Html::parse_document(content);
    let mut findings = Findings::default();

    let viewport = markup::meta_content(&doc, "viewport");
    findings.metric("has_viewport", viewport.is_some());
    match viewport {
        None => findings.critical("Missing viewport meta tag"),
        Some(value) => {
            if !value.replace(' ', "").contains("width=device-width") {
                findings.issue(format!("Viewport '{value}' does not set width=device-width"));
            }
            findings.metric("viewport_content", value);
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn css_breakpoints_and_units_are_collected() {
        let css = r#"
            .grid { display: grid; width: 100%; }
            .row { display:flex; padding: 1.5rem; }
            @media (max-width: 768px) { .row { display: block; } }
            @media screen and (min-width:1024px) and (max-width: 1440px) { .a { margin: 2em; } }
        "#;
        let findings = check_css(css);
        assert_eq!(findings.metrics["media_queries"], json!(2));
        assert_eq!(findings.metrics["breakpoints_px"], json!([768, 1024]));
        assert_eq!(findings.metrics["relative_units"], json!(["rem", "em", "%"]));
        assert_eq!(findings.metrics["uses_flexbox"], json!(true));
        assert_eq!(findings.metrics["uses_grid"], json!(true));
        assert!(findings.issues.is_empty());
    }

    #[test]
    fn fixed_layout_without_media_fails() {
        let findings = check_css(".a { width: 960px; }");
        assert!(findings.failed);
        assert_eq!(findings.issues.len(), 2);
    }
}
