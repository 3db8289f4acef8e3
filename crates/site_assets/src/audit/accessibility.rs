use scraper::Html;

use super::markup;
use super::Findings;
use crate::asset::{AssetKind, SiteFile};

const LANDMARKS: &[&str] = &["header", "nav", "main", "footer"];

pub(super) fn check(file: &SiteFile, content: &str) -> Findings {
    match file.kind {
        AssetKind::Css => check_css(content),
        _ => check_html(content),
    }
}

fn check_html(content: &str) -> Findings {
    let doc = Html::parse_document(content);
    let mut findings = Findings::default();

    let lang = markup::lang(&doc);
    findings.metric("has_lang", lang.is_some());
    if lang.is_none() {
        findings.critical("Missing lang attribute on <html>");
    }

    let images = markup::count(&doc, "img");
    let without_alt = markup::images_without_alt(&doc);
    findings.metric("images_total", images);
    findings.metric("images_without_alt", without_alt);
    if without_alt > 0 {
        findings.critical(format!("{without_alt} images missing alt text"));
    }

    findings.metric("aria_attributes", markup::aria_attribute_count(&doc));

    let levels = markup::heading_levels(&doc);
    let h1_count = levels.iter().filter(|&&level| level == 1).count();
    findings.metric("h1_count", h1_count);
    findings.metric("total_headings", levels.len());
    if h1_count != 1 {
        findings.issue(format!("Expected exactly one <h1>, found {h1_count}"));
    }
    for pair in levels.windows(2) {
        if pair[1] > pair[0] + 1 {
            findings.issue(format!(
                "Heading level skips from h{} to h{}",
                pair[0], pair[1]
            ));
        }
    }

    for landmark in LANDMARKS {
        let present = markup::has_tag(&doc, landmark);
        findings.metric(&format!("has_{landmark}"), present);
        if !present {
            findings.issue(format!("Missing <{landmark}> landmark"));
        }
    }

    let has_viewport = markup::meta_content(&doc, "viewport").is_some();
    findings.metric("has_viewport", has_viewport);
    if !has_viewport {
        findings.issue("Missing viewport meta tag");
    }

    let (controls, unlabeled) = markup::unlabeled_controls(&doc);
    findings.metric("form_controls", controls);
    findings.metric("unlabeled_controls", unlabeled);
    if unlabeled > 0 {
        findings.critical(format!("{unlabeled} form controls have no label"));
    }

    findings
}

fn check_css(content: &str) -> Findings {
    let mut findings = Findings::default();

    let focus = content.contains(":focus");
    findings.metric("has_focus_styles", focus);
    if !focus {
        findings.issue("No :focus styles; keyboard users cannot see focus");
    }

    let reduced_motion = content.contains("prefers-reduced-motion");
    findings.metric("has_reduced_motion", reduced_motion);
    if !reduced_motion {
        findings.issue("No prefers-reduced-motion media query");
    }

    findings
}
