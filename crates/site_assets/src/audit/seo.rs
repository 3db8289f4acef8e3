use scraper::Html;
use serde_json::json;

use super::markup;
use super::Findings;

const TITLE_OPTIMAL: (usize, usize) = (50, 60);
const TITLE_PASS: (usize, usize) = (30, 70);
const DESCRIPTION_OPTIMAL: (usize, usize) = (150, 160);
const DESCRIPTION_PASS: (usize, usize) = (120, 170);

const SEMANTIC_TAGS: &[&str] = &["header", "nav", "main", "footer", "article", "section"];

fn within((low, high): (usize, usize), value: usize) -> bool {
    (low..=high).contains(&value)
}

fn length_status(pass: (usize, usize), len: usize) -> &'static str {
    if within(pass, len) {
        "pass"
    } else {
        "warning"
    }
}

pub(super) fn check(content: &str) -> Findings {
    let doc = Html::parse_document(content);
    let mut findings = Findings::default();

    let title = markup::title(&doc);
    let title_len = title.chars().count();
    findings.metric(
        "title",
        json!({
            "text": title,
            "length": title_len,
            "optimal": within(TITLE_OPTIMAL, title_len),
            "status": length_status(TITLE_PASS, title_len),
        }),
    );
    if !within(TITLE_OPTIMAL, title_len) {
        let verdict = if title_len < TITLE_OPTIMAL.0 { "short" } else { "long" };
        findings.issue(format!(
            "Title too {verdict} ({title_len} chars). Recommend 50-60 chars."
        ));
    }

    let description = markup::meta_content(&doc, "description").unwrap_or_default();
    let description_len = description.chars().count();
    findings.metric(
        "meta_description",
        json!({
            "text": description,
            "length": description_len,
            "optimal": within(DESCRIPTION_OPTIMAL, description_len),
            "status": length_status(DESCRIPTION_PASS, description_len),
        }),
    );
    if !within(DESCRIPTION_OPTIMAL, description_len) {
        let verdict = if description_len < DESCRIPTION_OPTIMAL.0 {
            "short"
        } else {
            "long"
        };
        findings.issue(format!(
            "Meta description too {verdict} ({description_len} chars). Recommend 150-160 chars."
        ));
    }

    let has_viewport = markup::meta_content(&doc, "viewport").is_some();
    findings.metric("meta_viewport", has_viewport);
    if !has_viewport {
        findings.critical("Missing viewport meta tag");
    }

    let levels = markup::heading_levels(&doc);
    let h1_count = levels.iter().filter(|&&level| level == 1).count();
    findings.metric("h1_count", h1_count);
    findings.metric("total_headings", levels.len());
    match h1_count {
        0 => findings.critical("No H1 heading found"),
        1 => {}
        n => findings.issue(format!("Multiple H1 headings ({n}). Should have exactly one.")),
    }

    let images = markup::count(&doc, "img");
    let without_alt = markup::images_without_alt(&doc);
    findings.metric(
        "images",
        json!({ "total": images, "with_alt": images - without_alt, "without_alt": without_alt }),
    );
    if without_alt > 0 {
        findings.issue(format!("{without_alt} images missing alt text"));
    }

    let hrefs: Vec<String> = markup::select(&doc, "a[href]")
        .into_iter()
        .filter_map(|a| a.value().attr("href"))
        .map(|href| href.trim().to_ascii_lowercase())
        .collect();
    let external = hrefs
        .iter()
        .filter(|href| {
            href.starts_with("http://") || href.starts_with("https://") || href.starts_with("//")
        })
        .count();
    let other = hrefs
        .iter()
        .filter(|href| href.starts_with("mailto:") || href.starts_with("tel:"))
        .count();
    findings.metric(
        "links",
        json!({ "total": hrefs.len(), "internal": hrefs.len() - external - other, "external": external }),
    );

    let has_lang = markup::lang(&doc).is_some();
    findings.metric("has_lang", has_lang);
    if !has_lang {
        findings.issue("Missing lang attribute on html tag");
    }

    let semantic: serde_json::Map<String, serde_json::Value> = SEMANTIC_TAGS
        .iter()
        .map(|tag| (format!("has_{tag}"), markup::has_tag(&doc, tag).into()))
        .collect();
    findings.metric("semantic_html", semantic);

    findings
}
