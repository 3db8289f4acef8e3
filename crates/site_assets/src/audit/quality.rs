use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use super::Findings;
use crate::asset::{AssetKind, SiteFile};

const IMPORTANT_LIMIT: usize = 10;

static HTML_LANG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<html[^>]*\blang\s*=").expect("html lang pattern"));
static CSS_RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^}]+\}").expect("css rule pattern"));
static CSS_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("css comment pattern"));
static CSS_SELECTOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([.#][\w-]+)\s*\{").expect("css selector pattern"));
static JS_FUNCTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"function\s+\w+").expect("js function pattern"));
static JS_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bvar\s+").expect("js var pattern"));

pub(super) fn check(file: &SiteFile, content: &str) -> Findings {
    match file.kind {
        AssetKind::Html => check_html(content),
        AssetKind::Css => check_css(content),
        AssetKind::Js => check_js(content),
    }
}

fn line_count(content: &str) -> usize {
    content.split('\n').count()
}

/// `<head>` must not count `<header>`.
fn count_open_tags(lower: &str, tag: &str) -> usize {
    let needle = format!("<{tag}");
    lower
        .match_indices(&needle)
        .filter(|(at, _)| {
            lower[at + needle.len()..]
                .chars()
                .next()
                .is_some_and(|c| c == '>' || c == '/' || c.is_whitespace())
        })
        .count()
}

fn check_html(content: &str) -> Findings {
    let mut findings = Findings::default();
    let lower = content.to_ascii_lowercase();

    let has_doctype = lower.contains("<!doctype html>");
    findings.metric("has_doctype", has_doctype);
    if !has_doctype {
        findings.issue("Missing DOCTYPE declaration");
    }

    let has_lang = HTML_LANG.is_match(content);
    findings.metric("has_lang", has_lang);
    if !has_lang {
        findings.issue("Missing lang attribute on html tag");
    }

    for tag in ["html", "head", "body"] {
        let opened = count_open_tags(&lower, tag);
        let closed = lower.matches(&format!("</{tag}>")).count();
        if opened != closed {
            findings.issue(format!(
                "{} tag mismatch ({opened} opened, {closed} closed)",
                tag.to_ascii_uppercase()
            ));
        }
    }

    findings
}

fn check_css(content: &str) -> Findings {
    let mut findings = Findings::default();

    let important = content.matches("!important").count();
    let selectors: BTreeSet<&str> = CSS_SELECTOR
        .captures_iter(content)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect();

    findings.metric("total_lines", line_count(content));
    findings.metric("total_rules", CSS_RULE.find_iter(content).count());
    findings.metric("comments", CSS_COMMENT.find_iter(content).count());
    findings.metric("media_queries", content.matches("@media").count());
    findings.metric("important_usage", important);
    findings.metric("unique_selectors", selectors.len());

    if important > IMPORTANT_LIMIT {
        findings.issue(format!(
            "Excessive use of !important ({important} occurrences)"
        ));
    }

    findings
}

fn check_js(content: &str) -> Findings {
    let mut findings = Findings::default();

    let console_logs = content.matches("console.log").count();
    let vars = JS_VAR.find_iter(content).count();

    findings.metric("total_lines", line_count(content));
    findings.metric("functions", JS_FUNCTION.find_iter(content).count());
    findings.metric("arrow_functions", content.matches("=>").count());
    findings.metric("event_listeners", content.matches("addEventListener").count());
    findings.metric("console_logs", console_logs);
    findings.metric("var_declarations", vars);

    if console_logs > 0 {
        findings.issue(format!(
            "Contains {console_logs} console.log statements (should be removed for production)"
        ));
    }
    if vars > 0 {
        findings.issue(format!(
            "Uses deprecated 'var' keyword ({vars} times). Use 'let' or 'const' instead"
        ));
    }

    findings
}
