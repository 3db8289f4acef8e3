use scraper::{ElementRef, Html, Selector};

const INPUT_TYPES_WITHOUT_LABEL: &[&str] = &["hidden", "submit", "button", "reset", "image"];

pub(super) fn select<'a>(doc: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(sel) => doc.select(&sel).collect(),
        Err(_) => Vec::new(),
    }
}

pub(super) fn count(doc: &Html, css: &str) -> usize {
    select(doc, css).len()
}

pub(super) fn title(doc: &Html) -> String {
    select(doc, "title")
        .first()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

pub(super) fn lang(doc: &Html) -> Option<String> {
    select(doc, "html[lang]")
        .first()
        .and_then(|el| el.value().attr("lang"))
        .map(str::trim)
        .filter(|lang| !lang.is_empty())
        .map(str::to_string)
}

/// `content` of the first `<meta name=...>` whose name matches case-insensitively.
pub(super) fn meta_content(doc: &Html, name: &str) -> Option<String> {
    select(doc, "meta[name]")
        .into_iter()
        .find(|meta| {
            meta.value()
                .attr("name")
                .is_some_and(|n| n.trim().eq_ignore_ascii_case(name))
        })
        .map(|meta| meta.value().attr("content").unwrap_or_default().to_string())
}

pub(super) fn images_without_alt(doc: &Html) -> usize {
    select(doc, "img")
        .into_iter()
        .filter(|img| img.value().attr("alt").is_none())
        .count()
}

/// Heading levels (1..=6) in document order.
pub(super) fn heading_levels(doc: &Html) -> Vec<u8> {
    select(doc, "h1, h2, h3, h4, h5, h6")
        .into_iter()
        .filter_map(|el| el.value().name().strip_prefix('h')?.parse().ok())
        .collect()
}

pub(super) fn aria_attribute_count(doc: &Html) -> usize {
    select(doc, "*")
        .into_iter()
        .map(|el| {
            el.value()
                .attrs()
                .filter(|(name, _)| name.starts_with("aria-"))
                .count()
        })
        .sum()
}

/// Form controls a screen reader cannot name: no `<label for>`, no wrapping
/// `<label>` and no `aria-label`/`aria-labelledby`.
pub(super) fn unlabeled_controls(doc: &Html) -> (usize, usize) {
    let label_targets: Vec<String> = select(doc, "label[for]")
        .into_iter()
        .filter_map(|label| label.value().attr("for"))
        .map(str::to_string)
        .collect();

    let controls: Vec<ElementRef> = select(doc, "input, select, textarea")
        .into_iter()
        .filter(|el| {
            let input_type = el.value().attr("type").unwrap_or("text");
            !(el.value().name() == "input"
                && INPUT_TYPES_WITHOUT_LABEL
                    .iter()
                    .any(|t| t.eq_ignore_ascii_case(input_type)))
        })
        .collect();

    let unlabeled = controls
        .iter()
        .filter(|el| {
            let value = el.value();
            let by_for = value
                .id()
                .is_some_and(|id| label_targets.iter().any(|target| target == id));
            let by_aria =
                value.attr("aria-label").is_some() || value.attr("aria-labelledby").is_some();
            let wrapped = el
                .ancestors()
                .filter_map(ElementRef::wrap)
                .any(|ancestor| ancestor.value().name() == "label");
            !(by_for || by_aria || wrapped)
        })
        .count();

    (controls.len(), unlabeled)
}

pub(super) fn has_tag(doc: &Html, tag: &str) -> bool {
    count(doc, tag) > 0
}
