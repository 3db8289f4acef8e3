use std::collections::BTreeMap;

use scraper::{ElementRef, Html, Selector};
use site_core::{ImageRef, LinkRef, PageRecord, StructureEntry};
use url::Url;

use crate::text::{compact_text, is_hidden, preview, text_runs};

/// Characters kept in each `html_structure` preview.
pub const TEXT_PREVIEW_CHARS: usize = 200;

const STRUCTURE_TAGS: &[&str] = &["section", "div", "article"];

pub trait PageExtractor: Send + Sync {
    fn extract(&self, url: &str, html: &str) -> PageRecord;
}

/// Pulls title, meta description, headings, paragraphs, links, images,
/// visible text and a shallow block fingerprint out of a page.
///
/// Text inside script/style/noscript never reaches the record.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredExtractor;

impl PageExtractor for StructuredExtractor {
    fn extract(&self, url: &str, html: &str) -> PageRecord {
        let doc = Html::parse_document(html);
        let base = Url::parse(url).ok();

        PageRecord {
            url: url.to_string(),
            title: first_text(&doc, "title"),
            meta_description: meta_description(&doc),
            headings: headings(&doc),
            paragraphs: select(&doc, "p")
                .into_iter()
                .map(compact_text)
                .filter(|text| !text.is_empty())
                .collect(),
            links: select(&doc, "a[href]")
                .into_iter()
                .filter_map(|a| {
                    let href = a.value().attr("href")?;
                    Some(LinkRef {
                        href: resolve_reference(href, base.as_ref()),
                        text: compact_text(a),
                    })
                })
                .collect(),
            images: select(&doc, "img[src]")
                .into_iter()
                .filter_map(|img| {
                    let src = img.value().attr("src")?;
                    Some(ImageRef {
                        src: resolve_reference(src, base.as_ref()),
                        alt: img.value().attr("alt").unwrap_or_default().to_string(),
                    })
                })
                .collect(),
            raw_text: text_runs(*doc.root_element()).join("\n"),
            html_structure: structure(&doc),
        }
    }
}

/// Resolve `reference` against the page URL. Unresolvable references are kept
/// as written (trimmed) rather than dropped.
pub fn resolve_reference(reference: &str, base: Option<&Url>) -> String {
    let trimmed = reference.trim();
    if let Ok(url) = Url::parse(trimmed) {
        return url.into();
    }
    base.and_then(|base| base.join(trimmed).ok())
        .map(String::from)
        .unwrap_or_else(|| trimmed.to_string())
}

fn select<'a>(doc: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(sel) => doc.select(&sel).filter(|el| !inside_hidden(el)).collect(),
        Err(_) => Vec::new(),
    }
}

fn inside_hidden(element: &ElementRef) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| is_hidden(&ancestor))
}

fn first_text(doc: &Html, css: &str) -> String {
    Selector::parse(css)
        .ok()
        .and_then(|sel| doc.select(&sel).next())
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

fn meta_description(doc: &Html) -> String {
    select(doc, "meta[name]")
        .into_iter()
        .find(|meta| {
            meta.value()
                .attr("name")
                .is_some_and(|name| name.eq_ignore_ascii_case("description"))
        })
        .and_then(|meta| meta.value().attr("content"))
        .unwrap_or_default()
        .to_string()
}

fn headings(doc: &Html) -> BTreeMap<String, Vec<String>> {
    let mut headings = BTreeMap::new();
    for level in 1..=6 {
        let tag = format!("h{level}");
        let texts: Vec<String> = select(doc, &tag).into_iter().map(compact_text).collect();
        if !texts.is_empty() {
            headings.insert(tag, texts);
        }
    }
    headings
}

fn structure(doc: &Html) -> Vec<StructureEntry> {
    let container = select(doc, "main")
        .first()
        .copied()
        .or_else(|| select(doc, "body").first().copied());
    let Some(container) = container else {
        return Vec::new();
    };

    container
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|el| {
            let name = el.value().name();
            STRUCTURE_TAGS.iter().any(|tag| name.eq_ignore_ascii_case(tag))
        })
        .map(|el| StructureEntry {
            tag: el.value().name().to_ascii_lowercase(),
            class: el
                .value()
                .attr("class")
                .map(|class| class.split_whitespace().collect::<Vec<_>>().join(" "))
                .unwrap_or_default(),
            id: el.value().id().unwrap_or_default().to_string(),
            text_preview: preview(&compact_text(el), TEXT_PREVIEW_CHARS),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_and_absolute_references_resolve() {
        let base = Url::parse("https://example.com/docs/page").unwrap();
        assert_eq!(
            resolve_reference("../img/a.png", Some(&base)),
            "https://example.com/img/a.png"
        );
        assert_eq!(
            resolve_reference(" https://other.org ", Some(&base)),
            "https://other.org/"
        );
        assert_eq!(
            resolve_reference("#team", Some(&base)),
            "https://example.com/docs/page#team"
        );
        assert_eq!(resolve_reference("/x", None), "/x");
    }

    #[test]
    fn preview_is_capped_in_characters() {
        let long = "é".repeat(TEXT_PREVIEW_CHARS + 10);
        assert_eq!(preview(&long, TEXT_PREVIEW_CHARS).chars().count(), TEXT_PREVIEW_CHARS);
    }
}
