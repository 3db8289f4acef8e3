use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Structured content of one crawled page. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageRecord {
    pub url: String,
    pub title: String,
    pub meta_description: String,
    /// `"h1"`..`"h6"` to heading texts in document order. Empty levels are absent.
    pub headings: BTreeMap<String, Vec<String>>,
    pub paragraphs: Vec<String>,
    pub links: Vec<LinkRef>,
    pub images: Vec<ImageRef>,
    pub raw_text: String,
    pub html_structure: Vec<StructureEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRef {
    pub href: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub src: String,
    pub alt: String,
}

/// Shallow fingerprint of a top-level block under `<main>` or `<body>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureEntry {
    pub tag: String,
    pub class: String,
    pub id: String,
    pub text_preview: String,
}

impl PageRecord {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn heading_count(&self) -> usize {
        self.headings.values().map(Vec::len).sum()
    }
}
