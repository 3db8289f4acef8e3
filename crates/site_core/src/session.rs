use std::collections::{HashSet, VecDeque};

use crate::origin::{is_non_html_resource, normalize_url_for_dedupe};
use crate::{Origin, PageRecord};

pub const DEFAULT_MAX_PAGES: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    #[default]
    Idle,
    Running,
    Finished,
}

/// Everything one breadth-first crawl knows: frontier, budget and results.
///
/// `visited` only grows and bounds the total work; a URL enters it right
/// before its fetch is attempted, so a failed URL is never tried again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlSession {
    origin: Origin,
    max_pages: usize,
    status: SessionStatus,
    visited: HashSet<String>,
    visit_order: Vec<String>,
    to_visit: VecDeque<String>,
    in_flight: Option<String>,
    pages: Vec<PageRecord>,
    failures: usize,
}

impl CrawlSession {
    pub fn new(origin: Origin, max_pages: usize) -> Self {
        Self {
            origin,
            max_pages,
            status: SessionStatus::Idle,
            visited: HashSet::new(),
            visit_order: Vec::new(),
            to_visit: VecDeque::new(),
            in_flight: None,
            pages: Vec::new(),
            failures: 0,
        }
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn in_flight(&self) -> Option<&str> {
        self.in_flight.as_deref()
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Visited URLs in the order they were accepted for fetching.
    pub fn visited(&self) -> &[String] {
        &self.visit_order
    }

    pub fn queued(&self) -> impl Iterator<Item = &str> {
        self.to_visit.iter().map(String::as_str)
    }

    pub fn pages(&self) -> &[PageRecord] {
        &self.pages
    }

    pub fn into_pages(self) -> Vec<PageRecord> {
        self.pages
    }

    pub fn failures(&self) -> usize {
        self.failures
    }

    pub(crate) fn start(&mut self) {
        self.status = SessionStatus::Running;
        let seed = normalize_url_for_dedupe(self.origin.base_url());
        self.to_visit.push_back(seed);
    }

    pub(crate) fn finish(&mut self) {
        self.status = SessionStatus::Finished;
        self.in_flight = None;
    }

    pub(crate) fn take_in_flight(&mut self) -> Option<String> {
        self.in_flight.take()
    }

    pub(crate) fn budget_exhausted(&self) -> bool {
        self.visited.len() >= self.max_pages
    }

    /// Pop URLs until one passes the filters, mark it visited and hand it out.
    pub(crate) fn next_fetch(&mut self) -> Option<String> {
        while !self.budget_exhausted() {
            let url = self.to_visit.pop_front()?;
            if self.visited.contains(&url)
                || !self.origin.is_same_domain(&url)
                || is_non_html_resource(&url)
            {
                continue;
            }
            self.visited.insert(url.clone());
            self.visit_order.push(url.clone());
            self.in_flight = Some(url.clone());
            return Some(url);
        }
        None
    }

    pub(crate) fn record_page(&mut self, page: PageRecord) {
        for link in &page.links {
            let candidate = normalize_url_for_dedupe(&link.href);
            if candidate.is_empty()
                || self.visited.contains(&candidate)
                || !self.origin.is_same_domain(&candidate)
            {
                continue;
            }
            self.to_visit.push_back(candidate);
        }
        self.pages.push(page);
    }

    pub(crate) fn record_failure(&mut self) {
        self.failures += 1;
    }
}
