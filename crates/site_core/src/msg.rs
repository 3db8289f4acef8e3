use crate::PageRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Seed the frontier and pick the first URL.
    Start,
    /// The in-flight URL was fetched and extracted.
    PageFetched(Box<PageRecord>),
    /// The in-flight URL failed (transport, status or parse). It is not retried.
    PageFailed { reason: String },
    /// The politeness delay after a processed URL has passed.
    DelayElapsed,
}
