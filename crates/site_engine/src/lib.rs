//! Site engine: fetching, page extraction and persistence for the crawler.
mod crawl;
mod decode;
mod export;
mod extract;
mod fetch;
mod persist;
mod slug;
mod text;
mod types;

pub use crawl::{CrawlError, CrawlSettings, Crawler};
pub use decode::{decode_html, DecodeError, DecodedHtml};
pub use export::{save_content, CrawlSummary, ExportError, ExportOptions, ExportSummary};
pub use extract::{resolve_reference, PageExtractor, StructuredExtractor, TEXT_PREVIEW_CHARS};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher, BROWSER_USER_AGENT};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use slug::{slug_for_url, HOMEPAGE_SLUG};
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput};
