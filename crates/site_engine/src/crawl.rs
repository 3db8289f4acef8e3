use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use site_core::{update, CrawlSession, Effect, Msg, Origin, OriginError, PageRecord, DEFAULT_MAX_PAGES};
use site_logging::{site_debug, site_error, site_info};

use crate::decode::decode_html;
use crate::extract::{PageExtractor, StructuredExtractor};
use crate::fetch::{FetchSettings, Fetcher, ReqwestFetcher};
use crate::{FailureKind, FetchError};

#[derive(Debug, Clone)]
pub struct CrawlSettings {
    pub max_pages: usize,
    /// Fixed pause after every processed URL, whatever its outcome.
    pub delay: Duration,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            delay: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CrawlError {
    #[error("invalid seed: {0}")]
    Seed(#[from] OriginError),
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Runs a [`CrawlSession`] to completion, one request at a time.
pub struct Crawler {
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn PageExtractor>,
    settings: CrawlSettings,
}

impl Crawler {
    pub fn new(fetch: FetchSettings, settings: CrawlSettings) -> Self {
        Self::with_parts(
            Arc::new(ReqwestFetcher::new(fetch)),
            Arc::new(StructuredExtractor),
            settings,
        )
    }

    pub fn with_parts(
        fetcher: Arc<dyn Fetcher>,
        extractor: Arc<dyn PageExtractor>,
        settings: CrawlSettings,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            settings,
        }
    }

    pub fn settings(&self) -> &CrawlSettings {
        &self.settings
    }

    /// Fetch and extract one page. Every failure is logged and collapsed to `None`.
    pub async fn extract_page_content(&self, url: &str) -> Option<PageRecord> {
        self.scrape(url).await.ok()
    }

    /// `fetch_record` with the failure logged once, for every caller.
    async fn scrape(&self, url: &str) -> Result<PageRecord, FetchError> {
        self.fetch_record(url)
            .await
            .inspect_err(|err| site_error!("Error scraping {}: {}", url, err))
    }

    async fn fetch_record(&self, url: &str) -> Result<PageRecord, FetchError> {
        site_info!("Scraping: {}", url);
        let output = self.fetcher.fetch(url).await?;
        let decoded = decode_html(&output.bytes, output.metadata.content_type.as_deref())
            .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))?;
        site_debug!(
            "Decoded {} ({} bytes, {})",
            url,
            output.metadata.byte_len,
            decoded.encoding_label
        );
        Ok(self.extractor.extract(url, &decoded.html))
    }

    /// Breadth-first crawl from `seed`, confined to the seed's site.
    pub async fn crawl(&self, seed: &str) -> Result<CrawlSession, CrawlError> {
        let origin = Origin::parse(seed)?;
        let (mut session, effects) =
            update(CrawlSession::new(origin, self.settings.max_pages), Msg::Start);
        let mut pending: VecDeque<Effect> = effects.into();

        while let Some(effect) = pending.pop_front() {
            let msg = match effect {
                Effect::Fetch { url } => match self.scrape(&url).await {
                    Ok(record) => Msg::PageFetched(Box::new(record)),
                    Err(err) => Msg::PageFailed {
                        reason: err.to_string(),
                    },
                },
                Effect::Delay => {
                    tokio::time::sleep(self.settings.delay).await;
                    Msg::DelayElapsed
                }
                Effect::Finished => break,
            };
            let (next, effects) = update(session, msg);
            session = next;
            pending.extend(effects);
        }

        site_info!(
            "Crawled {} pages ({} extracted, {} failed)",
            session.visited().len(),
            session.pages().len(),
            session.failures()
        );
        Ok(session)
    }

    /// [`Crawler::crawl`] on a runtime owned by this call.
    pub fn crawl_blocking(&self, seed: &str) -> Result<CrawlSession, CrawlError> {
        let runtime = tokio::runtime::Runtime::new().map_err(CrawlError::Runtime)?;
        runtime.block_on(self.crawl(seed))
    }
}
