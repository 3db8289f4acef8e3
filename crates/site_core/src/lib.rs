//! Site core: pure crawl session state machine and page record types.
mod effect;
mod msg;
mod origin;
mod page;
mod session;
mod update;

pub use effect::Effect;
pub use msg::Msg;
pub use origin::{
    is_non_html_resource, normalize_url_for_dedupe, Origin, OriginError, SKIPPED_EXTENSIONS,
};
pub use page::{ImageRef, LinkRef, PageRecord, StructureEntry};
pub use session::{CrawlSession, SessionStatus, DEFAULT_MAX_PAGES};
pub use update::update;
