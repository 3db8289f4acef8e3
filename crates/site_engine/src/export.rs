use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use site_core::PageRecord;
use site_logging::site_info;

use crate::persist::{AtomicFileWriter, PersistError};
use crate::slug::slug_for_url;

pub const SUMMARY_FILENAME: &str = "_summary.json";
const EXTRACTION_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub summary_filename: String,
    pub extraction_date: String,
}

impl ExportOptions {
    pub fn at(extraction_date: impl Into<String>) -> Self {
        Self {
            summary_filename: SUMMARY_FILENAME.to_string(),
            extraction_date: extraction_date.into(),
        }
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::at(
            chrono::Local::now()
                .format(EXTRACTION_DATE_FORMAT)
                .to_string(),
        )
    }
}

/// Contents of `_summary.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlSummary {
    pub total_pages: usize,
    pub pages: Vec<String>,
    pub base_url: String,
    pub extraction_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub summary: CrawlSummary,
    pub page_paths: Vec<PathBuf>,
    pub summary_path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

/// Write one `<slug>.json` per page plus the summary document.
///
/// Pages whose URLs share a slug overwrite each other; the slug is listed
/// once, at its first position. The first failing write aborts the rest and
/// leaves earlier files in place.
pub fn save_content(
    pages: &[PageRecord],
    base_url: &str,
    output_dir: &Path,
    options: ExportOptions,
) -> Result<ExportSummary, ExportError> {
    let writer = AtomicFileWriter::new(output_dir.to_path_buf());

    let mut slugs: Vec<String> = Vec::new();
    let mut page_paths = Vec::new();
    for page in pages {
        let slug = slug_for_url(&page.url);
        let path = writer.write_json(&format!("{slug}.json"), page)?;
        site_info!("Saved: {}", path.display());
        if !slugs.contains(&slug) {
            slugs.push(slug);
            page_paths.push(path);
        }
    }

    let summary = CrawlSummary {
        total_pages: slugs.len(),
        pages: slugs,
        base_url: base_url.to_string(),
        extraction_date: options.extraction_date,
    };
    let summary_path = writer.write_json(&options.summary_filename, &summary)?;
    site_info!(
        "Content extraction complete. {} pages saved.",
        summary.total_pages
    );

    Ok(ExportSummary {
        summary,
        page_paths,
        summary_path,
    })
}
