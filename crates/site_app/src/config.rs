//! `sitekit.ron` loading. Every field has a default, so a config file only
//! needs the values that differ from the stock site layout.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use site_assets::audit::{AuditContext, ReportKind};
use site_assets::{AssetKind, PackageConfig, SiteFile};
use site_engine::{CrawlSettings, FetchSettings};
use site_logging::site_info;

pub const DEFAULT_CONFIG_FILENAME: &str = "sitekit.ron";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site sources live below this directory.
    pub root: PathBuf,
    /// Reports land here, relative to `root`.
    pub docs_dir: PathBuf,
    pub crawl: CrawlSection,
    pub assets: AssetsSection,
    pub audits: AuditSection,
    pub package: PackageSection,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            docs_dir: PathBuf::from("docs"),
            crawl: CrawlSection::default(),
            assets: AssetsSection::default(),
            audits: AuditSection::default(),
            package: PackageSection::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlSection {
    pub seed_url: String,
    pub max_pages: usize,
    pub delay_ms: u64,
    pub timeout_secs: u64,
    pub output_dir: PathBuf,
}

impl Default for CrawlSection {
    fn default() -> Self {
        Self {
            seed_url: "https://www.example.com".to_string(),
            max_pages: site_core::DEFAULT_MAX_PAGES,
            delay_ms: 1000,
            timeout_secs: 10,
            output_dir: PathBuf::from("extracted_content"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsSection {
    pub stylesheets: Vec<PathBuf>,
    pub scripts: Vec<PathBuf>,
}

impl Default for AssetsSection {
    fn default() -> Self {
        Self {
            stylesheets: vec![PathBuf::from("styles/main.css")],
            scripts: vec![
                PathBuf::from("scripts/main.js"),
                PathBuf::from("scripts/tools.js"),
                PathBuf::from("scripts/consumer-tools.js"),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditSection {
    pub pages: Vec<PathBuf>,
    /// Report names as accepted on the command line, e.g. `"code-quality"`.
    pub reports: Vec<String>,
    pub page_css: PathBuf,
    pub page_js: PathBuf,
}

const ALTERNATE_PAGES: [&str; 6] = ["about", "services", "team", "history", "contact", "pricing"];

impl Default for AuditSection {
    fn default() -> Self {
        let mut pages = vec![PathBuf::from("index.html")];
        pages.extend(
            ALTERNATE_PAGES
                .iter()
                .map(|name| PathBuf::from(format!("pages/alternate/{name}_alt.html"))),
        );
        Self {
            pages,
            reports: ReportKind::ALL
                .iter()
                .map(|kind| kind.as_str().to_string())
                .collect(),
            page_css: PathBuf::from("styles/main.min.css"),
            page_js: PathBuf::from("scripts/main.min.js"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageSection {
    pub output_dir: String,
    pub archive_name: String,
    pub package_name: String,
    pub version: String,
    /// `None` means the day the package is built.
    pub release_date: Option<String>,
    pub include: Vec<PathBuf>,
}

impl Default for PackageSection {
    fn default() -> Self {
        let audits = AuditSection::default();
        let assets = AssetsSection::default();
        let mut include = audits.pages;
        for source in assets.stylesheets.iter().chain(&assets.scripts) {
            include.push(source.clone());
            include.push(site_assets::minified_path(source));
        }
        include.push(PathBuf::from("README.md"));
        include.push(PathBuf::from("docs"));
        Self {
            output_dir: "production_package".to_string(),
            archive_name: "site_production_v1.0".to_string(),
            package_name: "Website Production Package".to_string(),
            version: "1.0".to_string(),
            release_date: None,
            include,
        }
    }
}

impl SiteConfig {
    pub fn docs_path(&self) -> PathBuf {
        self.root.join(&self.docs_dir)
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        let timeout = Duration::from_secs(self.crawl.timeout_secs);
        FetchSettings {
            connect_timeout: timeout,
            request_timeout: timeout,
            ..FetchSettings::default()
        }
    }

    pub fn crawl_settings(&self) -> CrawlSettings {
        CrawlSettings {
            max_pages: self.crawl.max_pages,
            delay: Duration::from_millis(self.crawl.delay_ms),
        }
    }

    /// Stylesheets and scripts to minify.
    pub fn minify_targets(&self) -> Vec<SiteFile> {
        let css = self
            .assets
            .stylesheets
            .iter()
            .map(|path| SiteFile::new(path.clone(), AssetKind::Css));
        let js = self
            .assets
            .scripts
            .iter()
            .map(|path| SiteFile::new(path.clone(), AssetKind::Js));
        css.chain(js).collect()
    }

    pub fn script_targets(&self) -> Vec<SiteFile> {
        self.assets
            .scripts
            .iter()
            .map(|path| SiteFile::new(path.clone(), AssetKind::Js))
            .collect()
    }

    /// Pages first, then the unminified stylesheets and scripts.
    pub fn audit_targets(&self) -> Vec<SiteFile> {
        let mut targets: Vec<SiteFile> = self
            .audits
            .pages
            .iter()
            .map(|path| SiteFile::new(path.clone(), AssetKind::Html))
            .collect();
        targets.extend(self.minify_targets());
        targets
    }

    pub fn audit_context(&self) -> AuditContext {
        AuditContext {
            root: self.root.clone(),
            page_css: self.audits.page_css.clone(),
            page_js: self.audits.page_js.clone(),
        }
    }

    pub fn report_kinds(&self) -> Result<Vec<ReportKind>> {
        self.audits
            .reports
            .iter()
            .map(|name| name.parse::<ReportKind>().map_err(anyhow::Error::msg))
            .collect()
    }

    pub fn package_config(&self, today: &str) -> PackageConfig {
        PackageConfig {
            root: self.root.clone(),
            output_dir: self.package.output_dir.clone(),
            archive_name: self.package.archive_name.clone(),
            package_name: self.package.package_name.clone(),
            version: self.package.version.clone(),
            release_date: self
                .package
                .release_date
                .clone()
                .unwrap_or_else(|| today.to_string()),
            include: self.package.include.clone(),
        }
    }
}

/// Load `explicit` if given, otherwise `sitekit.ron` in the working
/// directory when present, otherwise the built-in defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<SiteConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILENAME);
            if !default.is_file() {
                site_info!("No {} found, using built-in defaults", DEFAULT_CONFIG_FILENAME);
                return Ok(SiteConfig::default());
            }
            default
        }
    };

    let content = fs::read_to_string(&path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: SiteConfig = ron::from_str(&content)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    config
        .report_kinds()
        .with_context(|| format!("invalid report list in {}", path.display()))?;
    site_info!("Loaded config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("site.ron");
        fs::write(
            &path,
            r#"(
                root: "site",
                crawl: (seed_url: "https://acme.example.com", max_pages: 5),
                audits: (reports: ["seo", "code_quality"]),
            )"#,
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.root, PathBuf::from("site"));
        assert_eq!(config.crawl.seed_url, "https://acme.example.com");
        assert_eq!(config.crawl.max_pages, 5);
        assert_eq!(config.crawl.delay_ms, 1000);
        assert_eq!(config.assets, AssetsSection::default());
        assert_eq!(
            config.report_kinds().unwrap(),
            vec![ReportKind::Seo, ReportKind::CodeQuality]
        );
        assert_eq!(config.docs_path(), PathBuf::from("site/docs"));
    }

    #[test]
    fn unknown_report_name_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("site.ron");
        fs::write(&path, r#"(audits: (reports: ["speed"]))"#).unwrap();

        assert!(load_config(Some(&path)).is_err());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(load_config(Some(&dir.path().join("absent.ron"))).is_err());
    }

    #[test]
    fn defaults_cover_the_stock_site_layout() {
        let config = SiteConfig::default();
        let targets = config.audit_targets();
        assert_eq!(targets.len(), 7 + 1 + 3);
        assert_eq!(targets[1].display_path(), "pages/alternate/about_alt.html");
        assert!(config
            .package
            .include
            .contains(&PathBuf::from("scripts/consumer-tools.min.js")));
        assert_eq!(config.crawl_settings().delay, Duration::from_secs(1));
        assert_eq!(
            config.package_config("2025-11-15").release_date,
            "2025-11-15"
        );
    }
}
