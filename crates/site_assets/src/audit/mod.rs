//! Static audits of site sources.
//!
//! Every report runs through [`run_audit`]: read each target, hand it to the
//! report's checks, collect `{metrics, issues, status}` per file and write the
//! same data as `<NAME>.json` and `<NAME>.md`. A target that cannot be read
//! becomes a `missing` entry and the pass continues.

mod accessibility;
mod markup;
mod performance;
mod quality;
mod render;
mod responsive;
mod seo;
mod validation;

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use site_engine::AtomicFileWriter;
use site_logging::{site_info, site_warn};

use crate::asset::{AssetKind, SiteFile};
use crate::error::AssetError;

pub use render::render_markdown;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    Accessibility,
    Seo,
    Performance,
    Responsive,
    CodeQuality,
    Validation,
}

impl ReportKind {
    pub const ALL: [ReportKind; 6] = [
        ReportKind::Accessibility,
        ReportKind::Seo,
        ReportKind::Performance,
        ReportKind::Responsive,
        ReportKind::CodeQuality,
        ReportKind::Validation,
    ];

    /// File stem of the JSON and Markdown outputs.
    pub fn output_name(self) -> &'static str {
        match self {
            ReportKind::Accessibility => "ACCESSIBILITY_AUDIT",
            ReportKind::Seo => "SEO_VALIDATION_REPORT",
            ReportKind::Performance => "PERFORMANCE_REPORT",
            ReportKind::Responsive => "RESPONSIVE_TESTING_REPORT",
            ReportKind::CodeQuality => "CODE_QUALITY_REPORT",
            ReportKind::Validation => "PAGE_VALIDATION",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ReportKind::Accessibility => "Accessibility Audit",
            ReportKind::Seo => "SEO Validation Report",
            ReportKind::Performance => "Performance Report",
            ReportKind::Responsive => "Responsive Testing Report",
            ReportKind::CodeQuality => "Code Quality Report",
            ReportKind::Validation => "Page Validation",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReportKind::Accessibility => "accessibility",
            ReportKind::Seo => "seo",
            ReportKind::Performance => "performance",
            ReportKind::Responsive => "responsive",
            ReportKind::CodeQuality => "code-quality",
            ReportKind::Validation => "validation",
        }
    }

    /// Targets of other kinds are left out of the report entirely.
    pub fn applies_to(self, kind: AssetKind) -> bool {
        match self {
            ReportKind::Seo => kind == AssetKind::Html,
            ReportKind::Accessibility | ReportKind::Responsive | ReportKind::Validation => {
                matches!(kind, AssetKind::Html | AssetKind::Css)
            }
            ReportKind::Performance | ReportKind::CodeQuality => true,
        }
    }

    /// Text checks see a lossy decode; sizes are taken from the raw bytes.
    fn check(self, file: &SiteFile, bytes: &[u8], ctx: &AuditContext) -> Findings {
        let content = String::from_utf8_lossy(bytes);
        let content = content.as_ref();
        let size_bytes = bytes.len() as u64;
        match self {
            ReportKind::Accessibility => accessibility::check(file, content),
            ReportKind::Seo => seo::check(content),
            ReportKind::Performance => performance::check(file, size_bytes, ctx),
            ReportKind::Responsive => responsive::check(file, content),
            ReportKind::CodeQuality => quality::check(file, content),
            ReportKind::Validation => validation::check(file, content, size_bytes),
        }
    }

    fn recommendations(self, files: &[FileAudit]) -> Vec<String> {
        match self {
            ReportKind::Performance => performance::recommendations(files),
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        ReportKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| {
                format!(
                    "unknown report '{s}', expected one of: {}",
                    ReportKind::ALL.map(ReportKind::as_str).join(", ")
                )
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Pass,
    Warning,
    Fail,
    Missing,
}

impl FileStatus {
    pub fn label(self) -> &'static str {
        match self {
            FileStatus::Pass => "PASS",
            FileStatus::Warning => "WARNING",
            FileStatus::Fail => "FAIL",
            FileStatus::Missing => "MISSING",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileAudit {
    pub file: String,
    pub kind: AssetKind,
    pub status: FileStatus,
    pub metrics: BTreeMap<String, Value>,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditSummary {
    pub files_reviewed: usize,
    pub files_missing: usize,
    pub total_issues: usize,
    pub overall_status: FileStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub report: ReportKind,
    pub title: String,
    pub generated_at: String,
    pub summary: AuditSummary,
    pub files: Vec<FileAudit>,
    pub recommendations: Vec<String>,
}

/// Site-wide inputs some checks need besides the file under review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditContext {
    pub root: PathBuf,
    /// Stylesheet every page loads, used for page-weight estimates.
    pub page_css: PathBuf,
    /// Script every page loads, used for page-weight estimates.
    pub page_js: PathBuf,
}

impl AuditContext {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            page_css: PathBuf::from("styles/main.min.css"),
            page_js: PathBuf::from("scripts/main.min.js"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuditOutcome {
    pub report: AuditReport,
    pub json_path: PathBuf,
    pub markdown_path: PathBuf,
}

/// Metrics and issues gathered by one report for one file.
#[derive(Debug, Default)]
pub(crate) struct Findings {
    metrics: BTreeMap<String, Value>,
    issues: Vec<String>,
    failed: bool,
}

impl Findings {
    pub(crate) fn metric(&mut self, key: &str, value: impl Into<Value>) {
        self.metrics.insert(key.to_string(), value.into());
    }

    pub(crate) fn issue(&mut self, message: impl Into<String>) {
        self.issues.push(message.into());
    }

    /// An issue that fails the file instead of only warning.
    pub(crate) fn critical(&mut self, message: impl Into<String>) {
        self.failed = true;
        self.issue(message);
    }

    fn status(&self) -> FileStatus {
        if self.failed {
            FileStatus::Fail
        } else if self.issues.is_empty() {
            FileStatus::Pass
        } else {
            FileStatus::Warning
        }
    }
}

/// Review `targets` for one report kind and write `<NAME>.json` and
/// `<NAME>.md` into `docs_dir`, replacing earlier runs.
pub fn run_audit(
    kind: ReportKind,
    targets: &[SiteFile],
    ctx: &AuditContext,
    docs_dir: &Path,
    generated_at: &str,
) -> Result<AuditOutcome, AssetError> {
    site_info!("Running {} over {} targets", kind.title(), targets.len());

    let files: Vec<FileAudit> = targets
        .iter()
        .filter(|target| kind.applies_to(target.kind))
        .map(|target| audit_file(kind, target, ctx))
        .collect();

    let report = AuditReport {
        report: kind,
        title: kind.title().to_string(),
        generated_at: generated_at.to_string(),
        summary: summarize(&files),
        recommendations: kind.recommendations(&files),
        files,
    };

    let writer = AtomicFileWriter::new(docs_dir.to_path_buf());
    let json_path = writer.write_json(&format!("{}.json", kind.output_name()), &report)?;
    let markdown_path =
        writer.write(&format!("{}.md", kind.output_name()), &render_markdown(&report))?;
    site_info!(
        "{}: {} ({} files, {} issues) -> {}",
        kind.title(),
        report.summary.overall_status.label(),
        report.summary.files_reviewed,
        report.summary.total_issues,
        json_path.display()
    );

    Ok(AuditOutcome {
        report,
        json_path,
        markdown_path,
    })
}

fn audit_file(kind: ReportKind, target: &SiteFile, ctx: &AuditContext) -> FileAudit {
    let file = target.display_path();
    let path = ctx.root.join(&target.path);
    match fs::read(&path) {
        Ok(bytes) => {
            let findings = kind.check(target, &bytes, ctx);
            FileAudit {
                file,
                kind: target.kind,
                status: findings.status(),
                metrics: findings.metrics,
                issues: findings.issues,
            }
        }
        Err(err) => {
            site_warn!("Skipping {}: {}", path.display(), err);
            FileAudit {
                file,
                kind: target.kind,
                status: FileStatus::Missing,
                metrics: BTreeMap::new(),
                issues: vec![format!("File not found or unreadable: {err}")],
            }
        }
    }
}

fn summarize(files: &[FileAudit]) -> AuditSummary {
    let files_missing = files
        .iter()
        .filter(|f| f.status == FileStatus::Missing)
        .count();
    let worst = files
        .iter()
        .map(|f| f.status)
        .max()
        .unwrap_or(FileStatus::Pass);
    AuditSummary {
        files_reviewed: files.len() - files_missing,
        files_missing,
        total_issues: files.iter().map(|f| f.issues.len()).sum(),
        overall_status: match worst {
            FileStatus::Missing => FileStatus::Fail,
            other => other,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_kinds_parse_from_cli_names() {
        assert_eq!("seo".parse::<ReportKind>(), Ok(ReportKind::Seo));
        assert_eq!(
            "code_quality".parse::<ReportKind>(),
            Ok(ReportKind::CodeQuality)
        );
        assert_eq!(
            "Accessibility".parse::<ReportKind>(),
            Ok(ReportKind::Accessibility)
        );
        assert!("speed".parse::<ReportKind>().is_err());
    }

    #[test]
    fn findings_status_escalates() {
        let mut findings = Findings::default();
        assert_eq!(findings.status(), FileStatus::Pass);
        findings.issue("minor");
        assert_eq!(findings.status(), FileStatus::Warning);
        findings.critical("major");
        assert_eq!(findings.status(), FileStatus::Fail);
    }

    #[test]
    fn missing_files_fail_the_summary() {
        let entry = |status| FileAudit {
            file: "x".to_string(),
            kind: AssetKind::Html,
            status,
            metrics: BTreeMap::new(),
            issues: vec!["i".to_string()],
        };
        let summary = summarize(&[entry(FileStatus::Warning), entry(FileStatus::Missing)]);
        assert_eq!(summary.files_reviewed, 1);
        assert_eq!(summary.files_missing, 1);
        assert_eq!(summary.total_issues, 2);
        assert_eq!(summary.overall_status, FileStatus::Fail);
        assert_eq!(summarize(&[]).overall_status, FileStatus::Pass);
    }
}
