use std::fs;
use std::path::Path;

use serde_json::Value;

use super::{AuditContext, FileAudit, Findings};
use crate::asset::{AssetKind, SiteFile};

/// Throughput assumed for a 3G connection (500 Kbps).
const KBPS_3G: f64 = 62.5;
/// Throughput assumed for a 4G connection (20 Mbps).
const KBPS_4G: f64 = 2500.0;
const LCP_TARGET_SECS: f64 = 2.5;
const CSS_BUDGET_BYTES: u64 = 100_000;
const JS_BUDGET_BYTES: u64 = 200_000;

fn kb(bytes: u64) -> f64 {
    (bytes as f64 / 1024.0 * 10.0).round() / 10.0
}

fn size_on_disk(root: &Path, relative: &Path) -> u64 {
    fs::metadata(root.join(relative))
        .map(|meta| meta.len())
        .unwrap_or(0)
}

pub(super) fn check(file: &SiteFile, size: u64, ctx: &AuditContext) -> Findings {
    let mut findings = Findings::default();
    let name = file.display_path();

    findings.metric("size_bytes", size);
    findings.metric("size_kb", kb(size));
    findings.metric("minified", name.contains(".min."));

    if file.kind == AssetKind::Html {
        let page_size =
            size + size_on_disk(&ctx.root, &ctx.page_css) + size_on_disk(&ctx.root, &ctx.page_js);
        let page_kb = page_size as f64 / 1024.0;
        let load_3g = page_kb / KBPS_3G;
        let load_4g = page_kb / KBPS_4G;
        let lcp_pass = load_4g < LCP_TARGET_SECS;

        findings.metric("total_page_kb", kb(page_size));
        findings.metric("estimated_load_3g", format!("{load_3g:.2}s"));
        findings.metric("estimated_load_4g", format!("{load_4g:.3}s"));
        findings.metric(
            "estimated_lcp_status",
            if lcp_pass { "pass" } else { "warning" },
        );
        if !lcp_pass {
            findings.issue(format!(
                "Estimated 4G load of {load_4g:.2}s misses the {LCP_TARGET_SECS}s LCP target"
            ));
        }
    }

    findings
}

fn total_bytes(files: &[FileAudit], kind: AssetKind) -> u64 {
    files
        .iter()
        .filter(|f| f.kind == kind)
        .filter_map(|f| f.metrics.get("size_bytes")?.as_u64())
        .sum()
}

pub(super) fn recommendations(files: &[FileAudit]) -> Vec<String> {
    let mut recommendations = Vec::new();

    let css = total_bytes(files, AssetKind::Css);
    if css > CSS_BUDGET_BYTES {
        recommendations.push(format!(
            "CSS files total {:.1}KB: consider inlining critical CSS for above-the-fold content",
            css as f64 / 1024.0
        ));
    }

    let js = total_bytes(files, AssetKind::Js);
    if js > JS_BUDGET_BYTES {
        recommendations.push(format!(
            "JavaScript files total {:.1}KB: consider code splitting and async loading",
            js as f64 / 1024.0
        ));
    }

    let unminified = files.iter().any(|f| {
        f.kind != AssetKind::Html && f.metrics.get("minified") == Some(&Value::Bool(false))
    });
    if unminified {
        recommendations
            .push("Reference the .min.css and .min.js builds from production pages".to_string());
    }
    recommendations.push("Serve text assets with gzip or brotli compression".to_string());

    recommendations
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::audit::FileStatus;

    fn entry(kind: AssetKind, size: u64, minified: bool) -> FileAudit {
        let mut metrics = BTreeMap::new();
        metrics.insert("size_bytes".to_string(), size.into());
        metrics.insert("minified".to_string(), minified.into());
        FileAudit {
            file: "f".to_string(),
            kind,
            status: FileStatus::Pass,
            metrics,
            issues: Vec::new(),
        }
    }

    #[test]
    fn budgets_trigger_recommendations() {
        let small = recommendations(&[
            entry(AssetKind::Css, 10, true),
            entry(AssetKind::Js, 10, true),
        ]);
        assert_eq!(small.len(), 1);

        let large = recommendations(&[
            entry(AssetKind::Css, 60_000, false),
            entry(AssetKind::Css, 50_000, true),
            entry(AssetKind::Js, 200_001, true),
        ]);
        assert_eq!(large.len(), 4);
        assert!(large[0].starts_with("CSS files total"));
        assert!(large[1].starts_with("JavaScript files total"));
    }

    #[test]
    fn kilobytes_round_to_one_decimal() {
        assert_eq!(kb(1536), 1.5);
        assert_eq!(kb(0), 0.0);
    }
}
