use anyhow::{Context, Result};
use site_assets::audit::{run_audit, ReportKind};
use site_assets::{build_package, run_cleanup, run_minification, ArchiveOutcome};
use site_engine::{save_content, Crawler, ExportOptions};
use site_logging::{site_error, site_info, site_warn};

use crate::cli::Command;
use crate::config::SiteConfig;

const REPORT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn now() -> String {
    chrono::Local::now().format(REPORT_DATE_FORMAT).to_string()
}

pub fn run(command: Command, config: &SiteConfig) -> Result<()> {
    match command {
        Command::Crawl {
            url,
            max_pages,
            out,
        } => {
            let mut config = config.clone();
            if let Some(url) = url {
                config.crawl.seed_url = url;
            }
            if let Some(max_pages) = max_pages {
                config.crawl.max_pages = max_pages;
            }
            if let Some(out) = out {
                config.crawl.output_dir = out;
            }
            crawl(&config)
        }
        Command::Minify => minify(config),
        Command::Audit { kinds } => {
            let kinds = if kinds.is_empty() {
                config.report_kinds()?
            } else {
                kinds
            };
            audit(config, &kinds);
            Ok(())
        }
        Command::StripConsole => strip_console(config),
        Command::Package => package(config),
    }
}

fn crawl(config: &SiteConfig) -> Result<()> {
    let crawler = Crawler::new(config.fetch_settings(), config.crawl_settings());
    let session = crawler
        .crawl_blocking(&config.crawl.seed_url)
        .with_context(|| format!("crawl of {} failed", config.crawl.seed_url))?;

    let base_url = session.origin().base_url().to_string();
    let pages = session.into_pages();
    let output_dir = config.root.join(&config.crawl.output_dir);
    let export = save_content(&pages, &base_url, &output_dir, ExportOptions::default())
        .with_context(|| format!("failed to save pages to {}", output_dir.display()))?;

    println!("Pages extracted: {}", export.summary.total_pages);
    println!("Output directory: {}", output_dir.display());
    for slug in &export.summary.pages {
        println!("  - {slug}");
    }
    Ok(())
}

fn minify(config: &SiteConfig) -> Result<()> {
    let report = run_minification(
        &config.root,
        &config.minify_targets(),
        &config.docs_path(),
        now(),
    )
    .context("minification failed")?;

    println!(
        "Minified {} files: {} -> {} bytes ({:.1}% reduction)",
        report.files_minified,
        report.total_original_bytes,
        report.total_minified_bytes,
        report.total_reduction_percentage
    );
    Ok(())
}

/// Reports are independent; one that cannot be written does not stop the rest.
fn audit(config: &SiteConfig, kinds: &[ReportKind]) {
    let targets = config.audit_targets();
    let ctx = config.audit_context();
    let docs = config.docs_path();
    let generated_at = now();

    for &kind in kinds {
        match run_audit(kind, &targets, &ctx, &docs, &generated_at) {
            Ok(outcome) => println!(
                "{}: {} ({} issues) -> {}",
                kind.title(),
                outcome.report.summary.overall_status.label(),
                outcome.report.summary.total_issues,
                outcome.markdown_path.display()
            ),
            Err(err) => site_error!("{} failed: {}", kind.title(), err),
        }
    }
}

fn strip_console(config: &SiteConfig) -> Result<()> {
    let results =
        run_cleanup(&config.root, &config.script_targets()).context("console cleanup failed")?;
    let remaining: usize = results.iter().map(|r| r.remaining).sum();
    println!(
        "Cleaned {} scripts, {} console.log references remaining",
        results.len(),
        remaining
    );
    Ok(())
}

fn package(config: &SiteConfig) -> Result<()> {
    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    let summary =
        build_package(&config.package_config(&today)).context("packaging failed")?;

    println!(
        "Package: {} ({} files, {:.1} KB)",
        summary.package_dir.display(),
        summary.info.total_files,
        summary.info.total_size_kb
    );
    if !summary.skipped.is_empty() {
        site_warn!("{} entries were not found and skipped", summary.skipped.len());
    }
    for archive in &summary.archives {
        match archive {
            ArchiveOutcome::Created { path, size_bytes } => {
                println!("Archive: {} ({} bytes)", path.display(), size_bytes)
            }
            ArchiveOutcome::Failed { path, error } => {
                println!("Archive failed: {} ({})", path.display(), error)
            }
        }
    }
    site_info!("Packaging done");
    Ok(())
}
