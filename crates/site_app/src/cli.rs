use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::LevelFilter;
use site_assets::audit::ReportKind;
use site_logging::{LogDestination, DEFAULT_LOG_FILE};

#[derive(Debug, Parser)]
#[command(name = "sitekit", version, about = "Crawl, minify, audit and package a static website")]
pub struct Cli {
    /// RON config file; defaults to ./sitekit.ron when present.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Also write the log to ./sitekit.log.
    #[arg(long, global = true)]
    pub log_file: bool,

    /// Write the log to ./sitekit.log only, keeping the terminal quiet.
    #[arg(long, global = true, conflicts_with = "log_file")]
    pub log_only: bool,

    /// Log debug output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn log_destination(&self) -> LogDestination {
        let path = PathBuf::from(DEFAULT_LOG_FILE);
        if self.log_only {
            LogDestination::File(path)
        } else if self.log_file {
            LogDestination::Both(path)
        } else {
            LogDestination::Terminal
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Crawl the site breadth-first and save one JSON record per page.
    Crawl {
        /// Seed URL; overrides `crawl.seed_url`.
        #[arg(long)]
        url: Option<String>,
        /// Page budget; overrides `crawl.max_pages`.
        #[arg(long)]
        max_pages: Option<usize>,
        /// Output directory; overrides `crawl.output_dir`.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Write `.min` copies of the stylesheets and scripts.
    Minify,
    /// Run audit reports (all configured reports when none are named).
    Audit {
        #[arg(value_name = "KIND")]
        kinds: Vec<ReportKind>,
    },
    /// Remove console.log calls from the scripts in place.
    StripConsole,
    /// Build the production package and its archives.
    Package,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn audit_kinds_parse_from_names() {
        let cli = Cli::try_parse_from(["sitekit", "audit", "seo", "code_quality"]).unwrap();
        match cli.command {
            Command::Audit { kinds } => {
                assert_eq!(kinds, vec![ReportKind::Seo, ReportKind::CodeQuality])
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn unknown_audit_kind_is_rejected() {
        assert!(Cli::try_parse_from(["sitekit", "audit", "speed"]).is_err());
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from([
            "sitekit",
            "crawl",
            "--max-pages",
            "3",
            "--config",
            "alt.ron",
            "--log-file",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("alt.ron")));
        assert!(cli.log_file);
        assert_eq!(
            cli.log_destination(),
            LogDestination::Both(PathBuf::from(DEFAULT_LOG_FILE))
        );
        assert_eq!(cli.log_level(), LevelFilter::Info);
        match cli.command {
            Command::Crawl { url, max_pages, out } => {
                assert_eq!(url, None);
                assert_eq!(max_pages, Some(3));
                assert_eq!(out, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn log_destination_follows_flags() {
        let quiet = Cli::try_parse_from(["sitekit", "minify", "--log-only"]).unwrap();
        assert_eq!(
            quiet.log_destination(),
            LogDestination::File(PathBuf::from(DEFAULT_LOG_FILE))
        );

        let plain = Cli::try_parse_from(["sitekit", "minify"]).unwrap();
        assert_eq!(plain.log_destination(), LogDestination::Terminal);

        assert!(Cli::try_parse_from(["sitekit", "minify", "--log-only", "--log-file"]).is_err());
    }
}
