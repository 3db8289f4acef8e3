//! Static-site asset tooling: minification, audit reports, console cleanup
//! and release packaging. Every operation works on files below one site root.
mod asset;
pub mod audit;
mod cleanup;
mod error;
mod minify;
mod package;

pub use asset::{AssetKind, SiteFile};
pub use cleanup::{run_cleanup, strip_console_logs, CleanupResult};
pub use error::{AssetError, PackageError};
pub use minify::{
    minified_path, minify_file, reduction_percent, run_minification, CssMinifier, JsMinifier,
    MinificationReport, MinifiedFile, Minifier, MINIFICATION_REPORT_FILENAME,
};
pub use package::{
    build_package, ArchiveOutcome, PackageConfig, PackageContents, PackageInfo, PackageSummary,
};
