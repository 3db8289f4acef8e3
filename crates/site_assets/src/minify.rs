use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use site_engine::AtomicFileWriter;
use site_logging::{site_error, site_info, site_warn};

use crate::asset::{AssetKind, SiteFile};
use crate::error::AssetError;

pub const MINIFICATION_REPORT_FILENAME: &str = "MINIFICATION_REPORT.json";

static BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("block comment pattern"));
static LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)//.*$").expect("line comment pattern"));
static CSS_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*([{}:;,>+~])\s*").expect("css punctuation pattern"));
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

/// Text-level minifier. Implementations are blind to string literals, so a
/// `/*` or `//` inside a quoted string is treated as a comment.
pub trait Minifier {
    fn minify(&self, src: &str) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CssMinifier;

impl Minifier for CssMinifier {
    fn minify(&self, src: &str) -> String {
        let text = BLOCK_COMMENT.replace_all(src, "");
        let text = CSS_PUNCTUATION.replace_all(&text, "$1");
        let text = WHITESPACE_RUN.replace_all(&text, " ");
        text.replace(";}", "}").trim().to_string()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct JsMinifier;

impl Minifier for JsMinifier {
    fn minify(&self, src: &str) -> String {
        let text = LINE_COMMENT.replace_all(src, "");
        let text = BLOCK_COMMENT.replace_all(&text, "");
        let joined = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        WHITESPACE_RUN.replace_all(&joined, " ").trim().to_string()
    }
}

/// Percentage of bytes saved; 0 for an empty original.
pub fn reduction_percent(original: u64, minified: u64) -> f64 {
    if original == 0 {
        return 0.0;
    }
    (original as f64 - minified as f64) / original as f64 * 100.0
}

/// `styles/main.css` -> `styles/main.min.css`.
pub fn minified_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}.min.{}", ext.to_string_lossy()),
        None => format!("{stem}.min"),
    };
    path.with_file_name(name)
}

/// One row of the minification report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinifiedFile {
    pub filename: String,
    #[serde(rename = "type")]
    pub kind: AssetKind,
    pub original_size: u64,
    pub minified_size: u64,
    pub reduction_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinificationReport {
    pub minification_date: String,
    pub files_minified: usize,
    pub total_original_bytes: u64,
    pub total_minified_bytes: u64,
    pub total_reduction_percentage: f64,
    pub files: Vec<MinifiedFile>,
}

/// Minify `source` into its `.min` sibling. HTML is copied through unchanged.
///
/// Sizes come from the text just read and the text just written, so the
/// report never re-reads either file.
pub fn minify_file(source: &Path, kind: AssetKind) -> Result<MinifiedFile, AssetError> {
    let content = fs::read_to_string(source).map_err(|source_err| AssetError::Read {
        path: source.to_path_buf(),
        source: source_err,
    })?;
    let minified = match kind {
        AssetKind::Css => CssMinifier.minify(&content),
        AssetKind::Js => JsMinifier.minify(&content),
        AssetKind::Html => content.clone(),
    };

    let target = minified_path(source);
    let dir = target
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let filename = target
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    AtomicFileWriter::new(dir).write(&filename, &minified)?;

    let original_size = content.len() as u64;
    let minified_size = minified.len() as u64;
    Ok(MinifiedFile {
        filename: source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
        kind,
        original_size,
        minified_size,
        reduction_percentage: reduction_percent(original_size, minified_size),
    })
}

/// Minify every existing target and write `MINIFICATION_REPORT.json` into
/// `docs_dir`. Missing or unreadable sources are logged and left out of the
/// report; only the report write itself can fail the pass.
pub fn run_minification(
    root: &Path,
    targets: &[SiteFile],
    docs_dir: &Path,
    minification_date: impl Into<String>,
) -> Result<MinificationReport, AssetError> {
    let mut files = Vec::new();
    for target in targets {
        let source = root.join(&target.path);
        if !source.is_file() {
            site_warn!("File not found: {}", source.display());
            continue;
        }
        let entry = match minify_file(&source, target.kind) {
            Ok(entry) => entry,
            Err(err) => {
                site_error!("Skipping {}: {}", target.display_path(), err);
                continue;
            }
        };
        site_info!(
            "Minified {}: {} -> {} bytes ({:.1}%)",
            target.display_path(),
            entry.original_size,
            entry.minified_size,
            entry.reduction_percentage
        );
        files.push(entry);
    }

    let total_original_bytes = files.iter().map(|f| f.original_size).sum();
    let total_minified_bytes = files.iter().map(|f| f.minified_size).sum();
    let report = MinificationReport {
        minification_date: minification_date.into(),
        files_minified: files.len(),
        total_original_bytes,
        total_minified_bytes,
        total_reduction_percentage: reduction_percent(total_original_bytes, total_minified_bytes),
        files,
    };

    let path = AtomicFileWriter::new(docs_dir.to_path_buf())
        .write_json(MINIFICATION_REPORT_FILENAME, &report)?;
    site_info!(
        "Minification report saved: {} ({:.1}% total reduction)",
        path.display(),
        report.total_reduction_percentage
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_comments_and_trailing_semicolons_go() {
        assert_eq!(
            CssMinifier.minify(".a { color: red; /* note */ }"),
            ".a{color:red}"
        );
    }

    #[test]
    fn css_selectors_keep_single_spaces() {
        let src = "/* header */\nnav   ul li ,\n  .b > .c {\n  margin : 0 auto ;\n}\n";
        assert_eq!(CssMinifier.minify(src), "nav ul li,.b>.c{margin:0 auto}");
    }

    #[test]
    fn js_comments_and_blank_lines_go() {
        let src = "// setup\nconst a = 1;   // trailing\n\n/* block\n comment */\nfunction f() {\n    return a;\n}\n";
        assert_eq!(
            JsMinifier.minify(src),
            "const a = 1; function f() { return a; }"
        );
    }

    #[test]
    fn minifying_twice_changes_nothing() {
        let css = CssMinifier.minify("body {\n  color: #333;\n}\n@media (max-width: 600px) { body { font-size: 14px; } }");
        assert_eq!(CssMinifier.minify(&css), css);
        let js = JsMinifier.minify("let x = 1;\n\n// c\nx += 2;\n");
        assert_eq!(JsMinifier.minify(&js), js);
    }

    #[test]
    fn reduction_of_empty_input_is_zero() {
        assert_eq!(reduction_percent(0, 0), 0.0);
        assert_eq!(reduction_percent(200, 150), 25.0);
    }

    #[test]
    fn min_is_inserted_before_extension() {
        assert_eq!(
            minified_path(Path::new("styles/main.css")),
            PathBuf::from("styles/main.min.css")
        );
        assert_eq!(
            minified_path(Path::new("scripts/consumer-tools.js")),
            PathBuf::from("scripts/consumer-tools.min.js")
        );
        assert_eq!(minified_path(Path::new("LICENSE")), PathBuf::from("LICENSE.min"));
    }
}
