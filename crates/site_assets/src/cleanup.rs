use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use site_engine::AtomicFileWriter;
use site_logging::{site_info, site_warn};

use crate::asset::SiteFile;
use crate::error::AssetError;

/// Arguments with at most one level of nested parentheses, e.g. `fmt(a), b`.
const ARGS: &str = r"(?:[^()]|\([^()]*\))*";

static CATCH_LOG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\.catch\(\s*(\w+)\s*=>\s*console\.log\({ARGS}\)\s*\)"
    ))
    .expect("catch pattern")
});
static LOG_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?m)^[ \t]*console\.log\({ARGS}\);?[ \t]*\r?\n"))
        .expect("log line pattern")
});
static LOG_INLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"[ \t]*console\.log\({ARGS}\);?")).expect("inline log pattern")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanupResult {
    pub file: String,
    pub original_lines: usize,
    pub new_lines: usize,
    /// `console.log` references left over, such as `const log = console.log;`.
    pub remaining: usize,
}

/// Drop `console.log(...)` statements and turn `.catch(e => console.log(...))`
/// into `.catch(e => {})`.
pub fn strip_console_logs(src: &str) -> String {
    let text = CATCH_LOG.replace_all(src, ".catch($1 => {})");
    let text = LOG_LINE.replace_all(&text, "");
    LOG_INLINE.replace_all(&text, "").into_owned()
}

fn line_count(text: &str) -> usize {
    text.split('\n').count()
}

/// Rewrite each existing script in place. Missing files are logged and skipped.
pub fn run_cleanup(root: &Path, scripts: &[SiteFile]) -> Result<Vec<CleanupResult>, AssetError> {
    let mut results = Vec::new();
    for script in scripts {
        let path = root.join(&script.path);
        if !path.is_file() {
            site_warn!("File not found: {}", path.display());
            continue;
        }
        let content = fs::read_to_string(&path).map_err(|source| AssetError::Read {
            path: path.clone(),
            source,
        })?;
        let cleaned = strip_console_logs(&content);

        let dir = path.parent().unwrap_or(root).to_path_buf();
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        AtomicFileWriter::new(dir).write(&filename, &cleaned)?;

        let result = CleanupResult {
            file: script.display_path(),
            original_lines: line_count(&content),
            new_lines: line_count(&cleaned),
            remaining: cleaned.matches("console.log").count(),
        };
        site_info!(
            "{}: {} -> {} lines ({} removed)",
            result.file,
            result.original_lines,
            result.new_lines,
            result.original_lines.saturating_sub(result.new_lines)
        );
        if result.remaining > 0 {
            site_warn!(
                "{}: {} console.log statements remaining",
                result.file,
                result.remaining
            );
        }
        results.push(result);
    }
    Ok(results)
}
