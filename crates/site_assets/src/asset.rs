use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of a site source file; drives which minifier and checks apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Html,
    Css,
    Js,
}

impl AssetKind {
    /// Guess from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        ext.parse().ok()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AssetKind::Html => "html",
            AssetKind::Css => "css",
            AssetKind::Js => "js",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "html" | "htm" => Ok(AssetKind::Html),
            "css" => Ok(AssetKind::Css),
            "js" | "mjs" => Ok(AssetKind::Js),
            other => Err(format!("unknown asset kind: {other}")),
        }
    }
}

/// A file of the site, relative to the site root, with its kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteFile {
    pub path: PathBuf,
    pub kind: AssetKind,
}

impl SiteFile {
    pub fn new(path: impl Into<PathBuf>, kind: AssetKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Kind inferred from the extension; `None` for anything but html/css/js.
    pub fn infer(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let kind = AssetKind::from_path(&path)?;
        Some(Self { path, kind })
    }

    /// Path as written in reports, always with `/` separators.
    pub fn display_path(&self) -> String {
        self.path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_is_inferred_from_extension() {
        assert_eq!(
            SiteFile::infer("styles/main.min.css").map(|f| f.kind),
            Some(AssetKind::Css)
        );
        assert_eq!(SiteFile::infer("index.HTML").map(|f| f.kind), Some(AssetKind::Html));
        assert_eq!(SiteFile::infer("README.md"), None);
        assert_eq!(SiteFile::infer("Makefile"), None);
    }

    #[test]
    fn display_path_uses_forward_slashes() {
        let file = SiteFile::new(Path::new("pages").join("alternate").join("a.html"), AssetKind::Html);
        assert_eq!(file.display_path(), "pages/alternate/a.html");
    }
}
