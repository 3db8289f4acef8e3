use url::Url;

/// Lower-cased suffixes that are never fetched as pages.
pub const SKIPPED_EXTENSIONS: &[&str] = &[".pdf", ".jpg", ".png", ".gif", ".css", ".js"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OriginError {
    #[error("invalid seed url {0}")]
    InvalidSeed(String),
    #[error("seed url {0} has no host")]
    MissingHost(String),
}

/// The site a crawl is confined to.
///
/// Two URLs belong to the same site when their network location
/// (`host[:port]`) is equal. The scheme is ignored, so `http://x` and
/// `https://x` are one site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    base_url: String,
    netloc: String,
}

impl Origin {
    pub fn parse(seed: &str) -> Result<Self, OriginError> {
        let parsed =
            Url::parse(seed.trim()).map_err(|_| OriginError::InvalidSeed(seed.to_string()))?;
        let netloc = netloc(&parsed).ok_or_else(|| OriginError::MissingHost(seed.to_string()))?;
        Ok(Self {
            base_url: seed.trim().to_string(),
            netloc,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn netloc(&self) -> &str {
        &self.netloc
    }

    /// Relative references have no network location and count as same-site.
    /// Absolute URLs must be http(s) with a matching `host[:port]`.
    pub fn is_same_domain(&self, url: &str) -> bool {
        match Url::parse(url.trim()) {
            Ok(parsed) => {
                matches!(parsed.scheme(), "http" | "https")
                    && netloc(&parsed).as_deref() == Some(self.netloc.as_str())
            }
            Err(url::ParseError::RelativeUrlWithoutBase) => true,
            Err(_) => false,
        }
    }
}

fn netloc(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

pub fn is_non_html_resource(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    SKIPPED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Canonical frontier key: the parsed URL without its fragment, so
/// `http://x`, `http://x/` and `http://x/#top` are one entry. Strings that do
/// not parse only lose their fragment.
pub fn normalize_url_for_dedupe(url: &str) -> String {
    let trimmed = url.trim();
    match Url::parse(trimmed) {
        Ok(mut parsed) => {
            parsed.set_fragment(None);
            parsed.into()
        }
        Err(_) => match trimmed.split_once('#') {
            Some((head, _)) => head.to_string(),
            None => trimmed.to_string(),
        },
    }
}
