use url::Url;

/// Slug used for the site root (empty path).
pub const HOMEPAGE_SLUG: &str = "homepage";

/// Filesystem-safe, deterministic name for a crawled URL, derived from its path:
/// leading/trailing `/` stripped, `/` turned into `_`, empty paths become
/// [`HOMEPAGE_SLUG`].
///
/// Query strings and fragments are ignored, so distinct URLs can share a slug.
pub fn slug_for_url(url: &str) -> String {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };
    slug_for_path(&path)
}

fn slug_for_path(path: &str) -> String {
    let stripped = path.trim_matches('/');
    if stripped.is_empty() {
        return HOMEPAGE_SLUG.to_string();
    }
    let mut slug: String = stripped
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    if is_reserved_windows_name(&slug) {
        slug.push('_');
    }
    slug
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}
