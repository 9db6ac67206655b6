//! Shared utilities: host normalization, host matching, and URL absolutization.

use regex::Regex;
use url::Url;

/// Compiles a regex at static init; panics on invalid pattern.
pub fn compile_static_regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid static regex '{pattern}': {e}"))
}

/// Normalizes a host string: trim, strip leading "www.", trailing '.', and lowercases.
#[must_use]
pub fn canonical_host(host: &str) -> String {
    host.trim()
        .trim_start_matches("www.")
        .trim_end_matches('.')
        .to_ascii_lowercase()
}

/// Returns the canonical host of `url`, or `None` when it does not parse.
#[must_use]
pub fn host_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(canonical_host))
}

/// Returns true if the hostname of `url` contains `marker`.
///
/// Unparseable URLs never match.
#[must_use]
pub fn host_contains(url: &str, marker: &str) -> bool {
    host_of(url).is_some_and(|host| host.contains(marker))
}

/// Resolves a possibly relative URL string against a base URL.
///
/// Returns the value as-is if it already starts with `http://` or `https://`;
/// normalizes `//...` to `https:...`; otherwise joins with `base_url`.
/// Blank values resolve to `None`.
#[must_use]
pub fn absolutize_url(value: &str, base_url: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if value.starts_with("http://") || value.starts_with("https://") {
        return Some(value.to_string());
    }
    if value.starts_with("//") {
        return Some(format!("https:{value}"));
    }
    Url::parse(base_url)
        .ok()?
        .join(value)
        .ok()
        .map(|url| url.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_host_strips_www_and_case() {
        assert_eq!(canonical_host(" WWW.MediaFire.com. "), "mediafire.com");
    }

    #[test]
    fn test_host_contains_matches_subdomains() {
        assert!(host_contains("https://www106.zippyshare.com/v/abc/file.html", "zippyshare.com"));
        assert!(host_contains("https://x7.comicfiles.ru/a.cbr", "comicfiles.ru"));
        assert!(!host_contains("https://example.com/mega.nz", "mega.nz"));
        assert!(!host_contains("not a url", "mega.nz"));
    }

    #[test]
    fn test_absolutize_url_variants() {
        let base = "https://site.example/comics/page/";
        assert_eq!(
            absolutize_url("https://other.example/a", base).unwrap(),
            "https://other.example/a"
        );
        assert_eq!(
            absolutize_url("//cdn.example/a", base).unwrap(),
            "https://cdn.example/a"
        );
        assert_eq!(
            absolutize_url("/d/file.cbr", base).unwrap(),
            "https://site.example/d/file.cbr"
        );
        assert_eq!(
            absolutize_url("file.cbr", base).unwrap(),
            "https://site.example/comics/page/file.cbr"
        );
        assert!(absolutize_url("  ", base).is_none());
    }
}
