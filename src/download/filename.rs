//! Filename extraction and sanitization for downloads.
//!
//! Names come from a `Content-Disposition: attachment` header when the host
//! sends one, otherwise from the last URL path segment. Either way the result
//! is sanitized to a single safe path component before touching disk.

use std::path::{Component, Path};
use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::resolver::utils::compile_static_regex;

static FILENAME_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r#"filename[^;=\n]*=\s*("[^"]*"|'[^']*'|[^;\n]*)"#));

/// Parses a Content-Disposition header to extract the filename.
///
/// Only `attachment` dispositions carry a name. Handles:
/// - `attachment; filename="issue 01.cbr"`
/// - `attachment; filename=issue.cbr`
/// - `attachment; filename*=UTF-8''issue%2001.cbr`
pub(crate) fn parse_content_disposition(header: &str) -> Option<String> {
    if !header
        .trim_start()
        .to_ascii_lowercase()
        .starts_with("attachment")
    {
        return None;
    }

    let captures = FILENAME_TOKEN.captures(header)?;
    let raw = captures.get(1)?.as_str().trim();
    let unquoted = raw.trim_matches(|c| c == '"' || c == '\'');
    let decoded = urlencoding::decode(unquoted)
        .map_or_else(|_| unquoted.to_string(), std::borrow::Cow::into_owned);
    let without_charset = strip_charset_prefix(&decoded);
    let name = without_charset.trim();
    (!name.is_empty()).then(|| name.to_string())
}

// `filename*=UTF-8''name` leaves `UTF-8''name` behind after decoding.
fn strip_charset_prefix(value: &str) -> &str {
    let lower = value.to_ascii_lowercase();
    if lower.starts_with("utf-8") {
        value["utf-8".len()..].trim_start_matches('\'')
    } else {
        value
    }
}

/// Filename from the last path segment of `url`, percent-decoded.
pub(crate) fn filename_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let last = parsed.path_segments()?.rfind(|segment| !segment.is_empty())?;
    let decoded = urlencoding::decode(last)
        .map_or_else(|_| last.to_string(), std::borrow::Cow::into_owned);
    let trimmed = decoded.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Sanitizes filename for filesystem safety.
///
/// Replaces characters that are invalid on common filesystems:
/// / \ : * ? " < > |
pub(crate) fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.is_empty() {
        return "_".to_string();
    }

    if is_safe_filename_segment(&sanitized) {
        sanitized
    } else {
        sanitized
            .chars()
            .map(|c| if c == '.' { '_' } else { c })
            .collect()
    }
}

fn is_safe_filename_segment(name: &str) -> bool {
    !Path::new(name).components().any(|component| {
        matches!(
            component,
            Component::CurDir | Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    })
}

/// True if the content type names an HTML document.
pub(crate) fn is_html_content_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .eq_ignore_ascii_case("text/html")
}
