//! Single-URL mode validation.

use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

use crate::resolver::utils::canonical_host;

use super::CrawlError;

/// Prefixes `https://` when `raw` carries no scheme.
#[must_use]
pub fn ensure_scheme(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

/// True when both URLs share scheme, host (ignoring a `www.` prefix), and port.
#[must_use]
pub fn same_site(candidate: &Url, base: &Url) -> bool {
    candidate.scheme() == base.scheme()
        && candidate.host_str().map(canonical_host) == base.host_str().map(canonical_host)
        && candidate.port_or_known_default() == base.port_or_known_default()
}

/// Validates an explicit content-page URL and returns its resolved form.
///
/// The URL must parse, answer a HEAD request (redirects followed) with a
/// status other than 404, and resolve to the target site.
///
/// # Errors
///
/// Returns [`CrawlError::Validation`] for any of the above failures.
#[instrument(skip(client))]
pub async fn validate_single_url(
    raw: &str,
    base_url: &str,
    client: &Client,
) -> Result<String, CrawlError> {
    let candidate = ensure_scheme(raw);
    let parsed = Url::parse(&candidate).map_err(|_| CrawlError::malformed(raw))?;
    let base = Url::parse(base_url).map_err(|_| CrawlError::malformed(base_url))?;

    let response = client
        .head(parsed.as_str())
        .send()
        .await
        .map_err(|e| CrawlError::unreachable(raw, &e.to_string()))?;
    if response.status().as_u16() == 404 {
        return Err(CrawlError::unreachable(raw, "HTTP 404"));
    }

    let resolved = response.url().clone();
    debug!(resolved = %resolved, "explicit URL reachable");
    if !same_site(&resolved, &base) {
        return Err(CrawlError::foreign_origin(raw, base_url));
    }
    Ok(resolved.to_string())
}
