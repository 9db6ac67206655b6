//! Shared User-Agent strings for page, resolver, and download HTTP clients.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/fierce/get-comics";

/// Browser-like User-Agent for hosts that refuse non-browser clients.
pub(crate) const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Default User-Agent for all tool traffic (identifies the tool).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("get-comics/{version} (+{PROJECT_UA_URL})")
}
