//! Error types for discovery.

use thiserror::Error;

use crate::fetch::FetchError;

/// Errors that abort discovery.
///
/// Anything else encountered while walking (a later listing page or a
/// roundup failing to load) is logged and ends or skips that branch.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// The explicit URL is malformed, unreachable, or outside the target site.
    #[error("invalid URL '{url}': {reason}\n  Suggestion: {suggestion}")]
    Validation {
        /// The URL as supplied by the operator.
        url: String,
        /// Why it was rejected.
        reason: String,
        /// How to fix the issue.
        suggestion: String,
    },

    /// The starting listing page could not be loaded at all.
    #[error("cannot load starting listing page {url}: {source}")]
    StartPage {
        /// The first listing URL.
        url: String,
        /// The underlying fetch failure.
        #[source]
        source: FetchError,
    },
}

impl CrawlError {
    /// Creates a `Validation` error for a malformed URL.
    #[must_use]
    pub fn malformed(url: &str) -> Self {
        Self::Validation {
            url: url.to_string(),
            reason: "not a valid absolute URL".to_string(),
            suggestion: "Pass a full content page URL such as https://site/category/title/"
                .to_string(),
        }
    }

    /// Creates a `Validation` error for an unreachable URL.
    #[must_use]
    pub fn unreachable(url: &str, detail: &str) -> Self {
        Self::Validation {
            url: url.to_string(),
            reason: format!("page is not reachable ({detail})"),
            suggestion: "Check the URL in a browser and try again".to_string(),
        }
    }

    /// Creates a `Validation` error for a URL on another site.
    #[must_use]
    pub fn foreign_origin(url: &str, base_url: &str) -> Self {
        Self::Validation {
            url: url.to_string(),
            reason: format!("resolves outside {base_url}"),
            suggestion: format!("Only content pages under {base_url} can be downloaded"),
        }
    }

    /// Creates a `StartPage` error.
    #[must_use]
    pub fn start_page(url: &str, source: FetchError) -> Self {
        Self::StartPage {
            url: url.to_string(),
            source,
        }
    }
}
