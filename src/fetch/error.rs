//! Error types for page fetching.

use thiserror::Error;

/// Errors that can occur while loading a page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The URL that failed to load.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout fetching {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// HTTP error response (4xx client errors, 5xx server errors).
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The headless browser failed to launch or navigate.
    #[error("browser error loading {url}: {reason}")]
    Browser {
        /// The URL being loaded.
        url: String,
        /// What the browser reported.
        reason: String,
    },

    /// HTTP client construction failed.
    #[error("HTTP client construction failed: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl FetchError {
    /// Creates a network error, mapping reqwest timeouts to [`FetchError::Timeout`].
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            return Self::Timeout { url: url.into() };
        }
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates a browser error.
    pub fn browser(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Browser {
            url: url.into(),
            reason: reason.into(),
        }
    }
}
