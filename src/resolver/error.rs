//! Error types for host resolution.

use thiserror::Error;

/// Errors that can occur while turning a landing URL into a byte source.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    /// The host offered no downloadable asset for this link.
    #[error("{host} has no download available at '{url}': {reason}")]
    HostUnavailable {
        /// Resolver that gave up.
        host: String,
        /// Landing URL being resolved.
        url: String,
        /// What was missing.
        reason: String,
    },

    /// Network-level failure while talking to the host.
    #[error("network error resolving '{url}': {reason}")]
    Network {
        /// URL being requested.
        url: String,
        /// Underlying error text.
        reason: String,
    },

    /// The host answered with an error status.
    #[error("HTTP {status} resolving '{url}'")]
    HttpStatus {
        /// URL being requested.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// Too many redirects during resolution
    #[error(
        "too many redirects ({count}) resolving '{input}'\n  Suggestion: Check for circular redirects between hosts"
    )]
    TooManyRedirects {
        /// The original input being resolved
        input: String,
        /// Number of redirects encountered
        count: usize,
    },

    /// The resolver needed for this host could not be initialized.
    #[error("no resolver available for {host} ('{url}')")]
    Unsupported {
        /// Host table entry with no working resolver.
        host: String,
        /// Landing URL.
        url: String,
    },
}

impl ResolveError {
    /// Creates a `HostUnavailable` error.
    #[must_use]
    pub fn host_unavailable(host: &str, url: &str, reason: &str) -> Self {
        Self::HostUnavailable {
            host: host.to_string(),
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates a `Network` error.
    #[must_use]
    pub fn network(url: &str, source: &reqwest::Error) -> Self {
        Self::Network {
            url: url.to_string(),
            reason: source.to_string(),
        }
    }

    /// Creates an `HttpStatus` error.
    #[must_use]
    pub fn http_status(url: &str, status: u16) -> Self {
        Self::HttpStatus {
            url: url.to_string(),
            status,
        }
    }

    /// Creates a `TooManyRedirects` error.
    #[must_use]
    pub fn too_many_redirects(input: &str, count: usize) -> Self {
        Self::TooManyRedirects {
            input: input.to_string(),
            count,
        }
    }

    /// Creates an `Unsupported` error.
    #[must_use]
    pub fn unsupported(host: &str, url: &str) -> Self {
        Self::Unsupported {
            host: host.to_string(),
            url: url.to_string(),
        }
    }
}
