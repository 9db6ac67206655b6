//! Error types for the download module.
//!
//! None of these abort a run: the orchestrator logs them per host and moves
//! on to the next host or record.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::HostKind;
use crate::resolver::{ResolveError, TransferError};

/// Errors that can occur while downloading one host link.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The host could not be resolved to a transfer.
    #[error("{host} link {url} could not be resolved: {source}")]
    Resolve {
        /// Host key the link was filed under.
        host: HostKind,
        /// The link.
        url: String,
        /// The underlying resolver error.
        #[source]
        source: ResolveError,
    },

    /// The transfer broke off; the partial file has been removed.
    #[error("transfer into {path} failed: {source}")]
    Transfer {
        /// The destination that was being written.
        path: PathBuf,
        /// The underlying transfer error.
        #[source]
        source: TransferError,
    },

    /// File system error before or after the transfer.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl DownloadError {
    /// Creates a resolve error.
    pub fn resolve(host: HostKind, url: impl Into<String>, source: ResolveError) -> Self {
        Self::Resolve {
            host,
            url: url.into(),
            source,
        }
    }

    /// Creates a transfer error.
    pub fn transfer(path: impl Into<PathBuf>, source: TransferError) -> Self {
        Self::Transfer {
            path: path.into(),
            source,
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_resolve_error_names_host_and_url() {
        let err = DownloadError::resolve(
            HostKind::Mediafire,
            "https://www.mediafire.com/file/x",
            ResolveError::host_unavailable("mediafire", "https://www.mediafire.com/file/x", "gone"),
        );
        let msg = err.to_string();
        assert!(msg.contains("mediafire"));
        assert!(msg.contains("https://www.mediafire.com/file/x"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_transfer_error_names_path() {
        let err = DownloadError::transfer(
            "/tmp/out/issue.cbr",
            TransferError::Remote {
                url: "https://mega.nz/file/x".to_string(),
                reason: "bad MAC".to_string(),
            },
        );
        assert!(err.to_string().contains("/tmp/out/issue.cbr"));
    }

    #[test]
    fn test_io_error_display() {
        let err = DownloadError::io(
            "/readonly/file.cbz",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/readonly/file.cbz"));
        assert!(err.to_string().contains("denied"));
    }
}
