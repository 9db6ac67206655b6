//! Error types for archive post-processing.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from extracting or converting a downloaded archive.
///
/// Post-processing is best-effort: callers log these and keep the original
/// download.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The zip container could not be read or written.
    #[error("zip error on {path}: {source}")]
    Zip {
        /// Archive path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: zip::result::ZipError,
    },

    /// The RAR container could not be extracted.
    #[error("cannot extract RAR archive {path}: {reason}")]
    Rar {
        /// Archive path.
        path: PathBuf,
        /// Underlying error text.
        reason: String,
    },

    /// File system error during post-processing.
    #[error("IO error at {path}: {source}")]
    Io {
        /// Path being read, written, or removed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The blocking post-processing task did not complete.
    #[error("post-processing of {path} was interrupted: {reason}")]
    Interrupted {
        /// The downloaded file.
        path: PathBuf,
        /// Join error text.
        reason: String,
    },
}

impl ArchiveError {
    /// Creates a zip error.
    pub fn zip(path: impl Into<PathBuf>, source: zip::result::ZipError) -> Self {
        Self::Zip {
            path: path.into(),
            source,
        }
    }

    /// Creates a RAR error.
    pub fn rar(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        Self::Rar {
            path: path.into(),
            reason: reason.to_string(),
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
