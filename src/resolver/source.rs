//! Byte sources handed from resolution to the writer.

use async_trait::async_trait;
use futures_util::StreamExt;
use indicatif::ProgressBar;
use reqwest::Response;
use thiserror::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Errors while moving bytes from a host to disk.
#[derive(Debug, Error)]
pub enum TransferError {
    /// The HTTP body stream broke off.
    #[error("transfer from '{url}' interrupted: {source}")]
    Stream {
        /// Source URL.
        url: String,
        /// Underlying error.
        #[source]
        source: reqwest::Error,
    },

    /// A non-HTTP protocol reported a failure.
    #[error("transfer from '{url}' failed: {reason}")]
    Remote {
        /// Source URL.
        url: String,
        /// Protocol error text.
        reason: String,
    },

    /// Writing to the destination failed.
    #[error("write failed: {0}")]
    Write(#[from] std::io::Error),
}

/// A one-shot stream of file bytes.
///
/// Consumed by value: a source is read at most once.
#[async_trait]
pub trait ByteSource: Send {
    /// Short description for logs.
    fn describe(&self) -> String;

    /// Copies the whole body into `out`, advancing `progress` per chunk.
    ///
    /// Returns the number of bytes written.
    async fn copy_to(
        self: Box<Self>,
        out: &mut (dyn AsyncWrite + Unpin + Send),
        progress: &ProgressBar,
    ) -> Result<u64, TransferError>;
}

/// An HTTP response body whose headers have been read but body has not.
#[derive(Debug)]
pub struct HttpByteSource {
    url: String,
    response: Response,
}

impl HttpByteSource {
    /// Wraps an open response.
    #[must_use]
    pub fn new(response: Response) -> Self {
        Self {
            url: response.url().to_string(),
            response,
        }
    }
}

#[async_trait]
impl ByteSource for HttpByteSource {
    fn describe(&self) -> String {
        format!("http {}", self.url)
    }

    async fn copy_to(
        self: Box<Self>,
        out: &mut (dyn AsyncWrite + Unpin + Send),
        progress: &ProgressBar,
    ) -> Result<u64, TransferError> {
        let url = self.url;
        let mut stream = self.response.bytes_stream();
        let mut written: u64 = 0;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|source| TransferError::Stream {
                url: url.clone(),
                source,
            })?;
            out.write_all(&chunk).await?;
            let len = chunk.len() as u64;
            written += len;
            progress.inc(len);
        }
        out.flush().await?;
        Ok(written)
    }
}
