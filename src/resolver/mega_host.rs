//! MEGA public file links, handled through the `mega` client.

use std::sync::Arc;

use async_trait::async_trait;
use indicatif::ProgressBar;
use tokio::io::AsyncWrite;
use tokio_util::compat::TokioAsyncWriteCompatExt;
use tracing::debug;

use super::{ByteSource, ResolveError, ResolveStep, ResolvedDownload, Resolver, TransferError};

/// Resolves `mega.nz` file links to a decrypted MEGA transfer.
///
/// Folder links are not supported; only a link whose root is a file resolves.
pub struct MegaResolver {
    client: Arc<mega::Client>,
}

impl MegaResolver {
    /// Creates a MEGA client on top of an existing HTTP client.
    ///
    /// # Errors
    ///
    /// Returns the `mega` error if the client cannot be built.
    pub fn new(http: reqwest::Client) -> Result<Self, mega::Error> {
        let client = mega::Client::builder().build(http)?;
        Ok(Self {
            client: Arc::new(client),
        })
    }
}

impl std::fmt::Debug for MegaResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MegaResolver").finish_non_exhaustive()
    }
}

#[async_trait]
impl Resolver for MegaResolver {
    fn name(&self) -> &'static str {
        "mega"
    }

    #[tracing::instrument(skip(self), fields(resolver = "mega"))]
    async fn resolve(&self, url: &str) -> Result<ResolveStep, ResolveError> {
        let nodes = self.client.fetch_public_nodes(url).await.map_err(|e| {
            ResolveError::host_unavailable(self.name(), url, &format!("cannot read link: {e}"))
        })?;

        // `mega::Node` is not `Clone`; pick the root by handle, then take it by value.
        let handle = nodes
            .roots()
            .find(|node| !node.kind().is_folder())
            .map(|node| node.handle().to_string());
        let node = handle
            .and_then(|handle| nodes.into_iter().find(|node| node.handle() == handle))
            .ok_or_else(|| {
                ResolveError::host_unavailable(self.name(), url, "link is not a single file")
            })?;
        debug!(name = node.name(), size = node.size(), "MEGA node found");

        Ok(ResolveStep::Download(ResolvedDownload {
            file_name: node.name().to_string(),
            expected_size: Some(node.size()),
            source: Box::new(MegaByteSource {
                client: Arc::clone(&self.client),
                node,
                url: url.to_string(),
            }),
        }))
    }
}

struct MegaByteSource {
    client: Arc<mega::Client>,
    node: mega::Node,
    url: String,
}

#[async_trait]
impl ByteSource for MegaByteSource {
    fn describe(&self) -> String {
        format!("mega {}", self.node.name())
    }

    async fn copy_to(
        self: Box<Self>,
        out: &mut (dyn AsyncWrite + Unpin + Send),
        progress: &ProgressBar,
    ) -> Result<u64, TransferError> {
        // The client decrypts as it writes; progress is reported once at the end.
        let writer = (&mut *out).compat_write();
        self.client
            .download_node(&self.node, writer)
            .await
            .map_err(|e| TransferError::Remote {
                url: self.url.clone(),
                reason: e.to_string(),
            })?;
        progress.inc(self.node.size());
        Ok(self.node.size())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_mega_resolver_builds_over_plain_client() {
        let resolver = MegaResolver::new(reqwest::Client::new()).unwrap();
        assert_eq!(resolver.name(), "mega");
        assert!(format!("{resolver:?}").contains("MegaResolver"));
    }
}
