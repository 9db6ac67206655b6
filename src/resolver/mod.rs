//! Host resolution: turning a host link into a byte stream.
//!
//! Every link a [`ComicLink`](crate::model::ComicLink) carries points at a
//! landing page on some file host. Resolution walks from that landing URL to
//! an open transfer, picking the resolver by hostname from one ordered table.
//!
//! # Architecture
//!
//! - [`Resolver`] - Async trait that individual host resolvers implement
//! - [`ResolverKind`] - The closed set of resolution strategies
//! - [`ResolverRegistry`] - Host table lookup plus the redirect loop
//! - [`ResolveStep`] - Result of a single resolver attempt
//! - [`ResolvedDownload`] - A named, sized, not-yet-consumed byte source
//! - [`HostSource`] - What the download stage depends on
//!
//! # Example
//!
//! ```no_run
//! use get_comics_core::fetch::HttpClients;
//! use get_comics_core::options::NetworkSettings;
//! use get_comics_core::resolver::build_default_resolver_registry;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let clients = HttpClients::new(&NetworkSettings::default())?;
//! let registry = build_default_resolver_registry(&clients, &NetworkSettings::default());
//! let download = registry.resolve("https://www.mediafire.com/file/abc/issue.cbr/file").await?;
//! println!("would save {}", download.file_name);
//! # Ok(())
//! # }
//! ```

mod button;
mod direct;
mod error;
mod form_post;
mod mega_host;
mod redirect_hop;
mod registry;
pub(crate) mod source;
pub mod utils;

pub use button::ButtonResolver;
pub use direct::{DirectResolver, open_direct};
pub use error::ResolveError;
pub use form_post::{FormPostResolver, USERSCLOUD_ENDPOINT};
pub use mega_host::MegaResolver;
pub use redirect_hop::RedirectHopResolver;
pub use registry::{HOST_TABLE, ResolverKind, ResolverRegistry, classify_host};
pub use source::{ByteSource, HttpByteSource, TransferError};

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::fetch::{BrowserPageFetcher, HttpClients, HttpPageFetcher};
use crate::model::HostKind;
use crate::options::NetworkSettings;

/// Builds the registry used for real runs.
///
/// A resolver that cannot be constructed is left out; links for its hosts
/// then fail with [`ResolveError::Unsupported`] and the next host is tried.
#[must_use]
pub fn build_default_resolver_registry(
    clients: &HttpClients,
    settings: &NetworkSettings,
) -> ResolverRegistry {
    let mut registry = ResolverRegistry::new(DirectResolver::new(clients.downloads.clone()));

    registry.register(
        ResolverKind::ButtonHttp,
        Box::new(ButtonResolver::mediafire(
            Arc::new(HttpPageFetcher::new(clients.pages.clone())),
            clients.pages.clone(),
            clients.downloads.clone(),
        )),
    );
    registry.register(
        ResolverKind::ButtonBrowser,
        Box::new(ButtonResolver::zippyshare(
            Arc::new(BrowserPageFetcher::new(
                settings.chrome_path.clone(),
                settings.browser_timeout,
            )),
            clients.downloads.clone(),
        )),
    );
    registry.register(
        ResolverKind::FormPost,
        Box::new(FormPostResolver::new(
            USERSCLOUD_ENDPOINT,
            clients.browser_like.clone(),
            clients.downloads.clone(),
        )),
    );
    registry.register(
        ResolverKind::RedirectHop,
        Box::new(RedirectHopResolver::new(
            clients.no_redirect.clone(),
            clients.downloads.clone(),
        )),
    );

    match MegaResolver::new(clients.downloads.clone()) {
        Ok(resolver) => registry.register(ResolverKind::Mega, Box::new(resolver)),
        Err(error) => warn!(
            error = %error,
            "MEGA resolver unavailable; MEGA links will be skipped"
        ),
    }

    registry
}

/// A resolved transfer that has not been read yet.
///
/// The body is only consumed when the writer decides to keep the file, so a
/// skipped download never reads past the response headers.
pub struct ResolvedDownload {
    /// Name to save the file under, before sanitization.
    pub file_name: String,
    /// Size announced by the host, if any.
    pub expected_size: Option<u64>,
    /// The open transfer.
    pub source: Box<dyn ByteSource>,
}

impl std::fmt::Debug for ResolvedDownload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedDownload")
            .field("file_name", &self.file_name)
            .field("expected_size", &self.expected_size)
            .field("source", &self.source.describe())
            .finish()
    }
}

/// Result of a single resolver's attempt.
#[derive(Debug)]
pub enum ResolveStep {
    /// The transfer is open.
    Download(ResolvedDownload),
    /// Another URL that goes back through the host table.
    Redirect(String),
}

/// Trait implemented by each host strategy.
///
/// Uses `async_trait` so the registry can hold `Box<dyn Resolver>`.
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Returns the resolver's name (e.g., "mediafire", "fallback").
    fn name(&self) -> &str;

    /// Attempts one resolution step for `url`.
    async fn resolve(&self, url: &str) -> Result<ResolveStep, ResolveError>;
}

/// Opens a download for one host link.
///
/// The download orchestrator depends on this seam rather than on the
/// registry so that tests can substitute scripted hosts.
#[async_trait]
pub trait HostSource: Send + Sync {
    /// Resolves `url`, which was filed under `kind` by extraction.
    async fn open(&self, kind: HostKind, url: &str) -> Result<ResolvedDownload, ResolveError>;
}

#[async_trait]
impl HostSource for ResolverRegistry {
    async fn open(&self, kind: HostKind, url: &str) -> Result<ResolvedDownload, ResolveError> {
        tracing::debug!(host = %kind, url, "opening host link");
        self.resolve(url).await
    }
}
