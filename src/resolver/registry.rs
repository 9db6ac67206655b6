//! Host table and the resolution loop.
//!
//! The [`ResolverRegistry`] classifies each URL by hostname once, runs the
//! matching resolver, and sends any redirect step back through the table.

use std::collections::BTreeMap;

use tracing::{debug, info};

use super::utils::host_contains;
use super::{ResolveError, ResolveStep, ResolvedDownload, Resolver};

/// The resolution strategies a host can need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResolverKind {
    /// Binary protocol client (MEGA).
    Mega,
    /// Download button on a page served over plain HTTP.
    ButtonHttp,
    /// Download button on a page that needs a browser engine.
    ButtonBrowser,
    /// Form submission that redirects to the file.
    FormPost,
    /// One `Location` hop, then reclassify.
    RedirectHop,
    /// GET the URL and treat the body as the file.
    Fallback,
}

/// Hostname substring to resolver kind, checked in order.
pub const HOST_TABLE: [(&str, ResolverKind); 5] = [
    ("mega.nz", ResolverKind::Mega),
    ("mediafire.com", ResolverKind::ButtonHttp),
    ("zippyshare.com", ResolverKind::ButtonBrowser),
    ("userscloud.com", ResolverKind::FormPost),
    ("comicfiles.ru", ResolverKind::RedirectHop),
];

/// Picks the resolver kind for `url` from [`HOST_TABLE`].
#[must_use]
pub fn classify_host(url: &str) -> ResolverKind {
    HOST_TABLE
        .iter()
        .find(|(marker, _)| host_contains(url, marker))
        .map_or(ResolverKind::Fallback, |(_, kind)| *kind)
}

/// Maximum redirect steps before resolution gives up.
const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Resolver per host kind, plus the fallback.
pub struct ResolverRegistry {
    resolvers: BTreeMap<ResolverKind, Box<dyn Resolver>>,
    fallback: Box<dyn Resolver>,
    max_redirects: usize,
}

impl ResolverRegistry {
    /// Creates a registry where every host goes to `fallback` until registered.
    #[must_use]
    pub fn new(fallback: impl Resolver + 'static) -> Self {
        Self {
            resolvers: BTreeMap::new(),
            fallback: Box::new(fallback),
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }

    /// Overrides the redirect bound.
    #[must_use]
    pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    /// Registers the resolver for a host kind, replacing any earlier one.
    #[tracing::instrument(skip(self, resolver), fields(resolver_name = resolver.name()))]
    pub fn register(&mut self, kind: ResolverKind, resolver: Box<dyn Resolver>) {
        debug!(kind = ?kind, "Registering resolver");
        self.resolvers.insert(kind, resolver);
    }

    /// True if `kind` has a working resolver.
    #[must_use]
    pub fn has_resolver(&self, kind: ResolverKind) -> bool {
        kind == ResolverKind::Fallback || self.resolvers.contains_key(&kind)
    }

    fn resolver_for(&self, url: &str) -> Result<&dyn Resolver, ResolveError> {
        match classify_host(url) {
            ResolverKind::Fallback => Ok(self.fallback.as_ref()),
            kind => self
                .resolvers
                .get(&kind)
                .map(AsRef::as_ref)
                .ok_or_else(|| ResolveError::unsupported(&format!("{kind:?}"), url)),
        }
    }

    /// Resolves `input` to an open download, following redirect steps.
    ///
    /// # Errors
    ///
    /// Returns the first resolver error, [`ResolveError::Unsupported`] for a
    /// host whose resolver is missing, or [`ResolveError::TooManyRedirects`]
    /// when the chain exceeds the bound.
    #[tracing::instrument(skip(self))]
    pub async fn resolve(&self, input: &str) -> Result<ResolvedDownload, ResolveError> {
        let mut current = input.to_string();
        let mut redirect_count: usize = 0;

        loop {
            let resolver = self.resolver_for(&current)?;
            debug!(resolver = resolver.name(), url = %current, "Trying resolver");

            match resolver.resolve(&current).await? {
                ResolveStep::Download(download) => {
                    info!(
                        resolver = resolver.name(),
                        file_name = %download.file_name,
                        "Resolution successful"
                    );
                    return Ok(download);
                }
                ResolveStep::Redirect(next) => {
                    redirect_count += 1;
                    if redirect_count > self.max_redirects {
                        return Err(ResolveError::too_many_redirects(input, redirect_count));
                    }
                    debug!(
                        resolver = resolver.name(),
                        from = %current,
                        to = %next,
                        redirect_count,
                        "Following redirect"
                    );
                    current = next;
                }
            }
        }
    }
}

impl std::fmt::Debug for ResolverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.resolvers.values().map(|r| r.name()).collect();
        f.debug_struct("ResolverRegistry")
            .field("resolvers", &names)
            .field("fallback", &self.fallback.name())
            .field("max_redirects", &self.max_redirects)
            .finish()
    }
}
