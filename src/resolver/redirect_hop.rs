//! comicfiles.ru: one `Location` hop, then back through the host table.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::LOCATION;
use tracing::debug;

use super::utils::absolutize_url;
use super::{ResolveError, ResolveStep, Resolver, open_direct};

/// Reads the `Location` of an unfollowed HEAD and hands it back to the registry.
///
/// Without a `Location` the landing URL is taken to be the file itself.
#[derive(Debug, Clone)]
pub struct RedirectHopResolver {
    no_redirect: Client,
    downloads: Client,
}

impl RedirectHopResolver {
    /// Creates the resolver; `no_redirect` must not follow redirects.
    #[must_use]
    pub fn new(no_redirect: Client, downloads: Client) -> Self {
        Self {
            no_redirect,
            downloads,
        }
    }
}

#[async_trait]
impl Resolver for RedirectHopResolver {
    fn name(&self) -> &'static str {
        "redirect-hop"
    }

    #[tracing::instrument(skip(self), fields(resolver = "redirect-hop"))]
    async fn resolve(&self, url: &str) -> Result<ResolveStep, ResolveError> {
        let response = self
            .no_redirect
            .head(url)
            .send()
            .await
            .map_err(|e| ResolveError::network(url, &e))?;

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| absolutize_url(value, url));

        match location {
            Some(next) => {
                debug!(next = %next, "redirect hop");
                Ok(ResolveStep::Redirect(next))
            }
            None => open_direct(&self.downloads, self.name(), url)
                .await
                .map(ResolveStep::Download),
        }
    }
}
