//! userscloud: a form POST that redirects to the file.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::ACCEPT;
use tracing::debug;
use url::Url;

use super::{ResolveError, ResolveStep, Resolver, open_direct};

/// Endpoint that accepts the download form.
pub const USERSCLOUD_ENDPOINT: &str = "https://userscloud.com/x8u2u9htpg8x";

/// Submits `op=download2&id=<file id>` and opens wherever the host redirects.
///
/// The file id is the first non-empty path segment of the landing URL.
#[derive(Debug, Clone)]
pub struct FormPostResolver {
    endpoint: String,
    client: Client,
    downloads: Client,
}

impl FormPostResolver {
    /// Creates a resolver posting to `endpoint` with a browser-like `client`.
    #[must_use]
    pub fn new(endpoint: &str, client: Client, downloads: Client) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            client,
            downloads,
        }
    }
}

fn file_id(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .path_segments()?
        .find(|segment| !segment.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl Resolver for FormPostResolver {
    fn name(&self) -> &'static str {
        "userscloud"
    }

    #[tracing::instrument(skip(self), fields(resolver = "userscloud"))]
    async fn resolve(&self, url: &str) -> Result<ResolveStep, ResolveError> {
        let id = file_id(url)
            .ok_or_else(|| ResolveError::host_unavailable(self.name(), url, "no file id in URL"))?;

        let response = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, "*/*")
            .form(&[("op", "download2"), ("id", id.as_str())])
            .send()
            .await
            .map_err(|e| ResolveError::network(&self.endpoint, &e))?;

        let target = response.url().to_string();
        if target.trim_end_matches('/') == self.endpoint.trim_end_matches('/') {
            return Err(ResolveError::host_unavailable(
                self.name(),
                url,
                "form submission did not redirect to a file",
            ));
        }
        debug!(id = %id, target = %target, "form redirected");

        open_direct(&self.downloads, self.name(), &target)
            .await
            .map(ResolveStep::Download)
    }
}
