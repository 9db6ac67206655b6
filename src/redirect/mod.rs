//! Link normalization between extraction and host resolution.
//!
//! Two kinds of indirection are unwrapped: the site's own `{base}/links...`
//! redirector, read from the `Location` header of an unfollowed HEAD, and a
//! link shortener that only redirects clients without a User-Agent. Every
//! other URL passes through untouched.

use reqwest::Client;
use reqwest::header::{LOCATION, USER_AGENT};
use tracing::{debug, info, instrument, warn};

use crate::fetch::{FetchError, HttpClients};
use crate::model::ComicLink;
use crate::resolver::utils::host_contains;

/// Hostname marker of the link shortener.
const SHORTENER_MARKER: &str = "sh.st";

/// Resolves indirection links to their destinations.
#[derive(Debug, Clone)]
pub struct LinkRedirector {
    base_url: String,
    follow: Client,
    no_follow: Client,
}

impl LinkRedirector {
    /// Creates a redirector for the site at `base_url`.
    #[must_use]
    pub fn new(base_url: &str, clients: &HttpClients) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            follow: clients.pages.clone(),
            no_follow: clients.no_redirect.clone(),
        }
    }

    fn indirection_prefix(&self) -> String {
        format!("{}/links", self.base_url)
    }

    /// Resolves one raw link.
    ///
    /// Returns `Ok(None)` when the site redirector answers without a
    /// `Location`, meaning the link should be dropped. A `Location` is
    /// handed back verbatim: a relative one is not absolutized here.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the HEAD request itself fails.
    #[instrument(skip(self))]
    pub async fn resolve(&self, raw: &str) -> Result<Option<String>, FetchError> {
        if raw.starts_with(&self.indirection_prefix()) {
            let response = self
                .no_follow
                .head(raw)
                .send()
                .await
                .map_err(|e| FetchError::network(raw, e))?;
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string);
            debug!(location = ?location, "site redirector answered");
            return Ok(location);
        }

        if host_contains(raw, SHORTENER_MARKER) {
            let response = self
                .follow
                .head(raw)
                .header(USER_AGENT, "")
                .send()
                .await
                .map_err(|e| FetchError::network(raw, e))?;
            let destination = response.url().to_string();
            debug!(destination = %destination, "shortener followed");
            return Ok(Some(destination));
        }

        Ok(Some(raw.to_string()))
    }

    /// Rewrites every link of `record`, keeping host keys.
    ///
    /// Links that fail or resolve to nothing are dropped individually;
    /// returns `None` if the record is left with no links.
    pub async fn redirect_record(&self, record: ComicLink) -> Option<ComicLink> {
        let ComicLink {
            title,
            page_url,
            links,
        } = record;

        let mut resolved = links.clone();
        for (kind, raw) in links {
            match self.resolve(&raw).await {
                Ok(Some(destination)) => {
                    resolved.insert(kind, destination);
                }
                Ok(None) => {
                    warn!(title = %title, host = %kind, url = %raw, "redirect returned no destination; dropping link");
                    resolved.remove(&kind);
                }
                Err(error) => {
                    warn!(title = %title, host = %kind, url = %raw, error = %error, "redirect failed; dropping link");
                    resolved.remove(&kind);
                }
            }
        }

        let record = ComicLink::new(title, page_url, resolved);
        if record.is_none() {
            warn!("record lost every link during redirect resolution");
        }
        record
    }

    /// Rewrites all records sequentially, preserving order.
    pub async fn redirect_all(&self, records: Vec<ComicLink>) -> Vec<ComicLink> {
        let total = records.len();
        let mut out = Vec::with_capacity(total);
        for record in records {
            if let Some(record) = self.redirect_record(record).await {
                out.push(record);
            }
        }
        info!(total, kept = out.len(), "redirect resolution finished");
        out
    }
}
