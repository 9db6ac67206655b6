//! Hosts whose landing page carries a download button.
//!
//! The landing page is loaded through a [`PageFetcher`], the button's `href`
//! is read, and the real file URL is opened directly. One host serves its
//! page over plain HTTP, the other only to a real browser engine.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use scraper::{Html, Selector};
use tracing::debug;

use crate::download::filename::is_html_content_type;
use crate::extract::selectors::compile_static_selector;
use crate::fetch::PageFetcher;

use super::utils::absolutize_url;
use super::{ResolveError, ResolveStep, Resolver, open_direct};

/// Resolver that follows a download button on the host's landing page.
pub struct ButtonResolver {
    name: &'static str,
    fetcher: Arc<dyn PageFetcher>,
    button: Selector,
    probe: Option<Client>,
    downloads: Client,
}

impl ButtonResolver {
    /// Plain-HTTP variant for mediafire (`#downloadButton`).
    ///
    /// Some mediafire links are the file itself; a HEAD on `probe` detects a
    /// non-HTML content type and skips the page parse.
    #[must_use]
    pub fn mediafire(fetcher: Arc<dyn PageFetcher>, probe: Client, downloads: Client) -> Self {
        Self {
            name: "mediafire",
            fetcher,
            button: compile_static_selector("#downloadButton"),
            probe: Some(probe),
            downloads,
        }
    }

    /// Headless-browser variant for zippyshare (`#dlbutton`).
    #[must_use]
    pub fn zippyshare(fetcher: Arc<dyn PageFetcher>, downloads: Client) -> Self {
        Self {
            name: "zippyshare",
            fetcher,
            button: compile_static_selector("#dlbutton"),
            probe: None,
            downloads,
        }
    }

    async fn is_direct_file(&self, probe: &Client, url: &str) -> Result<bool, ResolveError> {
        let response = probe
            .head(url)
            .send()
            .await
            .map_err(|e| ResolveError::network(url, &e))?;
        // No Content-Type means a landing page, not a file.
        Ok(response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|content_type| !is_html_content_type(content_type)))
    }

    fn button_href(&self, html: &str, page_url: &str) -> Option<String> {
        let document = Html::parse_document(html);
        document
            .select(&self.button)
            .find_map(|button| button.value().attr("href"))
            .and_then(|href| absolutize_url(href, page_url))
    }
}

impl std::fmt::Debug for ButtonResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ButtonResolver")
            .field("name", &self.name)
            .field("fetcher", &self.fetcher.name())
            .field("probe", &self.probe.is_some())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Resolver for ButtonResolver {
    fn name(&self) -> &str {
        self.name
    }

    #[tracing::instrument(skip(self), fields(resolver = self.name))]
    async fn resolve(&self, url: &str) -> Result<ResolveStep, ResolveError> {
        if let Some(probe) = &self.probe
            && self.is_direct_file(probe, url).await?
        {
            debug!("landing URL is already the file");
            return open_direct(&self.downloads, self.name, url)
                .await
                .map(ResolveStep::Download);
        }

        let html = self
            .fetcher
            .fetch_html(url)
            .await
            .map_err(|e| ResolveError::host_unavailable(self.name, url, &e.to_string()))?;
        let href = self
            .button_href(&html, url)
            .ok_or_else(|| ResolveError::host_unavailable(self.name, url, "no download button"))?;
        debug!(href = %href, "download button found");

        open_direct(&self.downloads, self.name, &href)
            .await
            .map(ResolveStep::Download)
    }
}
