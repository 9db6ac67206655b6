//! Page fetch capability.
//!
//! Listing pages, content pages, and host landing pages are all loaded
//! through [`PageFetcher`], so a stage never knows whether the markup came
//! from a plain HTTP GET ([`HttpPageFetcher`]) or a full browser engine
//! ([`BrowserPageFetcher`]). Parsing happens downstream on the returned HTML.

mod browser;
mod error;
mod http_client;

pub use browser::BrowserPageFetcher;
pub use error::FetchError;
pub use http_client::HttpClients;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

/// Loads a URL and returns the rendered HTML document.
///
/// Uses `async_trait` so fetchers can be shared as `Arc<dyn PageFetcher>`.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Short name for logs ("http", "browser").
    fn name(&self) -> &str;

    /// Fetches `url` and returns its HTML.
    async fn fetch_html(&self, url: &str) -> Result<String, FetchError>;
}

/// Plain HTTP GET page loader.
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    /// Creates a fetcher over an existing client.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    fn name(&self) -> &'static str {
        "http"
    }

    #[tracing::instrument(skip(self), fields(fetcher = "http"))]
    async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::http_status(url, status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::network(url, e))?;
        debug!(bytes = body.len(), "page loaded");
        Ok(body)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_http_fetcher_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<h1>Hi</h1>"))
            .mount(&server)
            .await;

        let fetcher = HttpPageFetcher::new(Client::new());
        let html = fetcher
            .fetch_html(&format!("{}/page", server.uri()))
            .await
            .unwrap();
        assert_eq!(html, "<h1>Hi</h1>");
    }

    #[tokio::test]
    async fn test_http_fetcher_maps_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = HttpPageFetcher::new(Client::new());
        let err = fetcher
            .fetch_html(&format!("{}/missing", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::HttpStatus { status: 404, .. }));
    }
}
