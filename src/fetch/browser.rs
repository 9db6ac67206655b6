//! Headless browser page loader for landing pages behind bot detection.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures_util::StreamExt;
use tokio::time::timeout;
use tracing::{debug, warn};

use super::{FetchError, PageFetcher};

/// Loads pages in a fresh headless Chrome session per request.
///
/// A session is launched for each fetch and always closed afterwards, so no
/// browser process outlives the call even when navigation fails.
#[derive(Debug, Clone)]
pub struct BrowserPageFetcher {
    chrome_path: Option<PathBuf>,
    navigation_timeout: Duration,
}

impl BrowserPageFetcher {
    /// Creates a browser fetcher. `chrome_path` of `None` lets the driver locate Chrome.
    #[must_use]
    pub fn new(chrome_path: Option<PathBuf>, navigation_timeout: Duration) -> Self {
        Self {
            chrome_path,
            navigation_timeout,
        }
    }

    fn browser_config(&self, url: &str) -> Result<BrowserConfig, FetchError> {
        let mut builder = BrowserConfig::builder()
            .arg("--headless=new")
            .arg("--no-sandbox")
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--disable-extensions");
        if let Some(path) = &self.chrome_path {
            builder = builder.chrome_executable(path);
        }
        builder.build().map_err(|reason| FetchError::browser(url, reason))
    }

    async fn load(browser: &Browser, url: &str) -> Result<String, FetchError> {
        let page = browser
            .new_page(url)
            .await
            .map_err(|e| FetchError::browser(url, e.to_string()))?;
        page.wait_for_navigation()
            .await
            .map_err(|e| FetchError::browser(url, e.to_string()))?;
        page.content()
            .await
            .map_err(|e| FetchError::browser(url, e.to_string()))
    }
}

#[async_trait]
impl PageFetcher for BrowserPageFetcher {
    fn name(&self) -> &'static str {
        "browser"
    }

    #[tracing::instrument(skip(self), fields(fetcher = "browser"))]
    async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        let config = self.browser_config(url)?;
        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| FetchError::browser(url, e.to_string()))?;

        let events = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let result = match timeout(self.navigation_timeout, Self::load(&browser, url)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::timeout(url)),
        };

        if let Err(error) = browser.close().await {
            warn!(error = %error, "browser did not close cleanly");
        }
        let _ = events.await;

        if let Ok(html) = &result {
            debug!(bytes = html.len(), "page rendered");
        }
        result
    }
}
