//! Operator-supplied configuration for one run.

use std::path::PathBuf;
use std::time::Duration;

/// Default target site.
pub const DEFAULT_BASE_URL: &str = "https://getcomics.org";

/// Ceiling on listing pages visited when the page bound is 0 (unbounded).
pub const DEFAULT_MAX_INDEX_PAGES: u32 = 500;

/// Default HTTP connect timeout for every client (10 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default read timeout for page fetches and host resolution (30 seconds).
pub const READ_TIMEOUT_SECS: u64 = 30;

/// Default read timeout for file transfers (5 minutes for large archives).
pub const DOWNLOAD_READ_TIMEOUT_SECS: u64 = 300;

/// Default bound on one headless browser page load (30 seconds).
pub const BROWSER_TIMEOUT_SECS: u64 = 30;

/// Timeouts and browser location shared by all network-facing stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkSettings {
    /// Connect timeout for every HTTP client.
    pub connect_timeout: Duration,
    /// Total timeout for page fetches, HEAD probes, and resolution requests.
    pub read_timeout: Duration,
    /// Total timeout for a single file transfer.
    pub download_read_timeout: Duration,
    /// Bound on one headless browser navigation.
    pub browser_timeout: Duration,
    /// Chrome/Chromium executable; auto-detected when `None`.
    pub chrome_path: Option<PathBuf>,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
            read_timeout: Duration::from_secs(READ_TIMEOUT_SECS),
            download_read_timeout: Duration::from_secs(DOWNLOAD_READ_TIMEOUT_SECS),
            browser_timeout: Duration::from_secs(BROWSER_TIMEOUT_SECS),
            chrome_path: None,
        }
    }
}

/// Immutable options for one invocation. Defaults are applied once at entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Directory receiving downloads and the links file.
    pub output_dir: PathBuf,
    /// Number of listing pages to walk; 0 walks until the site reports no next page.
    pub pages: u32,
    /// First listing page. Page 0 requests the bare listing URL.
    pub start: u32,
    /// Replace files that already exist in `output_dir`.
    pub overwrite: bool,
    /// Write `links_<timestamp>.json` before downloading.
    pub save_links: bool,
    /// A single content page to extract from, bypassing pagination.
    pub url: Option<String>,
    /// Site search query.
    pub query: Option<String>,
    /// Tag filter. Takes precedence over `category`.
    pub tag: Option<String>,
    /// Category filter.
    pub category: Option<String>,
    /// Keep downloaded `.zip` archives as-is.
    pub no_extract: bool,
    /// Convert `.cbr` files to `.cbz`.
    pub cbz: bool,
    /// Extract zip entries by base name instead of their internal path.
    pub flatten: bool,
    /// Origin of the target site, without trailing slash.
    pub base_url: String,
    /// Safety ceiling on listing pages for unbounded walks.
    pub max_index_pages: u32,
    /// Network timeouts.
    pub network: NetworkSettings,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            pages: 1,
            start: 1,
            overwrite: false,
            save_links: false,
            url: None,
            query: None,
            tag: None,
            category: None,
            no_extract: false,
            cbz: false,
            flatten: false,
            base_url: DEFAULT_BASE_URL.to_string(),
            max_index_pages: DEFAULT_MAX_INDEX_PAGES,
            network: NetworkSettings::default(),
        }
    }
}

impl RunOptions {
    /// Base URL with any trailing slash removed.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// True when the walk only stops on the site's "no next page" signal.
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.pages == 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_run_options_defaults() {
        let options = RunOptions::default();
        assert_eq!(options.pages, 1);
        assert_eq!(options.start, 1);
        assert_eq!(options.output_dir, PathBuf::from("."));
        assert_eq!(options.base_url(), "https://getcomics.org");
        assert!(!options.overwrite);
        assert!(!options.is_unbounded());
    }

    #[test]
    fn test_base_url_strips_trailing_slash() {
        let options = RunOptions {
            base_url: "https://site.example/".to_string(),
            ..RunOptions::default()
        };
        assert_eq!(options.base_url(), "https://site.example");
    }

    #[test]
    fn test_network_settings_defaults() {
        let network = NetworkSettings::default();
        assert_eq!(network.connect_timeout, Duration::from_secs(10));
        assert_eq!(network.read_timeout, Duration::from_secs(30));
        assert_eq!(network.download_read_timeout, Duration::from_secs(300));
        assert!(network.chrome_path.is_none());
    }
}
