//! Shared HTTP client construction policy.
//!
//! Every stage builds its clients here so timeouts, compression, and the
//! User-Agent stay consistent across page loads, resolution, and transfers.

use reqwest::redirect::Policy;
use reqwest::{Client, ClientBuilder};

use crate::options::NetworkSettings;
use crate::user_agent::{self, BROWSER_USER_AGENT};

use super::FetchError;

/// The set of HTTP clients one run needs.
#[derive(Debug, Clone)]
pub struct HttpClients {
    /// Follows redirects; used for page loads, HEAD probes, and resolution.
    pub pages: Client,
    /// Never follows redirects; used to read `Location` headers.
    pub no_redirect: Client,
    /// Browser-like User-Agent; used by hosts that reject tool traffic.
    pub browser_like: Client,
    /// Long read timeout; used for file transfers.
    pub downloads: Client,
}

impl HttpClients {
    /// Builds all clients from the run's network settings.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ClientBuild`] when a client cannot be constructed.
    pub fn new(settings: &NetworkSettings) -> Result<Self, FetchError> {
        let pages = base_builder(settings, user_agent::default_user_agent())
            .timeout(settings.read_timeout)
            .build()
            .map_err(FetchError::ClientBuild)?;
        let no_redirect = base_builder(settings, user_agent::default_user_agent())
            .timeout(settings.read_timeout)
            .redirect(Policy::none())
            .build()
            .map_err(FetchError::ClientBuild)?;
        let browser_like = base_builder(settings, BROWSER_USER_AGENT.to_string())
            .timeout(settings.read_timeout)
            .build()
            .map_err(FetchError::ClientBuild)?;
        let downloads = base_builder(settings, user_agent::default_user_agent())
            .timeout(settings.download_read_timeout)
            .build()
            .map_err(FetchError::ClientBuild)?;

        Ok(Self {
            pages,
            no_redirect,
            browser_like,
            downloads,
        })
    }
}

fn base_builder(settings: &NetworkSettings, user_agent: String) -> ClientBuilder {
    Client::builder()
        .connect_timeout(settings.connect_timeout)
        .user_agent(user_agent)
        .cookie_store(true)
        .gzip(true)
}
