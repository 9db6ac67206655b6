//! End-to-end run: discover, extract, redirect, persist, download.
//!
//! Every stage runs in sequence and records flow as an explicit `Vec` from
//! one stage to the next. Collaborators are gathered in a [`RunContext`] so
//! tests can swap the page fetcher and the host source for fakes.

use std::path::PathBuf;
use std::sync::Arc;

use reqwest::Client;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::crawl::{CrawlError, IndexWalker, validate_single_url};
use crate::download::{DownloadOrchestrator, DownloadStats, RecordReport};
use crate::extract::extract_links;
use crate::fetch::{FetchError, HttpClients, HttpPageFetcher, PageFetcher};
use crate::model::ComicLink;
use crate::options::RunOptions;
use crate::redirect::LinkRedirector;
use crate::resolver::{HostSource, build_default_resolver_registry};
use crate::sidecar::{SidecarError, write_links_file};

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Bad explicit URL or unreadable starting listing page.
    #[error(transparent)]
    Crawl(#[from] CrawlError),

    /// HTTP clients could not be built.
    #[error("cannot initialize HTTP clients: {0}")]
    Setup(#[from] FetchError),

    /// The output directory could not be created.
    #[error("cannot create output directory {path}: {source}")]
    OutputDir {
        /// Requested directory.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The links file could not be written.
    #[error(transparent)]
    Sidecar(#[from] SidecarError),
}

/// Collaborators for one run.
pub struct RunContext {
    /// Loads listing and content pages.
    pub pages: Arc<dyn PageFetcher>,
    /// Client for the single-URL reachability check.
    pub validation: Client,
    /// Rewrites indirection links.
    pub redirector: LinkRedirector,
    /// Opens host links for download.
    pub hosts: Arc<dyn HostSource>,
    /// Show per-transfer progress bars.
    pub show_progress: bool,
}

impl RunContext {
    /// Builds the real HTTP, browser, and host stack for `options`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Setup`] if an HTTP client cannot be built.
    pub fn live(options: &RunOptions, show_progress: bool) -> Result<Self, PipelineError> {
        let clients = HttpClients::new(&options.network)?;
        Ok(Self {
            pages: Arc::new(HttpPageFetcher::new(clients.pages.clone())),
            validation: clients.pages.clone(),
            redirector: LinkRedirector::new(options.base_url(), &clients),
            hosts: Arc::new(build_default_resolver_registry(&clients, &options.network)),
            show_progress,
        })
    }
}

impl std::fmt::Debug for RunContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunContext")
            .field("pages", &self.pages.name())
            .field("redirector", &self.redirector)
            .field("show_progress", &self.show_progress)
            .finish_non_exhaustive()
    }
}

/// What a run did.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Records handed to the download stage.
    pub records: usize,
    /// Links file path, if one was written.
    pub links_file: Option<PathBuf>,
    /// Record outcome counts.
    pub stats: DownloadStats,
    /// Per-record detail.
    pub reports: Vec<RecordReport>,
}

async fn extract_page(pages: &dyn PageFetcher, url: &str) -> Vec<ComicLink> {
    match pages.fetch_html(url).await {
        Ok(html) => {
            let records = extract_links(&html, url);
            info!(url, records = records.len(), "content page parsed");
            records
        }
        Err(error) => {
            warn!(url, error = %error, "content page failed; skipping");
            Vec::new()
        }
    }
}

/// Discovers content pages and extracts their records, before redirects.
///
/// In single-URL mode the URL is validated and only that page is read;
/// otherwise listing pages are walked within the configured bounds.
///
/// # Errors
///
/// Returns [`PipelineError::Crawl`] for an invalid explicit URL or when the
/// first listing page (or the explicit page) cannot be loaded.
#[instrument(skip_all, fields(base_url = %options.base_url()))]
pub async fn collect_links(
    options: &RunOptions,
    pages: Arc<dyn PageFetcher>,
    validation: &Client,
) -> Result<Vec<ComicLink>, PipelineError> {
    if let Some(raw) = options.url.as_deref() {
        let url = validate_single_url(raw, options.base_url(), validation).await?;
        let html = pages
            .fetch_html(&url)
            .await
            .map_err(|e| CrawlError::start_page(&url, e))?;
        return Ok(extract_links(&html, &url));
    }

    let mut records = Vec::new();
    let mut walker = IndexWalker::new(Arc::clone(&pages), options);
    while let Some(batch) = walker.next_batch().await? {
        for content_url in batch {
            records.extend(extract_page(pages.as_ref(), &content_url).await);
        }
    }
    info!(
        listing_pages = walker.visited_pages(),
        records = records.len(),
        "discovery finished"
    );
    Ok(records)
}

/// Runs every stage for `options`.
///
/// # Errors
///
/// Returns [`PipelineError`] only for run-fatal failures; per-record and
/// per-host failures are logged and counted in the summary instead.
#[instrument(skip_all)]
pub async fn run(options: &RunOptions, context: &RunContext) -> Result<RunSummary, PipelineError> {
    let found = collect_links(options, Arc::clone(&context.pages), &context.validation).await?;
    let records = context.redirector.redirect_all(found).await;
    if records.is_empty() {
        info!("no comics found");
        return Ok(RunSummary::default());
    }

    std::fs::create_dir_all(&options.output_dir).map_err(|source| PipelineError::OutputDir {
        path: options.output_dir.clone(),
        source,
    })?;

    let links_file = if options.save_links {
        Some(write_links_file(&records, &options.output_dir)?)
    } else {
        None
    };

    let orchestrator = DownloadOrchestrator::new(Arc::clone(&context.hosts), options)
        .with_progress(context.show_progress);
    let (stats, reports) = orchestrator.download_all(&records).await;

    info!(
        records = records.len(),
        downloaded = stats.downloaded,
        skipped = stats.skipped,
        failed = stats.exhausted,
        "run finished"
    );
    Ok(RunSummary {
        records: records.len(),
        links_file,
        stats,
        reports,
    })
}
