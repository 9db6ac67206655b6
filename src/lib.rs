//! Get-Comics Core Library
//!
//! This library crawls a comics aggregator site, extracts per-issue download
//! links for several third-party file hosts, and downloads each issue from
//! the first host that delivers it.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`crawl`] - Pagination walker over listing pages, single-URL validation
//! - [`extract`] - Link extraction across the three content-page layouts
//! - [`redirect`] - Site indirection and link-shortener normalization
//! - [`resolver`] - Per-host resolution of landing URLs into byte sources
//! - [`download`] - Download orchestrator with host fallback and skip-if-exists
//! - [`archive`] - Zip extraction and CBR to CBZ conversion
//! - [`sidecar`] - Timestamped JSON links file
//! - [`pipeline`] - End-to-end run wiring the stages together
//! - [`fetch`] - Page fetch capability (plain HTTP or headless browser)

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod archive;
pub mod crawl;
pub mod download;
pub mod extract;
pub mod fetch;
pub mod model;
pub mod options;
pub mod pipeline;
pub mod redirect;
pub mod resolver;
pub mod sidecar;
mod user_agent;

// Re-export commonly used types
pub use crawl::{CrawlError, IndexWalker};
pub use download::{
    DOWNLOAD_PRIORITY, DownloadError, DownloadOrchestrator, DownloadOutcome, DownloadStats,
    RecordReport,
};
pub use extract::extract_links;
pub use fetch::{FetchError, HttpPageFetcher, PageFetcher};
pub use model::{ComicLink, HostKind};
pub use options::{NetworkSettings, RunOptions};
pub use pipeline::{PipelineError, RunContext, RunSummary, collect_links, run};
pub use redirect::LinkRedirector;
pub use resolver::{HostSource, ResolveError, ResolvedDownload};
pub use sidecar::{SidecarError, write_links_file};
