//! Download stage: streaming resolved transfers to disk with host fallback.
//!
//! # Features
//!
//! - Host links tried in a fixed priority order, first success wins
//! - Skip-if-exists without reading the byte stream (unless overwriting)
//! - Partial files removed when a transfer breaks off
//! - Filenames from `Content-Disposition` or the URL, sanitized
//! - Optional zip extraction and CBZ conversion after each download
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use get_comics_core::download::DownloadOrchestrator;
//! use get_comics_core::fetch::HttpClients;
//! use get_comics_core::options::RunOptions;
//! use get_comics_core::resolver::build_default_resolver_registry;
//!
//! # async fn example(records: Vec<get_comics_core::ComicLink>) -> Result<(), Box<dyn std::error::Error>> {
//! let options = RunOptions::default();
//! let clients = HttpClients::new(&options.network)?;
//! let registry = Arc::new(build_default_resolver_registry(&clients, &options.network));
//! let (stats, _) = DownloadOrchestrator::new(registry, &options)
//!     .download_all(&records)
//!     .await;
//! println!("downloaded {}", stats.downloaded);
//! # Ok(())
//! # }
//! ```

mod error;
pub(crate) mod filename;
mod orchestrator;
mod progress;
mod writer;

pub use error::DownloadError;
pub use orchestrator::{
    DOWNLOAD_PRIORITY, DownloadOrchestrator, DownloadOutcome, DownloadStats, HostAttempt,
    RecordReport,
};
pub use writer::{WriteOutcome, write_download};
