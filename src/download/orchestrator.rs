//! Per-record host fallback.
//!
//! Each record's links are tried in [`DOWNLOAD_PRIORITY`] order, one at a
//! time. A host that fails to resolve or stream is logged and the next one is
//! tried; a record whose hosts all fail is reported as exhausted and the run
//! moves on.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::archive::{self, PostProcessOptions};
use crate::model::{ComicLink, HostKind};
use crate::options::RunOptions;
use crate::resolver::HostSource;

use super::DownloadError;
use super::writer::{WriteOutcome, write_download};

/// Order in which a record's hosts are tried.
pub const DOWNLOAD_PRIORITY: [HostKind; 9] = [
    HostKind::Zippyshare,
    HostKind::Mediafire,
    HostKind::Main,
    HostKind::Mirror,
    HostKind::Mega,
    HostKind::Userscloud,
    HostKind::Dropapk,
    HostKind::Ufile,
    HostKind::Cloudmail,
];

/// Final state of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// A host delivered the file to this path.
    Downloaded(PathBuf),
    /// The file was already present; nothing was fetched.
    Skipped(PathBuf),
    /// Every available host failed.
    Exhausted,
}

/// One host tried for a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostAttempt {
    /// Host key.
    pub host: HostKind,
    /// Failure text, `None` if this host succeeded.
    pub error: Option<String>,
}

/// What happened to one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordReport {
    /// Record title.
    pub title: String,
    /// Final state.
    pub outcome: DownloadOutcome,
    /// Hosts tried, in order.
    pub attempts: Vec<HostAttempt>,
    /// Files left on disk after post-processing.
    pub files: Vec<PathBuf>,
}

/// Counts of record outcomes across a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadStats {
    /// Records downloaded.
    pub downloaded: usize,
    /// Records skipped because the file existed.
    pub skipped: usize,
    /// Records where every host failed.
    pub exhausted: usize,
}

impl DownloadStats {
    /// Adds one outcome.
    pub fn record(&mut self, outcome: &DownloadOutcome) {
        match outcome {
            DownloadOutcome::Downloaded(_) => self.downloaded += 1,
            DownloadOutcome::Skipped(_) => self.skipped += 1,
            DownloadOutcome::Exhausted => self.exhausted += 1,
        }
    }

    /// Returns the number of records processed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.downloaded + self.skipped + self.exhausted
    }
}

/// Downloads records one at a time through a [`HostSource`].
pub struct DownloadOrchestrator {
    hosts: Arc<dyn HostSource>,
    output_dir: PathBuf,
    overwrite: bool,
    post: PostProcessOptions,
    show_progress: bool,
}

impl DownloadOrchestrator {
    /// Creates an orchestrator for the run's output and post-processing options.
    #[must_use]
    pub fn new(hosts: Arc<dyn HostSource>, options: &RunOptions) -> Self {
        Self {
            hosts,
            output_dir: options.output_dir.clone(),
            overwrite: options.overwrite,
            post: PostProcessOptions::from(options),
            show_progress: false,
        }
    }

    /// Enables per-transfer progress bars.
    #[must_use]
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    async fn try_host(&self, host: HostKind, url: &str) -> Result<WriteOutcome, DownloadError> {
        let download = self
            .hosts
            .open(host, url)
            .await
            .map_err(|e| DownloadError::resolve(host, url, e))?;
        write_download(download, &self.output_dir, self.overwrite, self.show_progress).await
    }

    async fn postprocess(&self, path: PathBuf) -> Vec<PathBuf> {
        if !self.post.extract && !self.post.cbz {
            return vec![path];
        }

        let post = self.post.clone();
        let target = path.clone();
        match tokio::task::spawn_blocking(move || archive::postprocess(&target, &post)).await {
            Ok(Ok(files)) => files,
            Ok(Err(error)) => {
                warn!(file = %path.display(), error = %error, "post-processing failed; keeping download");
                vec![path]
            }
            Err(join_error) => {
                warn!(file = %path.display(), error = %join_error, "post-processing task failed");
                vec![path]
            }
        }
    }

    /// Downloads one record from the first host that delivers it.
    ///
    /// Never fails: host errors are logged and recorded in the report.
    #[instrument(skip(self, record), fields(title = %record.title))]
    pub async fn download_one(&self, record: &ComicLink) -> RecordReport {
        let mut attempts = Vec::new();

        for host in DOWNLOAD_PRIORITY {
            let Some(url) = record.link(host) else {
                continue;
            };
            debug!(host = %host, url, "trying host");

            match self.try_host(host, url).await {
                Ok(WriteOutcome::Written { path, bytes }) => {
                    info!(host = %host, path = %path.display(), bytes, "comic downloaded");
                    attempts.push(HostAttempt { host, error: None });
                    let files = self.postprocess(path.clone()).await;
                    return RecordReport {
                        title: record.title.clone(),
                        outcome: DownloadOutcome::Downloaded(path),
                        attempts,
                        files,
                    };
                }
                Ok(WriteOutcome::Skipped { path }) => {
                    attempts.push(HostAttempt { host, error: None });
                    return RecordReport {
                        title: record.title.clone(),
                        outcome: DownloadOutcome::Skipped(path.clone()),
                        attempts,
                        files: vec![path],
                    };
                }
                Err(error) => {
                    warn!(host = %host, url, error = %error, "host failed; trying next host");
                    attempts.push(HostAttempt {
                        host,
                        error: Some(error.to_string()),
                    });
                }
            }
        }

        warn!(
            page = %record.page_url,
            tried = attempts.len(),
            "no host could deliver this comic"
        );
        RecordReport {
            title: record.title.clone(),
            outcome: DownloadOutcome::Exhausted,
            attempts,
            files: Vec::new(),
        }
    }

    /// Downloads every record in order and returns the outcome counts.
    pub async fn download_all(&self, records: &[ComicLink]) -> (DownloadStats, Vec<RecordReport>) {
        let mut stats = DownloadStats::default();
        let mut reports = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            info!(
                current = index + 1,
                total = records.len(),
                title = %record.title,
                "downloading comic"
            );
            let report = self.download_one(record).await;
            stats.record(&report.outcome);
            reports.push(report);
        }
        (stats, reports)
    }
}

impl std::fmt::Debug for DownloadOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadOrchestrator")
            .field("output_dir", &self.output_dir)
            .field("overwrite", &self.overwrite)
            .field("post", &self.post)
            .field("show_progress", &self.show_progress)
            .finish_non_exhaustive()
    }
}
