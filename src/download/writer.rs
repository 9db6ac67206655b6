//! Writing one resolved transfer to the output directory.

use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, warn};

use crate::resolver::ResolvedDownload;

use super::DownloadError;
use super::filename::sanitize_filename;
use super::progress::transfer_bar;

/// What happened to a resolved transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The file was written in full.
    Written {
        /// Destination path.
        path: PathBuf,
        /// Bytes written.
        bytes: u64,
    },
    /// The destination already existed and overwrite was off; no bytes were read.
    Skipped {
        /// The existing path.
        path: PathBuf,
    },
}

/// Streams `download` into `output_dir`.
///
/// The body is only read once the destination is known to be writable under
/// the overwrite policy. Any failure mid-transfer removes the partial file.
///
/// # Errors
///
/// Returns [`DownloadError::Io`] if the file cannot be created or flushed and
/// [`DownloadError::Transfer`] if the byte stream fails.
#[tracing::instrument(skip(download), fields(file_name = %download.file_name))]
pub async fn write_download(
    download: ResolvedDownload,
    output_dir: &Path,
    overwrite: bool,
    show_progress: bool,
) -> Result<WriteOutcome, DownloadError> {
    let ResolvedDownload {
        file_name,
        expected_size,
        source,
    } = download;
    let file_name = sanitize_filename(&file_name);
    let path = output_dir.join(&file_name);

    if !overwrite && tokio::fs::try_exists(&path).await.unwrap_or(false) {
        info!(path = %path.display(), "file already exists, skipping");
        return Ok(WriteOutcome::Skipped { path });
    }

    let file = File::create(&path)
        .await
        .map_err(|e| DownloadError::io(&path, e))?;
    let mut writer = BufWriter::new(file);
    let bar = transfer_bar(show_progress, expected_size, &file_name);

    debug!(source = %source.describe(), expected_size = ?expected_size, "streaming");
    let copied = source.copy_to(&mut writer, &bar).await;
    let flushed = match copied {
        Ok(bytes) => writer.flush().await.map(|()| bytes).map_err(|e| DownloadError::io(&path, e)),
        Err(error) => Err(DownloadError::transfer(&path, error)),
    };

    match flushed {
        Ok(bytes) => {
            bar.finish_and_clear();
            info!(path = %path.display(), bytes, "download finished");
            Ok(WriteOutcome::Written { path, bytes })
        }
        Err(error) => {
            bar.abandon();
            drop(writer);
            remove_partial(&path).await;
            Err(error)
        }
    }
}

async fn remove_partial(path: &Path) {
    if let Err(error) = tokio::fs::remove_file(path).await {
        warn!(path = %path.display(), error = %error, "could not remove partial file");
    } else {
        debug!(path = %path.display(), "partial file removed");
    }
}
