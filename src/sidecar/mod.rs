//! Timestamped JSON links file.
//!
//! When link saving is on, the fully redirected record list is written to
//! `{output_dir}/links_{yyyy-MM-dd_HH-mm-ss}.json` before any download
//! starts. The file is write-once; a run never reads it back.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use time::OffsetDateTime;
use time::macros::format_description;
use tracing::{info, instrument, warn};

use crate::model::ComicLink;

/// Errors produced while writing the links file.
#[derive(Debug, Error)]
pub enum SidecarError {
    /// I/O error writing the links file to disk.
    #[error("I/O error writing links file {path}: {source}")]
    Io {
        /// Target path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// JSON serialization error (shouldn't occur for well-formed records).
    #[error("JSON serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    /// The local timestamp could not be formatted.
    #[error("cannot format links file timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
}

/// Builds `links_{timestamp}.json` for the given instant.
///
/// # Errors
///
/// Returns [`SidecarError::Timestamp`] if formatting fails.
pub fn links_file_name(now: OffsetDateTime) -> Result<String, SidecarError> {
    let stamp = now.format(format_description!(
        "[year]-[month]-[day]_[hour]-[minute]-[second]"
    ))?;
    Ok(format!("links_{stamp}.json"))
}

fn local_now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// Writes `links` as a pretty-printed JSON array into `output_dir`.
///
/// Uses local time for the file name, falling back to UTC when the local
/// offset is unavailable. Returns the path written.
///
/// # Errors
///
/// Returns [`SidecarError`] on I/O, serialization, or timestamp failure.
#[instrument(skip(links), fields(records = links.len()))]
pub fn write_links_file(links: &[ComicLink], output_dir: &Path) -> Result<PathBuf, SidecarError> {
    let path = output_dir.join(links_file_name(local_now())?);

    let file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .map_err(|source| SidecarError::Io {
            path: path.clone(),
            source,
        })?;

    let write_result = {
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, links)
            .map_err(SidecarError::from)
            .and_then(|()| {
                writer.flush().map_err(|source| SidecarError::Io {
                    path: path.clone(),
                    source,
                })
            })
    };
    if let Err(err) = write_result {
        // A half-written file is worse than none.
        discard_partial(&path);
        return Err(err);
    }

    info!(path = %path.display(), "links file written");
    Ok(path)
}

/// Removes a partial links file; returns false (after a warning) if it stays.
fn discard_partial(path: &Path) -> bool {
    match fs::remove_file(path) {
        Ok(()) => true,
        Err(error) => {
            warn!(path = %path.display(), error = %error, "could not remove partial links file");
            false
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use tempfile::TempDir;
    use time::macros::datetime;

    use super::*;
    use crate::model::HostKind;

    fn read_links_file(path: &Path) -> Vec<ComicLink> {
        serde_json::from_slice(&fs::read(path).unwrap()).unwrap()
    }

    fn sample() -> Vec<ComicLink> {
        let mut first = BTreeMap::new();
        first.insert(HostKind::Main, "https://files.example/a.cbr".to_string());
        first.insert(HostKind::Mediafire, "https://www.mediafire.com/file/a".to_string());
        let mut second = BTreeMap::new();
        second.insert(HostKind::Mega, "https://mega.nz/file/b#k".to_string());
        vec![
            ComicLink::new("Saga #54", "https://getcomics.org/other-comics/saga-54/", first)
                .unwrap(),
            ComicLink::new("Batman #1", "https://getcomics.org/dc/batman-1/", second).unwrap(),
        ]
    }

    #[test]
    fn test_links_file_name_is_zero_padded() {
        let name = links_file_name(datetime!(2024-03-07 04:05:09 UTC)).unwrap();
        assert_eq!(name, "links_2024-03-07_04-05-09.json");
    }

    #[test]
    fn test_round_trip_preserves_records() {
        let dir = TempDir::new().unwrap();
        let records = sample();

        let path = write_links_file(&records, dir.path()).unwrap();
        assert!(
            path.file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("links_")
        );

        let parsed = read_links_file(&path);
        assert_eq!(parsed.len(), records.len());
        for (left, right) in parsed.iter().zip(&records) {
            assert_eq!(left.title, right.title);
            assert_eq!(left.page_url, right.page_url);
            assert_eq!(left.links, right.links);
        }
    }

    #[test]
    fn test_file_uses_page_url_key_and_host_names() {
        let dir = TempDir::new().unwrap();
        let path = write_links_file(&sample(), dir.path()).unwrap();
        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();

        assert_eq!(raw[0]["pageUrl"], "https://getcomics.org/other-comics/saga-54/");
        assert_eq!(raw[0]["links"]["mediafire"], "https://www.mediafire.com/file/a");
        assert_eq!(raw[1]["links"]["mega"], "https://mega.nz/file/b#k");
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = write_links_file(&sample(), &dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, SidecarError::Io { .. }));
    }

    #[test]
    fn test_discard_partial_reports_failure() {
        let dir = TempDir::new().unwrap();
        let partial = dir.path().join("links_partial.json");
        fs::write(&partial, b"[").unwrap();

        assert!(discard_partial(&partial));
        assert!(!partial.exists());
        assert!(!discard_partial(&partial));
    }

    #[test]
    fn test_read_tolerates_unknown_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("links.json");
        fs::write(
            &path,
            r#"[{"title":"T","pageUrl":"https://p/","links":{"main":"https://m/"},"extra":1}]"#,
        )
        .unwrap();
        let parsed = read_links_file(&path);
        assert_eq!(parsed[0].link(HostKind::Main), Some("https://m/"));
    }
}
