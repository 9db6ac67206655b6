//! Legacy `.cbr` to `.cbz` conversion.

use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;
use rand::distributions::Alphanumeric;
use tracing::{debug, info, warn};

use super::ArchiveError;
use super::rarfile::extract_rar;
use super::zipfile::{has_zip_magic, pack_dir};

const TEMP_SUFFIX_LEN: usize = 10;

/// True if `path` has a `.cbr` extension (any case).
#[must_use]
pub fn is_cbr(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("cbr"))
}

fn temp_dir_for(path: &Path) -> PathBuf {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TEMP_SUFFIX_LEN)
        .map(char::from)
        .collect();
    path.parent()
        .unwrap_or_else(|| Path::new("."))
        .join(format!(".temp-{suffix}"))
}

/// Converts a `.cbr` into a `.cbz` next to it and removes the original.
///
/// A `.cbr` that is really a zip is renamed without repacking. Otherwise the
/// pages are unpacked into a `.temp-<random>` directory beside the file and
/// repacked; the directory is removed whether or not that works. On failure
/// the original is left in place.
///
/// # Errors
///
/// Returns [`ArchiveError`] if extraction, packing, or the final rename fails.
#[tracing::instrument]
pub fn convert_to_cbz(path: &Path) -> Result<PathBuf, ArchiveError> {
    let target = path.with_extension("cbz");

    if has_zip_magic(path) {
        debug!("already a zip container, renaming");
        fs::rename(path, &target).map_err(|e| ArchiveError::io(path, e))?;
        return Ok(target);
    }

    let temp_dir = temp_dir_for(path);
    let result = extract_rar(path, &temp_dir).and_then(|()| pack_dir(&temp_dir, &target));

    if let Err(error) = fs::remove_dir_all(&temp_dir)
        && error.kind() != std::io::ErrorKind::NotFound
    {
        warn!(dir = %temp_dir.display(), error = %error, "could not remove temporary directory");
    }

    match result {
        Ok(()) => {
            fs::remove_file(path).map_err(|e| ArchiveError::io(path, e))?;
            info!(cbz = %target.display(), "converted to CBZ");
            Ok(target)
        }
        Err(error) => {
            if target.exists() {
                discard_partial(&target);
            }
            Err(error)
        }
    }
}

/// Removes a half-written archive; returns false (after a warning) if it stays.
fn discard_partial(path: &Path) -> bool {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "partial CBZ removed");
            true
        }
        Err(error) => {
            warn!(path = %path.display(), error = %error, "could not remove partial CBZ");
            false
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::archive::zipfile::tests::write_zip;

    fn leftover_temp_dirs(dir: &Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter(|entry| {
                entry
                    .as_ref()
                    .unwrap()
                    .file_name()
                    .to_string_lossy()
                    .starts_with(".temp-")
            })
            .count()
    }

    #[test]
    fn test_is_cbr_ignores_case() {
        assert!(is_cbr(Path::new("/out/Saga 001.CBR")));
        assert!(is_cbr(Path::new("issue.cbr")));
        assert!(!is_cbr(Path::new("issue.cbz")));
        assert!(!is_cbr(Path::new("cbr")));
    }

    #[test]
    fn test_zip_disguised_as_cbr_is_renamed() {
        let dir = TempDir::new().unwrap();
        let cbr = dir.path().join("issue.cbr");
        write_zip(&cbr, &[("001.jpg", b"page")]);

        let cbz = convert_to_cbz(&cbr).unwrap();
        assert_eq!(cbz, dir.path().join("issue.cbz"));
        assert!(cbz.exists());
        assert!(!cbr.exists());
    }

    #[test]
    fn test_failed_conversion_keeps_original_and_cleans_up() {
        let dir = TempDir::new().unwrap();
        let cbr = dir.path().join("broken.cbr");
        fs::write(&cbr, b"Rar! but not really").unwrap();

        let err = convert_to_cbz(&cbr).unwrap_err();
        assert!(matches!(err, ArchiveError::Rar { .. }));
        assert!(cbr.exists());
        assert!(!dir.path().join("broken.cbz").exists());
        assert_eq!(leftover_temp_dirs(dir.path()), 0);
    }

    #[test]
    fn test_discard_partial_reports_failure() {
        let dir = TempDir::new().unwrap();
        let partial = dir.path().join("half.cbz");
        fs::write(&partial, b"PK").unwrap();

        assert!(discard_partial(&partial));
        assert!(!partial.exists());
        // A directory cannot be removed as a file.
        assert!(!discard_partial(dir.path()));
        assert!(dir.path().exists());
    }

    #[test]
    fn test_temp_dir_is_hidden_sibling() {
        let temp = temp_dir_for(Path::new("/out/issue.cbr"));
        assert_eq!(temp.parent().unwrap(), Path::new("/out"));
        let name = temp.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(".temp-"));
        assert_eq!(name.len(), ".temp-".len() + TEMP_SUFFIX_LEN);
    }
}
