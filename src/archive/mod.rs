//! Post-processing of downloaded files.
//!
//! A downloaded `.zip` is unpacked into the output directory and removed;
//! with CBZ conversion on, every `.cbr` that results (or that was downloaded
//! directly) is repacked as `.cbz`. All of it is synchronous file work, run
//! by the orchestrator on the blocking pool.

mod cbz;
mod error;
mod rarfile;
mod zipfile;

pub use cbz::{convert_to_cbz, is_cbr};
pub use error::ArchiveError;
pub use rarfile::extract_rar;
pub use zipfile::{extract_zip, pack_dir};

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::options::RunOptions;

/// Which post-processing steps to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostProcessOptions {
    /// Directory extracted entries are written to.
    pub output_dir: PathBuf,
    /// Unpack downloaded `.zip` files.
    pub extract: bool,
    /// Convert `.cbr` files to `.cbz`.
    pub cbz: bool,
    /// Write extracted entries by base name only.
    pub flatten: bool,
}

impl From<&RunOptions> for PostProcessOptions {
    fn from(options: &RunOptions) -> Self {
        Self {
            output_dir: options.output_dir.clone(),
            extract: !options.no_extract,
            cbz: options.cbz,
            flatten: options.flatten,
        }
    }
}

/// True if `path` has a `.zip` extension (any case).
#[must_use]
pub fn is_zip(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
}

/// Runs the enabled steps on one downloaded file and returns the files that remain.
///
/// Conversion failures are logged per file and leave that file as it was.
///
/// # Errors
///
/// Returns [`ArchiveError`] only if zip extraction fails; the zip is then
/// kept and no conversion is attempted.
pub fn postprocess(
    downloaded: &Path,
    options: &PostProcessOptions,
) -> Result<Vec<PathBuf>, ArchiveError> {
    let mut files = vec![downloaded.to_path_buf()];

    if options.extract && is_zip(downloaded) {
        info!(archive = %downloaded.display(), "extracting zip archive");
        files = extract_zip(downloaded, &options.output_dir, options.flatten)?;
        fs::remove_file(downloaded).map_err(|e| ArchiveError::io(downloaded, e))?;
        info!(entries = files.len(), "archive extracted, zip removed");
    }

    if options.cbz {
        files = files
            .into_iter()
            .map(|file| {
                if !is_cbr(&file) {
                    return file;
                }
                match convert_to_cbz(&file) {
                    Ok(converted) => converted,
                    Err(error) => {
                        warn!(file = %file.display(), error = %error, "CBZ conversion failed; keeping original");
                        file
                    }
                }
            })
            .collect();
    }

    Ok(files)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::archive::zipfile::tests::write_zip;

    fn options(dir: &Path, extract: bool, cbz: bool) -> PostProcessOptions {
        PostProcessOptions {
            output_dir: dir.to_path_buf(),
            extract,
            cbz,
            flatten: false,
        }
    }

    #[test]
    fn test_options_from_run_options() {
        let run = RunOptions {
            no_extract: true,
            cbz: true,
            flatten: true,
            ..RunOptions::default()
        };
        let post = PostProcessOptions::from(&run);
        assert!(!post.extract);
        assert!(post.cbz);
        assert!(post.flatten);
    }

    #[test]
    fn test_zip_is_extracted_and_removed() {
        let dir = TempDir::new().unwrap();
        let zip = dir.path().join("Pack.ZIP");
        write_zip(&zip, &[("a.cbz", b"1"), ("b.cbz", b"2")]);

        let files = postprocess(&zip, &options(dir.path(), true, false)).unwrap();
        assert_eq!(files, vec![dir.path().join("a.cbz"), dir.path().join("b.cbz")]);
        assert!(!zip.exists());
    }

    #[test]
    fn test_no_extract_leaves_zip() {
        let dir = TempDir::new().unwrap();
        let zip = dir.path().join("pack.zip");
        write_zip(&zip, &[("a.cbz", b"1")]);

        let files = postprocess(&zip, &options(dir.path(), false, false)).unwrap();
        assert_eq!(files, vec![zip.clone()]);
        assert!(zip.exists());
        assert!(!dir.path().join("a.cbz").exists());
    }

    #[test]
    fn test_cbz_converts_extracted_cbr_entries() {
        let dir = TempDir::new().unwrap();
        let inner = dir.path().join("inner.zip");
        write_zip(&inner, &[("001.jpg", b"page")]);
        let inner_bytes = fs::read(&inner).unwrap();
        fs::remove_file(&inner).unwrap();

        let zip = dir.path().join("pack.zip");
        write_zip(&zip, &[("Issue 1.cbr", &inner_bytes), ("notes.txt", b"hi")]);

        let files = postprocess(&zip, &options(dir.path(), true, true)).unwrap();
        assert_eq!(
            files,
            vec![dir.path().join("Issue 1.cbz"), dir.path().join("notes.txt")]
        );
        assert!(!dir.path().join("Issue 1.cbr").exists());
    }

    #[test]
    fn test_failed_conversion_keeps_file() {
        let dir = TempDir::new().unwrap();
        let cbr = dir.path().join("bad.cbr");
        fs::write(&cbr, b"junk").unwrap();

        let files = postprocess(&cbr, &options(dir.path(), true, true)).unwrap();
        assert_eq!(files, vec![cbr.clone()]);
        assert!(cbr.exists());
    }

    #[test]
    fn test_broken_zip_is_kept() {
        let dir = TempDir::new().unwrap();
        let zip = dir.path().join("broken.zip");
        fs::write(&zip, b"nope").unwrap();

        assert!(postprocess(&zip, &options(dir.path(), true, false)).is_err());
        assert!(zip.exists());
    }
}
