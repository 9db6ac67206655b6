//! RAR extraction through the `unrar` bindings.

use std::fs;
use std::path::Path;

use tracing::debug;
use unrar::Archive;

use super::ArchiveError;

/// Extracts every file of the RAR archive at `archive_path` into `dest`.
///
/// # Errors
///
/// Returns [`ArchiveError::Rar`] if the archive cannot be opened or an entry
/// fails to extract.
pub fn extract_rar(archive_path: &Path, dest: &Path) -> Result<(), ArchiveError> {
    fs::create_dir_all(dest).map_err(|e| ArchiveError::io(dest, e))?;

    let mut archive = Archive::new(archive_path)
        .open_for_processing()
        .map_err(|e| ArchiveError::rar(archive_path, e))?;
    while let Some(header) = archive
        .read_header()
        .map_err(|e| ArchiveError::rar(archive_path, e))?
    {
        archive = if header.entry().is_file() {
            debug!(entry = %header.entry().filename.display(), "extracting");
            header
                .extract_with_base(dest)
                .map_err(|e| ArchiveError::rar(archive_path, e))?
        } else {
            header.skip().map_err(|e| ArchiveError::rar(archive_path, e))?
        };
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_garbage_input_is_rar_error() {
        let dir = TempDir::new().unwrap();
        let bogus = dir.path().join("issue.cbr");
        fs::write(&bogus, b"definitely not a rar archive").unwrap();

        let err = extract_rar(&bogus, &dir.path().join("out")).unwrap_err();
        assert!(matches!(err, ArchiveError::Rar { .. }));
    }
}
