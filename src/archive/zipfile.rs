//! Zip extraction and packing.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::ArchiveError;

const ZIP_MAGIC: [u8; 4] = [b'P', b'K', 0x03, 0x04];

/// True if the file starts with a zip local-file header.
pub(crate) fn has_zip_magic(path: &Path) -> bool {
    let mut header = [0_u8; 4];
    File::open(path)
        .and_then(|mut file| file.read_exact(&mut header))
        .is_ok_and(|()| header == ZIP_MAGIC)
}

/// Extracts every entry of `archive_path` into `dest`.
///
/// Internal paths are kept unless `flatten` is set, in which case entries
/// land in `dest` by base name. Entries whose names would escape `dest` are
/// skipped. Returns the extracted file paths in archive order.
///
/// # Errors
///
/// Returns [`ArchiveError`] when the archive cannot be read or an entry
/// cannot be written.
pub fn extract_zip(
    archive_path: &Path,
    dest: &Path,
    flatten: bool,
) -> Result<Vec<PathBuf>, ArchiveError> {
    let file = File::open(archive_path).map_err(|e| ArchiveError::io(archive_path, e))?;
    let mut archive =
        ZipArchive::new(BufReader::new(file)).map_err(|e| ArchiveError::zip(archive_path, e))?;
    fs::create_dir_all(dest).map_err(|e| ArchiveError::io(dest, e))?;

    let mut extracted = Vec::new();
    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| ArchiveError::zip(archive_path, e))?;
        let Some(relative) = entry.enclosed_name().map(Path::to_path_buf) else {
            warn!(entry = entry.name(), "skipping zip entry outside the output directory");
            continue;
        };

        if entry.is_dir() {
            if !flatten {
                let dir = dest.join(&relative);
                fs::create_dir_all(&dir).map_err(|e| ArchiveError::io(&dir, e))?;
            }
            continue;
        }

        let target = if flatten {
            match relative.file_name() {
                Some(name) => dest.join(name),
                None => continue,
            }
        } else {
            dest.join(&relative)
        };
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| ArchiveError::io(parent, e))?;
        }

        debug!(entry = %relative.display(), "extracting");
        let mut out = File::create(&target).map_err(|e| ArchiveError::io(&target, e))?;
        io::copy(&mut entry, &mut out).map_err(|e| ArchiveError::io(&target, e))?;
        extracted.push(target);
    }
    Ok(extracted)
}

/// Packs the contents of `source_dir` into a new zip at `dest`.
///
/// Entry names are relative to `source_dir` with `/` separators, sorted so
/// page order follows file names.
///
/// # Errors
///
/// Returns [`ArchiveError`] when a file cannot be read or the zip written.
pub fn pack_dir(source_dir: &Path, dest: &Path) -> Result<(), ArchiveError> {
    let mut files = Vec::new();
    collect_files(source_dir, &mut files)?;
    files.sort();

    let out = File::create(dest).map_err(|e| ArchiveError::io(dest, e))?;
    let mut zip = ZipWriter::new(BufWriter::new(out));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for path in files {
        let Ok(relative) = path.strip_prefix(source_dir) else {
            continue;
        };
        let name = relative
            .components()
            .map(|component| component.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        zip.start_file(name, options)
            .map_err(|e| ArchiveError::zip(dest, e))?;
        let mut input = File::open(&path).map_err(|e| ArchiveError::io(&path, e))?;
        io::copy(&mut input, &mut zip).map_err(|e| ArchiveError::io(dest, e))?;
    }

    zip.finish().map_err(|e| ArchiveError::zip(dest, e))?;
    Ok(())
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), ArchiveError> {
    for entry in fs::read_dir(dir).map_err(|e| ArchiveError::io(dir, e))? {
        let path = entry.map_err(|e| ArchiveError::io(dir, e))?.path();
        if path.is_dir() {
            collect_files(&path, files)?;
        } else {
            files.push(path);
        }
    }
    Ok(())
}
