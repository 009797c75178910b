// src/archive.rs
//! Single-entry zip archiver
//!
//! `pack` always writes exactly one DEFLATE entry named after the source
//! file. `unpack` only ever reads the first entry in central-directory
//! order; any further entries are logged and ignored.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{CoreError, Result};
use crate::file_ops::{not_found_or_io, temp_beside};

/// Compress `source` into a single-entry zip at `dest`; returns the zip size
pub fn pack<P: AsRef<Path>, Q: AsRef<Path>>(source: P, dest: Q) -> Result<u64> {
    let source = source.as_ref();
    let dest = dest.as_ref();

    let entry_name = source
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| CoreError::NotFound(source.to_path_buf()))?;
    let mut input = File::open(source).map_err(|e| not_found_or_io(e, source))?;

    let mut tmp = temp_beside(dest)?;
    {
        let mut zip = ZipWriter::new(tmp.as_file_mut());
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(0o644);
        zip.start_file(entry_name, options)?;
        io::copy(&mut input, &mut zip)?;
        zip.finish()?;
    }
    tmp.as_file().sync_all()?;
    let file = tmp.persist(dest).map_err(|e| CoreError::Io(e.error))?;

    Ok(file.metadata()?.len())
}

/// Extract the first entry of `container` into `dest_dir`.
///
/// Returns the extracted file name (final path component only) and its path.
pub fn unpack<P: AsRef<Path>, Q: AsRef<Path>>(
    container: P,
    dest_dir: Q,
) -> Result<(String, PathBuf)> {
    let container = container.as_ref();
    let dest_dir = dest_dir.as_ref();

    let file = File::open(container).map_err(|e| not_found_or_io(e, container))?;
    let mut archive = ZipArchive::new(file)?;

    if archive.is_empty() {
        return Err(CoreError::MalformedContainer(format!(
            "{} holds no entries",
            container.display()
        )));
    }
    if archive.len() > 1 {
        warn!(
            container = %container.display(),
            entries = archive.len(),
            "archive holds more than one entry; extracting only the first"
        );
    }

    let mut entry = archive.by_index(0)?;
    if entry.is_dir() {
        return Err(CoreError::MalformedContainer(format!(
            "first entry of {} is a directory",
            container.display()
        )));
    }
    let name = entry
        .enclosed_name()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .filter(|n| !n.is_empty())
        .ok_or_else(|| {
            CoreError::MalformedContainer(format!(
                "first entry of {} has no usable file name",
                container.display()
            ))
        })?;

    let out_path = dest_dir.join(&name);
    let mut tmp = temp_beside(&out_path)?;
    io::copy(&mut entry, tmp.as_file_mut())?;
    tmp.as_file().sync_all()?;
    tmp.persist(&out_path).map_err(|e| CoreError::Io(e.error))?;

    Ok((name, out_path))
}
