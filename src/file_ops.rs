// src/file_ops.rs
//! Stage file I/O
//!
//! Whole-artifact reads and writes between stage directories. Writes go to
//! a temp file next to the target and are persisted in one rename, so a
//! failed stage never leaves a half-written artifact behind.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{CoreError, Result};

/// Map a missing file onto [`CoreError::NotFound`], everything else onto `Io`
pub(crate) fn not_found_or_io(err: io::Error, path: &Path) -> CoreError {
    if err.kind() == io::ErrorKind::NotFound {
        CoreError::NotFound(path.to_path_buf())
    } else {
        CoreError::Io(err)
    }
}

/// Temp file in the directory that will hold `target`
pub(crate) fn temp_beside(target: &Path) -> Result<NamedTempFile> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    tempfile::Builder::new()
        .prefix(".crypter-")
        .tempfile_in(dir)
        .map_err(|e| not_found_or_io(e, dir))
}

/// Read a whole stage artifact into memory
pub fn read_stage_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let path = path.as_ref();
    fs::read(path).map_err(|e| not_found_or_io(e, path))
}

/// Write `bytes` to `path` atomically; returns the number of bytes written
pub fn write_atomic<P: AsRef<Path>>(path: P, bytes: &[u8]) -> Result<u64> {
    let path = path.as_ref();
    let mut tmp = temp_beside(path)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| CoreError::Io(e.error))?;
    Ok(bytes.len() as u64)
}

pub fn file_size<P: AsRef<Path>>(path: P) -> Result<u64> {
    let path = path.as_ref();
    Ok(fs::metadata(path).map_err(|e| not_found_or_io(e, path))?.len())
}

/// Delete every listed file that exists. Missing paths are skipped, so
/// calling this twice with the same list is a no-op the second time.
pub fn remove_files<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();
    for path in paths {
        let path = path.as_ref();
        match fs::remove_file(path) {
            Ok(()) => {
                debug!(path = %path.display(), "removed intermediate artifact");
                removed.push(path.to_path_buf());
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(CoreError::Io(e)),
        }
    }
    Ok(removed)
}
