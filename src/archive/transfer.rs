//! File placement
//!
//! Copy and move helpers that keep the source's access and modification
//! times on the archived file.

use filetime::{set_file_times, FileTime};
use std::fs;
use std::path::Path;

use crate::config::TransferMode;
use crate::error::{ArchiveError, Result};

/// Ensure the destination's parent directory exists
fn ensure_parent(destination: &Path) -> Result<()> {
    if let Some(parent) = destination.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| ArchiveError::io(parent, e))?;
        }
    }
    Ok(())
}

/// Copy the source's atime/mtime onto the destination
fn copy_times(source_meta: &fs::Metadata, destination: &Path) -> Result<()> {
    let atime = FileTime::from_last_access_time(source_meta);
    let mtime = FileTime::from_last_modification_time(source_meta);
    set_file_times(destination, atime, mtime).map_err(|e| ArchiveError::io(destination, e))
}

/// `fs::copy` with the error tagged on the side that failed
fn copy_contents(source: &Path, destination: &Path) -> Result<()> {
    fs::copy(source, destination).map(|_| ()).map_err(|e| {
        let source_readable = fs::File::open(source)
            .and_then(|f| f.metadata())
            .map(|m| m.is_file())
            .unwrap_or(false);
        let path = if source_readable { destination } else { source };
        ArchiveError::io(path, e)
    })
}

/// Copy `source` to `destination`, overwriting it if present
pub fn perform_copy(source: &Path, destination: &Path) -> Result<()> {
    ensure_parent(destination)?;
    let meta = fs::metadata(source).map_err(|e| ArchiveError::io(source, e))?;

    copy_contents(source, destination)?;
    copy_times(&meta, destination)
}

/// Move `source` to `destination`, replacing any existing file there
pub fn perform_move(source: &Path, destination: &Path) -> Result<()> {
    ensure_parent(destination)?;
    let meta = fs::metadata(source).map_err(|e| ArchiveError::io(source, e))?;

    // Try rename first (same filesystem), fall back to copy+delete.
    // Both replace an existing destination file.
    if let Err(e) = fs::rename(source, destination) {
        tracing::debug!(
            source = %source.display(),
            destination = %destination.display(),
            error = %e,
            "Rename failed, falling back to copy"
        );
        copy_contents(source, destination)?;
        copy_times(&meta, destination)?;
        fs::remove_file(source).map_err(|e| ArchiveError::io(source, e))?;
    }
    Ok(())
}

/// Place a file according to the transfer mode
pub fn place(source: &Path, destination: &Path, mode: TransferMode) -> Result<()> {
    match mode {
        TransferMode::Copy => perform_copy(source, destination),
        TransferMode::Move => perform_move(source, destination),
    }
}
