//! Candidate discovery
//!
//! Collects the files a run will consider: explicit paths first, then the
//! top level of each source directory in name order.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{ArchiveError, Result};

/// Extensions treated as Markdown (case-insensitive)
const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];

/// Whether a path names a Markdown file by extension
pub fn is_markdown(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .map(|e| MARKDOWN_EXTENSIONS.contains(&e.as_str()))
        .unwrap_or(false)
}

/// Regular files directly inside `dir`, sorted by file name.
///
/// A missing directory is created and yields nothing.
pub fn list_source_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        tracing::info!(dir = %dir.display(), "Source directory does not exist; creating it");
        fs::create_dir_all(dir).map_err(|e| ArchiveError::io(dir, e))?;
        return Ok(Vec::new());
    }

    let files = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                tracing::warn!(dir = %dir.display(), error = %err, "Skipping unreadable entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect();

    Ok(files)
}

/// Explicit files followed by directory listings, each path once
pub fn collect_candidates(files: &[PathBuf], source_dirs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut candidates = Vec::new();

    for file in files {
        if seen.insert(file.clone()) {
            candidates.push(file.clone());
        }
    }

    for dir in source_dirs {
        for file in list_source_dir(dir)? {
            if seen.insert(file.clone()) {
                candidates.push(file);
            }
        }
    }

    Ok(candidates)
}
