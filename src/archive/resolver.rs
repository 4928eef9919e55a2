//! Duplicate resolver
//!
//! Finds a free name for an archive destination by appending `_1`, `_2`, ...
//! to the file stem.

use std::path::{Path, PathBuf};

/// Split a file name into stem and extension (with its dot)
fn split_name(path: &Path) -> (String, String) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "file".to_string());
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    (stem, ext)
}

/// Path with `_{counter}` inserted before the extension
pub fn suffixed_path(original: &Path, counter: u64) -> PathBuf {
    let parent = original.parent().unwrap_or(Path::new("."));
    let (stem, ext) = split_name(original);
    parent.join(format!("{}_{}{}", stem, counter, ext))
}

/// Return `desired` if free, otherwise the first free `stem_N.ext`.
///
/// Terminates for any finite directory: each probe checks a distinct name.
pub fn resolve(desired: &Path) -> PathBuf {
    if !desired.exists() {
        return desired.to_path_buf();
    }

    let mut counter: u64 = 1;
    loop {
        let candidate = suffixed_path(desired, counter);
        if !candidate.exists() {
            tracing::debug!(
                desired = %desired.display(),
                resolved = %candidate.display(),
                "Destination taken, using suffixed name"
            );
            return candidate;
        }
        counter += 1;
    }
}
