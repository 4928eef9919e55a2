//! Marker-region updater
//!
//! Replaces the text between a start and an end marker in a host document,
//! appending the region when the markers are absent. Everything outside the
//! region is preserved byte-for-byte.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

use crate::error::{ArchiveError, Result};

pub const DEFAULT_START_MARKER: &str = "<!-- DOCSORT:INDEX:START -->";
pub const DEFAULT_END_MARKER: &str = "<!-- DOCSORT:INDEX:END -->";

/// Literal start/end tokens delimiting the managed region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerRegion {
    pub start: String,
    pub end: String,
}

impl MarkerRegion {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Byte range strictly between the markers of the first complete pair.
    ///
    /// Anchored on the first end marker and the nearest start marker before
    /// it, so a stray start marker earlier in the text never widens the span.
    fn inner_span(&self, document: &str) -> Option<(usize, usize)> {
        if self.start.is_empty() || self.end.is_empty() {
            return None;
        }

        let mut from = 0;
        while let Some(found) = document[from..].find(&self.end) {
            let end_at = from + found;
            if let Some(start_at) = document[..end_at].rfind(&self.start) {
                return Some((start_at + self.start.len(), end_at));
            }
            from = end_at + self.end.len();
        }
        None
    }

    /// Splice `body` into `document`.
    ///
    /// Applying the same body twice gives the same text as applying it once.
    pub fn update(&self, document: &str, body: &str) -> String {
        let inner = format!("\n{}\n", body.trim_end_matches('\n'));

        if let Some((from, to)) = self.inner_span(document) {
            let mut updated = String::with_capacity(document.len() + inner.len());
            updated.push_str(&document[..from]);
            updated.push_str(&inner);
            updated.push_str(&document[to..]);
            return updated;
        }

        let mut updated = document.to_string();
        if !updated.is_empty() && !updated.ends_with('\n') {
            updated.push('\n');
        }
        updated.push_str(&self.start);
        updated.push_str(&inner);
        updated.push_str(&self.end);
        updated.push('\n');
        updated
    }
}

impl Default for MarkerRegion {
    fn default() -> Self {
        Self::new(DEFAULT_START_MARKER, DEFAULT_END_MARKER)
    }
}

/// Replace (or append) the default marker region of `document` with `body`
pub fn update_region(document: &str, body: &str) -> String {
    MarkerRegion::default().update(document, body)
}

/// What the index step did to the host document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IndexUpdate {
    Updated,
    Unchanged,
    HostMissing,
}

/// Rewrite the marker region of the file at `host`.
///
/// Writes only when the text changes. A missing host is reported, not created.
pub fn write_index(host: &Path, markers: &MarkerRegion, body: &str) -> Result<IndexUpdate> {
    let document = match fs::read_to_string(host) {
        Ok(d) => d,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::warn!(host = %host.display(), "Index host document not found; skipping index update");
            return Ok(IndexUpdate::HostMissing);
        }
        Err(e) => return Err(ArchiveError::io(host, e)),
    };

    let updated = markers.update(&document, body);
    if updated == document {
        tracing::debug!(host = %host.display(), "Index unchanged");
        return Ok(IndexUpdate::Unchanged);
    }

    fs::write(host, updated).map_err(|e| ArchiveError::io(host, e))?;
    tracing::info!(host = %host.display(), "Index updated");
    Ok(IndexUpdate::Updated)
}
