//! Run configuration
//!
//! Everything the pipeline needs to know about one archival run. The binary
//! fills this in from command-line flags; tests build it directly.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::index::MarkerRegion;

/// Catch-all category used whenever classification yields no valid label
pub const FALLBACK_CATEGORY: &str = "Etc";

/// Category list used when none is configured
pub const DEFAULT_CATEGORIES: &str = "Python,JavaScript,DevOps,Database,Etc";

/// Whether `name` stays a single directory directly under the archive root
fn is_directory_name(name: &str) -> bool {
    !name.starts_with('.') && !name.contains(['/', '\\']) && !name.contains('\0')
}

/// Ordered, de-duplicated category vocabulary.
///
/// The fallback category is always a member, appended at the end when the
/// user-supplied list leaves it out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySet {
    names: Vec<String>,
}

impl CategorySet {
    /// Build from an iterator of names (trimmed, empties and repeats dropped).
    ///
    /// Names that could escape the archive root (separators, `.`/`..`,
    /// hidden names) are dropped with a warning.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut unique: Vec<String> = Vec::new();
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() || unique.iter().any(|n| n == name) {
                continue;
            }
            if !is_directory_name(name) {
                tracing::warn!(category = %name, "Ignoring category that is not a plain directory name");
                continue;
            }
            unique.push(name.to_string());
        }

        if !unique.iter().any(|n| n == FALLBACK_CATEGORY) {
            unique.push(FALLBACK_CATEGORY.to_string());
        }

        Self { names: unique }
    }

    /// Parse a comma-separated list, e.g. `"Python, DevOps,Etc"`
    pub fn parse(list: &str) -> Self {
        Self::new(list.split(','))
    }

    /// Whether `label` is exactly one of the categories (case-sensitive)
    pub fn contains(&self, label: &str) -> bool {
        self.names.iter().any(|n| n == label)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn fallback(&self) -> &str {
        FALLBACK_CATEGORY
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for CategorySet {
    fn default() -> Self {
        Self::parse(DEFAULT_CATEGORIES)
    }
}

/// How a candidate reaches the archive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferMode {
    /// Relocate the source; the archive becomes the file's only home
    #[default]
    Move,
    /// Leave the source in place and archive a copy
    Copy,
}

/// Where and how to regenerate the index listing
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Host document holding the marker region (usually README.md)
    pub host_document: PathBuf,
    /// Prefix for link targets; defaults to the archive root
    pub link_base: Option<String>,
    /// Start/end tokens delimiting the generated region
    pub markers: MarkerRegion,
}

impl IndexConfig {
    pub fn new(host_document: impl Into<PathBuf>) -> Self {
        Self {
            host_document: host_document.into(),
            link_base: None,
            markers: MarkerRegion::default(),
        }
    }
}

/// Configuration for one archival run
#[derive(Debug, Clone)]
pub struct ArchiveConfig {
    /// Category vocabulary (always includes the fallback)
    pub categories: CategorySet,
    /// Directories scanned (non-recursively) for candidates
    pub source_dirs: Vec<PathBuf>,
    /// Candidate files given explicitly, processed before directory scans
    pub files: Vec<PathBuf>,
    /// Archive root; categories become its immediate subdirectories
    pub docs_root: PathBuf,
    /// Copy or move into the archive
    pub mode: TransferMode,
    /// Resolve destination collisions with `_N` suffixes instead of overwriting
    pub keep_duplicates: bool,
    /// Rewrite archived copies into the structured note format
    pub transform: bool,
    /// Index regeneration, disabled when `None`
    pub index: Option<IndexConfig>,
}

impl ArchiveConfig {
    pub fn new(docs_root: impl Into<PathBuf>) -> Self {
        Self {
            categories: CategorySet::default(),
            source_dirs: Vec::new(),
            files: Vec::new(),
            docs_root: docs_root.into(),
            mode: TransferMode::default(),
            keep_duplicates: false,
            transform: false,
            index: None,
        }
    }

    /// Link prefix used by the index: explicit base or the archive root
    pub fn index_link_base(&self) -> String {
        self.index
            .as_ref()
            .and_then(|i| i.link_base.clone())
            .unwrap_or_else(|| self.docs_root.to_string_lossy().replace('\\', "/"))
    }
}

/// Connection settings for the OpenAI-compatible oracle
#[derive(Debug, Clone)]
pub struct OracleSettings {
    pub api_base: String,
    pub model: String,
    pub api_key: String,
}

impl OracleSettings {
    pub const DEFAULT_API_BASE: &'static str = "https://api.openai.com/v1";
    pub const DEFAULT_MODEL: &'static str = "gpt-4o-mini";

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_base: Self::DEFAULT_API_BASE.to_string(),
            model: Self::DEFAULT_MODEL.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Full URL of the chat completions endpoint
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }
}
