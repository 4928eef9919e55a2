//! Index generator
//!
//! Renders the archive tree as a Markdown listing, one section per category
//! directory. Output depends only on the filesystem, so re-running over an
//! unchanged archive yields identical text.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::archive::discovery::is_markdown;

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Sorted, non-hidden entries directly inside `dir` matching `keep`
fn children(dir: &Path, keep: impl Fn(&walkdir::DirEntry) -> bool) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                tracing::warn!(dir = %dir.display(), error = %err, "Skipping unreadable index entry");
                None
            }
        })
        .filter(|e| !is_hidden(e.path()))
        .filter(|e| keep(e))
        .map(|e| e.into_path())
        .collect()
}

/// Link target for one archived file, spaces percent-encoded
fn link_target(link_base: &str, category: &str, file: &str) -> String {
    let base = link_base.trim_end_matches('/');
    let target = if base.is_empty() {
        format!("{}/{}", category, file)
    } else {
        format!("{}/{}/{}", base, category, file)
    };
    target.replace(' ', "%20")
}

/// Render the index for `archive_root`.
///
/// Returns an empty string when the root is missing or holds no categorized
/// Markdown files.
pub fn generate_index(archive_root: &Path, link_base: &str) -> String {
    if !archive_root.is_dir() {
        tracing::debug!(root = %archive_root.display(), "Archive root missing; empty index");
        return String::new();
    }

    let mut sections: Vec<String> = Vec::new();

    for category_dir in children(archive_root, |e| e.file_type().is_dir()) {
        let category = file_name(&category_dir);
        let files = children(&category_dir, |e| e.file_type().is_file() && is_markdown(e.path()));
        if files.is_empty() {
            continue;
        }

        let mut section = format!("## {}\n\n", category);
        let entries: Vec<String> = files
            .iter()
            .map(|f| {
                let name = file_name(f);
                format!("- [{}]({})", name, link_target(link_base, &category, &name))
            })
            .collect();
        section.push_str(&entries.join("\n"));
        sections.push(section);
    }

    sections.join("\n\n")
}
