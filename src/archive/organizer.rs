//! Archive organizer
//!
//! Drives each candidate through filter, classify, place and the optional
//! rewrite. Candidates are processed one at a time in the order given.
//! Filesystem errors fail only the file at hand; oracle errors end the run.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::discovery::is_markdown;
use super::report::{ArchiveReport, FailedFile, FileOutcome, PlacedFile, SkippedFile};
use super::resolver;
use super::transfer;
use crate::ai::{classify, rewrite, RewriteOutcome, TextOracle};
use crate::config::ArchiveConfig;
use crate::error::{ArchiveError, Result};

/// Archives candidates according to an `ArchiveConfig`
pub struct ArchiveOrganizer<'a> {
    config: &'a ArchiveConfig,
    oracle: &'a dyn TextOracle,
}

/// Whether two paths name the same existing file
fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

impl<'a> ArchiveOrganizer<'a> {
    pub fn new(config: &'a ArchiveConfig, oracle: &'a dyn TextOracle) -> Self {
        Self { config, oracle }
    }

    /// Process all candidates in order.
    ///
    /// Returns the first fatal error; files placed before it stay placed.
    pub async fn run(&self, candidates: &[PathBuf]) -> Result<ArchiveReport> {
        let mut report = ArchiveReport::new();

        tracing::info!(
            run_id = %report.run_id,
            candidates = candidates.len(),
            docs_root = %self.config.docs_root.display(),
            mode = ?self.config.mode,
            "Starting archive run"
        );

        for path in candidates {
            let outcome = self.process(path).await.inspect_err(|e| {
                tracing::error!(path = %path.display(), error = %e, "Aborting run");
            })?;
            report.record(outcome);
        }

        report.finish();
        tracing::info!(run_id = %report.run_id, "{}", report.summary());
        Ok(report)
    }

    /// Run a single candidate to a terminal state
    pub async fn process(&self, path: &Path) -> Result<FileOutcome> {
        if !is_markdown(path) {
            tracing::debug!(path = %path.display(), "Skipping non-Markdown file");
            return Ok(FileOutcome::Skipped(SkippedFile {
                path: path.to_path_buf(),
                reason: "not a Markdown file".to_string(),
            }));
        }

        // A file can vanish between discovery and processing
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable file");
                return Ok(FileOutcome::Skipped(SkippedFile {
                    path: path.to_path_buf(),
                    reason: format!("unreadable: {}", e),
                }));
            }
        };

        match self.archive(path, &content).await {
            Ok(placed) => {
                tracing::info!(
                    source = %placed.source.display(),
                    category = %placed.category,
                    destination = %placed.destination.display(),
                    "Archived"
                );
                Ok(FileOutcome::Placed(placed))
            }
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to archive");
                Ok(FileOutcome::Failed(FailedFile {
                    path: path.to_path_buf(),
                    error: e.to_string(),
                }))
            }
        }
    }

    /// Classify, place and optionally rewrite one readable Markdown file
    async fn archive(&self, source: &Path, content: &str) -> Result<PlacedFile> {
        let category = classify(self.oracle, content, &self.config.categories).await?;

        let category_dir = self.config.docs_root.join(&category);
        fs::create_dir_all(&category_dir).map_err(|e| ArchiveError::io(&category_dir, e))?;

        let basename = source
            .file_name()
            .ok_or_else(|| {
                ArchiveError::io(source, io::Error::new(io::ErrorKind::InvalidInput, "no file name"))
            })?;
        let desired = category_dir.join(basename);

        if same_file(source, &desired) {
            tracing::debug!(path = %source.display(), "Already archived in place");
            return self.finish(source, category, desired, false).await;
        }

        let destination = if self.config.keep_duplicates {
            resolver::resolve(&desired)
        } else {
            if desired.exists() {
                tracing::warn!(
                    destination = %desired.display(),
                    "Overwriting existing archive entry"
                );
            }
            desired.clone()
        };
        let renamed = destination != desired;

        transfer::place(source, &destination, self.config.mode)?;

        self.finish(source, category, destination, renamed).await
    }

    /// Optional rewrite of the placed file, then build the report entry
    async fn finish(
        &self,
        source: &Path,
        category: String,
        destination: PathBuf,
        renamed: bool,
    ) -> Result<PlacedFile> {
        let rewritten = if self.config.transform {
            self.transform(&destination).await?
        } else {
            false
        };

        Ok(PlacedFile {
            source: source.to_path_buf(),
            category,
            destination,
            renamed,
            rewritten,
        })
    }

    /// Rewrite the archived copy in place; keeps it unchanged on unusable output
    async fn transform(&self, placed: &Path) -> Result<bool> {
        let original = fs::read_to_string(placed).map_err(|e| ArchiveError::io(placed, e))?;

        match rewrite(self.oracle, &original).await? {
            RewriteOutcome::Rewritten(text) => {
                fs::write(placed, text).map_err(|e| ArchiveError::io(placed, e))?;
                Ok(true)
            }
            RewriteOutcome::Empty => {
                tracing::warn!(path = %placed.display(), "Rewrite returned nothing; keeping original");
                Ok(false)
            }
            RewriteOutcome::LostMedia(missing) => {
                tracing::warn!(
                    path = %placed.display(),
                    missing = ?missing,
                    "Rewrite dropped media references; keeping original"
                );
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::oracle::stub::StubOracle;
    use crate::ai::OracleError;
    use crate::config::{CategorySet, TransferMode};
    use tempfile::{tempdir, TempDir};

    fn setup(mode: TransferMode, keep_duplicates: bool) -> (TempDir, ArchiveConfig) {
        let dir = tempdir().unwrap();
        let mut config = ArchiveConfig::new(dir.path().join("docs"));
        config.categories = CategorySet::parse("Python,DevOps,Etc");
        config.mode = mode;
        config.keep_duplicates = keep_duplicates;
        fs::create_dir_all(dir.path().join("uploads")).unwrap();
        (dir, config)
    }

    fn upload(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join("uploads").join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_move_into_category() {
        let (dir, config) = setup(TransferMode::Move, false);
        let source = upload(&dir, "decorators.md", "# Decorators");
        let oracle = StubOracle::new(["Python"]);

        let outcome = ArchiveOrganizer::new(&config, &oracle).process(&source).await.unwrap();

        let dest = dir.path().join("docs/Python/decorators.md");
        match outcome {
            FileOutcome::Placed(p) => {
                assert_eq!(p.category, "Python");
                assert_eq!(p.destination, dest);
                assert!(!p.renamed);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(!source.exists());
        assert_eq!(fs::read_to_string(dest).unwrap(), "# Decorators");
    }

    #[tokio::test]
    async fn test_unknown_label_goes_to_fallback() {
        let (dir, config) = setup(TransferMode::Copy, false);
        let source = upload(&dir, "goroutines.md", "# Goroutines");
        let oracle = StubOracle::new(["Go"]);

        ArchiveOrganizer::new(&config, &oracle).process(&source).await.unwrap();

        assert!(dir.path().join("docs/Etc/goroutines.md").exists());
        assert!(source.exists());
    }

    #[tokio::test]
    async fn test_keep_duplicates_suffixes() {
        let (dir, config) = setup(TransferMode::Copy, true);
        let source = upload(&dir, "note.md", "new");
        fs::create_dir_all(dir.path().join("docs/Python")).unwrap();
        fs::write(dir.path().join("docs/Python/note.md"), "old").unwrap();
        let oracle = StubOracle::new(["Python", "Python"]);
        let organizer = ArchiveOrganizer::new(&config, &oracle);

        let first = organizer.process(&source).await.unwrap();
        let second = organizer.process(&source).await.unwrap();

        let dest = |o: FileOutcome| match o {
            FileOutcome::Placed(p) => {
                assert!(p.renamed);
                p.destination
            }
            other => panic!("unexpected outcome: {:?}", other),
        };
        assert_eq!(dest(first), dir.path().join("docs/Python/note_1.md"));
        assert_eq!(dest(second), dir.path().join("docs/Python/note_2.md"));
        assert_eq!(fs::read_to_string(dir.path().join("docs/Python/note.md")).unwrap(), "old");
    }

    #[tokio::test]
    async fn test_without_protection_latest_wins() {
        let (dir, config) = setup(TransferMode::Move, false);
        let source = upload(&dir, "note.md", "new");
        fs::create_dir_all(dir.path().join("docs/Python")).unwrap();
        fs::write(dir.path().join("docs/Python/note.md"), "old").unwrap();
        let oracle = StubOracle::new(["Python"]);

        ArchiveOrganizer::new(&config, &oracle).process(&source).await.unwrap();

        assert_eq!(fs::read_to_string(dir.path().join("docs/Python/note.md")).unwrap(), "new");
        assert!(!dir.path().join("docs/Python/note_1.md").exists());
    }

    #[tokio::test]
    async fn test_non_markdown_and_vanished_are_skipped() {
        let (dir, config) = setup(TransferMode::Move, false);
        let text = upload(&dir, "notes.txt", "plain");
        let gone = dir.path().join("uploads/gone.md");
        let oracle = StubOracle::default();
        let organizer = ArchiveOrganizer::new(&config, &oracle);

        assert!(matches!(organizer.process(&text).await.unwrap(), FileOutcome::Skipped(_)));
        assert!(matches!(organizer.process(&gone).await.unwrap(), FileOutcome::Skipped(_)));
        assert_eq!(oracle.request_count(), 0);
    }

    #[tokio::test]
    async fn test_already_archived_is_noop() {
        let (dir, mut config) = setup(TransferMode::Copy, true);
        config.source_dirs = vec![dir.path().join("docs/Python")];
        fs::create_dir_all(dir.path().join("docs/Python")).unwrap();
        let archived = dir.path().join("docs/Python/a.md");
        fs::write(&archived, "# A").unwrap();
        let oracle = StubOracle::new(["Python"]);

        let outcome = ArchiveOrganizer::new(&config, &oracle).process(&archived).await.unwrap();

        assert!(matches!(outcome, FileOutcome::Placed(ref p) if !p.renamed));
        assert!(!dir.path().join("docs/Python/a_1.md").exists());
    }

    #[tokio::test]
    async fn test_transform_rewrites_placed_copy() {
        let (dir, mut config) = setup(TransferMode::Copy, false);
        config.transform = true;
        let source = upload(&dir, "k8s.md", "pods ![p](pod.png)");
        let oracle = StubOracle::new(["DevOps", "# Pods\n\n![p](pod.png)"]);

        let outcome = ArchiveOrganizer::new(&config, &oracle).process(&source).await.unwrap();

        assert!(matches!(outcome, FileOutcome::Placed(ref p) if p.rewritten));
        let placed = fs::read_to_string(dir.path().join("docs/DevOps/k8s.md")).unwrap();
        assert_eq!(placed, "# Pods\n\n![p](pod.png)\n");
        assert_eq!(fs::read_to_string(&source).unwrap(), "pods ![p](pod.png)");
    }

    #[tokio::test]
    async fn test_transform_empty_keeps_original() {
        let (dir, mut config) = setup(TransferMode::Move, false);
        config.transform = true;
        let source = upload(&dir, "k8s.md", "pods");
        let oracle = StubOracle::new(["DevOps", ""]);

        let outcome = ArchiveOrganizer::new(&config, &oracle).process(&source).await.unwrap();

        assert!(matches!(outcome, FileOutcome::Placed(ref p) if !p.rewritten));
        assert_eq!(fs::read_to_string(dir.path().join("docs/DevOps/k8s.md")).unwrap(), "pods");
    }

    #[tokio::test]
    async fn test_run_aborts_on_oracle_failure() {
        let (dir, config) = setup(TransferMode::Move, false);
        let first = upload(&dir, "a.md", "a");
        let second = upload(&dir, "b.md", "b");
        let third = upload(&dir, "c.md", "c");
        let oracle = StubOracle::new(["Python"]);
        oracle.push_error(OracleError::Status {
            status: 500,
            body: "boom".to_string(),
        });

        let result = ArchiveOrganizer::new(&config, &oracle)
            .run(&[first, second.clone(), third.clone()])
            .await;

        assert!(matches!(result, Err(ArchiveError::Oracle(_))));
        assert!(dir.path().join("docs/Python/a.md").exists());
        assert!(second.exists());
        assert!(third.exists());
    }

    #[tokio::test]
    async fn test_run_isolates_filesystem_failures() {
        let (dir, config) = setup(TransferMode::Copy, false);
        // A plain file where the category directory should go
        fs::create_dir_all(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("docs/DevOps"), "not a dir").unwrap();
        let first = upload(&dir, "a.md", "a");
        let second = upload(&dir, "b.md", "b");
        let oracle = StubOracle::new(["DevOps", "Python"]);

        let report = ArchiveOrganizer::new(&config, &oracle)
            .run(&[first, second])
            .await
            .unwrap();

        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.placed.len(), 1);
        assert_eq!(report.placed[0].category, "Python");
        assert!(!report.success());
    }
}
