//! Run report
//!
//! One entry per candidate, grouped by terminal state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

use crate::index::IndexUpdate;

/// A file that reached the archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedFile {
    /// Where the candidate was read from
    pub source: PathBuf,
    /// Category chosen by the classifier (or the fallback)
    pub category: String,
    /// Final archive path
    pub destination: PathBuf,
    /// Whether the duplicate resolver picked a suffixed name
    pub renamed: bool,
    /// Whether the archived copy was rewritten
    pub rewritten: bool,
}

/// A candidate left alone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// A candidate whose placement hit a filesystem error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedFile {
    pub path: PathBuf,
    pub error: String,
}

/// Terminal state of one candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Placed(PlacedFile),
    Skipped(SkippedFile),
    Failed(FailedFile),
}

/// Result of an archival run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub placed: Vec<PlacedFile>,
    pub skipped: Vec<SkippedFile>,
    pub failed: Vec<FailedFile>,
    /// Index step outcome, `None` when the step is disabled
    pub index: Option<IndexUpdate>,
}

impl ArchiveReport {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: None,
            placed: Vec::new(),
            skipped: Vec::new(),
            failed: Vec::new(),
            index: None,
        }
    }

    pub fn record(&mut self, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Placed(p) => self.placed.push(p),
            FileOutcome::Skipped(s) => self.skipped.push(s),
            FileOutcome::Failed(f) => self.failed.push(f),
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Whether every candidate was placed or deliberately skipped
    pub fn success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.placed.len() + self.skipped.len() + self.failed.len()
    }

    /// One-line human summary
    pub fn summary(&self) -> String {
        let renamed = self.placed.iter().filter(|p| p.renamed).count();
        let rewritten = self.placed.iter().filter(|p| p.rewritten).count();
        format!(
            "{} placed ({} renamed, {} rewritten), {} skipped, {} failed",
            self.placed.len(),
            renamed,
            rewritten,
            self.skipped.len(),
            self.failed.len()
        )
    }
}

impl Default for ArchiveReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_summary() {
        let mut report = ArchiveReport::new();
        report.record(FileOutcome::Placed(PlacedFile {
            source: PathBuf::from("uploads/a.md"),
            category: "Python".to_string(),
            destination: PathBuf::from("docs/Python/a_1.md"),
            renamed: true,
            rewritten: false,
        }));
        report.record(FileOutcome::Skipped(SkippedFile {
            path: PathBuf::from("uploads/b.txt"),
            reason: "not a Markdown file".to_string(),
        }));
        report.finish();

        assert!(report.success());
        assert_eq!(report.total(), 2);
        assert!(report.finished_at.is_some());
        assert_eq!(
            report.summary(),
            "1 placed (1 renamed, 0 rewritten), 1 skipped, 0 failed"
        );
    }

    #[test]
    fn test_failure_marks_unsuccessful() {
        let mut report = ArchiveReport::new();
        report.record(FileOutcome::Failed(FailedFile {
            path: PathBuf::from("uploads/c.md"),
            error: "permission denied".to_string(),
        }));
        assert!(!report.success());
    }

    #[test]
    fn test_serializes_camel_case() {
        let report = ArchiveReport::new();
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("runId").is_some());
        assert!(json.get("startedAt").is_some());
        assert!(json["index"].is_null());
    }
}
