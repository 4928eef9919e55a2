//! Archive pipeline: discovery, placement and the per-run report

pub mod discovery;
pub mod organizer;
pub mod report;
pub mod resolver;
pub mod transfer;

pub use discovery::{collect_candidates, is_markdown};
pub use organizer::ArchiveOrganizer;
pub use report::{ArchiveReport, FailedFile, FileOutcome, PlacedFile, SkippedFile};
pub use resolver::resolve;
pub use transfer::place;
