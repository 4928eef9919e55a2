//! docsort - classify uploaded Markdown notes into a category archive
//!
//! Sorts each note into `<docs-dir>/<Category>/`, optionally rewrites it
//! into a study format, and refreshes an index region in a host document.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use docsort::ai::{CredentialManager, OpenAiClient};
use docsort::archive::ArchiveReport;
use docsort::config::{
    ArchiveConfig, CategorySet, IndexConfig, OracleSettings, TransferMode, DEFAULT_CATEGORIES,
};
use docsort::index::MarkerRegion;
use docsort::index::region::{DEFAULT_END_MARKER, DEFAULT_START_MARKER};

/// Exit status when the run finished but some files could not be placed
const EXIT_PARTIAL: u8 = 2;

/// Command-line arguments for docsort
#[derive(Parser, Debug)]
#[command(name = "docsort")]
#[command(about = "Classify Markdown notes into a category archive")]
#[command(version)]
struct Args {
    /// Markdown files to archive (in addition to any --uploads-dir)
    files: Vec<PathBuf>,

    /// Comma-separated category vocabulary; "Etc" is always added
    #[arg(long, default_value = DEFAULT_CATEGORIES, env = "DOCSORT_CATEGORIES")]
    categories: String,

    /// Directory scanned for uploads (repeatable). Defaults to "uploads"
    /// when no files are given.
    #[arg(long = "uploads-dir", env = "DOCSORT_UPLOADS_DIR", value_delimiter = ',')]
    uploads_dirs: Vec<PathBuf>,

    /// Archive root
    #[arg(long, default_value = "docs", env = "DOCSORT_DOCS_DIR")]
    docs_dir: PathBuf,

    /// Copy files instead of moving them. Same-named archive entries are
    /// overwritten unless --keep-duplicates is set.
    #[arg(long)]
    copy: bool,

    /// Never overwrite an archived file; pick `name_N.md` instead.
    /// Without it the latest file replaces an existing entry of the same name.
    #[arg(long)]
    keep_duplicates: bool,

    /// Rewrite archived notes into the study format
    #[arg(long)]
    transform: bool,

    /// Host document whose index region is regenerated
    #[arg(long, env = "DOCSORT_INDEX_FILE")]
    index_file: Option<PathBuf>,

    /// Link prefix for index entries (defaults to the docs dir)
    #[arg(long)]
    index_link_base: Option<String>,

    /// Line opening the generated index region in the host document
    #[arg(long, default_value = DEFAULT_START_MARKER)]
    marker_start: String,

    /// Line closing the generated index region in the host document
    #[arg(long, default_value = DEFAULT_END_MARKER)]
    marker_end: String,

    /// Chat model used for classification and rewrites
    #[arg(long, default_value = OracleSettings::DEFAULT_MODEL, env = "DOCSORT_MODEL")]
    model: String,

    /// OpenAI-compatible API base URL
    #[arg(long, default_value = OracleSettings::DEFAULT_API_BASE, env = "OPENAI_BASE_URL")]
    api_base: String,

    /// Print the run report as JSON on stdout
    #[arg(long)]
    json: bool,
}

impl Args {
    fn archive_config(&self) -> ArchiveConfig {
        let mut config = ArchiveConfig::new(&self.docs_dir);
        config.categories = CategorySet::parse(&self.categories);
        config.files = self.files.clone();
        config.source_dirs = if self.uploads_dirs.is_empty() && self.files.is_empty() {
            vec![PathBuf::from("uploads")]
        } else {
            self.uploads_dirs.clone()
        };
        config.mode = if self.copy {
            TransferMode::Copy
        } else {
            TransferMode::Move
        };
        config.keep_duplicates = self.keep_duplicates;
        config.transform = self.transform;
        config.index = self.index_file.as_ref().map(|host| {
            let mut index = IndexConfig::new(host);
            index.link_base = self.index_link_base.clone();
            index.markers = MarkerRegion::new(&self.marker_start, &self.marker_end);
            index
        });
        config
    }

    fn oracle_settings(&self) -> Result<OracleSettings> {
        let api_key = CredentialManager::get_api_key("openai").map_err(anyhow::Error::msg)?;
        let mut settings = OracleSettings::new(api_key);
        settings.model = self.model.clone();
        settings.api_base = self.api_base.clone();
        Ok(settings)
    }
}

fn print_report(report: &ArchiveReport) {
    for placed in &report.placed {
        println!(
            "{} -> {}{}",
            placed.source.display(),
            placed.destination.display(),
            if placed.rewritten { " (rewritten)" } else { "" }
        );
    }
    for skipped in &report.skipped {
        println!("skipped {}: {}", skipped.path.display(), skipped.reason);
    }
    for failed in &report.failed {
        println!("FAILED {}: {}", failed.path.display(), failed.error);
    }
    if let Some(index) = report.index {
        println!("index: {:?}", index);
    }
    println!("{}", report.summary());
}

async fn run(args: Args) -> Result<ArchiveReport> {
    let config = args.archive_config();

    let settings = args.oracle_settings().context("Failed to configure oracle")?;
    let oracle = OpenAiClient::new(settings);
    tracing::info!(model = %oracle.model(), categories = ?config.categories.names(), "Oracle ready");

    let report = docsort::run(&config, &oracle).await.context("Archive run failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(report)
}


#[tokio::main]
async fn main() -> ExitCode {
    docsort::init_tracing();
    let args = Args::parse();

    match run(args).await {
        Ok(report) if report.success() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(EXIT_PARTIAL),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
