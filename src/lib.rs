pub mod ai;
pub mod archive;
pub mod config;
pub mod error;
pub mod index;

use ai::TextOracle;
use archive::{collect_candidates, ArchiveOrganizer, ArchiveReport};
use config::ArchiveConfig;
use error::Result;
use tracing_subscriber::EnvFilter;

/// Load `.env` and install the stderr tracing subscriber.
pub fn init_tracing() {
    // Check the working directory first, then its parent
    if dotenvy::dotenv().is_err() {
        let _ = dotenvy::from_path("../.env");
    }

    // Default: warn for dependencies, info for per-file outcomes
    // Use RUST_LOG=docsort=debug for verbose logs
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,docsort=info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Run the whole pipeline: discover, archive, then refresh the index.
///
/// An oracle failure aborts the run before the index step.
pub async fn run(config: &ArchiveConfig, oracle: &dyn TextOracle) -> Result<ArchiveReport> {
    let candidates = collect_candidates(&config.files, &config.source_dirs)?;
    if candidates.is_empty() {
        tracing::info!("No candidate files found");
    }

    let mut report = ArchiveOrganizer::new(config, oracle).run(&candidates).await?;

    if let Some(index) = &config.index {
        let body = index::generate_index(&config.docs_root, &config.index_link_base());
        report.index = Some(index::write_index(&index.host_document, &index.markers, &body)?);
    }

    Ok(report)
}
