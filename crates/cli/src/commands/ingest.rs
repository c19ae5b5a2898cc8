//! Ingest command handler.

use super::prepare;
use clap::Args;
use copilot_core::{config::AppConfig, AppResult};
use copilot_knowledge::Copilot;
use std::path::PathBuf;

/// Ingest the markdown corpus and report counts
#[derive(Args, Debug)]
pub struct IngestCommand {
    /// Docs directory (overrides configuration)
    #[arg(long)]
    pub docs: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl IngestCommand {
    pub async fn execute(&self, config: AppConfig) -> AppResult<()> {
        let config = prepare(config, self.docs.clone())?;
        tracing::info!("Executing ingest command for {:?}", config.resolved_docs_path());

        let copilot = Copilot::from_config(&config)?;
        let stats = copilot.ingest(true).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        } else {
            println!(
                "Ingested {} documents ({} chunks) in {:.2}s",
                stats.documents_processed, stats.chunks_created, stats.duration_secs
            );
        }

        Ok(())
    }
}
