//! Ask command handler.

use super::{non_blank, prepare, render_answer};
use clap::Args;
use copilot_core::{config::AppConfig, AppResult};
use copilot_knowledge::Copilot;
use std::path::PathBuf;

/// Ask a single question
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to answer
    #[arg(value_parser = non_blank)]
    pub question: String,

    /// Docs directory (overrides configuration)
    #[arg(long)]
    pub docs: Option<PathBuf>,

    /// Number of evidence chunks to retrieve
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Minimum best-chunk similarity required to answer
    #[arg(long)]
    pub min_score: Option<f32>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    pub async fn execute(&self, mut config: AppConfig) -> AppResult<()> {
        if let Some(top_k) = self.top_k {
            config.rag.top_k = top_k;
        }
        if let Some(min_score) = self.min_score {
            config.rag.min_relevance_score = min_score;
        }
        let config = prepare(config, self.docs.clone())?;

        tracing::info!("Executing ask command");
        tracing::debug!("Question: {}", self.question);

        let copilot = Copilot::from_config(&config)?;
        copilot.ingest(false).await?;

        let state = copilot.ask(&self.question).await?;
        print!("{}", render_answer(&state, self.json)?);
        if self.json {
            println!();
        }

        Ok(())
    }
}
