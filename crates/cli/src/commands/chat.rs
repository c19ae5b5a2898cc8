//! Interactive chat command handler.

use super::{prepare, render_answer, render_error};
use clap::Args;
use copilot_core::{config::AppConfig, AppError, AppResult};
use copilot_knowledge::Copilot;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Answer questions read line by line from stdin
#[derive(Args, Debug)]
pub struct ChatCommand {
    /// Docs directory (overrides configuration)
    #[arg(long)]
    pub docs: Option<PathBuf>,

    /// Print each answer as JSON
    #[arg(long)]
    pub json: bool,
}

/// What a line of input asks for.
#[derive(Debug, PartialEq, Eq)]
enum ChatInput<'a> {
    Skip,
    Quit,
    Ingest { reset: bool },
    Question(&'a str),
}

fn classify(line: &str) -> ChatInput<'_> {
    match line.trim() {
        "" => ChatInput::Skip,
        "/quit" | "/exit" => ChatInput::Quit,
        "/ingest" => ChatInput::Ingest { reset: false },
        "/reset" => ChatInput::Ingest { reset: true },
        question => ChatInput::Question(question),
    }
}

fn prompt() -> AppResult<()> {
    let mut stderr = std::io::stderr();
    write!(stderr, "> ")?;
    stderr.flush()?;
    Ok(())
}

impl ChatCommand {
    pub async fn execute(&self, config: AppConfig) -> AppResult<()> {
        let config = prepare(config, self.docs.clone())?;
        tracing::info!("Executing chat command");

        let copilot = Copilot::from_config(&config)?;
        let stats = copilot.ingest(false).await?;
        eprintln!(
            "Ready: {} documents, {} chunks. Commands: /ingest, /reset, /quit",
            stats.documents_processed, stats.chunks_created
        );

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        prompt()?;

        while let Some(line) = lines.next_line().await? {
            match classify(&line) {
                ChatInput::Skip => {}
                ChatInput::Quit => break,
                ChatInput::Ingest { reset } => match copilot.ingest(reset).await {
                    Ok(stats) => eprintln!(
                        "Ingested {} documents ({} chunks)",
                        stats.documents_processed, stats.chunks_created
                    ),
                    Err(e) => report(&e),
                },
                ChatInput::Question(question) => match copilot.ask(question).await {
                    Ok(state) => {
                        print!("{}", render_answer(&state, self.json)?);
                        println!();
                    }
                    Err(e) => report(&e),
                },
            }
            prompt()?;
        }

        Ok(())
    }
}

/// Report a failed turn without ending the session.
fn report(err: &AppError) {
    tracing::error!(kind = err.kind(), "Chat turn failed: {}", err);
    eprintln!("{}", render_error(err));
}
