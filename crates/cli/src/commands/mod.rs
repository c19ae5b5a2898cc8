//! Command handlers for the Docs Copilot CLI.
//!
//! This module organizes all CLI commands into separate submodules, plus
//! the output rendering they share.

pub mod ask;
pub mod chat;
pub mod eval;
pub mod ingest;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use chat::ChatCommand;
pub use eval::EvalCommand;
pub use ingest::IngestCommand;

use copilot_core::{config::AppConfig, AppError, AppResult};
use copilot_knowledge::{Citation, WorkflowState};
use serde::Serialize;
use std::path::PathBuf;

/// The user-facing view of one workflow execution.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOutput<'a> {
    pub answer: &'a str,
    pub citations: &'a [Citation],
    pub abstained: bool,
    pub model_abstained: bool,
    pub request_id: &'a str,
}

impl<'a> From<&'a WorkflowState> for AnswerOutput<'a> {
    fn from(state: &'a WorkflowState) -> Self {
        Self {
            answer: state.answer_text(),
            citations: &state.citations,
            abstained: state.should_abstain,
            model_abstained: state.model_abstained,
            request_id: &state.request_id,
        }
    }
}

/// Render a workflow result as JSON or human-readable text.
pub fn render_answer(state: &WorkflowState, json: bool) -> AppResult<String> {
    if json {
        return Ok(serde_json::to_string_pretty(&AnswerOutput::from(state))?);
    }

    let mut out = String::new();
    out.push_str(state.answer_text().trim_end());
    out.push('\n');

    if !state.citations.is_empty() {
        out.push_str("\nSources:\n");
        for (i, citation) in state.citations.iter().enumerate() {
            out.push_str(&format!(
                "[{}] {} ({}, score {:.3})\n    {}\n",
                i + 1,
                citation.source,
                citation.chunk_id,
                citation.score,
                citation.excerpt.replace('\n', " ")
            ));
        }
    }

    Ok(out)
}

/// One-line error for the terminal: the kind code and a generic message.
pub fn render_error(err: &AppError) -> String {
    format!("error [{}]: {}", err.kind(), err.user_message())
}

/// Apply a `--docs` override and validate the merged configuration.
pub fn prepare(mut config: AppConfig, docs: Option<PathBuf>) -> AppResult<AppConfig> {
    if let Some(docs) = docs {
        config.docs_path = docs;
    }
    config.validate()?;
    Ok(config)
}

/// Clap value parser rejecting empty or whitespace-only questions.
pub fn non_blank(raw: &str) -> Result<String, String> {
    if raw.trim().is_empty() {
        Err("question must not be empty".to_string())
    } else {
        Ok(raw.to_string())
    }
}
