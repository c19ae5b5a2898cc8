//! Grounded answer generation.

use crate::rag::types::{Citation, EvidenceSet};
use copilot_core::config::GenerationSettings;
use copilot_core::AppResult;
use copilot_llm::{LlmClient, LlmRequest};
use copilot_prompt::{build_prompt, PromptDefinition};
use std::collections::HashMap;
use std::sync::Arc;

/// Result of one generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedAnswer {
    pub answer: String,
    pub citations: Vec<Citation>,
    /// The model replied with the "I don't know" sentinel.
    pub model_abstained: bool,
}

/// Turns evidence into a grounded prompt, calls the model once, and
/// attaches citations.
pub struct AnswerGenerator {
    llm: Arc<dyn LlmClient>,
    prompt: PromptDefinition,
    model: String,
    settings: GenerationSettings,
}

impl AnswerGenerator {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        prompt: PromptDefinition,
        model: impl Into<String>,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            llm,
            prompt,
            model: model.into(),
            settings,
        }
    }

    /// Render the prompt for a question and its evidence.
    pub fn render_prompt(&self, question: &str, evidence: &EvidenceSet) -> AppResult<LlmRequest> {
        let mut variables = HashMap::new();
        variables.insert("question".to_string(), question.to_string());
        variables.insert("context".to_string(), format_context(evidence));

        let built = build_prompt(&self.prompt, variables)?;

        let mut request = LlmRequest::new(built.user, self.model.clone())
            .with_temperature(self.settings.temperature);
        if let Some(max_tokens) = self.settings.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }
        if let Some(system) = built.system {
            request = request.with_system(system);
        }
        Ok(request)
    }

    /// Generate an answer. The model is invoked exactly once and failures
    /// are returned as-is.
    pub async fn generate(&self, question: &str, evidence: &EvidenceSet) -> AppResult<GeneratedAnswer> {
        let request = self.render_prompt(question, evidence)?;

        tracing::debug!(
            "Generating answer with {} ({} evidence items)",
            self.llm.provider_name(),
            evidence.len()
        );

        let response = self.llm.complete(&request).await?;
        let model_abstained = contains_sentinel(&response.content);

        Ok(GeneratedAnswer {
            citations: evidence.iter().map(Citation::from).collect(),
            answer: response.content,
            model_abstained,
        })
    }
}

/// Number evidence `[1]`, `[2]`, ... in set order, each with its source tag.
pub fn format_context(evidence: &EvidenceSet) -> String {
    evidence
        .iter()
        .enumerate()
        .map(|(i, item)| {
            format!(
                "[{}] {}\nSource: {} ({})",
                i + 1,
                item.content,
                item.source,
                item.chunk_id
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Whether an answer contains "I don't know", ignoring case and the
/// apostrophe variant.
pub fn contains_sentinel(answer: &str) -> bool {
    answer
        .to_lowercase()
        .replace('\u{2019}', "'")
        .contains("i don't know")
}
