//! The retrieve, decide, generate state machine.

use crate::rag::gate::decide;
use crate::rag::generator::AnswerGenerator;
use crate::rag::retriever::Retriever;
use crate::rag::types::{Stage, WorkflowState};
use copilot_core::config::RagSettings;
use copilot_core::AppResult;
use std::sync::Arc;

/// Answers questions from retrieved evidence, or abstains.
///
/// Executions are independent; one workflow can serve concurrent callers
/// behind an `Arc`.
pub struct RagWorkflow {
    retriever: Arc<dyn Retriever>,
    generator: AnswerGenerator,
    settings: RagSettings,
}

impl RagWorkflow {
    pub fn new(
        retriever: Arc<dyn Retriever>,
        generator: AnswerGenerator,
        settings: RagSettings,
    ) -> Self {
        Self {
            retriever,
            generator,
            settings,
        }
    }

    pub fn settings(&self) -> &RagSettings {
        &self.settings
    }

    /// Run one execution to completion.
    ///
    /// The question must be non-blank; callers validate it. Abstention is a
    /// successful result. Any stage failure ends the execution and its error
    /// is returned unchanged.
    pub async fn execute(&self, question: &str) -> AppResult<WorkflowState> {
        let mut state = WorkflowState::new(question);

        while !state.stage.is_terminal() {
            let next = self.step(&mut state).await?;
            tracing::debug!(
                request_id = %state.request_id,
                "Workflow {} -> {}",
                state.stage,
                next
            );
            state.stage = next;
        }

        tracing::info!(
            request_id = %state.request_id,
            abstained = state.should_abstain,
            model_abstained = state.model_abstained,
            evidence = state.evidence.len(),
            "Workflow completed"
        );

        Ok(state)
    }

    /// Perform the work of the current stage and return the next one.
    async fn step(&self, state: &mut WorkflowState) -> AppResult<Stage> {
        let next = match state.stage {
            Stage::Start => Stage::Retrieving,

            Stage::Retrieving => {
                state.evidence = self
                    .retriever
                    .retrieve(&state.question, self.settings.top_k)
                    .await?;
                Stage::Deciding
            }

            Stage::Deciding => {
                let decision = decide(&state.evidence, self.settings.min_relevance_score);
                state.should_abstain = decision.should_abstain;
                state.abstain_reason = decision.abstain_reason;

                if state.should_abstain {
                    Stage::Abstained
                } else {
                    Stage::Generating
                }
            }

            Stage::Abstained => {
                state.answer = state.abstain_reason.clone();
                state.citations = Vec::new();
                Stage::Done
            }

            Stage::Generating => {
                let generated = self
                    .generator
                    .generate(&state.question, &state.evidence)
                    .await?;
                state.answer = Some(generated.answer);
                state.citations = generated.citations;
                state.model_abstained = generated.model_abstained;
                Stage::Done
            }

            Stage::Done => Stage::Done,
        };

        Ok(next)
    }
}
