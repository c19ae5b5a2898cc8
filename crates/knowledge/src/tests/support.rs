//! Test doubles for the retriever and the language model.

use crate::rag::{AnswerGenerator, EvidenceItem, EvidenceSet, RagWorkflow, Retriever};
use copilot_core::config::{GenerationSettings, RagSettings};
use copilot_core::{AppError, AppResult};
use copilot_llm::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use std::sync::{Arc, Mutex};

/// What the scripted retriever does on every call.
#[derive(Debug, Clone)]
pub enum RetrievalScript {
    Evidence(Vec<EvidenceItem>),
    Unavailable,
    BackendError,
}

/// Retriever that replays a fixed script and records requested limits.
pub struct ScriptedRetriever {
    script: RetrievalScript,
    pub limits: Mutex<Vec<usize>>,
}

impl ScriptedRetriever {
    pub fn new(script: RetrievalScript) -> Arc<Self> {
        Arc::new(Self {
            script,
            limits: Mutex::new(Vec::new()),
        })
    }

    pub fn with_evidence(items: Vec<EvidenceItem>) -> Arc<Self> {
        Self::new(RetrievalScript::Evidence(items))
    }
}

#[async_trait::async_trait]
impl Retriever for ScriptedRetriever {
    async fn retrieve(&self, _question: &str, limit: usize) -> AppResult<EvidenceSet> {
        self.limits.lock().unwrap().push(limit);
        match &self.script {
            RetrievalScript::Evidence(items) => Ok(EvidenceSet::from_items(items.clone())),
            RetrievalScript::Unavailable => Err(AppError::RetrievalUnavailable(
                "no index loaded".to_string(),
            )),
            RetrievalScript::BackendError => Err(AppError::RetrievalBackend(
                "vector store unreachable".to_string(),
            )),
        }
    }
}

/// What the recording model replies.
#[derive(Debug, Clone)]
pub enum ModelScript {
    Reply(String),
    Timeout,
    BackendError,
}

/// Language model that records every prompt it receives.
pub struct RecordingLlm {
    script: ModelScript,
    pub prompts: Mutex<Vec<String>>,
}

impl RecordingLlm {
    pub fn new(script: ModelScript) -> Arc<Self> {
        Arc::new(Self {
            script,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn replying(text: &str) -> Arc<Self> {
        Self::new(ModelScript::Reply(text.to_string()))
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl LlmClient for RecordingLlm {
    fn provider_name(&self) -> &str {
        "recording"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        self.prompts.lock().unwrap().push(request.prompt.clone());
        match &self.script {
            ModelScript::Reply(text) => Ok(LlmResponse {
                content: text.clone(),
                model: request.model.clone(),
                usage: LlmUsage::new(10, 5),
            }),
            ModelScript::Timeout => Err(AppError::GenerationTimeout(
                "request timed out after 60s".to_string(),
            )),
            ModelScript::BackendError => Err(AppError::GenerationBackend(
                "503 Service Unavailable".to_string(),
            )),
        }
    }
}

/// Workflow over the given doubles with the built-in prompt.
pub fn workflow(
    retriever: Arc<dyn Retriever>,
    llm: Arc<dyn LlmClient>,
    min_relevance_score: f32,
) -> RagWorkflow {
    let generator = AnswerGenerator::new(
        llm,
        copilot_prompt::grounded_answer(),
        "test-model",
        GenerationSettings::default(),
    );

    RagWorkflow::new(
        retriever,
        generator,
        RagSettings {
            min_relevance_score,
            top_k: 5,
        },
    )
}

pub fn item(content: &str, source: &str, chunk_id: &str, score: f32) -> EvidenceItem {
    EvidenceItem::new(content, source, chunk_id, score)
}
