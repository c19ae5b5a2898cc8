//! Wiring of the ingestion pipeline and the RAG workflow from configuration.

use crate::embeddings::create_provider;
use crate::index::IndexHandle;
use crate::ingest::Ingestor;
use crate::rag::{AnswerGenerator, IndexRetriever, RagWorkflow, WorkflowState};
use crate::types::IngestStats;
use copilot_core::{AppConfig, AppResult};
use copilot_llm::create_client;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// A ready-to-serve copilot: one index handle shared by ingestion and
/// retrieval, plus the workflow that answers questions.
pub struct Copilot {
    ingestor: Ingestor,
    workflow: Arc<RagWorkflow>,
    docs_path: PathBuf,
}

impl Copilot {
    /// Build every collaborator from configuration. Nothing is ingested yet.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let embedder = create_provider(
            &config.embedding,
            config.resolve_embedding_api_key().as_deref(),
        )?;

        let llm = create_client(
            &config.provider,
            config.resolve_endpoint(&config.provider).as_deref(),
            config.resolve_api_key(&config.provider).as_deref(),
            Duration::from_secs(config.generation.timeout_secs),
        )?;

        let prompt = copilot_prompt::load_or_default(&config.workspace)?;

        let handle = IndexHandle::new();
        let ingestor = Ingestor::new(embedder.clone(), handle.clone(), &config.ingest);
        let retriever = Arc::new(IndexRetriever::new(handle, embedder));
        let generator = AnswerGenerator::new(
            llm,
            prompt,
            config.model.clone(),
            config.generation.clone(),
        );

        tracing::debug!(
            "Copilot ready (provider: {}, model: {}, topK: {}, minRelevanceScore: {})",
            config.provider,
            config.model,
            config.rag.top_k,
            config.rag.min_relevance_score
        );

        Ok(Self {
            ingestor,
            workflow: Arc::new(RagWorkflow::new(retriever, generator, config.rag)),
            docs_path: config.resolved_docs_path(),
        })
    }

    /// Ingest the configured docs directory.
    pub async fn ingest(&self, reset: bool) -> AppResult<IngestStats> {
        self.ingestor.ingest(&self.docs_path, reset).await
    }

    /// Answer one question.
    pub async fn ask(&self, question: &str) -> AppResult<WorkflowState> {
        self.workflow.execute(question).await
    }

    pub fn workflow(&self) -> Arc<RagWorkflow> {
        Arc::clone(&self.workflow)
    }

    pub fn index(&self) -> &IndexHandle {
        self.ingestor.handle()
    }

    pub fn docs_path(&self) -> &std::path::Path {
        &self.docs_path
    }
}
