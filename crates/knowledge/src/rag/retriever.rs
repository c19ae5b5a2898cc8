//! Retrieval of ranked evidence for a question.

use crate::embeddings::EmbeddingProvider;
use crate::index::IndexHandle;
use crate::rag::types::{EvidenceItem, EvidenceSet};
use copilot_core::{AppError, AppResult};
use std::sync::Arc;

/// Source of ranked evidence.
///
/// Implementations return the backend's ranking as-is; they never filter
/// by score. Errors are `RetrievalUnavailable` when nothing has been
/// ingested and `RetrievalBackend` when the backend call fails.
#[async_trait::async_trait]
pub trait Retriever: Send + Sync {
    async fn retrieve(&self, question: &str, limit: usize) -> AppResult<EvidenceSet>;
}

/// Retriever over the in-memory index.
#[derive(Debug, Clone)]
pub struct IndexRetriever {
    handle: IndexHandle,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl IndexRetriever {
    pub fn new(handle: IndexHandle, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { handle, embedder }
    }
}

#[async_trait::async_trait]
impl Retriever for IndexRetriever {
    async fn retrieve(&self, question: &str, limit: usize) -> AppResult<EvidenceSet> {
        let index = self.handle.snapshot().await.ok_or_else(|| {
            AppError::RetrievalUnavailable(
                "No index loaded; ingest documents first".to_string(),
            )
        })?;

        let query = self.embedder.embed(question).await.map_err(|e| match e {
            AppError::RetrievalBackend(_) | AppError::RetrievalUnavailable(_) => e,
            other => AppError::RetrievalBackend(format!("Failed to embed question: {}", other)),
        })?;

        let hits = index.search(&query, limit.max(1))?;

        tracing::debug!(
            "Retrieved {} chunks (top score: {:?})",
            hits.len(),
            hits.first().map(|h| h.score)
        );

        Ok(EvidenceSet::from_items(
            hits.into_iter()
                .map(|hit| {
                    EvidenceItem::new(hit.chunk.content, hit.chunk.source, hit.chunk.id, hit.score)
                })
                .collect(),
        ))
    }
}
