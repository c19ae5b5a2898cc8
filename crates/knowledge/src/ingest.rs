//! Ingestion: docs directory to a freshly built index.

use crate::chunker::chunk_text;
use crate::embeddings::EmbeddingProvider;
use crate::index::{IndexHandle, IndexedChunk, MemoryIndex};
use crate::parser::load_documents;
use crate::types::IngestStats;
use chrono::Utc;
use copilot_core::config::IngestSettings;
use copilot_core::{AppError, AppResult};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Builds indexes from markdown documents and installs them in a handle.
#[derive(Debug, Clone)]
pub struct Ingestor {
    embedder: Arc<dyn EmbeddingProvider>,
    handle: IndexHandle,
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Ingestor {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        handle: IndexHandle,
        settings: &IngestSettings,
    ) -> Self {
        Self {
            embedder,
            handle,
            chunk_size: settings.chunk_size,
            chunk_overlap: settings.chunk_overlap,
        }
    }

    /// Handle the new index is installed into.
    pub fn handle(&self) -> &IndexHandle {
        &self.handle
    }

    /// Read, chunk, and embed every document in `docs_dir`, then swap the
    /// new index in.
    ///
    /// With `reset` the current index is dropped first, so retrieval is
    /// unavailable until this run finishes. Without it the previous index
    /// keeps serving until the swap. On failure the handle is left as it was
    /// after the optional reset.
    pub async fn ingest(&self, docs_dir: &Path, reset: bool) -> AppResult<IngestStats> {
        let start = Instant::now();

        tracing::info!("Starting ingestion from {:?} (reset: {})", docs_dir, reset);

        if reset {
            tracing::info!("Resetting index");
            self.handle.clear().await;
        }

        let documents = load_documents(docs_dir)?;
        let mut entries = Vec::new();

        for document in &documents {
            let chunks = chunk_text(
                &document.name,
                &document.text,
                self.chunk_size,
                self.chunk_overlap,
            );
            if chunks.is_empty() {
                tracing::warn!("Document {} produced no chunks", document.name);
                continue;
            }

            let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
            let embeddings = self.embedder.embed_batch(&texts).await?;

            if embeddings.len() != chunks.len() {
                return Err(AppError::Knowledge(format!(
                    "Embedding provider returned {} vectors for {} chunks of {}",
                    embeddings.len(),
                    chunks.len(),
                    document.name
                )));
            }

            tracing::debug!("Embedded {} chunks from {}", chunks.len(), document.name);

            entries.extend(
                chunks
                    .into_iter()
                    .zip(embeddings)
                    .map(|(chunk, embedding)| IndexedChunk { chunk, embedding }),
            );
        }

        let chunks_created = entries.len();
        let index = MemoryIndex::build(self.embedder.dimensions(), entries)?;
        self.handle.replace(index).await;

        let duration = start.elapsed();

        tracing::info!(
            "Ingestion completed: {} documents, {} chunks in {:.2}s",
            documents.len(),
            chunks_created,
            duration.as_secs_f64()
        );

        Ok(IngestStats {
            documents_processed: documents.len(),
            chunks_created,
            ingested_at: Utc::now(),
            duration_secs: duration.as_secs_f64(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::providers::TrigramProvider;
    use std::fs;
    use tempfile::TempDir;

    fn ingestor(handle: IndexHandle) -> Ingestor {
        Ingestor::new(
            Arc::new(TrigramProvider::new(64)),
            handle,
            &IngestSettings {
                chunk_size: 100,
                chunk_overlap: 20,
            },
        )
    }

    #[tokio::test]
    async fn test_ingest_counts_documents_and_chunks() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.md"), "Install with the package manager.").unwrap();
        fs::write(temp.path().join("b.md"), "word ".repeat(50)).unwrap();
        fs::write(temp.path().join("skip.txt"), "ignored").unwrap();

        let handle = IndexHandle::new();
        let stats = ingestor(handle.clone()).ingest(temp.path(), false).await.unwrap();

        assert_eq!(stats.documents_processed, 2);
        // "word " * 50 = 250 chars -> windows at 0, 80, 160
        assert_eq!(stats.chunks_created, 4);
        assert_eq!(handle.snapshot().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_empty_directory_installs_empty_index() {
        let temp = TempDir::new().unwrap();
        let handle = IndexHandle::new();

        let stats = ingestor(handle.clone()).ingest(temp.path(), false).await.unwrap();

        assert_eq!(stats.documents_processed, 0);
        assert!(handle.snapshot().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_directory_keeps_previous_index() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.md"), "Some docs.").unwrap();

        let handle = IndexHandle::new();
        let ingestor = ingestor(handle.clone());
        ingestor.ingest(temp.path(), false).await.unwrap();

        let err = ingestor
            .ingest(&temp.path().join("missing"), false)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "knowledge_error");
        assert!(handle.is_loaded().await);
    }

    #[tokio::test]
    async fn test_reset_clears_before_ingesting() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.md"), "Some docs.").unwrap();

        let handle = IndexHandle::new();
        let ingestor = ingestor(handle.clone());
        ingestor.ingest(temp.path(), false).await.unwrap();

        assert!(ingestor
            .ingest(&temp.path().join("missing"), true)
            .await
            .is_err());
        assert!(!handle.is_loaded().await);
    }
}
