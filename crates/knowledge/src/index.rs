//! In-memory vector index and the shared handle that owns it.
//!
//! A `MemoryIndex` is immutable once built. Ingestion builds a new one and
//! swaps it into the `IndexHandle`; readers take an `Arc` snapshot and never
//! hold the lock across a search.

use crate::types::DocumentChunk;
use copilot_core::{AppError, AppResult};
use std::cmp::Ordering;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A chunk together with its embedding.
#[derive(Debug, Clone)]
pub struct IndexedChunk {
    pub chunk: DocumentChunk,
    pub embedding: Vec<f32>,
}

/// A search hit: chunk plus cosine similarity (higher is better).
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub chunk: DocumentChunk,
    pub score: f32,
}

/// Brute-force cosine similarity index held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryIndex {
    dimensions: usize,
    entries: Vec<IndexedChunk>,
}

impl MemoryIndex {
    /// Build an index, checking that every embedding has `dimensions` entries.
    pub fn build(dimensions: usize, entries: Vec<IndexedChunk>) -> AppResult<Self> {
        if let Some(bad) = entries.iter().find(|e| e.embedding.len() != dimensions) {
            return Err(AppError::Knowledge(format!(
                "Chunk {} has {} dimensions, index expects {}",
                bad.chunk.id,
                bad.embedding.len(),
                dimensions
            )));
        }

        Ok(Self {
            dimensions,
            entries,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Return the `limit` most similar chunks, best first.
    ///
    /// Ties are broken by chunk id so results are deterministic.
    pub fn search(&self, query: &[f32], limit: usize) -> AppResult<Vec<ScoredChunk>> {
        if self.entries.is_empty() {
            return Ok(Vec::new());
        }

        if query.len() != self.dimensions {
            return Err(AppError::RetrievalBackend(format!(
                "Query has {} dimensions, index expects {}",
                query.len(),
                self.dimensions
            )));
        }

        let mut scored: Vec<(f32, &IndexedChunk)> = self
            .entries
            .iter()
            .map(|entry| (cosine_similarity(query, &entry.embedding), entry))
            .collect();

        scored.sort_by(|a, b| {
            score_order(a.0, b.0).then_with(|| a.1.chunk.id.cmp(&b.1.chunk.id))
        });

        Ok(scored
            .into_iter()
            .take(limit)
            .map(|(score, entry)| ScoredChunk {
                chunk: entry.chunk.clone(),
                score,
            })
            .collect())
    }
}

/// Best-first ordering of similarity scores. NaN sorts after every real score.
pub(crate) fn score_order(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.total_cmp(&a),
    }
}

/// Cosine similarity in `[-1, 1]`; zero when either vector has no magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

/// Shared ownership of the current index.
///
/// Empty until the first ingestion completes. Cloning the handle shares the
/// same slot.
#[derive(Debug, Clone, Default)]
pub struct IndexHandle {
    slot: Arc<RwLock<Option<Arc<MemoryIndex>>>>,
}

impl IndexHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current index, if one has been installed.
    pub async fn snapshot(&self) -> Option<Arc<MemoryIndex>> {
        self.slot.read().await.clone()
    }

    /// Install a new index, replacing any previous one wholesale.
    pub async fn replace(&self, index: MemoryIndex) {
        let chunks = index.len();
        *self.slot.write().await = Some(Arc::new(index));
        tracing::debug!("Installed new index with {} chunks", chunks);
    }

    /// Drop the current index; retrieval is unavailable until the next `replace`.
    pub async fn clear(&self) {
        *self.slot.write().await = None;
        tracing::debug!("Cleared index");
    }

    pub async fn is_loaded(&self) -> bool {
        self.slot.read().await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, embedding: Vec<f32>) -> IndexedChunk {
        IndexedChunk {
            chunk: DocumentChunk {
                id: id.to_string(),
                source: "doc.md".to_string(),
                position: 0,
                content: format!("content of {}", id),
            },
            embedding,
        }
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_search_orders_best_first() {
        let index = MemoryIndex::build(
            2,
            vec![
                entry("far", vec![0.0, 1.0]),
                entry("near", vec![1.0, 0.1]),
                entry("mid", vec![1.0, 1.0]),
            ],
        )
        .unwrap();

        let hits = index.search(&[1.0, 0.0], 10).unwrap();
        let ids: Vec<_> = hits.iter().map(|h| h.chunk.id.as_str()).collect();

        assert_eq!(ids, vec!["near", "mid", "far"]);
        assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_search_with_nan_scores_ranks_them_last() {
        let entries = (0..24)
            .map(|i| {
                let embedding = if i % 4 == 0 {
                    vec![f32::NAN, 1.0]
                } else {
                    vec![1.0, i as f32 / 10.0]
                };
                entry(&format!("c{:02}", i), embedding)
            })
            .collect();
        let index = MemoryIndex::build(2, entries).unwrap();

        let hits = index.search(&[1.0, 0.0], 24).unwrap();
        assert_eq!(hits.len(), 24);
        assert_eq!(hits[0].chunk.id, "c01");
        assert!(hits[..18].iter().all(|h| !h.score.is_nan()));
        assert!(hits[18..].iter().all(|h| h.score.is_nan()));
    }

    #[test]
    fn test_score_order_is_total_with_nan() {
        assert_eq!(score_order(0.9, 0.1), Ordering::Less);
        assert_eq!(score_order(f32::NAN, 0.1), Ordering::Greater);
        assert_eq!(score_order(-1.0, f32::NAN), Ordering::Less);
        assert_eq!(score_order(f32::NAN, f32::NAN), Ordering::Equal);
    }

    #[test]
    fn test_search_respects_limit_and_ties() {
        let index = MemoryIndex::build(
            2,
            vec![
                entry("b", vec![1.0, 0.0]),
                entry("a", vec![1.0, 0.0]),
                entry("c", vec![0.0, 1.0]),
            ],
        )
        .unwrap();

        let hits = index.search(&[1.0, 0.0], 2).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].chunk.id, "a");
        assert_eq!(hits[1].chunk.id, "b");
    }

    #[test]
    fn test_build_rejects_mismatched_dimensions() {
        let err = MemoryIndex::build(3, vec![entry("x", vec![1.0])]).unwrap_err();
        assert_eq!(err.kind(), "knowledge_error");
    }

    #[test]
    fn test_query_dimension_mismatch() {
        let index = MemoryIndex::build(2, vec![entry("x", vec![1.0, 0.0])]).unwrap();
        let err = index.search(&[1.0], 1).unwrap_err();
        assert_eq!(err.kind(), "retrieval_backend_error");
    }

    #[tokio::test]
    async fn test_handle_lifecycle() {
        let handle = IndexHandle::new();
        assert!(handle.snapshot().await.is_none());

        handle
            .replace(MemoryIndex::build(2, vec![entry("x", vec![1.0, 0.0])]).unwrap())
            .await;
        let first = handle.snapshot().await.unwrap();
        assert_eq!(first.len(), 1);

        handle.replace(MemoryIndex::build(2, Vec::new()).unwrap()).await;
        assert!(handle.snapshot().await.unwrap().is_empty());
        // Earlier snapshots are unaffected by the swap.
        assert_eq!(first.len(), 1);

        handle.clear().await;
        assert!(!handle.is_loaded().await);
    }

    #[tokio::test]
    async fn test_cloned_handles_share_slot() {
        let handle = IndexHandle::new();
        let reader = handle.clone();

        handle.replace(MemoryIndex::default()).await;
        assert!(reader.is_loaded().await);
    }
}
