//! Docs knowledge base and retrieval-augmented answering.
//!
//! Ingestion reads markdown from a docs directory, chunks and embeds it, and
//! installs an in-memory index behind an [`IndexHandle`]. The [`rag`] module
//! answers questions from that index, abstaining when the best evidence is
//! not relevant enough.

pub mod chunker;
pub mod copilot;
pub mod embeddings;
pub mod eval;
pub mod index;
pub mod ingest;
pub mod parser;
pub mod rag;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use copilot::Copilot;
pub use embeddings::{create_provider, EmbeddingProvider};
pub use eval::{load_cases, run_eval, EvalCase, EvalCaseResult, EvalReport};
pub use index::{IndexHandle, MemoryIndex};
pub use ingest::Ingestor;
pub use rag::{
    AnswerGenerator, Citation, EvidenceItem, EvidenceSet, IndexRetriever, RagWorkflow, Retriever,
    Stage, WorkflowState,
};
pub use types::{DocumentChunk, IngestStats, SourceDocument};
