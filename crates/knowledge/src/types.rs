//! Knowledge base types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A markdown document read from the docs directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    /// File name, used as the citation source
    pub name: String,

    /// Full path on disk
    pub path: PathBuf,

    /// Raw document text
    pub text: String,
}

/// A chunk of a document, ready to be embedded and indexed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentChunk {
    /// Stable identifier: `<file>_chunk_<position>`
    pub id: String,

    /// File name of the originating document
    pub source: String,

    /// Position of this chunk within its document
    pub position: u32,

    /// Chunk text
    pub content: String,
}

impl DocumentChunk {
    /// Create a chunk, deriving its id from the source and position.
    pub fn new(source: &str, position: u32, content: impl Into<String>) -> Self {
        Self {
            id: format!("{}_chunk_{}", source, position),
            source: source.to_string(),
            position,
            content: content.into(),
        }
    }
}

/// Statistics from an ingestion run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestStats {
    /// Number of documents read
    pub documents_processed: usize,

    /// Number of chunks embedded and indexed
    pub chunks_created: usize,

    /// When the new index was installed
    pub ingested_at: DateTime<Utc>,

    /// Wall-clock duration of the run
    pub duration_secs: f64,
}
