//! Embedding provider implementations.

pub mod ollama;
pub mod openai;
pub mod trigram;

pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;
pub use trigram::TrigramProvider;

use copilot_core::{AppError, AppResult};
use std::time::Duration;

/// Build an HTTP client for a remote embedding backend.
pub(crate) fn backend_client(timeout: Duration) -> AppResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))
}

/// Reject vectors whose length differs from the configured dimensions.
pub(crate) fn check_dimensions(embedding: &[f32], expected: usize) -> AppResult<()> {
    if embedding.len() != expected {
        return Err(AppError::RetrievalBackend(format!(
            "Unexpected embedding dimensions: got {}, expected {}",
            embedding.len(),
            expected
        )));
    }
    Ok(())
}
