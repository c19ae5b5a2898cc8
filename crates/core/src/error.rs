//! Error types for Docs Copilot.
//!
//! This module defines a unified error enum that covers every error category
//! in the application. The four RAG failure kinds (retrieval unavailable,
//! retrieval backend, generation backend, generation timeout) are distinct
//! variants so callers can tell them apart without inspecting messages.

use thiserror::Error;

/// Unified error type for Docs Copilot.
///
/// All fallible functions return `Result<T, AppError>`.
/// Abstaining from an answer is not an error and never appears here.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No vector index is loaded; the operator must ingest documents first.
    #[error("Retrieval unavailable: {0}")]
    RetrievalUnavailable(String),

    /// The similarity backend call itself failed.
    #[error("Retrieval backend error: {0}")]
    RetrievalBackend(String),

    /// The language-model provider failed (network, status, malformed response).
    #[error("Generation backend error: {0}")]
    GenerationBackend(String),

    /// The language-model call exceeded its time allotment.
    #[error("Generation timed out: {0}")]
    GenerationTimeout(String),

    /// Ingestion and knowledge base errors
    #[error("Knowledge error: {0}")]
    Knowledge(String),

    /// Prompt system errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Stable machine-readable code for this error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Config(_) => "config_error",
            AppError::Io(_) => "io_error",
            AppError::RetrievalUnavailable(_) => "retrieval_unavailable",
            AppError::RetrievalBackend(_) => "retrieval_backend_error",
            AppError::GenerationBackend(_) => "generation_backend_error",
            AppError::GenerationTimeout(_) => "generation_timeout",
            AppError::Knowledge(_) => "knowledge_error",
            AppError::Prompt(_) => "prompt_error",
            AppError::Serialization(_) => "serialization_error",
            AppError::Other(_) => "internal_error",
        }
    }

    /// Generic, detail-free message suitable for end users.
    ///
    /// The full error (with provider messages, paths, etc.) belongs in logs only.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::RetrievalUnavailable(_) => {
                "No documents have been ingested yet. Run ingestion and try again."
            }
            AppError::RetrievalBackend(_) => {
                "The document search service failed. Please try again later."
            }
            AppError::GenerationBackend(_) => {
                "The language model service failed. Please try again later."
            }
            AppError::GenerationTimeout(_) => {
                "The language model took too long to respond. Please try again later."
            }
            AppError::Config(_) => "The application is misconfigured.",
            _ => "An unexpected error occurred.",
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rag_error_kinds_are_distinct() {
        let kinds = [
            AppError::RetrievalUnavailable("x".into()).kind(),
            AppError::RetrievalBackend("x".into()).kind(),
            AppError::GenerationBackend("x".into()).kind(),
            AppError::GenerationTimeout("x".into()).kind(),
        ];

        for (i, a) in kinds.iter().enumerate() {
            for b in kinds.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_user_message_hides_details() {
        let err = AppError::GenerationBackend("HTTP 500 from http://10.0.0.3:11434".into());
        assert!(!err.user_message().contains("10.0.0.3"));
        assert!(err.to_string().contains("10.0.0.3"));
    }

    #[test]
    fn test_from_serde_json() {
        let err: AppError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert_eq!(err.kind(), "serialization_error");
    }
}
