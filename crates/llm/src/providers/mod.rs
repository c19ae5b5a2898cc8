//! Concrete LLM provider implementations.

pub mod ollama;
pub mod openai;

pub use ollama::OllamaClient;
pub use openai::OpenAiCompatClient;

use copilot_core::AppError;
use std::time::Duration;

/// Build an HTTP client that enforces the per-request timeout.
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client, AppError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))
}

/// Classify a transport failure as a timeout or a backend error.
pub(crate) fn transport_error(provider: &str, err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::GenerationTimeout(format!("{} request timed out: {}", provider, err))
    } else {
        AppError::GenerationBackend(format!("Failed to send request to {}: {}", provider, err))
    }
}

/// Turn a non-success response into a backend error carrying the body text.
pub(crate) async fn status_error(provider: &str, response: reqwest::Response) -> AppError {
    let status = response.status();
    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    AppError::GenerationBackend(format!("{} API error ({}): {}", provider, status, error_text))
}
