//! LLM provider factory.
//!
//! This module creates LLM clients from a provider name, resolving the
//! endpoint default and checking that required secrets are present.

use crate::client::LlmClient;
use crate::providers::{OllamaClient, OpenAiCompatClient};
use crate::types::ProviderType;
use copilot_core::{AppError, AppResult};
use std::sync::Arc;
use std::time::Duration;

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("ollama", "openai", "openrouter")
/// * `endpoint` - Optional custom endpoint URL
/// * `api_key` - Optional API key (for providers that require it)
/// * `timeout` - Per-request timeout enforced by the HTTP client
///
/// # Errors
/// Returns `AppError::Config` if the provider is unknown, a required API key
/// is missing, or the HTTP client cannot be built.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
    timeout: Duration,
) -> AppResult<Arc<dyn LlmClient>> {
    let provider_type = ProviderType::parse(provider)
        .ok_or_else(|| AppError::Config(format!("Unknown provider: {}", provider)))?;

    let base_url = endpoint.unwrap_or(provider_type.default_endpoint());

    tracing::debug!(
        "Creating {} client (endpoint: {}, timeout: {:?})",
        provider_type.as_str(),
        base_url,
        timeout
    );

    match provider_type {
        ProviderType::Ollama => Ok(Arc::new(OllamaClient::with_base_url(base_url, timeout)?)),
        ProviderType::OpenAI | ProviderType::OpenRouter => {
            let key = api_key.filter(|k| !k.trim().is_empty()).ok_or_else(|| {
                AppError::Config(format!(
                    "{} provider requires API key",
                    provider_type.as_str()
                ))
            })?;
            Ok(Arc::new(OpenAiCompatClient::new(
                provider_type.as_str(),
                base_url,
                key,
                timeout,
            )?))
        }
    }
}
