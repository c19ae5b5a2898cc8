//! OpenAI-compatible embedding provider (`POST {base_url}/embeddings`).

use super::{backend_client, check_dimensions};
use crate::embeddings::provider::EmbeddingProvider;
use copilot_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

/// Embeddings from an OpenAI-compatible API.
pub struct OpenAiProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    dimensions: usize,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("dimensions", &self.dimensions)
            .finish()
    }
}

impl OpenAiProvider {
    pub fn new(
        endpoint: Option<&str>,
        api_key: &str,
        model: &str,
        dimensions: usize,
        timeout: Duration,
    ) -> AppResult<Self> {
        Ok(Self {
            client: backend_client(timeout)?,
            base_url: endpoint
                .unwrap_or(DEFAULT_OPENAI_URL)
                .trim_end_matches('/')
                .to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            dimensions,
        })
    }

    /// Order embeddings by their reported index and validate the count.
    fn collect(&self, expected: usize, mut data: Vec<EmbeddingData>) -> AppResult<Vec<Vec<f32>>> {
        if data.len() != expected {
            return Err(AppError::RetrievalBackend(format!(
                "Embedding API returned {} vectors for {} inputs",
                data.len(),
                expected
            )));
        }

        data.sort_by_key(|d| d.index);
        data.into_iter()
            .map(|d| {
                check_dimensions(&d.embedding, self.dimensions)?;
                Ok(d.embedding)
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for OpenAiProvider {
    fn provider_name(&self) -> &str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        tracing::debug!("Embedding {} texts with {}", texts.len(), self.model);

        let url = format!("{}/embeddings", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&EmbeddingRequest {
                model: &self.model,
                input: texts,
            })
            .send()
            .await
            .map_err(|e| {
                AppError::RetrievalBackend(format!("Failed to send embedding request: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::RetrievalBackend(format!(
                "Embedding API error ({}): {}",
                status, body
            )));
        }

        let body: EmbeddingResponse = response.json().await.map_err(|e| {
            AppError::RetrievalBackend(format!("Failed to parse embedding response: {}", e))
        })?;

        self.collect(texts.len(), body.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> OpenAiProvider {
        OpenAiProvider::new(None, "sk-test", "text-embedding-3-small", 3, Duration::from_secs(5))
            .unwrap()
    }

    #[test]
    fn test_collect_orders_by_index() {
        let raw: EmbeddingResponse = serde_json::from_str(
            r#"{"data":[{"index":1,"embedding":[0,1,0]},{"index":0,"embedding":[1,0,0]}]}"#,
        )
        .unwrap();

        let vectors = provider().collect(2, raw.data).unwrap();
        assert_eq!(vectors[0], vec![1.0, 0.0, 0.0]);
        assert_eq!(vectors[1], vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let rendered = format!("{:?}", provider());
        assert!(!rendered.contains("sk-test"));
        assert!(rendered.contains("<redacted>"));
        assert!(rendered.contains("text-embedding-3-small"));
    }

    #[test]
    fn test_collect_rejects_wrong_count() {
        let err = provider().collect(2, Vec::new()).unwrap_err();
        assert_eq!(err.kind(), "retrieval_backend_error");
    }

    #[test]
    fn test_collect_rejects_wrong_dimensions() {
        let data = vec![EmbeddingData {
            index: 0,
            embedding: vec![1.0, 0.0],
        }];
        assert!(provider().collect(1, data).is_err());
    }
}
