//! Embeddings from OpenAI-compatible `/embeddings` endpoints.
//!
//! Only available with the `openai` feature. OpenAI itself, Ollama, vLLM and
//! text-embeddings-inference all speak this protocol; point the provider at
//! them with [`OpenAIEmbeddingProvider::with_base_url`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

/// The default OpenAI API base URL.
pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

const PROVIDER: &str = "OpenAI";
const DEFAULT_MODEL: &str = "text-embedding-3-small";
const DEFAULT_DIMENSIONS: usize = 1536;

/// Largest `input` array the API accepts in one request.
const MAX_INPUTS_PER_REQUEST: usize = 2048;

fn embedding_error(message: impl Into<String>) -> RagError {
    RagError::EmbeddingError { provider: PROVIDER.into(), message: message.into() }
}

/// An [`EmbeddingProvider`] calling an OpenAI-compatible embeddings API.
///
/// Defaults to `text-embedding-3-small` (1536 dimensions) on api.openai.com.
/// Large batches are split into requests of at most 2048 inputs.
pub struct OpenAIEmbeddingProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    dimensions: usize,
    /// Sent as `dimensions` so the server truncates the vectors.
    request_dimensions: Option<usize>,
}

impl OpenAIEmbeddingProvider {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(embedding_error("API key must not be empty"));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: OPENAI_API_BASE.into(),
            model: DEFAULT_MODEL.into(),
            dimensions: DEFAULT_DIMENSIONS,
            request_dimensions: None,
        })
    }

    /// Read the key from `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| embedding_error("OPENAI_API_KEY environment variable not set"))?;
        Self::new(api_key)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Request vectors of `dims` entries; also what [`dimensions()`](EmbeddingProvider::dimensions) reports.
    pub fn with_dimensions(mut self, dims: usize) -> Self {
        self.dimensions = dims;
        self.request_dimensions = Some(dims);
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/embeddings", self.base_url)
    }

    async fn request(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let body = EmbeddingRequest {
            model: &self.model,
            input: texts,
            dimensions: self.request_dimensions,
        };

        let response =
            self.client.post(self.endpoint()).bearer_auth(&self.api_key).json(&body).send().await;
        let response = response.map_err(|e| {
            error!(provider = PROVIDER, error = %e, "request failed");
            embedding_error(format!("request failed: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let detail =
                serde_json::from_str::<ErrorResponse>(&text).map(|e| e.error.message).unwrap_or(text);
            error!(provider = PROVIDER, %status, "API error");
            return Err(embedding_error(format!("API returned {status}: {detail}")));
        }

        let parsed: EmbeddingResponse = response.json().await.map_err(|e| {
            error!(provider = PROVIDER, error = %e, "failed to parse response");
            embedding_error(format!("failed to parse response: {e}"))
        })?;
        parsed.into_ordered(texts.len())
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

impl EmbeddingResponse {
    /// Vectors in input order; servers may return `data` out of order.
    fn into_ordered(mut self, expected: usize) -> Result<Vec<Vec<f32>>> {
        if self.data.len() != expected {
            return Err(embedding_error(format!(
                "expected {expected} embeddings, got {}",
                self.data.len()
            )));
        }
        self.data.sort_by_key(|d| d.index);
        Ok(self.data.into_iter().map(|d| d.embedding).collect())
    }
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

#[async_trait]
impl EmbeddingProvider for OpenAIEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.request(&[text])
            .await?
            .pop()
            .ok_or_else(|| embedding_error("API returned empty response"))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(MAX_INPUTS_PER_REQUEST) {
            debug!(provider = PROVIDER, model = %self.model, batch_size = batch.len(), "embedding batch");
            vectors.extend(self.request(batch).await?);
        }
        Ok(vectors)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_api_key() {
        assert!(matches!(OpenAIEmbeddingProvider::new(""), Err(RagError::EmbeddingError { .. })));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let provider = OpenAIEmbeddingProvider::new("sk-test")
            .unwrap()
            .with_base_url("http://localhost:11434/v1/")
            .with_model("all-minilm")
            .with_dimensions(384);
        assert_eq!(provider.endpoint(), "http://localhost:11434/v1/embeddings");
        assert_eq!(provider.dimensions(), 384);
    }

    #[test]
    fn response_is_reordered_by_index() {
        let raw = r#"{"data":[{"index":1,"embedding":[2.0]},{"index":0,"embedding":[1.0]}]}"#;
        let parsed: EmbeddingResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.into_ordered(2).unwrap(), vec![vec![1.0], vec![2.0]]);
    }

    #[test]
    fn short_response_is_an_error() {
        let parsed: EmbeddingResponse =
            serde_json::from_str(r#"{"data":[{"index":0,"embedding":[1.0]}]}"#).unwrap();
        assert!(parsed.into_ordered(2).is_err());
    }

    #[tokio::test]
    async fn empty_batch_makes_no_request() {
        let provider = OpenAIEmbeddingProvider::new("sk-test").unwrap();
        assert!(provider.embed_batch(&[]).await.unwrap().is_empty());
    }
}
