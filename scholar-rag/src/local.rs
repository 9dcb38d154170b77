//! Local sentence embeddings with `fastembed`.
//!
//! [`FastEmbedProvider`] runs `all-MiniLM-L6-v2` through ONNX Runtime on the
//! local machine. The model is downloaded into the cache directory on first
//! use and no API key is needed. Only available with the `fastembed` feature.

use std::path::PathBuf;
use std::sync::Arc;

use ::fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use async_trait::async_trait;
use tracing::{debug, error, info};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

const PROVIDER: &str = "fastembed";

/// Output size of `all-MiniLM-L6-v2`.
pub const MINILM_DIMENSIONS: usize = 384;

fn embedding_error(message: impl Into<String>) -> RagError {
    RagError::EmbeddingError { provider: PROVIDER.into(), message: message.into() }
}

/// An [`EmbeddingProvider`] backed by a local `all-MiniLM-L6-v2` model.
pub struct FastEmbedProvider {
    model: Arc<TextEmbedding>,
}

impl FastEmbedProvider {
    /// Load the model from fastembed's default cache directory.
    ///
    /// Blocking: the first call downloads the model files.
    pub fn new() -> Result<Self> {
        Self::load(InitOptions::new(EmbeddingModel::AllMiniLML6V2))
    }

    /// Load the model, caching its files under `dir`.
    pub fn with_cache_dir(dir: impl Into<PathBuf>) -> Result<Self> {
        Self::load(InitOptions::new(EmbeddingModel::AllMiniLML6V2).with_cache_dir(dir.into()))
    }

    fn load(options: InitOptions) -> Result<Self> {
        let model = TextEmbedding::try_new(options).map_err(|e| {
            error!(provider = PROVIDER, error = %e, "failed to load embedding model");
            embedding_error(format!("failed to load all-MiniLM-L6-v2: {e}"))
        })?;
        info!(provider = PROVIDER, model = "all-MiniLM-L6-v2", "embedding model loaded");
        Ok(Self { model: Arc::new(model) })
    }
}

#[async_trait]
impl EmbeddingProvider for FastEmbedProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text])
            .await?
            .pop()
            .ok_or_else(|| embedding_error("model returned no embedding"))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        debug!(provider = PROVIDER, batch_size = texts.len(), "embedding batch");

        // Inference is CPU-bound.
        let model = Arc::clone(&self.model);
        let owned: Vec<String> = texts.iter().map(|t| t.to_string()).collect();
        let vectors = tokio::task::spawn_blocking(move || model.embed(owned, None))
            .await
            .map_err(|e| embedding_error(format!("embedding task failed: {e}")))?
            .map_err(|e| embedding_error(format!("embedding failed: {e}")))?;

        if vectors.len() != texts.len() {
            return Err(embedding_error(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                vectors.len()
            )));
        }
        Ok(vectors)
    }

    fn dimensions(&self) -> usize {
        MINILM_DIMENSIONS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cosine(a: &[f32], b: &[f32]) -> f32 {
        let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
        let norm = |v: &[f32]| v.iter().map(|x| x * x).sum::<f32>().sqrt();
        dot / (norm(a) * norm(b))
    }

    #[tokio::test]
    #[ignore = "downloads all-MiniLM-L6-v2 - run manually"]
    async fn related_sentences_are_closer_than_unrelated_ones() {
        let provider = FastEmbedProvider::new().unwrap();
        let vectors = provider
            .embed_batch(&[
                "Neural networks learn representations from data.",
                "Deep learning models learn features automatically.",
                "The recipe needs two cups of flour.",
            ])
            .await
            .unwrap();

        assert!(vectors.iter().all(|v| v.len() == MINILM_DIMENSIONS));
        assert!(cosine(&vectors[0], &vectors[1]) > cosine(&vectors[0], &vectors[2]));
    }
}
