//! Offline embedding provider based on the hashing trick.
//!
//! [`HashingEmbeddingProvider`] needs no model and no network: every lowercase
//! word is hashed into one of `dimensions` buckets with a hash-derived sign,
//! and the bucket counts are L2-normalized. Texts that share words end up with
//! a positive cosine similarity, which is enough for tests and for running
//! the assistant fully offline.

use async_trait::async_trait;

use crate::embedding::EmbeddingProvider;
use crate::error::Result;

/// Dimensionality of `all-MiniLM-L6-v2`, kept so stores can switch providers.
pub const DEFAULT_HASHING_DIMENSIONS: usize = 384;

/// A deterministic bag-of-words [`EmbeddingProvider`].
#[derive(Debug, Clone)]
pub struct HashingEmbeddingProvider {
    dimensions: usize,
}

impl Default for HashingEmbeddingProvider {
    fn default() -> Self {
        Self::new(DEFAULT_HASHING_DIMENSIONS)
    }
}

impl HashingEmbeddingProvider {
    /// Create a provider producing vectors of the given size (at least 1).
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions: dimensions.max(1) }
    }

    /// Embed synchronously. All-zero for text without any word characters.
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];
        for token in text.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()) {
            let hash = fnv1a(&token.to_lowercase());
            let bucket = (hash % self.dimensions as u64) as usize;
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|x| *x /= norm);
        }
        vector
    }
}

fn fnv1a(token: &str) -> u64 {
    token.bytes().fold(0xcbf2_9ce4_8422_2325u64, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
    })
}

#[async_trait]
impl EmbeddingProvider for HashingEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_text(text))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[test]
    fn embeddings_are_deterministic_and_normalized() {
        let provider = HashingEmbeddingProvider::new(64);
        let a = provider.embed_text("Neural networks learn representations");
        let b = provider.embed_text("neural NETWORKS learn representations");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!((dot(&a, &a) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn shared_words_score_higher_than_disjoint_words() {
        let provider = HashingEmbeddingProvider::default();
        let query = provider.embed_text("gradient descent");
        let related = provider.embed_text("We optimise the loss with gradient descent.");
        let unrelated = provider.embed_text("Protein folding in yeast cells.");
        assert!(dot(&query, &related) > dot(&query, &unrelated));
    }

    #[test]
    fn punctuation_only_text_is_the_zero_vector() {
        let provider = HashingEmbeddingProvider::new(8);
        assert!(provider.embed_text("... !!").iter().all(|x| *x == 0.0));
    }

    #[tokio::test]
    async fn batch_matches_single_embeddings() {
        let provider = HashingEmbeddingProvider::new(32);
        let batch = provider.embed_batch(&["alpha beta", "gamma"]).await.unwrap();
        assert_eq!(batch[0], provider.embed("alpha beta").await.unwrap());
        assert_eq!(batch[1], provider.embed("gamma").await.unwrap());
    }
}
