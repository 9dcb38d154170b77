//! In-memory vector store using cosine similarity.
//!
//! This module provides [`InMemoryVectorStore`], a zero-dependency vector store
//! backed by ordered maps protected by a `tokio::sync::RwLock`. It is suitable
//! for a personal paper collection, development, and tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::{Chunk, SearchResult};
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// Chunks of one collection keyed by chunk id.
pub(crate) type CollectionMap = BTreeMap<String, Chunk>;

/// An in-memory vector store using cosine similarity for search.
///
/// Collections are stored as nested ordered maps: collection name → chunk ID → chunk.
/// Equal scores are returned in chunk-id order, so results are deterministic.
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    collections: RwLock<BTreeMap<String, CollectionMap>>,
}

impl InMemoryVectorStore {
    /// Create a new empty in-memory vector store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of chunks stored in a collection, or `None` if it does not exist.
    pub async fn len(&self, collection: &str) -> Option<usize> {
        self.collections.read().await.get(collection).map(BTreeMap::len)
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Score every chunk against `embedding` and keep the best `top_k`.
pub(crate) fn rank(store: &CollectionMap, embedding: &[f32], top_k: usize) -> Vec<SearchResult> {
    let mut scored: Vec<SearchResult> = store
        .values()
        .map(|chunk| SearchResult {
            chunk: chunk.clone(),
            score: cosine_similarity(&chunk.embedding, embedding),
        })
        .collect();

    // Stable sort keeps id order among equal scores.
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(top_k);
    scored
}

pub(crate) fn missing_collection(backend: &str, collection: &str) -> RagError {
    RagError::VectorStoreError {
        backend: backend.to_string(),
        message: format!("collection '{collection}' does not exist"),
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn create_collection(&self, name: &str, _dimensions: usize) -> Result<()> {
        let mut collections = self.collections.write().await;
        collections.entry(name.to_string()).or_default();
        Ok(())
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        let mut collections = self.collections.write().await;
        collections.remove(name);
        Ok(())
    }

    async fn upsert(&self, collection: &str, chunks: &[Chunk]) -> Result<()> {
        let mut collections = self.collections.write().await;
        let store = collections
            .get_mut(collection)
            .ok_or_else(|| missing_collection("InMemory", collection))?;
        for chunk in chunks {
            store.insert(chunk.id.clone(), chunk.clone());
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, ids: &[&str]) -> Result<()> {
        let mut collections = self.collections.write().await;
        let store = collections
            .get_mut(collection)
            .ok_or_else(|| missing_collection("InMemory", collection))?;
        for id in ids {
            store.remove(*id);
        }
        Ok(())
    }

    async fn delete_by_file(&self, collection: &str, file: &str) -> Result<()> {
        let mut collections = self.collections.write().await;
        let store = collections
            .get_mut(collection)
            .ok_or_else(|| missing_collection("InMemory", collection))?;
        store.retain(|_, chunk| chunk.metadata.file != file);
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        let collections = self.collections.read().await;
        let store =
            collections.get(collection).ok_or_else(|| missing_collection("InMemory", collection))?;
        Ok(rank(store, embedding, top_k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_of_zero_vector_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert!((cosine_similarity(&[2.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn operations_on_missing_collection_fail() {
        let store = InMemoryVectorStore::new();
        let err = store.search("nope", &[1.0], 3).await.unwrap_err();
        assert!(matches!(err, RagError::VectorStoreError { .. }));
        assert!(store.upsert("nope", &[]).await.is_err());
    }
}
