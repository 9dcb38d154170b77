//! Vector store trait for storing and searching chunk embeddings.

use async_trait::async_trait;

use crate::document::{Chunk, SearchResult};
use crate::error::Result;

/// A storage backend for chunk embeddings with similarity search.
///
/// Implementations manage named collections of [`Chunk`]s. Writes are keyed
/// by chunk id with upsert semantics: writing an id twice keeps the latest
/// chunk. Search is global over the collection; scoping to one paper is the
/// retriever's job.
///
/// # Example
///
/// ```rust,ignore
/// use scholar_rag::{InMemoryVectorStore, VectorStore};
///
/// let store = InMemoryVectorStore::new();
/// store.create_collection("research_papers", 384).await?;
/// store.upsert("research_papers", &chunks).await?;
/// let results = store.search("research_papers", &query_embedding, 3).await?;
/// ```
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create a named collection. No-op if it already exists.
    async fn create_collection(&self, name: &str, dimensions: usize) -> Result<()>;

    /// Delete a named collection and all its data.
    async fn delete_collection(&self, name: &str) -> Result<()>;

    /// Upsert chunks into a collection. Chunks must have embeddings set.
    async fn upsert(&self, collection: &str, chunks: &[Chunk]) -> Result<()>;

    /// Delete chunks by their IDs from a collection. Unknown ids are ignored.
    async fn delete(&self, collection: &str, ids: &[&str]) -> Result<()>;

    /// Delete every chunk whose `metadata.file` is `file`.
    ///
    /// Re-indexing a paper clears its previous chunks this way, so nothing
    /// stale survives even when the earlier run happened in another process.
    async fn delete_by_file(&self, collection: &str, file: &str) -> Result<()>;

    /// Search for the `top_k` most similar chunks to the given embedding.
    ///
    /// Returns results ordered by descending similarity score.
    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>>;
}
