//! Query-time retrieval scoped to the selected paper.
//!
//! The vector search is global over the collection, so the retriever
//! over-fetches the `top_k` nearest chunks of all papers and then keeps only
//! those of the selected one. With `top_k = 3` that is "top 3 overall,
//! filtered", not "top 3 of this paper".

use std::sync::Arc;

use tracing::{debug, error};

use crate::document::SearchResult;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// A chunk that survived filtering, with what the prompt needs of it.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedChunk {
    /// Title of the paper.
    pub title: String,
    /// One-based chunk position.
    pub page: usize,
    /// Chunk text.
    pub text: String,
    /// Similarity score from the vector store.
    pub score: f32,
}

/// Result of a retrieval.
#[derive(Debug, Clone, PartialEq)]
pub enum Retrieval {
    /// The vector search returned nothing.
    NoResults,
    /// Nearest chunks exist, but none belongs to the selected paper.
    NoMatchInDocument,
    /// Chunks of the selected paper, in search order.
    Found(Vec<RetrievedChunk>),
}

/// Keep only results from `selected`, preserving their order.
pub fn filter_to_document(results: Vec<SearchResult>, selected: &str) -> Retrieval {
    if results.is_empty() {
        return Retrieval::NoResults;
    }
    let chunks: Vec<RetrievedChunk> = results
        .into_iter()
        .filter(|r| r.chunk.metadata.file == selected)
        .map(|r| RetrievedChunk {
            title: r.chunk.metadata.title,
            page: r.chunk.metadata.page,
            text: r.chunk.text,
            score: r.score,
        })
        .collect();
    if chunks.is_empty() { Retrieval::NoMatchInDocument } else { Retrieval::Found(chunks) }
}

/// Embeds a query, searches the collection and filters to the selected paper.
pub struct Retriever {
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    collection: String,
    top_k: usize,
}

impl Retriever {
    /// Create a retriever over `collection` fetching `top_k` chunks per query.
    pub fn new(
        embedding_provider: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStore>,
        collection: impl Into<String>,
        top_k: usize,
    ) -> Self {
        Self { embedding_provider, vector_store, collection: collection.into(), top_k }
    }

    /// Retrieve context for `query` from the paper `selected`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::PipelineError`] if embedding or search fails.
    pub async fn retrieve(&self, query: &str, selected: &str) -> Result<Retrieval> {
        let query_embedding = self.embedding_provider.embed(query).await.map_err(|e| {
            error!(error = %e, "embedding failed during query");
            RagError::PipelineError(format!("query embedding failed: {e}"))
        })?;

        let results = self
            .vector_store
            .search(&self.collection, &query_embedding, self.top_k)
            .await
            .map_err(|e| {
                error!(collection = %self.collection, error = %e, "vector store search failed");
                RagError::PipelineError(format!(
                    "search failed in collection '{}': {e}",
                    self.collection
                ))
            })?;

        let raw_count = results.len();
        let retrieval = filter_to_document(results, selected);
        let kept = match &retrieval {
            Retrieval::Found(chunks) => chunks.len(),
            _ => 0,
        };
        debug!(raw_count, kept, document = selected, "retrieval completed");
        Ok(retrieval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Chunk, ChunkMetadata};

    fn result(file: &str, page: usize, text: &str, score: f32) -> SearchResult {
        SearchResult {
            chunk: Chunk {
                id: format!("{file}_{}", page - 1),
                text: text.to_string(),
                embedding: Vec::new(),
                metadata: ChunkMetadata {
                    title: format!("Title of {file}"),
                    authors: "Someone".to_string(),
                    page,
                    file: file.to_string(),
                },
            },
            score,
        }
    }

    #[test]
    fn empty_search_is_no_results() {
        assert_eq!(filter_to_document(Vec::new(), "a.pdf"), Retrieval::NoResults);
    }

    #[test]
    fn results_from_other_papers_only_is_no_match() {
        let results = vec![result("b.pdf", 1, "x", 0.9), result("c.pdf", 2, "y", 0.8)];
        assert_eq!(filter_to_document(results, "a.pdf"), Retrieval::NoMatchInDocument);
    }

    #[test]
    fn filtering_keeps_selected_paper_in_order() {
        let results = vec![
            result("a.pdf", 4, "first", 0.9),
            result("b.pdf", 1, "other", 0.85),
            result("a.pdf", 2, "second", 0.7),
        ];
        let Retrieval::Found(chunks) = filter_to_document(results, "a.pdf") else {
            panic!("expected chunks");
        };
        let texts: Vec<_> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, ["first", "second"]);
        assert_eq!(chunks[0].page, 4);
        assert_eq!(chunks[0].title, "Title of a.pdf");
    }
}
