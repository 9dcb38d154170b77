//! Paper ingestion: extract → metadata → chunk → embed → store.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::chunking::Chunker;
use crate::document::Document;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::extract::TextExtractor;
use crate::metadata::MetadataExtractor;
use crate::registry::PaperRecord;
use crate::vectorstore::VectorStore;

/// Writes one paper's chunks into a collection.
pub struct ChunkIndexer {
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    chunker: Box<dyn Chunker>,
    metadata: Box<dyn MetadataExtractor>,
    extractor: Arc<dyn TextExtractor>,
    collection: String,
}

impl ChunkIndexer {
    pub fn new(
        embedding_provider: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStore>,
        chunker: Box<dyn Chunker>,
        metadata: Box<dyn MetadataExtractor>,
        extractor: Arc<dyn TextExtractor>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            embedding_provider,
            vector_store,
            chunker,
            metadata,
            extractor,
            collection: collection.into(),
        }
    }

    /// Extract a file's text on a blocking thread.
    ///
    /// Failures are logged and yield an empty string, so an unreadable
    /// paper is still registered (with unknown metadata and no chunks).
    pub async fn extract_file(&self, path: PathBuf) -> String {
        let extractor = Arc::clone(&self.extractor);
        let shown = path.display().to_string();
        match tokio::task::spawn_blocking(move || extractor.extract(&path)).await {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                warn!(path = %shown, error = %e, "text extraction failed, indexing empty text");
                String::new()
            }
            Err(e) => {
                warn!(path = %shown, error = %e, "extraction task failed, indexing empty text");
                String::new()
            }
        }
    }

    /// Index `text` under `filename`.
    ///
    /// Chunks left in the collection by an earlier run for the same file are
    /// removed before the new ones are written.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::PipelineError`] if embedding or storage fails.
    pub async fn index_text(&self, filename: &str, text: &str) -> Result<PaperRecord> {
        let metadata = self.metadata.extract(text);
        let document =
            Document { filename: filename.to_string(), text: text.to_string(), metadata };

        let mut chunks = self.chunker.chunk(&document);
        if !chunks.is_empty() {
            let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
            let embeddings =
                self.embedding_provider.embed_batch(&texts).await.map_err(|e| {
                    error!(document = filename, error = %e, "embedding failed during indexing");
                    RagError::PipelineError(format!("embedding failed for '{filename}': {e}"))
                })?;
            for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
                chunk.embedding = embedding;
            }
        }

        self.vector_store.delete_by_file(&self.collection, filename).await.map_err(|e| {
            error!(document = filename, error = %e, "stale chunk cleanup failed");
            RagError::PipelineError(format!("stale chunk cleanup failed for '{filename}': {e}"))
        })?;

        if !chunks.is_empty() {
            self.vector_store.upsert(&self.collection, &chunks).await.map_err(|e| {
                error!(document = filename, error = %e, "upsert failed during indexing");
                RagError::PipelineError(format!("upsert failed for '{filename}': {e}"))
            })?;
        }

        let chunk_count = chunks.len();
        info!(document = filename, title = %document.metadata.title, chunk_count, "indexed paper");

        Ok(PaperRecord {
            title: document.metadata.title,
            filename: document.filename,
            authors: document.metadata.authors,
            chunk_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::FixedSizeChunker;
    use crate::extract::PlainTextExtractor;
    use crate::hashing::HashingEmbeddingProvider;
    use crate::inmemory::InMemoryVectorStore;
    use crate::metadata::FirstLinesExtractor;

    async fn indexer(store: Arc<InMemoryVectorStore>) -> ChunkIndexer {
        store.create_collection("papers", 64).await.unwrap();
        ChunkIndexer::new(
            Arc::new(HashingEmbeddingProvider::new(64)),
            store,
            Box::new(FixedSizeChunker::new(500, 100)),
            Box::new(FirstLinesExtractor),
            Arc::new(PlainTextExtractor),
            "papers",
        )
    }

    #[tokio::test]
    async fn indexes_chunks_with_metadata() {
        let store = Arc::new(InMemoryVectorStore::new());
        let indexer = indexer(store.clone()).await;
        let text = format!("A Title\nAlice, Bob\n{}", "x".repeat(1178));
        assert_eq!(text.chars().count(), 1200);

        let record = indexer.index_text("p.pdf", &text).await.unwrap();
        assert_eq!(record.title, "A Title");
        assert_eq!(record.authors, "Alice, Bob");
        assert_eq!(record.chunk_count, 3);
        assert_eq!(store.len("papers").await, Some(3));
    }

    #[tokio::test]
    async fn empty_text_registers_unknown_paper_without_chunks() {
        let store = Arc::new(InMemoryVectorStore::new());
        let record = indexer(store.clone()).await.index_text("blank.pdf", "").await.unwrap();
        assert_eq!(record.title, crate::metadata::UNKNOWN_TITLE);
        assert_eq!(record.chunk_count, 0);
        assert_eq!(store.len("papers").await, Some(0));
    }

    #[tokio::test]
    async fn reindexing_shorter_text_removes_stale_chunks() {
        let store = Arc::new(InMemoryVectorStore::new());
        let indexer = indexer(store.clone()).await;
        let first = indexer.index_text("p.pdf", &"y".repeat(1200)).await.unwrap();
        assert_eq!(first.chunk_count, 3);
        indexer.index_text("q.pdf", "another paper").await.unwrap();

        let second = indexer.index_text("p.pdf", "short").await.unwrap();
        assert_eq!(second.chunk_count, 1);
        assert_eq!(store.len("papers").await, Some(2));

        indexer.index_text("p.pdf", "").await.unwrap();
        assert_eq!(store.len("papers").await, Some(1));
    }

    #[tokio::test]
    async fn unreadable_file_extracts_as_empty_text() {
        let store = Arc::new(InMemoryVectorStore::new());
        let text = indexer(store).await.extract_file(PathBuf::from("/nonexistent/x.pdf")).await;
        assert!(text.is_empty());
    }
}
