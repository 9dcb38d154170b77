//! Data types for papers, chunks, and search results.

use serde::{Deserialize, Serialize};

/// Title and author line guessed from a paper's text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaperMetadata {
    /// Best-effort title.
    pub title: String,
    /// Best-effort author line, kept verbatim.
    pub authors: String,
}

/// A paper's extracted text ready to be chunked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// File name of the source PDF. Doubles as the document identifier.
    pub filename: String,
    /// The full extracted text.
    pub text: String,
    /// Metadata copied onto every chunk.
    pub metadata: PaperMetadata,
}

/// Metadata stored with every chunk in the vector collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkMetadata {
    /// Title of the parent paper.
    pub title: String,
    /// Authors of the parent paper.
    pub authors: String,
    /// One-based chunk position within the paper.
    pub page: usize,
    /// File name of the parent paper.
    pub file: String,
}

/// A segment of a [`Document`] with its vector embedding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// `<filename>_<chunk_index>`, zero-based.
    pub id: String,
    /// The text content of the chunk.
    pub text: String,
    /// The vector embedding for this chunk's text. Empty until the indexer embeds it.
    #[serde(default)]
    pub embedding: Vec<f32>,
    /// Title, authors, page and file of the chunk.
    pub metadata: ChunkMetadata,
}

/// Build the storage id of a chunk.
pub fn chunk_id(filename: &str, chunk_index: usize) -> String {
    format!("{filename}_{chunk_index}")
}

/// A retrieved [`Chunk`] paired with a relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// The similarity score (higher is more relevant).
    pub score: f32,
}
