//! Document chunking strategies.
//!
//! This module provides the [`Chunker`] trait and two implementations:
//!
//! - [`FixedSizeChunker`] - fixed character windows with a fixed overlap
//! - [`RecursiveChunker`] - splits on paragraphs, lines, words, then characters
//!   and merges the pieces back up to the chunk size
//!
//! All sizes are counted in characters, never bytes, so multi-byte text
//! extracted from PDFs is always cut on a character boundary.

use std::collections::VecDeque;

use crate::config::{AssistantConfig, ChunkingStrategy};
use crate::document::{Chunk, ChunkMetadata, Document, chunk_id};

/// A strategy for splitting documents into chunks.
///
/// Implementations produce [`Chunk`]s with text and metadata but no embeddings.
/// Embeddings are attached later by the indexer.
pub trait Chunker: Send + Sync {
    /// Split a document into chunks.
    ///
    /// Returns an empty `Vec` if the document has empty text. Chunk `i` gets
    /// the id `<filename>_<i>` and `page = i + 1`.
    fn chunk(&self, document: &Document) -> Vec<Chunk>;
}

/// Build the chunker selected by a configuration.
pub fn chunker_for(config: &AssistantConfig) -> Box<dyn Chunker> {
    match config.chunking {
        ChunkingStrategy::Fixed => {
            Box::new(FixedSizeChunker::new(config.chunk_size, config.chunk_overlap))
        }
        ChunkingStrategy::Recursive => {
            Box::new(RecursiveChunker::new(config.chunk_size, config.chunk_overlap))
        }
    }
}

fn into_chunks(document: &Document, texts: Vec<String>) -> Vec<Chunk> {
    texts
        .into_iter()
        .enumerate()
        .map(|(i, text)| Chunk {
            id: chunk_id(&document.filename, i),
            text,
            embedding: Vec::new(),
            metadata: ChunkMetadata {
                title: document.metadata.title.clone(),
                authors: document.metadata.authors.clone(),
                page: i + 1,
                file: document.filename.clone(),
            },
        })
        .collect()
}

/// An overlap of `chunk_size` or more would never advance past the first window.
fn clamp_overlap(chunk_size: usize, chunk_overlap: usize) -> usize {
    chunk_overlap.min(chunk_size.saturating_sub(1))
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Splits text into fixed-size chunks by character count with configurable overlap.
///
/// Consecutive chunks share exactly `chunk_overlap` characters. Splitting stops
/// as soon as a chunk reaches the end of the text, so 1200 characters with
/// `(500, 100)` produce chunks starting at 0, 400 and 800.
///
/// # Example
///
/// ```rust,ignore
/// use scholar_rag::FixedSizeChunker;
///
/// let chunker = FixedSizeChunker::new(500, 100);
/// let chunks = chunker.chunk(&document);
/// ```
#[derive(Debug, Clone)]
pub struct FixedSizeChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl FixedSizeChunker {
    /// Create a new `FixedSizeChunker`.
    ///
    /// # Arguments
    ///
    /// * `chunk_size` - maximum number of characters per chunk
    /// * `chunk_overlap` - number of overlapping characters between consecutive chunks,
    ///   clamped below `chunk_size` so every window advances
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self { chunk_size, chunk_overlap: clamp_overlap(chunk_size, chunk_overlap) }
    }
}

impl Chunker for FixedSizeChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        into_chunks(document, split_by_size(&document.text, self.chunk_size, self.chunk_overlap))
    }
}

/// Character-window splitting with overlap.
fn split_by_size(text: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    if text.is_empty() || chunk_size == 0 {
        return Vec::new();
    }

    // Byte offset of every character start, plus the end of the text.
    let boundaries: Vec<usize> =
        text.char_indices().map(|(i, _)| i).chain(std::iter::once(text.len())).collect();
    let char_count = boundaries.len() - 1;
    let step = chunk_size.saturating_sub(chunk_overlap);

    let mut chunks = Vec::new();
    let mut start = 0;
    loop {
        let end = (start + chunk_size).min(char_count);
        chunks.push(text[boundaries[start]..boundaries[end]].to_string());
        if end == char_count || step == 0 {
            break;
        }
        start += step;
    }
    chunks
}

/// Splits text hierarchically: paragraphs → lines → words → characters.
///
/// Text is cut on the coarsest separator present. Pieces shorter than
/// `chunk_size` are merged back together; when a merged chunk is full, up to
/// `chunk_overlap` characters of its trailing pieces start the next one.
/// Pieces that are still too long are split again with the next separator.
#[derive(Debug, Clone)]
pub struct RecursiveChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl RecursiveChunker {
    const SEPARATORS: [&'static str; 4] = ["\n\n", "\n", " ", ""];

    /// Create a new `RecursiveChunker`.
    ///
    /// # Arguments
    ///
    /// * `chunk_size` - maximum number of characters per chunk
    /// * `chunk_overlap` - maximum number of characters carried into the next chunk,
    ///   clamped below `chunk_size`
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self { chunk_size, chunk_overlap: clamp_overlap(chunk_size, chunk_overlap) }
    }
}

impl Chunker for RecursiveChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        if document.text.trim().is_empty() || self.chunk_size == 0 {
            return Vec::new();
        }
        let texts =
            split_recursive(&document.text, self.chunk_size, self.chunk_overlap, &Self::SEPARATORS);
        into_chunks(document, texts)
    }
}

fn split_recursive(
    text: &str,
    chunk_size: usize,
    chunk_overlap: usize,
    separators: &[&str],
) -> Vec<String> {
    let Some(position) = separators.iter().position(|sep| sep.is_empty() || text.contains(sep))
    else {
        return split_by_size(text, chunk_size, chunk_overlap);
    };
    let separator = separators[position];
    let finer = &separators[position + 1..];

    let pieces: Vec<&str> = if separator.is_empty() {
        text.char_indices().map(|(i, c)| &text[i..i + c.len_utf8()]).collect()
    } else {
        text.split(separator).filter(|piece| !piece.is_empty()).collect()
    };

    let mut chunks = Vec::new();
    let mut pending: Vec<&str> = Vec::new();
    for piece in pieces {
        if char_len(piece) < chunk_size {
            pending.push(piece);
            continue;
        }
        if !pending.is_empty() {
            chunks.extend(merge_pieces(&pending, separator, chunk_size, chunk_overlap));
            pending.clear();
        }
        if finer.is_empty() {
            chunks.push(piece.to_string());
        } else {
            chunks.extend(split_recursive(piece, chunk_size, chunk_overlap, finer));
        }
    }
    if !pending.is_empty() {
        chunks.extend(merge_pieces(&pending, separator, chunk_size, chunk_overlap));
    }
    chunks
}

/// Join short pieces into chunks of at most `chunk_size` characters.
///
/// `total` always equals the character length of `window` joined by `separator`.
fn merge_pieces(
    pieces: &[&str],
    separator: &str,
    chunk_size: usize,
    chunk_overlap: usize,
) -> Vec<String> {
    let separator_len = char_len(separator);
    let mut chunks = Vec::new();
    let mut window: VecDeque<&str> = VecDeque::new();
    let mut total = 0;

    for &piece in pieces {
        let len = char_len(piece);
        if !window.is_empty() && total + separator_len + len > chunk_size {
            push_joined(&mut chunks, &window, separator);
            while let Some(&first) = window.front() {
                if total <= chunk_overlap && total + separator_len + len <= chunk_size {
                    break;
                }
                window.pop_front();
                let gap = if window.is_empty() { 0 } else { separator_len };
                total -= char_len(first) + gap;
            }
        }

        let gap = if window.is_empty() { 0 } else { separator_len };
        total += gap + len;
        window.push_back(piece);
    }
    push_joined(&mut chunks, &window, separator);
    chunks
}

fn push_joined(chunks: &mut Vec<String>, window: &VecDeque<&str>, separator: &str) {
    let joined = window.iter().copied().collect::<Vec<_>>().join(separator);
    let trimmed = joined.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}
