//! # scholar-rag
//!
//! Retrieval-augmented question answering over a personal collection of
//! research papers.
//!
//! ## Overview
//!
//! Papers (PDF files in an input folder) are split into overlapping chunks,
//! embedded and stored in a vector collection. A user then selects one paper
//! and asks questions about it; each question is answered by a chat model
//! grounded in the nearest chunks of that paper only.
//!
//! - [`StudyAssistant`] - indexing and per-turn answering
//! - [`Session`] - per-conversation state (selection, follow-up context, history)
//! - [`PaperRegistry`] - ordered list of processed papers
//! - [`IntentRouter`] - menu/selection/content routing
//! - [`Retriever`], [`PromptComposer`], [`AnswerGenerator`] - the answer path
//!
//! ## Backends
//!
//! | Concern | Implementations | Feature |
//! |---------|-----------------|---------|
//! | Embeddings | [`HashingEmbeddingProvider`] (offline test double) | always |
//! | | `FastEmbedProvider` (local all-MiniLM-L6-v2) | `fastembed` |
//! | | `OpenAIEmbeddingProvider` | `openai` |
//! | Vector store | [`InMemoryVectorStore`], [`FileVectorStore`] | always |
//! | | `ChromaVectorStore` | `chroma` |
//! | Chat model | [`MockChatModel`] | always |
//! | | `GroqChatModel` | `groq` |
//! | PDF text | `PdfTextExtractor` | `pdf` (default) |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use scholar_rag::*;
//!
//! let assistant = StudyAssistant::builder()
//!     .config(AssistantConfig::from_env()?)
//!     .embedding_provider(Arc::new(HashingEmbeddingProvider::default()))
//!     .vector_store(Arc::new(InMemoryVectorStore::new()))
//!     .chat_model(Arc::new(MockChatModel::new("...")))
//!     .build()?;
//! assistant.create_collection().await?;
//! assistant.index_directory().await?;
//! ```

pub mod assistant;
pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod extract;
pub mod followup;
pub mod generator;
pub mod hashing;
pub mod indexer;
pub mod inmemory;
pub mod messages;
pub mod metadata;
pub mod mock;
pub mod model;
pub mod persistent;
pub mod prompt;
pub mod registry;
pub mod retriever;
pub mod router;
pub mod session;
pub mod vectorstore;

#[cfg(feature = "chroma")]
pub mod chroma;
#[cfg(feature = "groq")]
pub mod groq;
#[cfg(feature = "fastembed")]
pub mod local;
#[cfg(feature = "openai")]
pub mod openai;

pub use assistant::{StudyAssistant, StudyAssistantBuilder};
pub use chunking::{Chunker, FixedSizeChunker, RecursiveChunker, chunker_for};
pub use config::{AssistantConfig, AssistantConfigBuilder, ChunkingStrategy, FollowUpStrategy};
pub use document::{Chunk, ChunkMetadata, Document, PaperMetadata, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use extract::{PlainTextExtractor, TextExtractor};
pub use followup::{ElaborationFollowUp, FollowUpDetector, SubstringFollowUp};
pub use generator::AnswerGenerator;
pub use hashing::HashingEmbeddingProvider;
pub use indexer::ChunkIndexer;
pub use inmemory::InMemoryVectorStore;
pub use metadata::{FirstLinesExtractor, MetadataExtractor};
pub use mock::MockChatModel;
pub use model::ChatModel;
pub use persistent::FileVectorStore;
pub use prompt::{ComposedPrompt, PromptComposer, PromptKind};
pub use registry::{PaperRecord, PaperRegistry};
pub use retriever::{Retrieval, RetrievedChunk, Retriever};
pub use router::{IntentRouter, Route};
pub use session::{Exchange, Session};
pub use vectorstore::VectorStore;

#[cfg(feature = "chroma")]
pub use chroma::ChromaVectorStore;
#[cfg(feature = "pdf")]
pub use extract::PdfTextExtractor;
#[cfg(feature = "fastembed")]
pub use local::FastEmbedProvider;
#[cfg(feature = "groq")]
pub use groq::GroqChatModel;
#[cfg(feature = "openai")]
pub use openai::OpenAIEmbeddingProvider;
