//! Error types for the `scholar-rag` crate.

use thiserror::Error;

/// Errors that can occur while indexing papers or answering queries.
///
/// User-facing outcomes such as an invalid selection or an empty retrieval
/// are not errors; they are returned as reply strings. This enum covers
/// failures of the collaborating services and of configuration.
#[derive(Debug, Error)]
pub enum RagError {
    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the vector store backend.
    #[error("Vector store error ({backend}): {message}")]
    VectorStoreError {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// Text could not be extracted from a source file.
    #[error("Extraction error ({path}): {message}")]
    ExtractionError {
        /// The file that failed to extract.
        path: String,
        /// A description of the failure.
        message: String,
    },

    /// The chat-completion model failed.
    #[error("Model error ({model}): {message}")]
    ModelError {
        /// The model (or provider) that produced the error.
        model: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An error in the indexing or query orchestration.
    #[error("Pipeline error: {0}")]
    PipelineError(String),

    /// A filesystem error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A convenience result type for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;
