//! Configuration for the study assistant.

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// How extracted text is split into chunks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChunkingStrategy {
    /// Fixed character windows, see [`FixedSizeChunker`](crate::FixedSizeChunker).
    #[default]
    Fixed,
    /// Separator-aware merging, see [`RecursiveChunker`](crate::RecursiveChunker).
    Recursive,
}

impl FromStr for ChunkingStrategy {
    type Err = RagError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "recursive" => Ok(Self::Recursive),
            other => Err(RagError::ConfigError(format!("unknown chunking strategy '{other}'"))),
        }
    }
}

/// How a query is judged to be a follow-up of the previous turn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FollowUpStrategy {
    /// The query appears verbatim (case-insensitive) in the previous context.
    #[default]
    Substring,
    /// As `Substring`, or the query asks to elaborate/explain/expand.
    Elaboration,
}

impl FromStr for FollowUpStrategy {
    type Err = RagError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "substring" => Ok(Self::Substring),
            "elaboration" => Ok(Self::Elaboration),
            other => Err(RagError::ConfigError(format!("unknown follow-up strategy '{other}'"))),
        }
    }
}

/// Configuration parameters for indexing and answering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssistantConfig {
    /// Folder scanned for `.pdf` files.
    pub input_dir: PathBuf,
    /// Where persistent vector stores keep their data.
    pub db_path: PathBuf,
    /// Name of the vector collection holding every paper's chunks.
    pub collection: String,
    /// Maximum chunk size in characters.
    pub chunk_size: usize,
    /// Number of overlapping characters between consecutive chunks.
    pub chunk_overlap: usize,
    /// Number of nearest chunks fetched across the whole collection per query.
    pub top_k: usize,
    /// Splitter used by the indexer.
    pub chunking: ChunkingStrategy,
    /// Follow-up detector used by the prompt composer.
    pub follow_up: FollowUpStrategy,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input"),
            db_path: PathBuf::from("chroma_db"),
            collection: "research_papers".to_string(),
            chunk_size: 500,
            chunk_overlap: 100,
            top_k: 3,
            chunking: ChunkingStrategy::Fixed,
            follow_up: FollowUpStrategy::Substring,
        }
    }
}

impl AssistantConfig {
    /// Create a new builder for constructing an [`AssistantConfig`].
    pub fn builder() -> AssistantConfigBuilder {
        AssistantConfigBuilder::default()
    }

    /// Build a configuration from `SCHOLAR_*` environment variables.
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if a variable does not parse or the
    /// resulting configuration is inconsistent.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    ///
    /// Recognised keys: `SCHOLAR_INPUT_DIR`, `SCHOLAR_DB_PATH`,
    /// `SCHOLAR_COLLECTION`, `SCHOLAR_CHUNK_SIZE`, `SCHOLAR_CHUNK_OVERLAP`,
    /// `SCHOLAR_TOP_K`, `SCHOLAR_CHUNKING`, `SCHOLAR_FOLLOW_UP`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut builder = Self::builder();
        if let Some(dir) = lookup("SCHOLAR_INPUT_DIR") {
            builder = builder.input_dir(dir);
        }
        if let Some(path) = lookup("SCHOLAR_DB_PATH") {
            builder = builder.db_path(path);
        }
        if let Some(name) = lookup("SCHOLAR_COLLECTION") {
            builder = builder.collection(name);
        }
        if let Some(size) = lookup("SCHOLAR_CHUNK_SIZE") {
            builder = builder.chunk_size(parse_number("SCHOLAR_CHUNK_SIZE", &size)?);
        }
        if let Some(overlap) = lookup("SCHOLAR_CHUNK_OVERLAP") {
            builder = builder.chunk_overlap(parse_number("SCHOLAR_CHUNK_OVERLAP", &overlap)?);
        }
        if let Some(k) = lookup("SCHOLAR_TOP_K") {
            builder = builder.top_k(parse_number("SCHOLAR_TOP_K", &k)?);
        }
        if let Some(strategy) = lookup("SCHOLAR_CHUNKING") {
            builder = builder.chunking(strategy.parse()?);
        }
        if let Some(strategy) = lookup("SCHOLAR_FOLLOW_UP") {
            builder = builder.follow_up(strategy.parse()?);
        }
        builder.build()
    }
}

fn parse_number(key: &str, value: &str) -> Result<usize> {
    value
        .trim()
        .parse()
        .map_err(|e| RagError::ConfigError(format!("{key}='{value}' is not a valid number: {e}")))
}

/// Builder for constructing a validated [`AssistantConfig`].
#[derive(Debug, Clone, Default)]
pub struct AssistantConfigBuilder {
    config: AssistantConfig,
}

impl AssistantConfigBuilder {
    /// Start from an existing configuration.
    pub fn from_config(config: AssistantConfig) -> Self {
        Self { config }
    }

    /// Set the folder scanned for PDFs.
    pub fn input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.input_dir = dir.into();
        self
    }

    /// Set the directory used by persistent vector stores.
    pub fn db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.db_path = path.into();
        self
    }

    /// Set the vector collection name.
    pub fn collection(mut self, name: impl Into<String>) -> Self {
        self.config.collection = name.into();
        self
    }

    /// Set the maximum chunk size in characters.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the overlap between consecutive chunks in characters.
    pub fn chunk_overlap(mut self, overlap: usize) -> Self {
        self.config.chunk_overlap = overlap;
        self
    }

    /// Set the number of nearest chunks fetched per query.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the chunking strategy.
    pub fn chunking(mut self, strategy: ChunkingStrategy) -> Self {
        self.config.chunking = strategy;
        self
    }

    /// Set the follow-up detection strategy.
    pub fn follow_up(mut self, strategy: FollowUpStrategy) -> Self {
        self.config.follow_up = strategy;
        self
    }

    /// Build the [`AssistantConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if:
    /// - `chunk_overlap >= chunk_size`
    /// - `top_k == 0`
    /// - the collection name is blank
    pub fn build(self) -> Result<AssistantConfig> {
        if self.config.chunk_overlap >= self.config.chunk_size {
            return Err(RagError::ConfigError(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                self.config.chunk_overlap, self.config.chunk_size
            )));
        }
        if self.config.top_k == 0 {
            return Err(RagError::ConfigError("top_k must be greater than zero".to_string()));
        }
        if self.config.collection.trim().is_empty() {
            return Err(RagError::ConfigError("collection name must not be empty".to_string()));
        }
        Ok(self.config)
    }
}
