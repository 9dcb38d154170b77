//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use scholar_rag::chroma::DEFAULT_CHROMA_URL;
use scholar_rag::config::{AssistantConfig, AssistantConfigBuilder};
use scholar_rag::{ChunkingStrategy, FollowUpStrategy, RagError};

#[derive(Parser, Debug)]
#[command(name = "scholar", version, about = "Ask questions about your research papers")]
pub struct Cli {
    /// Folder scanned for `.pdf` files [env: SCHOLAR_INPUT_DIR, default: input]
    #[arg(long, global = true)]
    pub input_dir: Option<PathBuf>,

    /// Directory of the file vector store [env: SCHOLAR_DB_PATH, default: chroma_db]
    #[arg(long, global = true)]
    pub db_path: Option<PathBuf>,

    /// Vector collection name [env: SCHOLAR_COLLECTION, default: research_papers]
    #[arg(long, global = true)]
    pub collection: Option<String>,

    /// Number of nearest chunks fetched per query [env: SCHOLAR_TOP_K, default: 3]
    #[arg(long, global = true)]
    pub top_k: Option<usize>,

    /// Chunking strategy: fixed or recursive [env: SCHOLAR_CHUNKING]
    #[arg(long, global = true)]
    pub chunking: Option<ChunkingStrategy>,

    /// Follow-up detection: substring or elaboration [env: SCHOLAR_FOLLOW_UP]
    #[arg(long, global = true)]
    pub follow_up: Option<FollowUpStrategy>,

    /// Vector store backend
    #[arg(long, value_enum, default_value_t = StoreKind::File, global = true)]
    pub store: StoreKind,

    /// Chroma server URL, used with `--store chroma`
    #[arg(long, env = "CHROMA_URL", default_value = DEFAULT_CHROMA_URL, global = true)]
    pub chroma_url: String,

    /// Embedding provider
    #[arg(long, value_enum, default_value_t = EmbedderKind::Fastembed, global = true)]
    pub embedder: EmbedderKind,

    /// Where `--embedder fastembed` caches the model files
    #[arg(long, env = "FASTEMBED_CACHE_DIR", global = true)]
    pub embedding_cache: Option<PathBuf>,

    /// Chat model backend
    #[arg(long, value_enum, default_value_t = ModelKind::Groq, global = true)]
    pub model: ModelKind,

    /// Model name passed to the chat backend
    #[arg(long, global = true)]
    pub model_name: Option<String>,

    /// Append every turn record to this file
    #[arg(long, env = "LOG_FILE_PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Write the log file as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Index the input folder, then answer questions interactively (default)
    Chat,
    /// Index the input folder and print the paper list
    Index,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    /// Process-local, lost on exit
    Memory,
    /// JSON files under the db path
    File,
    /// Chroma server
    Chroma,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedderKind {
    /// Local all-MiniLM-L6-v2, downloaded on first use
    Fastembed,
    /// Offline feature hashing, no model download
    Hashing,
    /// OpenAI-compatible embeddings API (OPENAI_API_KEY)
    Openai,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    /// Groq chat completions (GROQ_API_KEY)
    Groq,
    /// Canned reply, for trying the console offline
    Mock,
}

impl Cli {
    /// The subcommand, defaulting to `chat`.
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Chat)
    }

    /// Apply command-line overrides on top of `base`.
    pub fn assistant_config(&self, base: AssistantConfig) -> Result<AssistantConfig, RagError> {
        let mut builder = AssistantConfigBuilder::from_config(base);
        if let Some(dir) = &self.input_dir {
            builder = builder.input_dir(dir);
        }
        if let Some(path) = &self.db_path {
            builder = builder.db_path(path);
        }
        if let Some(name) = &self.collection {
            builder = builder.collection(name);
        }
        if let Some(k) = self.top_k {
            builder = builder.top_k(k);
        }
        if let Some(strategy) = self.chunking {
            builder = builder.chunking(strategy);
        }
        if let Some(strategy) = self.follow_up {
            builder = builder.follow_up(strategy);
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_chat_with_file_store_fastembed_and_groq() {
        let cli = Cli::try_parse_from(["scholar"]).unwrap();
        assert_eq!(cli.command(), Command::Chat);
        assert_eq!(cli.store, StoreKind::File);
        assert_eq!(cli.embedder, EmbedderKind::Fastembed);
        assert_eq!(cli.model, ModelKind::Groq);
    }

    #[test]
    fn flags_override_the_base_config() {
        let cli = Cli::try_parse_from([
            "scholar",
            "index",
            "--input-dir",
            "papers",
            "--top-k",
            "5",
            "--chunking",
            "recursive",
            "--follow-up",
            "elaboration",
        ])
        .unwrap();
        assert_eq!(cli.command(), Command::Index);

        let config = cli.assistant_config(AssistantConfig::default()).unwrap();
        assert_eq!(config.input_dir, PathBuf::from("papers"));
        assert_eq!(config.top_k, 5);
        assert_eq!(config.chunking, ChunkingStrategy::Recursive);
        assert_eq!(config.follow_up, FollowUpStrategy::Elaboration);
        assert_eq!(config.collection, "research_papers");
    }

    #[test]
    fn invalid_overrides_are_rejected() {
        let cli = Cli::try_parse_from(["scholar", "--top-k", "0"]).unwrap();
        assert!(cli.assistant_config(AssistantConfig::default()).is_err());
        assert!(Cli::try_parse_from(["scholar", "--chunking", "sentences"]).is_err());
    }
}
