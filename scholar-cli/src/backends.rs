//! Construction of the services selected on the command line.

use std::sync::Arc;

use anyhow::{Context, Result};
use scholar_rag::{
    AssistantConfig, ChatModel, ChromaVectorStore, EmbeddingProvider, FastEmbedProvider,
    FileVectorStore, GroqChatModel, HashingEmbeddingProvider, InMemoryVectorStore, MockChatModel,
    OpenAIEmbeddingProvider, StudyAssistant, VectorStore,
};
use tracing::info;

use crate::cli::{Cli, EmbedderKind, ModelKind, StoreKind};

/// Reply of `--model mock`.
const MOCK_REPLY: &str =
    "(mock model) No language model is configured; this is a placeholder answer.";

pub async fn vector_store(cli: &Cli, config: &AssistantConfig) -> Result<Arc<dyn VectorStore>> {
    let store: Arc<dyn VectorStore> = match cli.store {
        StoreKind::Memory => Arc::new(InMemoryVectorStore::new()),
        StoreKind::File => Arc::new(
            FileVectorStore::open(&config.db_path)
                .await
                .with_context(|| format!("opening vector store at {}", config.db_path.display()))?,
        ),
        StoreKind::Chroma => Arc::new(
            ChromaVectorStore::new(&cli.chroma_url)
                .with_context(|| format!("connecting to Chroma at {}", cli.chroma_url))?,
        ),
    };
    info!(store = ?cli.store, "vector store ready");
    Ok(store)
}

pub async fn embedding_provider(cli: &Cli) -> Result<Arc<dyn EmbeddingProvider>> {
    Ok(match cli.embedder {
        EmbedderKind::Fastembed => {
            // Loading may download the model; keep it off the runtime threads.
            let cache = cli.embedding_cache.clone();
            let provider = tokio::task::spawn_blocking(move || match cache {
                Some(dir) => FastEmbedProvider::with_cache_dir(dir),
                None => FastEmbedProvider::new(),
            })
            .await
            .context("embedding model loader panicked")?
            .context("loading the local embedding model")?;
            Arc::new(provider)
        }
        EmbedderKind::Hashing => Arc::new(HashingEmbeddingProvider::default()),
        EmbedderKind::Openai => {
            Arc::new(OpenAIEmbeddingProvider::from_env().context("configuring OpenAI embeddings")?)
        }
    })
}

pub fn chat_model(cli: &Cli) -> Result<Arc<dyn ChatModel>> {
    Ok(match cli.model {
        ModelKind::Groq => {
            let mut model = GroqChatModel::from_env().context("configuring the Groq chat model")?;
            if let Some(name) = &cli.model_name {
                model = model.with_model(name);
            }
            Arc::new(model)
        }
        ModelKind::Mock => Arc::new(MockChatModel::new(MOCK_REPLY)),
    })
}

/// Build the assistant and make sure its collection exists.
pub async fn assistant(cli: &Cli, config: AssistantConfig) -> Result<StudyAssistant> {
    let vector_store = vector_store(cli, &config).await?;
    let assistant = StudyAssistant::builder()
        .embedding_provider(embedding_provider(cli).await?)
        .vector_store(vector_store)
        .chat_model(chat_model(cli)?)
        .config(config)
        .build()?;
    assistant.create_collection().await?;
    Ok(assistant)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[tokio::test]
    async fn offline_backends_build_an_assistant() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("db");
        let cli = Cli::try_parse_from([
            "scholar",
            "--model",
            "mock",
            "--embedder",
            "hashing",
            "--db-path",
            db.to_str().unwrap(),
        ])
        .unwrap();
        let config = cli.assistant_config(AssistantConfig::default()).unwrap();

        let assistant = assistant(&cli, config).await.unwrap();
        assert_eq!(assistant.chat_model().name(), "mock");
        assert!(db.join("research_papers.json").exists());
    }
}
