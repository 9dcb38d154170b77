//! The study assistant: indexing plus per-turn question answering.
//!
//! A [`StudyAssistant`] owns the paper registry and the service handles; all
//! conversational state lives in the [`Session`] passed into each turn.
//!
//! # Example
//!
//! ```rust,ignore
//! use scholar_rag::{AssistantConfig, InMemoryVectorStore, HashingEmbeddingProvider, Session, StudyAssistant};
//!
//! let assistant = StudyAssistant::builder()
//!     .config(AssistantConfig::default())
//!     .embedding_provider(Arc::new(HashingEmbeddingProvider::default()))
//!     .vector_store(Arc::new(InMemoryVectorStore::new()))
//!     .chat_model(Arc::new(GroqChatModel::from_env()?))
//!     .build()?;
//!
//! assistant.create_collection().await?;
//! assistant.index_directory().await?;
//!
//! let mut session = Session::new();
//! println!("{}", assistant.select_document(&mut session, 0).await);
//! println!("{}", assistant.answer(&mut session, "What is the main contribution?").await);
//! ```

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::chunking::{Chunker, chunker_for};
use crate::config::AssistantConfig;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::extract::{self, TextExtractor};
use crate::followup::{FollowUpDetector, detector_for};
use crate::generator::{AnswerGenerator, TurnRecord};
use crate::indexer::ChunkIndexer;
use crate::messages;
use crate::metadata::{FirstLinesExtractor, MetadataExtractor};
use crate::model::ChatModel;
use crate::prompt::{PromptComposer, format_context};
use crate::registry::{PaperRecord, PaperRegistry};
use crate::retriever::{Retrieval, Retriever};
use crate::router::{IntentRouter, Route};
use crate::session::Session;
use crate::vectorstore::VectorStore;

/// Indexes papers and answers questions about the selected one.
///
/// Construct one via [`StudyAssistant::builder()`].
pub struct StudyAssistant {
    config: AssistantConfig,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    registry: RwLock<PaperRegistry>,
    router: IntentRouter,
    indexer: ChunkIndexer,
    retriever: Retriever,
    composer: PromptComposer,
    generator: AnswerGenerator,
}

impl StudyAssistant {
    /// Create a new [`StudyAssistantBuilder`].
    pub fn builder() -> StudyAssistantBuilder {
        StudyAssistantBuilder::default()
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    /// The chat model answers are generated with.
    pub fn chat_model(&self) -> &Arc<dyn ChatModel> {
        self.generator.model()
    }

    /// Create the configured collection, sized for the embedding provider.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::PipelineError`] if the vector store operation fails.
    pub async fn create_collection(&self) -> Result<()> {
        let name = &self.config.collection;
        let dimensions = self.embedding_provider.dimensions();
        self.vector_store.create_collection(name, dimensions).await.map_err(|e| {
            error!(collection = %name, error = %e, "failed to create collection");
            RagError::PipelineError(format!("failed to create collection '{name}': {e}"))
        })
    }

    /// Index every `.pdf` file in the configured input folder, by name.
    ///
    /// # Errors
    ///
    /// Fails if the folder cannot be read or a paper cannot be stored.
    pub async fn index_directory(&self) -> Result<Vec<PaperRecord>> {
        let names = extract::list_pdf_files(&self.config.input_dir).map_err(|e| {
            error!(dir = %self.config.input_dir.display(), error = %e, "cannot scan input folder");
            e
        })?;
        info!(dir = %self.config.input_dir.display(), files = names.len(), "indexing input folder");
        self.index_files(&names).await
    }

    /// Index the named files from the input folder, in the given order.
    ///
    /// Names without the `.pdf` suffix are skipped.
    pub async fn index_files(&self, names: &[String]) -> Result<Vec<PaperRecord>> {
        let mut records = Vec::with_capacity(names.len());
        for name in names {
            if !extract::is_pdf(name) {
                warn!(file = %name, "skipping file without .pdf suffix");
                continue;
            }
            let path = extract::source_path(&self.config.input_dir, name);
            let text = self.indexer.extract_file(path).await;
            records.push(self.index_text(name, &text).await?);
        }
        Ok(records)
    }

    /// Index already-extracted text under `filename` and register the paper.
    ///
    /// Re-indexing a registered filename replaces its record in place.
    pub async fn index_text(&self, filename: &str, text: &str) -> Result<PaperRecord> {
        let record = self.indexer.index_text(filename, text).await?;
        self.registry.write().await.register(record.clone());
        Ok(record)
    }

    /// Snapshot of the registered papers in display order.
    pub async fn papers(&self) -> Vec<PaperRecord> {
        self.registry.read().await.papers().to_vec()
    }

    /// The numbered paper listing.
    pub async fn list_papers(&self) -> String {
        self.registry.read().await.list_papers()
    }

    /// Select the paper at a 0-based `index` for `session`.
    pub async fn select_document(&self, session: &mut Session, index: i64) -> String {
        self.registry.read().await.select_document(session, index)
    }

    /// Handle one user turn and record it in the session history.
    ///
    /// Never fails: every outcome, including service failures, is a reply.
    pub async fn answer(&self, session: &mut Session, query: &str) -> String {
        let reply = self.respond(session, query).await;
        session.record(query, reply.clone());
        reply
    }

    async fn respond(&self, session: &mut Session, query: &str) -> String {
        let route = self.router.route(query, session.selected_document.is_some());
        let document = match (route, session.selected_document.clone()) {
            (Route::Menu, _) => return self.list_papers().await,
            (Route::Content, Some(document)) => document,
            _ => return messages::NO_DOCUMENT_SELECTED.to_string(),
        };

        let chunks = match self.retriever.retrieve(query, &document).await {
            Ok(Retrieval::Found(chunks)) => chunks,
            Ok(Retrieval::NoResults) => return messages::NO_RELEVANT_INFORMATION.to_string(),
            Ok(Retrieval::NoMatchInDocument) => return messages::NO_MATCHING_CONTENT.to_string(),
            Err(e) => return format!("{}: {e}", messages::RETRIEVAL_FAILED),
        };

        let context = format_context(&chunks);
        let prompt = self.composer.compose(&context, query, session.last_context.as_deref());
        let response = self
            .generator
            .generate(TurnRecord {
                session: session.id,
                document: &document,
                query,
                context: &context,
                prompt: &prompt.text,
            })
            .await;

        session.last_context = Some(context);
        response
    }
}

/// Builder for constructing a [`StudyAssistant`].
///
/// The embedding provider, vector store and chat model are required. The
/// chunker and follow-up detector default to what the configuration selects;
/// metadata and text extraction default to [`FirstLinesExtractor`] and
/// [`extract::default_extractor`].
#[derive(Default)]
pub struct StudyAssistantBuilder {
    config: Option<AssistantConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    vector_store: Option<Arc<dyn VectorStore>>,
    chat_model: Option<Arc<dyn ChatModel>>,
    chunker: Option<Box<dyn Chunker>>,
    metadata_extractor: Option<Box<dyn MetadataExtractor>>,
    text_extractor: Option<Arc<dyn TextExtractor>>,
    follow_up: Option<Box<dyn FollowUpDetector>>,
}

impl StudyAssistantBuilder {
    /// Set the configuration. Defaults to [`AssistantConfig::default()`].
    pub fn config(mut self, config: AssistantConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.vector_store = Some(store);
        self
    }

    pub fn chat_model(mut self, model: Arc<dyn ChatModel>) -> Self {
        self.chat_model = Some(model);
        self
    }

    /// Override the chunker selected by the configuration.
    pub fn chunker(mut self, chunker: Box<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    pub fn metadata_extractor(mut self, extractor: Box<dyn MetadataExtractor>) -> Self {
        self.metadata_extractor = Some(extractor);
        self
    }

    pub fn text_extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.text_extractor = Some(extractor);
        self
    }

    /// Override the follow-up detector selected by the configuration.
    pub fn follow_up(mut self, detector: Box<dyn FollowUpDetector>) -> Self {
        self.follow_up = Some(detector);
        self
    }

    /// Build the [`StudyAssistant`], validating that all required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if a required field is missing.
    pub fn build(self) -> Result<StudyAssistant> {
        let config = self.config.unwrap_or_default();
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::ConfigError("embedding_provider is required".to_string()))?;
        let vector_store = self
            .vector_store
            .ok_or_else(|| RagError::ConfigError("vector_store is required".to_string()))?;
        let chat_model = self
            .chat_model
            .ok_or_else(|| RagError::ConfigError("chat_model is required".to_string()))?;

        let chunker = match self.chunker {
            Some(chunker) => chunker,
            None => chunker_for(&config),
        };
        let follow_up = match self.follow_up {
            Some(detector) => detector,
            None => detector_for(config.follow_up)?,
        };

        let indexer = ChunkIndexer::new(
            Arc::clone(&embedding_provider),
            Arc::clone(&vector_store),
            chunker,
            self.metadata_extractor.unwrap_or_else(|| Box::new(FirstLinesExtractor)),
            self.text_extractor.unwrap_or_else(|| Arc::from(extract::default_extractor())),
            config.collection.clone(),
        );
        let retriever = Retriever::new(
            Arc::clone(&embedding_provider),
            Arc::clone(&vector_store),
            config.collection.clone(),
            config.top_k,
        );

        Ok(StudyAssistant {
            router: IntentRouter::new()?,
            registry: RwLock::new(PaperRegistry::new()),
            composer: PromptComposer::new(follow_up),
            generator: AnswerGenerator::new(chat_model),
            indexer,
            retriever,
            embedding_provider,
            vector_store,
            config,
        })
    }
}
