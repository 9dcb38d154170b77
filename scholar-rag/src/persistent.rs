//! File-backed vector store.
//!
//! [`FileVectorStore`] keeps the same in-memory index as
//! [`InMemoryVectorStore`](crate::InMemoryVectorStore) and mirrors every
//! collection to `<root>/<collection>.json` after each mutation, so indexed
//! papers survive a restart without an external database.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::document::{Chunk, SearchResult};
use crate::error::{RagError, Result};
use crate::inmemory::{CollectionMap, missing_collection, rank};
use crate::vectorstore::VectorStore;

const BACKEND: &str = "file";

/// A [`VectorStore`] persisted as one JSON file per collection.
#[derive(Debug)]
pub struct FileVectorStore {
    root: PathBuf,
    collections: RwLock<BTreeMap<String, CollectionMap>>,
}

impl FileVectorStore {
    /// Open (or create) a store rooted at `root`, loading every `*.json` collection found there.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;

        let mut collections = BTreeMap::new();
        let mut entries = tokio::fs::read_dir(&root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
                continue;
            };
            let chunks = load_collection(&path).await?;
            debug!(collection = %name, chunk_count = chunks.len(), "loaded collection");
            collections.insert(name, chunks);
        }

        info!(root = %root.display(), collection_count = collections.len(), "opened file vector store");
        Ok(Self { root, collections: RwLock::new(collections) })
    }

    /// Directory holding the collection files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_path(&self, name: &str) -> Result<PathBuf> {
        let valid = !name.is_empty()
            && name.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
            && !name.starts_with('.');
        if !valid {
            return Err(RagError::VectorStoreError {
                backend: BACKEND.to_string(),
                message: format!("invalid collection name '{name}'"),
            });
        }
        Ok(self.root.join(format!("{name}.json")))
    }

    /// Write a collection snapshot atomically (temp file + rename).
    async fn persist(&self, name: &str, chunks: &CollectionMap) -> Result<()> {
        let path = self.collection_path(name)?;
        let snapshot: Vec<&Chunk> = chunks.values().collect();
        let bytes = serde_json::to_vec(&snapshot).map_err(|e| RagError::VectorStoreError {
            backend: BACKEND.to_string(),
            message: format!("failed to serialize collection '{name}': {e}"),
        })?;

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;
        debug!(collection = name, chunk_count = chunks.len(), "persisted collection");
        Ok(())
    }
}

async fn load_collection(path: &Path) -> Result<CollectionMap> {
    let bytes = tokio::fs::read(path).await?;
    let chunks: Vec<Chunk> =
        serde_json::from_slice(&bytes).map_err(|e| RagError::VectorStoreError {
            backend: BACKEND.to_string(),
            message: format!("corrupt collection file {}: {e}", path.display()),
        })?;
    Ok(chunks.into_iter().map(|chunk| (chunk.id.clone(), chunk)).collect())
}

#[async_trait]
impl VectorStore for FileVectorStore {
    async fn create_collection(&self, name: &str, _dimensions: usize) -> Result<()> {
        let mut collections = self.collections.write().await;
        if collections.contains_key(name) {
            return Ok(());
        }
        let empty = CollectionMap::new();
        self.persist(name, &empty).await?;
        collections.insert(name.to_string(), empty);
        Ok(())
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        let mut collections = self.collections.write().await;
        if collections.remove(name).is_some() {
            let path = self.collection_path(name)?;
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    async fn upsert(&self, collection: &str, chunks: &[Chunk]) -> Result<()> {
        let mut collections = self.collections.write().await;
        let store = collections
            .get_mut(collection)
            .ok_or_else(|| missing_collection(BACKEND, collection))?;
        for chunk in chunks {
            store.insert(chunk.id.clone(), chunk.clone());
        }
        self.persist(collection, store).await
    }

    async fn delete(&self, collection: &str, ids: &[&str]) -> Result<()> {
        let mut collections = self.collections.write().await;
        let store = collections
            .get_mut(collection)
            .ok_or_else(|| missing_collection(BACKEND, collection))?;
        let before = store.len();
        for id in ids {
            store.remove(*id);
        }
        if store.len() != before {
            self.persist(collection, store).await?;
        }
        Ok(())
    }

    async fn delete_by_file(&self, collection: &str, file: &str) -> Result<()> {
        let mut collections = self.collections.write().await;
        let store = collections
            .get_mut(collection)
            .ok_or_else(|| missing_collection(BACKEND, collection))?;
        let before = store.len();
        store.retain(|_, chunk| chunk.metadata.file != file);
        if store.len() != before {
            debug!(collection, file, removed = before - store.len(), "removed chunks of file");
            self.persist(collection, store).await?;
        }
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        let collections = self.collections.read().await;
        let store =
            collections.get(collection).ok_or_else(|| missing_collection(BACKEND, collection))?;
        Ok(rank(store, embedding, top_k))
    }
}
