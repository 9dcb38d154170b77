//! Chroma vector store backend.
//!
//! Provides [`ChromaVectorStore`] which implements [`VectorStore`] against a
//! Chroma server's v2 HTTP API using `reqwest`. Embeddings are always computed
//! client-side and sent with each write and query; Chroma only stores and
//! searches them. Collections are created in cosine space and scores are
//! reported as `1 - distance`.
//!
//! This module is only available when the `chroma` feature is enabled.
//!
//! # Example
//!
//! ```rust,ignore
//! use scholar_rag::chroma::ChromaVectorStore;
//!
//! let store = ChromaVectorStore::new("http://localhost:8000")?;
//! store.create_collection("research_papers", 384).await?;
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::RwLock;
use tracing::{debug, error};

use crate::document::{Chunk, ChunkMetadata, SearchResult};
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

const BACKEND: &str = "chroma";

/// The default local Chroma server URL.
pub const DEFAULT_CHROMA_URL: &str = "http://localhost:8000";

/// A [`VectorStore`] backed by a [Chroma](https://www.trychroma.com/) server.
pub struct ChromaVectorStore {
    client: reqwest::Client,
    base_url: String,
    tenant: String,
    database: String,
    /// Collection name → Chroma collection id.
    collection_ids: RwLock<HashMap<String, String>>,
}

impl ChromaVectorStore {
    /// Create a store talking to the Chroma server at `url`, using the
    /// default tenant and database.
    pub fn new(url: &str) -> Result<Self> {
        let base_url = url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(map_err("server URL must not be empty"));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            tenant: "default_tenant".to_string(),
            database: "default_database".to_string(),
            collection_ids: RwLock::new(HashMap::new()),
        })
    }

    /// Use a specific tenant and database.
    pub fn with_database(mut self, tenant: impl Into<String>, database: impl Into<String>) -> Self {
        self.tenant = tenant.into();
        self.database = database.into();
        self
    }

    fn collections_url(&self) -> String {
        format!(
            "{}/api/v2/tenants/{}/databases/{}/collections",
            self.base_url, self.tenant, self.database
        )
    }

    /// Send a request and fail on transport errors or non-success statuses.
    async fn send_raw(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let response = request.send().await.map_err(|e| {
            error!(backend = BACKEND, error = %e, "request failed");
            map_err(format!("request failed: {e}"))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(backend = BACKEND, %status, "API error");
            return Err(map_err(format!("API returned {status}: {body}")));
        }
        Ok(response)
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let response = self.send_raw(request).await?;
        response.json().await.map_err(|e| map_err(format!("failed to parse response: {e}")))
    }

    /// Resolve (and cache) the Chroma id of a named collection.
    async fn collection_id(&self, name: &str) -> Result<String> {
        if let Some(id) = self.collection_ids.read().await.get(name) {
            return Ok(id.clone());
        }
        let url = format!("{}/{name}", self.collections_url());
        let collection: CollectionResponse = self.send(self.client.get(url)).await?;
        self.collection_ids.write().await.insert(name.to_string(), collection.id.clone());
        Ok(collection.id)
    }
}

fn map_err(message: impl Into<String>) -> RagError {
    RagError::VectorStoreError { backend: BACKEND.to_string(), message: message.into() }
}

// ── Chroma API request/response types ──────────────────────────────

#[derive(Deserialize)]
struct CollectionResponse {
    id: String,
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
    ids: Vec<&'a str>,
    embeddings: Vec<&'a [f32]>,
    documents: Vec<&'a str>,
    metadatas: Vec<&'a ChunkMetadata>,
}

#[derive(Deserialize)]
struct QueryResponse {
    ids: Vec<Vec<String>>,
    #[serde(default)]
    documents: Option<Vec<Vec<Option<String>>>>,
    #[serde(default)]
    metadatas: Option<Vec<Vec<Option<ChunkMetadata>>>>,
    #[serde(default)]
    distances: Option<Vec<Vec<Option<f32>>>>,
}

impl QueryResponse {
    /// Flatten the first (only) query's columns into search results.
    fn into_results(self) -> Result<Vec<SearchResult>> {
        let ids = self.ids.into_iter().next().unwrap_or_default();
        let mut documents = self.documents.and_then(|d| d.into_iter().next()).unwrap_or_default();
        let mut metadatas = self.metadatas.and_then(|m| m.into_iter().next()).unwrap_or_default();
        let distances = self.distances.and_then(|d| d.into_iter().next()).unwrap_or_default();

        ids.into_iter()
            .enumerate()
            .map(|(i, id)| {
                let text = documents.get_mut(i).and_then(Option::take).unwrap_or_default();
                let metadata = metadatas
                    .get_mut(i)
                    .and_then(Option::take)
                    .ok_or_else(|| map_err(format!("record '{id}' has no metadata")))?;
                let distance = distances.get(i).copied().flatten().unwrap_or(1.0);
                Ok(SearchResult {
                    chunk: Chunk { id, text, embedding: Vec::new(), metadata },
                    score: 1.0 - distance,
                })
            })
            .collect()
    }
}

// ── VectorStore implementation ─────────────────────────────────────

#[async_trait]
impl VectorStore for ChromaVectorStore {
    async fn create_collection(&self, name: &str, dimensions: usize) -> Result<()> {
        let body = json!({
            "name": name,
            "get_or_create": true,
            "metadata": { "hnsw:space": "cosine" },
        });
        let collection: CollectionResponse =
            self.send(self.client.post(self.collections_url()).json(&body)).await?;
        debug!(collection = name, id = %collection.id, dimensions, "chroma collection ready");
        self.collection_ids.write().await.insert(name.to_string(), collection.id);
        Ok(())
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        let url = format!("{}/{name}", self.collections_url());
        self.send_raw(self.client.delete(url)).await?;
        self.collection_ids.write().await.remove(name);
        debug!(collection = name, "deleted chroma collection");
        Ok(())
    }

    async fn upsert(&self, collection: &str, chunks: &[Chunk]) -> Result<()> {
        if chunks.is_empty() {
            return Ok(());
        }
        let id = self.collection_id(collection).await?;
        let body = UpsertRequest {
            ids: chunks.iter().map(|c| c.id.as_str()).collect(),
            embeddings: chunks.iter().map(|c| c.embedding.as_slice()).collect(),
            documents: chunks.iter().map(|c| c.text.as_str()).collect(),
            metadatas: chunks.iter().map(|c| &c.metadata).collect(),
        };
        let url = format!("{}/{id}/upsert", self.collections_url());
        self.send_raw(self.client.post(url).json(&body)).await?;
        debug!(collection, chunk_count = chunks.len(), "upserted chunks into chroma");
        Ok(())
    }

    async fn delete(&self, collection: &str, ids: &[&str]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let id = self.collection_id(collection).await?;
        let url = format!("{}/{id}/delete", self.collections_url());
        self.send_raw(self.client.post(url).json(&json!({ "ids": ids }))).await?;
        Ok(())
    }

    async fn delete_by_file(&self, collection: &str, file: &str) -> Result<()> {
        let id = self.collection_id(collection).await?;
        let url = format!("{}/{id}/delete", self.collections_url());
        let body = json!({ "where": { "file": file } });
        self.send_raw(self.client.post(url).json(&body)).await?;
        debug!(collection, file, "deleted chroma chunks of file");
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        let id = self.collection_id(collection).await?;
        let url = format!("{}/{id}/query", self.collections_url());
        let body = json!({
            "query_embeddings": [embedding],
            "n_results": top_k,
            "include": ["documents", "metadatas", "distances"],
        });
        let response: QueryResponse = self.send(self.client.post(url).json(&body)).await?;
        response.into_results()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_response_maps_distance_to_score() {
        let raw = json!({
            "ids": [["a.pdf_0", "b.pdf_3"]],
            "documents": [["first", "second"]],
            "metadatas": [[
                { "title": "A", "authors": "Ann", "page": 1, "file": "a.pdf" },
                { "title": "B", "authors": "Ben", "page": 4, "file": "b.pdf" }
            ]],
            "distances": [[0.25, 0.5]]
        });
        let response: QueryResponse = serde_json::from_value(raw).unwrap();
        let results = response.into_results().unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.id, "a.pdf_0");
        assert_eq!(results[0].chunk.text, "first");
        assert!((results[0].score - 0.75).abs() < 1e-6);
        assert_eq!(results[1].chunk.metadata.page, 4);
        assert_eq!(results[1].chunk.metadata.file, "b.pdf");
    }

    #[test]
    fn empty_query_response_yields_no_results() {
        let response: QueryResponse = serde_json::from_value(json!({ "ids": [[]] })).unwrap();
        assert!(response.into_results().unwrap().is_empty());
    }

    #[test]
    fn collections_url_uses_tenant_and_database() {
        let store = ChromaVectorStore::new("http://chroma:8000/").unwrap().with_database("t", "d");
        assert_eq!(
            store.collections_url(),
            "http://chroma:8000/api/v2/tenants/t/databases/d/collections"
        );
    }
}
