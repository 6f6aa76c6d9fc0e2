//! Document ingestion and nearest-neighbour retrieval.

use crate::embeddings::EmbeddingProvider;
use crate::error::MemoryError;
use crate::store::VectorStore;
use crate::{MemoryEntry, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Number of documents returned by [`Retriever::retrieve`] unless configured otherwise.
pub const DEFAULT_TOP_K: usize = 5;

/// A document returned from a retrieval query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedDocument {
    /// Document ID.
    pub id: String,

    /// Stored text content.
    pub content: String,

    /// Stored metadata.
    pub metadata: HashMap<String, serde_json::Value>,

    /// Cosine similarity to the query.
    pub score: f32,
}

impl From<(MemoryEntry, f32)> for RetrievedDocument {
    fn from((entry, score): (MemoryEntry, f32)) -> Self {
        Self {
            id: entry.id,
            content: entry.content,
            metadata: entry.metadata,
            score,
        }
    }
}

/// Embeds documents and queries with one provider and stores them in one store.
///
/// Using the same provider for ingestion and lookup keeps query vectors
/// comparable with stored ones.
pub struct Retriever {
    embeddings: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    top_k: usize,
}

impl Retriever {
    /// Create a new retriever.
    pub fn new(embeddings: Arc<dyn EmbeddingProvider>, store: Arc<dyn VectorStore>) -> Self {
        Self {
            embeddings,
            store,
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Set the number of results returned per query.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Number of results returned per query.
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Embed `content` and store it under `id`.
    ///
    /// Metadata records `source` along with the embedding `model` and
    /// `dimension`. An existing document with the same ID is replaced.
    pub async fn add_document(&self, id: &str, content: &str, source: &str) -> Result<()> {
        let embedding = self.embeddings.embed_one(content).await?;
        let entry = MemoryEntry::new(id, content, embedding)
            .with_metadata("source", Value::String(source.to_string()))
            .with_metadata("model", Value::String(self.embeddings.model_name().to_string()))
            .with_metadata("dimension", Value::from(self.embeddings.dimension()));
        self.store.insert(entry).await?;
        debug!("Indexed document {} ({} bytes)", id, content.len());
        Ok(())
    }

    /// Return the `top_k` stored documents nearest to `query`.
    ///
    /// Fails when a stored vector was produced with a different dimension
    /// than the current provider's, since such documents cannot be compared.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<RetrievedDocument>> {
        let query_embedding = self.embeddings.embed_one(query).await?;
        let results = self.store.search(&query_embedding, self.top_k).await?;

        if let Some((entry, _)) = results
            .iter()
            .find(|(entry, _)| entry.embedding.len() != query_embedding.len())
        {
            return Err(MemoryError::Store(format!(
                "document {} has {}-dimensional embedding but {} produces {}; re-index the collection",
                entry.id,
                entry.embedding.len(),
                self.embeddings.model_name(),
                query_embedding.len()
            )));
        }

        debug!("Query matched {} documents", results.len());
        Ok(results.into_iter().map(RetrievedDocument::from).collect())
    }

    /// Delete a document. Returns whether it was present.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        self.store.delete(id).await
    }

    /// Get a stored document by ID.
    pub async fn get(&self, id: &str) -> Result<Option<MemoryEntry>> {
        self.store.get(id).await
    }

    /// Number of stored documents.
    pub async fn count(&self) -> Result<usize> {
        self.store.count().await
    }
}
