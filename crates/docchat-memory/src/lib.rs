//! Document embeddings and vector storage for DocChat.
//!
//! This crate provides:
//! - Embedding generation (offline hashed n-grams, or the OpenAI API)
//! - Vector storage in memory or persisted to a JSON collection file
//! - A [`Retriever`] that ties the two together for ingest and top-k lookup

pub mod embeddings;
pub mod error;
pub mod search;
pub mod store;

pub use embeddings::{EmbeddingProvider, HashEmbeddings, OpenAIEmbeddings};
pub use error::MemoryError;
pub use search::{RetrievedDocument, Retriever, DEFAULT_TOP_K};
pub use store::{FileVectorStore, MemoryVectorStore, VectorStore};

use std::collections::HashMap;

/// Result type for memory operations.
pub type Result<T> = std::result::Result<T, MemoryError>;

/// A stored document with its vector embedding.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct MemoryEntry {
    /// Unique identifier.
    pub id: String,

    /// Text content.
    pub content: String,

    /// Vector embedding.
    pub embedding: Vec<f32>,

    /// Metadata.
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,

    /// Creation timestamp.
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl MemoryEntry {
    /// Create a new entry.
    pub fn new(id: impl Into<String>, content: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            embedding,
            metadata: HashMap::new(),
            created_at: chrono::Utc::now(),
        }
    }

    /// Add metadata.
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}
