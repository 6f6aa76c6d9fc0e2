//! Vector storage implementations.

use crate::embeddings::cosine_similarity;
use crate::{MemoryEntry, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::debug;

/// Trait for vector stores.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Insert an entry, replacing any entry with the same ID.
    async fn insert(&self, entry: MemoryEntry) -> Result<()>;

    /// Get an entry by ID.
    async fn get(&self, id: &str) -> Result<Option<MemoryEntry>>;

    /// Delete an entry by ID. Returns whether an entry was removed.
    async fn delete(&self, id: &str) -> Result<bool>;

    /// Search for the `limit` entries most similar to `query`.
    async fn search(&self, query: &[f32], limit: usize) -> Result<Vec<(MemoryEntry, f32)>>;

    /// Count entries.
    async fn count(&self) -> Result<usize>;

    /// Clear all entries.
    async fn clear(&self) -> Result<()>;
}

/// Score every entry against `query` and keep the best `limit`.
fn rank(
    entries: &HashMap<String, MemoryEntry>,
    query: &[f32],
    limit: usize,
) -> Vec<(MemoryEntry, f32)> {
    let mut results: Vec<(MemoryEntry, f32)> = entries
        .values()
        .map(|entry| (entry.clone(), cosine_similarity(query, &entry.embedding)))
        .collect();

    // Sort by score descending, ties by id for stable output
    results.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.id.cmp(&b.0.id))
    });
    results.truncate(limit);
    results
}

/// In-memory vector store.
pub struct MemoryVectorStore {
    entries: RwLock<HashMap<String, MemoryEntry>>,
}

impl Default for MemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryVectorStore {
    /// Create a new in-memory vector store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn insert(&self, entry: MemoryEntry) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(entry.id.clone(), entry);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<MemoryEntry>> {
        let entries = self.entries.read().await;
        Ok(entries.get(id).cloned())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut entries = self.entries.write().await;
        Ok(entries.remove(id).is_some())
    }

    async fn search(&self, query: &[f32], limit: usize) -> Result<Vec<(MemoryEntry, f32)>> {
        let entries = self.entries.read().await;
        Ok(rank(&entries, query, limit))
    }

    async fn count(&self) -> Result<usize> {
        let entries = self.entries.read().await;
        Ok(entries.len())
    }

    async fn clear(&self) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.clear();
        Ok(())
    }
}

/// File-backed vector store with JSON persistence.
///
/// One file holds one collection. All mutations are persisted to disk via
/// atomic writes (write to tmp, then rename).
pub struct FileVectorStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, MemoryEntry>>,
}

impl FileVectorStore {
    /// Open a file-backed vector store.
    ///
    /// If the file at `path` exists, its contents are deserialized into memory.
    /// If the file does not exist, the store starts empty and the file is
    /// created on the first mutation.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries: HashMap<String, MemoryEntry> = if path.exists() {
            let data = std::fs::read_to_string(&path)?;
            serde_json::from_str(&data)?
        } else {
            HashMap::new()
        };

        debug!("Opened vector store {} ({} entries)", path.display(), entries.len());

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Atomically persist `entries` to disk.
    async fn save(&self, entries: &HashMap<String, MemoryEntry>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp_path = self.path.with_extension("tmp");
        let data = serde_json::to_vec(entries)?;
        tokio::fs::write(&tmp_path, data).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }
}

// Memory changes only after the new map has been written to disk.
#[async_trait]
impl VectorStore for FileVectorStore {
    async fn insert(&self, entry: MemoryEntry) -> Result<()> {
        let mut entries = self.entries.write().await;
        let mut next = entries.clone();
        next.insert(entry.id.clone(), entry);
        self.save(&next).await?;
        *entries = next;
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<MemoryEntry>> {
        let entries = self.entries.read().await;
        Ok(entries.get(id).cloned())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut entries = self.entries.write().await;
        if !entries.contains_key(id) {
            return Ok(false);
        }
        let mut next = entries.clone();
        next.remove(id);
        self.save(&next).await?;
        *entries = next;
        Ok(true)
    }

    async fn search(&self, query: &[f32], limit: usize) -> Result<Vec<(MemoryEntry, f32)>> {
        let entries = self.entries.read().await;
        Ok(rank(&entries, query, limit))
    }

    async fn count(&self) -> Result<usize> {
        let entries = self.entries.read().await;
        Ok(entries.len())
    }

    async fn clear(&self) -> Result<()> {
        let mut entries = self.entries.write().await;
        self.save(&HashMap::new()).await?;
        entries.clear();
        Ok(())
    }
}
