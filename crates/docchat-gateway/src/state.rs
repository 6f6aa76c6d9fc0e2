//! Shared application services.

use crate::chat::{ChatResponder, EchoResponder};
use crate::conversations::ConversationLog;
use crate::files::FileManager;
use crate::Result;
use docchat_core::config::{
    Config, EmbeddingsConfig, EmbeddingsProvider, VectorBackend, VectorStoreConfig,
};
use docchat_core::env;
use docchat_memory::{
    EmbeddingProvider, FileVectorStore, HashEmbeddings, MemoryError, MemoryVectorStore,
    OpenAIEmbeddings, Retriever, VectorStore,
};
use std::sync::Arc;
use tracing::info;

/// Services handed to every route and socket handler.
#[derive(Clone)]
pub struct AppState {
    /// Upload storage and indexing.
    pub files: Arc<FileManager>,

    /// Saved conversation history.
    pub conversations: Arc<ConversationLog>,

    /// Reply generator for the chat channel.
    pub chat: Arc<dyn ChatResponder>,
}

impl AppState {
    /// Assemble state from already-constructed services.
    pub fn new(
        files: Arc<FileManager>,
        conversations: Arc<ConversationLog>,
        chat: Arc<dyn ChatResponder>,
    ) -> Self {
        Self {
            files,
            conversations,
            chat,
        }
    }

    /// Build every service described by `config`, with the echo responder.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let retriever = Arc::new(build_retriever(config)?);
        let files = FileManager::open(&config.storage.upload_dir, retriever).await?;
        let conversations = ConversationLog::new(&config.storage.conversations_file);

        Ok(Self::new(
            Arc::new(files),
            Arc::new(conversations),
            Arc::new(EchoResponder),
        ))
    }

    /// Replace the chat responder.
    pub fn with_chat(mut self, chat: Arc<dyn ChatResponder>) -> Self {
        self.chat = chat;
        self
    }

    /// Retriever shared with the file manager.
    pub fn retriever(&self) -> &Arc<Retriever> {
        self.files.retriever()
    }
}

/// Build the retriever described by `config`.
pub fn build_retriever(config: &Config) -> Result<Retriever> {
    let embeddings = build_embeddings(&config.embeddings)?;
    let store = build_store(&config.vector_store)?;
    Ok(Retriever::new(embeddings, store).with_top_k(config.retrieval.top_k))
}

/// Build the configured embeddings provider.
pub fn build_embeddings(config: &EmbeddingsConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    let provider: Arc<dyn EmbeddingProvider> = match config.provider {
        EmbeddingsProvider::Local => Arc::new(HashEmbeddings::new(config.dimension)),
        EmbeddingsProvider::Openai => {
            let api_key = env::get_var(env::vars::OPENAI_API_KEY).ok_or_else(|| {
                MemoryError::Config(format!(
                    "{} must be set for the openai embeddings provider",
                    env::vars::OPENAI_API_KEY
                ))
            })?;
            let mut provider = OpenAIEmbeddings::new(api_key);
            if let Some(model) = &config.model {
                provider = provider.with_model(model.clone());
            }
            if let Some(url) = &config.base_url {
                provider = provider.with_base_url(url.clone());
            }
            Arc::new(provider)
        }
    };

    info!(
        "Using embeddings model {} ({} dimensions)",
        provider.model_name(),
        provider.dimension()
    );
    Ok(provider)
}

/// Open the configured vector store.
pub fn build_store(config: &VectorStoreConfig) -> Result<Arc<dyn VectorStore>> {
    let store: Arc<dyn VectorStore> = match config.backend {
        VectorBackend::Memory => Arc::new(MemoryVectorStore::new()),
        VectorBackend::File => {
            let path = config.collection_path();
            info!("Using vector store {}", path.display());
            Arc::new(FileVectorStore::open(path)?)
        }
    };
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_from_config_creates_upload_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.storage.upload_dir = dir.path().join("uploads");
        config.storage.conversations_file = dir.path().join("conversations.json");
        config.vector_store.persist_dir = dir.path().join("vector_db");

        let state = AppState::from_config(&config).await.unwrap();
        assert!(dir.path().join("uploads").is_dir());
        assert_eq!(state.retriever().top_k(), 5);
        assert_eq!(state.chat.respond("x").await.unwrap(), "Echo: x");
    }

    #[tokio::test]
    async fn test_file_store_reopens_collection() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.storage.upload_dir = dir.path().join("uploads");
        config.vector_store.persist_dir = dir.path().join("vector_db");

        {
            let state = AppState::from_config(&config).await.unwrap();
            state.files.upload("kept.txt", b"persisted text").await.unwrap();
        }

        let state = AppState::from_config(&config).await.unwrap();
        assert_eq!(state.retriever().count().await.unwrap(), 1);
    }

    #[test]
    fn test_local_embeddings_dimension() {
        let config = EmbeddingsConfig {
            dimension: 16,
            ..Default::default()
        };
        let provider = build_embeddings(&config).unwrap();
        assert_eq!(provider.dimension(), 16);
    }

    #[test]
    fn test_memory_backend() {
        let config = VectorStoreConfig {
            backend: VectorBackend::Memory,
            ..Default::default()
        };
        assert!(build_store(&config).is_ok());
    }
}
