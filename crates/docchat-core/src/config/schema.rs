//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main DocChat configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Upload and conversation storage.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Vector store settings.
    #[serde(default)]
    pub vector_store: VectorStoreConfig,

    /// Embeddings provider settings.
    #[serde(default)]
    pub embeddings: EmbeddingsConfig,

    /// Retrieval settings.
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind mode.
    #[serde(default)]
    pub bind: BindMode,

    /// Port number.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Enable CORS.
    #[serde(default = "default_true")]
    pub cors: bool,

    /// Largest accepted request body, in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: BindMode::default(),
            port: default_port(),
            cors: true,
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_port() -> u16 {
    8080
}

fn default_max_upload_bytes() -> usize {
    16 * 1024 * 1024
}

/// Interface the server binds to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindMode {
    /// Bind to loopback only (127.0.0.1).
    Loopback,

    /// Bind to all interfaces (0.0.0.0).
    #[default]
    Lan,
}

impl std::str::FromStr for BindMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "loopback" => Ok(Self::Loopback),
            "lan" => Ok(Self::Lan),
            other => Err(format!("Invalid bind mode: {} (expected loopback or lan)", other)),
        }
    }
}

/// File and conversation storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory uploaded files are written to.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    /// Newline-delimited JSON conversation log.
    #[serde(default = "default_conversations_file")]
    pub conversations_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            conversations_file: default_conversations_file(),
        }
    }
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_conversations_file() -> PathBuf {
    PathBuf::from("conversations.json")
}

/// Vector store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorStoreConfig {
    /// Storage backend.
    #[serde(default)]
    pub backend: VectorBackend,

    /// Directory holding persisted collections.
    #[serde(default = "default_persist_dir")]
    pub persist_dir: PathBuf,

    /// Collection name.
    #[serde(default = "default_collection")]
    pub collection: String,
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            backend: VectorBackend::default(),
            persist_dir: default_persist_dir(),
            collection: default_collection(),
        }
    }
}

impl VectorStoreConfig {
    /// Path of the JSON file backing the configured collection.
    pub fn collection_path(&self) -> PathBuf {
        self.persist_dir.join(format!("{}.json", self.collection))
    }
}

fn default_persist_dir() -> PathBuf {
    PathBuf::from("vector_db")
}

fn default_collection() -> String {
    "chatbot_collection".to_string()
}

/// Vector store backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VectorBackend {
    /// JSON file under `persist_dir`.
    #[default]
    File,

    /// Process memory only.
    Memory,
}

/// Embeddings configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingsConfig {
    /// Embeddings provider.
    #[serde(default)]
    pub provider: EmbeddingsProvider,

    /// Vector dimension for the local provider.
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// Model name for remote providers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Base URL override for remote providers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for EmbeddingsConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingsProvider::default(),
            dimension: default_dimension(),
            model: None,
            base_url: None,
        }
    }
}

fn default_dimension() -> usize {
    384
}

/// Embeddings provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingsProvider {
    /// Offline hashed n-gram embeddings.
    #[default]
    Local,
    Openai,
}

/// Retrieval configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of nearest documents returned.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

fn default_top_k() -> usize {
    5
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default)]
    pub level: LogLevel,
}

/// Log level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

fn default_true() -> bool {
    true
}
