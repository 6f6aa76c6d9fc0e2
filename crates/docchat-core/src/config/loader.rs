//! Configuration loading and persistence.

use super::{Config, EmbeddingsProvider};
use crate::env;
use crate::error::ConfigError;
use crate::paths;
use std::fs;
use std::path::Path;
use tracing::debug;

impl Config {
    /// Load configuration from the default path.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = paths::config_file()?;
        Self::load(&path)
    }

    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        json5::from_str(content).map_err(|e| ConfigError::Json5(e.to_string()))
    }

    /// Save configuration to a file path.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_json5()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write atomically
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// Serialize to JSON5 string.
    pub fn to_json5(&self) -> Result<String, ConfigError> {
        // json5 doesn't have a serializer; plain JSON is valid JSON5
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Validate the configuration, collecting all errors before returning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.server.port == 0 {
            errors.push("Server port cannot be 0".to_string());
        }

        if self.server.max_upload_bytes == 0 {
            errors.push("Server max_upload_bytes must be greater than 0".to_string());
        }

        if self.storage.upload_dir.as_os_str().is_empty() {
            errors.push("Upload directory must not be empty".to_string());
        }

        if self.storage.conversations_file.as_os_str().is_empty() {
            errors.push("Conversations file must not be empty".to_string());
        }

        if self.vector_store.collection.trim().is_empty() {
            errors.push("Vector store collection name must not be empty".to_string());
        }

        if self.embeddings.provider == EmbeddingsProvider::Local && self.embeddings.dimension == 0 {
            errors.push("Embedding dimension must be greater than 0".to_string());
        }

        if self.retrieval.top_k == 0 {
            errors.push("Retrieval top_k must be greater than 0".to_string());
        }
        if self.retrieval.top_k > 100 {
            errors.push(format!(
                "Retrieval top_k {} exceeds maximum of 100",
                self.retrieval.top_k
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors.join("; ")))
        }
    }

    /// Load from an explicit path, or the default path when `None`.
    ///
    /// A missing file yields defaults; environment overrides are applied in
    /// both cases.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let loaded = match path {
            Some(p) => Self::load(p),
            None => Self::load_default(),
        };

        let mut config = match loaded {
            Ok(config) => config,
            Err(ConfigError::NotFound(p)) => {
                debug!("No config file at {}, using defaults", p.display());
                Self::default()
            }
            Err(e) => return Err(e),
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Some(port) = env::get_u16(env::vars::DOCCHAT_PORT) {
            self.server.port = port;
        }
    }
}
