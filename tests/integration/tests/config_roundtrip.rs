//! Config save/load roundtrip integration tests.
//!
//! These tests verify that configuration can be serialized, written to disk,
//! and loaded back with identical field values.

use docchat_core::config::{BindMode, Config, EmbeddingsProvider, VectorBackend};
use std::path::Path;
use tempfile::TempDir;

#[test]
fn test_config_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("docchat.json5");

    let config = Config::default();
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.server.port, config.server.port);
    assert_eq!(loaded.server.bind, config.server.bind);
    assert_eq!(loaded.retrieval.top_k, config.retrieval.top_k);
    assert_eq!(loaded.vector_store.collection, config.vector_store.collection);
    assert_eq!(loaded.embeddings.dimension, config.embeddings.dimension);
}

#[test]
fn test_config_modify_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("docchat.json5");

    let mut config = Config::default();
    config.server.port = 9090;
    config.server.bind = BindMode::Loopback;
    config.vector_store.backend = VectorBackend::Memory;
    config.embeddings.provider = EmbeddingsProvider::Openai;
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.server.port, 9090);
    assert_eq!(loaded.server.bind, BindMode::Loopback);
    assert_eq!(loaded.vector_store.backend, VectorBackend::Memory);
    assert_eq!(loaded.embeddings.provider, EmbeddingsProvider::Openai);
}

#[test]
fn test_config_load_nonexistent() {
    let result = Config::load(Path::new("/nonexistent/docchat.json5"));
    assert!(result.is_err());
}

#[test]
fn test_config_load_from_missing_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let config = Config::load_from(Some(dir.path().join("absent.json5").as_path())).unwrap();
    assert_eq!(config.storage.upload_dir, Path::new("uploads"));
    assert_eq!(
        config.vector_store.collection_path(),
        Path::new("vector_db").join("chatbot_collection.json")
    );
}

#[test]
fn test_config_parse_invalid() {
    let result = Config::parse("not valid json");
    assert!(result.is_err());
}
