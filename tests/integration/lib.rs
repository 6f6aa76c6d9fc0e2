//! Shared fixtures for DocChat integration tests.

use axum::body::Body;
use axum::http::Request;
use docchat_core::config::{Config, VectorBackend};
use docchat_gateway::AppState;
use http_body_util::BodyExt;
use serde_json::Value;
use std::path::Path;

/// Multipart boundary used by [`upload_request`].
pub const BOUNDARY: &str = "docchat-integration-boundary";

/// Configuration rooted in `dir`, using the given vector backend.
pub fn config_in(dir: &Path, backend: VectorBackend) -> Config {
    let mut config = Config::default();
    config.storage.upload_dir = dir.join("uploads");
    config.storage.conversations_file = dir.join("conversations.json");
    config.vector_store.backend = backend;
    config.vector_store.persist_dir = dir.join("vector_db");
    config
}

/// Build application state for a configuration.
pub async fn state_for(config: &Config) -> AppState {
    AppState::from_config(config).await.unwrap()
}

/// `POST /upload_file` with a single file part.
pub fn upload_request(filename: &str, content: &str) -> Request<Body> {
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\n\
         Content-Type: text/plain\r\n\r\n{c}\r\n--{b}--\r\n",
        b = BOUNDARY,
        f = filename,
        c = content
    );
    Request::builder()
        .method("POST")
        .uri("/upload_file")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

/// JSON `POST` request.
pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Plain `GET` request.
pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Collect a response body as JSON.
pub async fn json_body(resp: axum::response::Response) -> Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
