//! Gateway error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use docchat_memory::MemoryError;
use thiserror::Error;
use tracing::error;

/// Errors that can occur in the gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Upload request had no `file` part.
    #[error("No file part")]
    MissingFile,

    /// Upload `file` part had an empty filename.
    #[error("No selected file")]
    EmptyFilename,

    /// Named file does not exist in the upload directory.
    #[error("File not found")]
    FileNotFound,

    /// Malformed multipart body.
    #[error("Invalid multipart body: {0}")]
    Multipart(String),

    /// Conversation log line could not be parsed.
    #[error("Corrupt conversation record at line {line}: {source}")]
    CorruptRecord {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Embedding or vector store failure.
    #[error("Memory error: {0}")]
    Memory(#[from] MemoryError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// HTTP status used when this error reaches a client.
    ///
    /// Upload and delete failures are reported in the payload with a
    /// success status, matching what the page script expects.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingFile | Self::EmptyFilename | Self::FileNotFound => StatusCode::OK,
            Self::Multipart(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
