//! HTTP route handlers.

use crate::error::GatewayError;
use crate::state::AppState;
use crate::Result;
use axum::extract::{Multipart, State};
use axum::Json;
use docchat_memory::RetrievedDocument;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Multipart field carrying the uploaded file.
const FILE_FIELD: &str = "file";

/// Successful upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub filename: String,
}

/// Generic success acknowledgement.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    fn ok() -> Json<Self> {
        Json(Self { success: true })
    }
}

/// Body of `POST /delete_file`.
#[derive(Debug, Deserialize)]
pub struct DeleteFileRequest {
    pub filename: String,
}

/// Body of `POST /save_conversation`.
#[derive(Debug, Deserialize)]
pub struct SaveConversationRequest {
    pub conversation: Value,
}

/// Body of `POST /retrieve`.
#[derive(Debug, Deserialize)]
pub struct RetrieveRequest {
    pub query: String,
}

/// `POST /upload_file`
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| GatewayError::Multipart(e.to_string()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        // A part without a filename parameter is a form value, not a file.
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        if filename.is_empty() {
            return Err(GatewayError::EmptyFilename);
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| GatewayError::Multipart(e.to_string()))?;
        let filename = state.files.upload(&filename, &bytes).await?;

        return Ok(Json(UploadResponse {
            success: true,
            filename,
        }));
    }

    Err(GatewayError::MissingFile)
}

/// `GET /get_uploaded_files`
pub async fn get_uploaded_files(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    Ok(Json(state.files.list().await?))
}

/// `POST /delete_file`
pub async fn delete_file(
    State(state): State<AppState>,
    Json(request): Json<DeleteFileRequest>,
) -> Result<Json<SuccessResponse>> {
    state.files.delete(&request.filename).await?;
    Ok(SuccessResponse::ok())
}

/// `POST /save_conversation`
pub async fn save_conversation(
    State(state): State<AppState>,
    Json(request): Json<SaveConversationRequest>,
) -> Result<Json<SuccessResponse>> {
    state.conversations.save(&request.conversation).await?;
    Ok(SuccessResponse::ok())
}

/// `GET /get_conversations`
pub async fn get_conversations(State(state): State<AppState>) -> Result<Json<Vec<Value>>> {
    Ok(Json(state.conversations.list_all().await?))
}

/// `POST /retrieve`
pub async fn retrieve(
    State(state): State<AppState>,
    Json(request): Json<RetrieveRequest>,
) -> Result<Json<Vec<RetrievedDocument>>> {
    debug!("Retrieve: {} chars", request.query.len());
    Ok(Json(state.retriever().retrieve(&request.query).await?))
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Result<Json<Value>> {
    let documents = state.retriever().count().await?;
    Ok(Json(serde_json::json!({
        "status": "ok",
        "documents": documents,
    })))
}
