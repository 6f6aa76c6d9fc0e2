//! WebSocket event channel.
//!
//! Frames are JSON envelopes of the form `{"event": "...", "data": ...}`.
//! A `chat_message` event is answered on the same socket with a
//! `chat_response` event carrying `{"message": ...}`.

use crate::chat::ChatResponder;
use crate::state::AppState;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Event sent by clients with a chat message.
pub const CHAT_MESSAGE: &str = "chat_message";

/// Event sent back with the reply.
pub const CHAT_RESPONSE: &str = "chat_response";

/// One framed event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocketEvent {
    /// Event name.
    pub event: String,

    /// Event payload.
    #[serde(default)]
    pub data: Value,
}

impl SocketEvent {
    /// Create an event.
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }
}

/// Payload text for a chat message; non-string payloads are rendered as JSON.
fn message_text(data: &Value) -> String {
    match data {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Handle one inbound frame, returning the event to send back, if any.
pub async fn dispatch(text: &str, chat: &dyn ChatResponder) -> Option<SocketEvent> {
    let event: SocketEvent = match serde_json::from_str(text) {
        Ok(event) => event,
        Err(e) => {
            warn!("Ignoring malformed socket frame: {}", e);
            return None;
        }
    };

    match event.event.as_str() {
        CHAT_MESSAGE => {
            let message = message_text(&event.data);
            debug!("Chat message: {} chars", message.len());
            match chat.respond(&message).await {
                Ok(reply) => Some(SocketEvent::new(
                    CHAT_RESPONSE,
                    serde_json::json!({ "message": reply }),
                )),
                Err(e) => {
                    error!("Chat responder failed: {}", e);
                    None
                }
            }
        }
        other => {
            debug!("Ignoring unknown socket event: {}", other);
            None
        }
    }
}

/// WebSocket upgrade handler.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let chat = state.chat.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, chat))
}

/// Serve one WebSocket connection until it closes.
async fn handle_socket(socket: WebSocket, chat: Arc<dyn ChatResponder>) {
    info!("Chat client connected");
    let (mut sender, mut receiver) = socket.split();

    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                let Some(reply) = dispatch(&text, chat.as_ref()).await else {
                    continue;
                };
                let frame = match serde_json::to_string(&reply) {
                    Ok(frame) => frame,
                    Err(e) => {
                        error!("Failed to encode socket event: {}", e);
                        continue;
                    }
                };
                if let Err(e) = sender.send(Message::Text(frame)).await {
                    warn!("Failed to send socket event: {}", e);
                    break;
                }
            }
            Ok(Message::Close(_)) => {
                debug!("Chat client closed connection");
                break;
            }
            Err(e) => {
                warn!("WebSocket error: {}", e);
                break;
            }
            _ => {}
        }
    }

    info!("Chat client disconnected");
}
