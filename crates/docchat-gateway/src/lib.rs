//! HTTP and WebSocket server for DocChat.
//!
//! This crate provides:
//! - Page, upload, and conversation-history routes
//! - A WebSocket event channel for chat
//! - The file manager and conversation log behind those routes

pub mod chat;
pub mod conversations;
pub mod error;
pub mod files;
pub mod pages;
pub mod routes;
pub mod server;
pub mod socket;
pub mod state;

pub use chat::{ChatResponder, EchoResponder};
pub use conversations::ConversationLog;
pub use error::GatewayError;
pub use files::FileManager;
pub use server::{Gateway, GatewayConfig};
pub use state::AppState;

/// Result type for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;
