//! Chat response capability.

use crate::Result;
use async_trait::async_trait;

/// Produces a reply for one chat message.
///
/// The WebSocket layer only talks to this trait, so a language-model backed
/// implementation can replace [`EchoResponder`] without touching transport code.
#[async_trait]
pub trait ChatResponder: Send + Sync {
    /// Reply to `message`.
    async fn respond(&self, message: &str) -> Result<String>;
}

/// Replies with the input prefixed by `"Echo: "`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoResponder;

/// Marker prepended by [`EchoResponder`].
pub const ECHO_PREFIX: &str = "Echo: ";

#[async_trait]
impl ChatResponder for EchoResponder {
    async fn respond(&self, message: &str) -> Result<String> {
        Ok(format!("{}{}", ECHO_PREFIX, message))
    }
}
