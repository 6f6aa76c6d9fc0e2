//! Append-only conversation history.

use crate::error::GatewayError;
use crate::Result;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

/// Newline-delimited JSON log of saved conversations.
///
/// Records are opaque JSON values kept in write order. Appends from this
/// process are serialized; other processes writing the same file are not.
pub struct ConversationLog {
    path: PathBuf,
    append_lock: Mutex<()>,
}

impl ConversationLog {
    /// Create a log backed by `path`. The file is created on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            append_lock: Mutex::new(()),
        }
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one conversation as a single line.
    pub async fn save(&self, conversation: &Value) -> Result<()> {
        let mut line = serde_json::to_vec(conversation)?;
        line.push(b'\n');

        let _guard = self.append_lock.lock().await;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(&line).await?;
        file.flush().await?;

        debug!("Saved conversation ({} bytes)", line.len());
        Ok(())
    }

    /// Every saved conversation, oldest first.
    ///
    /// Returns an empty list when the log does not exist yet.
    pub async fn list_all(&self) -> Result<Vec<Value>> {
        let data = match tokio::fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        data.lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| {
                serde_json::from_str(line)
                    .map_err(|source| GatewayError::CorruptRecord { line: i + 1, source })
            })
            .collect()
    }
}
