//! Path resolution utilities.

use crate::error::ConfigError;
use std::path::{Path, PathBuf};

/// Get the DocChat base directory (~/.docchat).
pub fn base_dir() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or_else(|| {
        ConfigError::Validation("Could not determine home directory".to_string())
    })?;
    Ok(home.join(".docchat"))
}

/// Get the main config file path (~/.docchat/docchat.json5).
pub fn config_file() -> Result<PathBuf, ConfigError> {
    Ok(base_dir()?.join("docchat.json5"))
}

/// Expand tilde (~) in a path.
pub fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}

/// Reduce an untrusted file name to its final component.
///
/// Returns `None` when nothing usable remains (empty, `.`, `..`, or a bare
/// separator).
pub fn sanitize_file_name(name: &str) -> Option<String> {
    // Browsers on Windows may send backslash-separated paths.
    let last = name.rsplit(&['/', '\\'][..]).next()?;
    if last.is_empty() || last == "." || last == ".." {
        return None;
    }
    Some(last.to_string())
}
