//! Environment variable handling.

use std::env;

/// Well-known environment variable names.
pub mod vars {
    /// Overrides the config file location.
    pub const DOCCHAT_CONFIG: &str = "DOCCHAT_CONFIG";

    /// Overrides the server port.
    pub const DOCCHAT_PORT: &str = "DOCCHAT_PORT";

    /// API key for the OpenAI embeddings provider.
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
}

/// Get an environment variable, returning None if not set or empty.
pub fn get_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable as a u16 (e.g., for ports).
pub fn get_u16(name: &str) -> Option<u16> {
    get_var(name).and_then(|v| v.parse().ok())
}
