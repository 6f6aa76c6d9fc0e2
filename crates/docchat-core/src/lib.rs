//! # docchat-core
//!
//! Core configuration and utilities for DocChat.
//!
//! This crate provides shared functionality used across all DocChat crates:
//!
//! - **Configuration**: Loading, validation, and persistence of the JSON5 config file
//! - **Paths**: Resolution of the config directory and data locations
//! - **Environment**: Typed access to environment overrides

pub mod config;
pub mod env;
pub mod error;
pub mod paths;

// Re-exports for convenience
pub use config::Config;
pub use error::{ConfigError, Result};
