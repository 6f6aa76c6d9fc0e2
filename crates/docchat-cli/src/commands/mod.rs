//! CLI command implementations.

pub mod config;
pub mod retrieve;
pub mod serve;
