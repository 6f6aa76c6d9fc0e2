//! DocChat command-line interface.

pub mod commands;

use clap::{Parser, Subcommand};
use docchat_core::config::LogLevel;
use std::path::PathBuf;

/// DocChat - chat over your uploaded documents
#[derive(Parser)]
#[command(name = "docchat")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to config file
    #[arg(short, long, env = "DOCCHAT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve(commands::serve::ServeArgs),

    /// Query the document index
    Retrieve(commands::retrieve::RetrieveArgs),

    /// Configuration management
    Config(commands::config::ConfigArgs),

    /// Show version information
    Version,
}

/// Default `EnvFilter` directives when `RUST_LOG` is unset.
///
/// Each `-v` raises the level one step above the configured one.
pub fn default_filter(verbose: u8, level: LogLevel) -> String {
    let level = match verbose {
        0 => level,
        1 => match level {
            LogLevel::Error | LogLevel::Warn | LogLevel::Info => LogLevel::Debug,
            _ => LogLevel::Trace,
        },
        _ => LogLevel::Trace,
    };
    format!("docchat={0},tower_http={0}", level.as_str())
}

/// Run the CLI with the given arguments.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Serve(args) => commands::serve::run(args, config_path).await,
        Commands::Retrieve(args) => commands::retrieve::run(args, config_path).await,
        Commands::Config(args) => commands::config::run(args, config_path).await,
        Commands::Version => {
            println!("docchat {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
