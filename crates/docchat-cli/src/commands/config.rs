//! Configuration management commands.

use clap::Args;
use docchat_core::config::Config;
use docchat_core::paths;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Config command arguments.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(clap::Subcommand)]
pub enum ConfigCommand {
    /// Show configuration
    Show,

    /// Get a configuration value
    Get {
        /// Configuration key (dot-separated path)
        key: String,
    },

    /// Initialize configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Show configuration file path
    Path,

    /// Validate configuration
    Validate,
}

/// Config file in use: the explicit path, or the default location.
fn resolve_path(config_path: Option<&Path>) -> anyhow::Result<PathBuf> {
    match config_path {
        Some(p) => Ok(paths::expand_tilde(p)),
        None => Ok(paths::config_file()?),
    }
}

/// Walk a dot-separated key through a JSON value.
fn lookup<'a>(json: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.').try_fold(json, |acc, k| acc.get(k))
}

/// Run the config command.
pub async fn run(args: ConfigArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let path = resolve_path(config_path)?;

    match args.command {
        ConfigCommand::Show => {
            let config = Config::load_from(Some(path.as_path()))?;
            println!("{}", config.to_json5()?);
        }

        ConfigCommand::Get { key } => {
            let config = Config::load_from(Some(path.as_path()))?;
            let json = serde_json::to_value(&config)?;

            match lookup(&json, &key) {
                Some(v) => println!("{}", serde_json::to_string_pretty(v)?),
                None => anyhow::bail!("Key not found: {}", key),
            }
        }

        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists: {}. Use --force to overwrite.",
                    path.display()
                );
            }

            Config::default().save(&path)?;
            println!("Created config file: {}", path.display());
        }

        ConfigCommand::Path => {
            println!("{}", path.display());
        }

        ConfigCommand::Validate => {
            let config =
                Config::load(&path).map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
            config
                .validate()
                .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;
            println!("Configuration is valid");
        }
    }

    Ok(())
}
