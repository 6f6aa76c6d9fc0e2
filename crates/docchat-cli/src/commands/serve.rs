//! Serve command.

use clap::Args;
use docchat_core::config::{BindMode, Config};
use docchat_gateway::{AppState, Gateway, GatewayConfig};
use std::path::Path;
use tracing::info;

/// Serve command arguments.
#[derive(Args)]
pub struct ServeArgs {
    /// Bind mode (loopback, lan)
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Port number
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl ServeArgs {
    /// Apply command-line overrides on top of the loaded configuration.
    fn apply(&self, config: &mut Config) -> anyhow::Result<()> {
        if let Some(bind) = &self.bind {
            config.server.bind = bind.parse::<BindMode>().map_err(anyhow::Error::msg)?;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        Ok(())
    }
}

/// Run the serve command.
pub async fn run(args: ServeArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let mut config = Config::load_from(config_path)?;
    args.apply(&mut config)?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    let state = AppState::from_config(&config).await?;
    info!(
        "Serving uploads from {} ({} indexed documents)",
        state.files.upload_dir().display(),
        state.retriever().count().await?
    );

    let gateway = Gateway::new(GatewayConfig::from(&config.server), state);
    gateway.run().await?;
    Ok(())
}
