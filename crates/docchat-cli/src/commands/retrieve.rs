//! Retrieve command.

use clap::Args;
use docchat_core::config::Config;
use docchat_gateway::state::build_retriever;
use std::path::Path;

/// Retrieve command arguments.
#[derive(Args)]
pub struct RetrieveArgs {
    /// Query text
    pub query: String,

    /// Number of documents to return
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,
}

/// Run the retrieve command.
///
/// Prints matching documents as a JSON array, best match first.
pub async fn run(args: RetrieveArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let mut config = Config::load_from(config_path)?;
    if let Some(top_k) = args.top_k {
        config.retrieval.top_k = top_k;
    }
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    let retriever = build_retriever(&config)?;
    let results = retriever.retrieve(&args.query).await?;
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}
