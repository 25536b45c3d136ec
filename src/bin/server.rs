use anyhow::Context;
use clap::Parser;
use code_navigator::{api, logging, Config};
use std::path::PathBuf;
use tracing::info;

/// Code Navigator HTTP service
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::load(args.config.as_deref()).context("failed to load configuration")?;
    logging::init(config.log_level())?;

    info!("Code Navigator Web Server Starting...");
    info!("Health check: http://{}/health", config.server.bind_addr);

    api::serve(&config).await?;
    Ok(())
}
