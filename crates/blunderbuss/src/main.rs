//! blunderbuss - unified CLI
//!
//! Runs either the game server or the terminal client.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use blunderbuss_server::ServerConfig;
use clap::Parser;
use cli::{Cli, Command};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { config, port, host } => run_server(config, port, host).await,
        Command::Tui { server_url } => blunderbuss::run_tui(server_url).await,
    }
}

/// Run the HTTP game server
async fn run_server(config_path: PathBuf, port: Option<u16>, host: Option<String>) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,blunderbuss=debug,blunderbuss_server=debug")),
        )
        .init();

    let mut config = load_server_config(&config_path)?;
    if let Some(port) = port {
        config = config.with_port(port);
    }
    if let Some(host) = host {
        config = config.with_host(host);
    }

    info!(addr = %config.bind_addr(), "Starting blunderbuss server");
    blunderbuss_server::run(config).await?;
    Ok(())
}

#[instrument(skip(path), fields(path = %path.display()))]
fn load_server_config(path: &Path) -> Result<ServerConfig> {
    if path.exists() {
        Ok(ServerConfig::from_file(path)?)
    } else {
        info!("Config file not found, using defaults");
        Ok(ServerConfig::default())
    }
}
