//! Command-line interface for blunderbuss.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// blunderbuss - networked chess-like game
#[derive(Parser, Debug)]
#[command(name = "blunderbuss")]
#[command(about = "Chess-like game server and terminal client", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve {
        /// Path to a TOML config file
        #[arg(short, long, default_value = "blunderbuss.toml")]
        config: PathBuf,

        /// Port to bind to (overrides the config file)
        #[arg(short, long, env = "BLUNDERBUSS_PORT")]
        port: Option<u16>,

        /// Host to bind to (overrides the config file)
        #[arg(long, env = "BLUNDERBUSS_HOST")]
        host: Option<String>,
    },

    /// Run the terminal client
    Tui {
        /// Game server URL
        #[arg(long, env = "BLUNDERBUSS_SERVER_URL", default_value = "http://localhost:8080")]
        server_url: String,
    },
}
