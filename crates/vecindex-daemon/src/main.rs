//! Vecindex Daemon
//!
//! Keyed in-memory vector indexes with exact cosine search, served over gRPC.
//!
//! # Usage
//!
//! ```bash
//! vecindex-daemon start [--foreground] [--port PORT] [--host HOST]
//! vecindex-daemon stop
//! vecindex-daemon status
//! vecindex-daemon index create docs 3
//! vecindex-daemon index add docs --vectors '[[1,0,0],[0,1,0]]'
//! vecindex-daemon index search docs --query '[1,0,0]' -k 2
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/vecindex/config.toml)
//! 3. Environment variables (VECINDEX_*)
//! 4. CLI flags

use anyhow::Result;
use clap::Parser;

use vecindex_daemon::{
    handle_index, init_logging, show_status, start_daemon, stop_daemon, Cli, Commands,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Start {
            foreground,
            port,
            host,
        } => {
            start_daemon(
                cli.config.as_deref(),
                foreground,
                port,
                host.as_deref(),
                cli.log_level.as_deref(),
            )
            .await?;
        }
        Commands::Stop => {
            stop_daemon()?;
        }
        Commands::Status => {
            show_status()?;
        }
        Commands::Index { endpoint, command } => {
            init_logging(cli.log_level.as_deref().unwrap_or("warn"))?;
            handle_index(&endpoint, command).await?;
        }
    }

    Ok(())
}
