//! Command implementations for the vecindex daemon.
//!
//! Handles:
//! - start: Load config, build the registry, start gRPC server
//! - stop: Signal running daemon to stop (via PID file)
//! - status: Check if daemon is running
//! - index: Client-side create/add/search/stats against a running daemon

use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{info, warn};

use vecindex_client::VectorIndexClient;
use vecindex_core::IndexRegistry;
use vecindex_service::{run_server_with_shutdown, ServerOptions};
use vecindex_types::Settings;

use crate::cli::IndexCommands;

/// Get the PID file path
fn pid_file_path() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| {
            // On Linux, use runtime dir or fall back to cache dir
            #[cfg(unix)]
            {
                dirs.runtime_dir()
                    .map(|p| p.to_path_buf())
                    .unwrap_or_else(|| dirs.cache_dir().to_path_buf())
            }
            #[cfg(not(unix))]
            {
                dirs.cache_dir().to_path_buf()
            }
        })
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("vecindex")
        .join("daemon.pid")
}

/// Write PID to file
fn write_pid_file() -> Result<()> {
    let pid_path = pid_file_path();
    if let Some(parent) = pid_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&pid_path, std::process::id().to_string())?;
    info!("Wrote PID file: {:?}", pid_path);
    Ok(())
}

/// Remove PID file
fn remove_pid_file() {
    let pid_path = pid_file_path();
    if pid_path.exists() {
        if let Err(e) = fs::remove_file(&pid_path) {
            warn!("Failed to remove PID file: {}", e);
        } else {
            info!("Removed PID file");
        }
    }
}

/// Read PID from file
fn read_pid_file() -> Option<u32> {
    let pid_path = pid_file_path();
    fs::read_to_string(&pid_path)
        .ok()
        .and_then(|s| s.trim().parse().ok())
}

/// Check if a process is running
#[cfg(unix)]
fn is_process_running(pid: u32) -> bool {
    // Signal 0 only checks that the process exists
    unsafe { libc::kill(pid as i32, 0) == 0 }
}

#[cfg(not(unix))]
fn is_process_running(_pid: u32) -> bool {
    // Without a probe, trust the PID file
    true
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when set.
pub fn init_logging(level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down...");
        }
    }
}

/// Start the vecindex daemon.
///
/// 1. Load configuration (defaults -> file -> env -> CLI)
/// 2. Build an empty index registry
/// 3. Start gRPC server
/// 4. Handle graceful shutdown on SIGINT/SIGTERM
pub async fn start_daemon(
    config_path: Option<&str>,
    foreground: bool,
    port_override: Option<u16>,
    host_override: Option<&str>,
    log_level_override: Option<&str>,
) -> Result<()> {
    let mut settings = Settings::load(config_path).context("Failed to load configuration")?;

    // CLI flags have the highest precedence
    if let Some(port) = port_override {
        settings.grpc_port = port;
    }
    if let Some(host) = host_override {
        settings.grpc_host = host.to_string();
    }
    if let Some(log_level) = log_level_override {
        settings.log_level = log_level.to_string();
    }

    init_logging(&settings.log_level)?;

    info!("Vecindex daemon starting...");
    info!("Configuration:");
    info!("  gRPC address: {}", settings.grpc_addr());
    info!("  Default top-k: {}", settings.default_top_k);
    info!("  Max message bytes: {}", settings.max_message_bytes);
    info!("  Log level: {}", settings.log_level);

    if !foreground {
        warn!("Background mode not implemented, running in foreground");
        warn!("Use a process manager (systemd, launchd) for background operation");
    }

    // Indexes live only as long as this process
    let registry = Arc::new(IndexRegistry::new());

    let options = ServerOptions::try_from(&settings).context("Invalid server settings")?;
    let addr: SocketAddr = settings
        .grpc_addr()
        .parse()
        .context("Invalid gRPC address")?;

    write_pid_file()?;

    let result = run_server_with_shutdown(
        addr,
        registry,
        options,
        shutdown_signal(),
    )
    .await;

    remove_pid_file();

    result.map_err(|e| anyhow::anyhow!("Server error: {}", e))
}

/// Stop the running daemon by sending SIGTERM.
pub fn stop_daemon() -> Result<()> {
    let pid = read_pid_file().context("No PID file found - daemon may not be running")?;

    if !is_process_running(pid) {
        remove_pid_file();
        anyhow::bail!("Daemon not running (stale PID file removed)");
    }

    #[cfg(unix)]
    {
        unsafe {
            if libc::kill(pid as i32, libc::SIGTERM) != 0 {
                anyhow::bail!("Failed to send SIGTERM to daemon");
            }
        }
        println!("Sent SIGTERM to daemon (PID {})", pid);
    }

    #[cfg(not(unix))]
    {
        anyhow::bail!("Stop command not yet implemented on this platform");
    }

    Ok(())
}

/// Show daemon status.
pub fn show_status() -> Result<()> {
    let pid_path = pid_file_path();

    match read_pid_file() {
        Some(pid) if is_process_running(pid) => {
            println!("Vecindex daemon is running (PID {})", pid);
            println!("PID file: {:?}", pid_path);
        }
        Some(pid) => {
            println!(
                "Vecindex daemon is NOT running (stale PID {} in {:?})",
                pid, pid_path
            );
        }
        None => {
            println!("Vecindex daemon is NOT running (no PID file)");
        }
    }
    Ok(())
}

/// Parse a JSON list of vectors, e.g. `[[1, 0], [0, 1]]`.
pub fn parse_vectors(raw: &str) -> Result<Vec<Vec<f32>>> {
    let vectors: Vec<Vec<f32>> =
        serde_json::from_str(raw).context("--vectors must be a JSON list of number lists")?;
    if vectors.is_empty() {
        anyhow::bail!("--vectors must contain at least one vector");
    }
    Ok(vectors)
}

/// Parse a JSON query vector, e.g. `[1, 0, 0]`.
pub fn parse_query(raw: &str) -> Result<Vec<f32>> {
    serde_json::from_str(raw).context("--query must be a JSON list of numbers")
}

/// Run an index subcommand against a running daemon.
pub async fn handle_index(endpoint: &str, command: IndexCommands) -> Result<()> {
    let mut client = VectorIndexClient::connect(endpoint)
        .await
        .with_context(|| format!("Failed to connect to {}", endpoint))?;

    match command {
        IndexCommands::Create { key, dimension } => {
            let dimension = client.create_index(&key, dimension).await?;
            println!("Index '{}' created (dimension {})", key, dimension);
        }
        IndexCommands::Add { key, vectors } => {
            let vectors = parse_vectors(&vectors)?;
            let result = client.add_vectors(&key, vectors).await?;
            println!(
                "{} (ids {}..{})",
                result.message,
                result.first_id,
                result.first_id + result.added_count
            );
        }
        IndexCommands::Search { key, query, k } => {
            let query = parse_query(&query)?;
            let hits = client.search(&key, query, k).await?;
            if hits.is_empty() {
                println!("No results");
            }
            for (rank, (id, score)) in hits.ids.iter().zip(hits.scores.iter()).enumerate() {
                println!("{:>3}. id={:<8} score={:.6}", rank + 1, id, score);
            }
        }
        IndexCommands::Stats { key } => {
            let stats = client.index_stats(&key).await?;
            println!("Index: {}", stats.key);
            println!("  Dimension: {}", stats.dimension);
            println!("  Vectors: {}", stats.vector_count);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pid_file_path() {
        let path = pid_file_path();
        assert!(path.ends_with("daemon.pid"));
        assert!(path
            .parent()
            .unwrap()
            .to_string_lossy()
            .contains("vecindex"));
    }

    #[test]
    fn test_status_no_daemon() {
        let result = show_status();
        assert!(result.is_ok());
    }

    #[test]
    fn test_parse_vectors() {
        let vectors = parse_vectors("[[1, 0, 0], [0, 1.5, -2]]").unwrap();
        assert_eq!(vectors, vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.5, -2.0]]);

        assert!(parse_vectors("[]").is_err());
        assert!(parse_vectors("[1, 2]").is_err());
        assert!(parse_vectors("not json").is_err());
    }

    #[test]
    fn test_parse_query() {
        assert_eq!(parse_query("[0.25, -1]").unwrap(), vec![0.25, -1.0]);
        assert!(parse_query("[[1]]").is_err());
    }
}
