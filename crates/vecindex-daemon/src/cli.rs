//! CLI argument parsing for the vecindex daemon.
//!
//! CLI flags override all other config sources.

use clap::{Parser, Subcommand};

/// Vecindex Daemon
///
/// Serves keyed in-memory vector indexes with exact cosine search over gRPC.
#[derive(Parser, Debug)]
#[command(name = "vecindex-daemon")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/vecindex/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Daemon commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the vecindex daemon
    Start {
        /// Run in foreground (don't daemonize)
        #[arg(short, long)]
        foreground: bool,

        /// Override gRPC port
        #[arg(short, long)]
        port: Option<u16>,

        /// Override gRPC bind host
        #[arg(long)]
        host: Option<String>,
    },

    /// Stop the running daemon
    Stop,

    /// Show daemon status
    Status,

    /// Create, fill and search indexes on a running daemon
    Index {
        /// gRPC endpoint (default: http://[::1]:50051)
        #[arg(short, long, default_value = "http://[::1]:50051")]
        endpoint: String,

        #[command(subcommand)]
        command: IndexCommands,
    },
}

/// Index subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum IndexCommands {
    /// Create an empty index
    Create {
        /// Index key
        key: String,

        /// Vector dimension
        dimension: u32,
    },

    /// Append vectors to an index
    Add {
        /// Index key
        key: String,

        /// JSON list of vectors, e.g. '[[1,0,0],[0,1,0]]'
        #[arg(long)]
        vectors: String,
    },

    /// Search an index
    Search {
        /// Index key
        key: String,

        /// JSON query vector, e.g. '[1,0,0]'
        #[arg(long)]
        query: String,

        /// Number of neighbors (server default when omitted)
        #[arg(short, long)]
        k: Option<u32>,
    },

    /// Show dimension and vector count of an index
    Stats {
        /// Index key
        key: String,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_start_foreground() {
        let cli = Cli::parse_from(["vecindex-daemon", "start", "--foreground"]);
        match cli.command {
            Commands::Start { foreground, .. } => assert!(foreground),
            _ => panic!("Expected Start command"),
        }
    }

    #[test]
    fn test_cli_start_with_port_and_host() {
        let cli = Cli::parse_from(["vecindex-daemon", "start", "-p", "9999", "--host", "127.0.0.1"]);
        match cli.command {
            Commands::Start { port, host, .. } => {
                assert_eq!(port, Some(9999));
                assert_eq!(host.as_deref(), Some("127.0.0.1"));
            }
            _ => panic!("Expected Start command"),
        }
    }

    #[test]
    fn test_cli_with_config_and_log_level() {
        let cli = Cli::parse_from([
            "vecindex-daemon",
            "--config",
            "/path/to/config.toml",
            "--log-level",
            "debug",
            "start",
        ]);
        assert_eq!(cli.config, Some("/path/to/config.toml".to_string()));
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_status_and_stop() {
        let cli = Cli::parse_from(["vecindex-daemon", "status"]);
        assert!(matches!(cli.command, Commands::Status));

        let cli = Cli::parse_from(["vecindex-daemon", "stop"]);
        assert!(matches!(cli.command, Commands::Stop));
    }

    #[test]
    fn test_cli_index_create() {
        let cli = Cli::parse_from(["vecindex-daemon", "index", "create", "docs", "3"]);
        match cli.command {
            Commands::Index { endpoint, command } => {
                assert_eq!(endpoint, "http://[::1]:50051");
                match command {
                    IndexCommands::Create { key, dimension } => {
                        assert_eq!(key, "docs");
                        assert_eq!(dimension, 3);
                    }
                    _ => panic!("Expected Create command"),
                }
            }
            _ => panic!("Expected Index command"),
        }
    }

    #[test]
    fn test_cli_index_search_with_endpoint() {
        let cli = Cli::parse_from([
            "vecindex-daemon",
            "index",
            "-e",
            "http://localhost:9999",
            "search",
            "docs",
            "--query",
            "[-1.0, 0.5, 0]",
            "-k",
            "2",
        ]);
        match cli.command {
            Commands::Index { endpoint, command } => {
                assert_eq!(endpoint, "http://localhost:9999");
                match command {
                    IndexCommands::Search { key, query, k } => {
                        assert_eq!(key, "docs");
                        assert_eq!(query, "[-1.0, 0.5, 0]");
                        assert_eq!(k, Some(2));
                    }
                    _ => panic!("Expected Search command"),
                }
            }
            _ => panic!("Expected Index command"),
        }
    }

    #[test]
    fn test_cli_index_add() {
        let cli = Cli::parse_from([
            "vecindex-daemon",
            "index",
            "add",
            "docs",
            "--vectors",
            "[[1,0,0],[0,1,0]]",
        ]);
        match cli.command {
            Commands::Index {
                command: IndexCommands::Add { key, vectors },
                ..
            } => {
                assert_eq!(key, "docs");
                assert_eq!(vectors, "[[1,0,0],[0,1,0]]");
            }
            _ => panic!("Expected Index add command"),
        }
    }
}
