//! Configuration loading for vecindex.
//!
//! Layered config: defaults -> config file -> env vars -> CLI flags.
//! The default config file lives at ~/.config/vecindex/config.toml.

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;

/// Neighbors returned by a search that does not specify `k`.
pub const DEFAULT_TOP_K: u32 = 5;

/// Main application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// gRPC server port
    #[serde(default = "default_grpc_port")]
    pub grpc_port: u16,

    /// gRPC server host
    #[serde(default = "default_grpc_host")]
    pub grpc_host: String,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Search `k` used when a request leaves it unset
    #[serde(default = "default_top_k")]
    pub default_top_k: u32,

    /// Largest gRPC message accepted or sent, in bytes
    #[serde(default = "default_max_message_bytes")]
    pub max_message_bytes: usize,
}

fn default_grpc_port() -> u16 {
    50051
}

fn default_grpc_host() -> String {
    "0.0.0.0".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_top_k() -> u32 {
    DEFAULT_TOP_K
}

fn default_max_message_bytes() -> usize {
    16 * 1024 * 1024
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grpc_port: default_grpc_port(),
            grpc_host: default_grpc_host(),
            log_level: default_log_level(),
            default_top_k: default_top_k(),
            max_message_bytes: default_max_message_bytes(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/vecindex/config.toml)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (VECINDEX_GRPC_PORT, VECINDEX_LOG_LEVEL, ...)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, ConfigError> {
        let config_dir = ProjectDirs::from("", "", "vecindex")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("grpc_port", default_grpc_port() as i64)?
            .set_default("grpc_host", default_grpc_host())?
            .set_default("log_level", default_log_level())?
            .set_default("default_top_k", default_top_k() as i64)?
            .set_default("max_message_bytes", default_max_message_bytes() as i64)?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // `__` nests keys: VECINDEX_GRPC_PORT -> grpc_port
        builder = builder.add_source(
            Environment::with_prefix("VECINDEX")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the server cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_top_k == 0 {
            return Err(ConfigError::Invalid(
                "default_top_k must be > 0".to_string(),
            ));
        }
        if self.max_message_bytes == 0 {
            return Err(ConfigError::Invalid(
                "max_message_bytes must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the socket address for the gRPC server
    pub fn grpc_addr(&self) -> String {
        format!("{}:{}", self.grpc_host, self.grpc_port)
    }
}
