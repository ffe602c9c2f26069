//! Vecindex daemon library exports.
//!
//! This crate provides the CLI daemon binary for the vecindex service.
//!
//! # Modules
//!
//! - `cli`: Command-line argument parsing with clap
//! - `commands`: Command implementations (start, stop, status, index)

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands, IndexCommands};
pub use commands::{
    handle_index, init_logging, parse_query, parse_vectors, show_status, start_daemon,
    stop_daemon,
};
