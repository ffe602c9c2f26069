//! # vecindex-types
//!
//! Shared types for the vecindex workspace.
//!
//! - `Settings`: layered daemon configuration (defaults, file, env, CLI)
//! - `ConfigError`: failures while loading settings
//!
//! ## Usage
//!
//! ```rust,no_run
//! use vecindex_types::Settings;
//!
//! let settings = Settings::load(None).expect("settings");
//! println!("listening on {}", settings.grpc_addr());
//! ```

pub mod settings;
pub mod error;

pub use settings::{Settings, DEFAULT_TOP_K};
pub use error::ConfigError;
