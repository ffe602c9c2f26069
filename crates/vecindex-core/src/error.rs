//! Index error types.

use thiserror::Error;

/// Errors returned by registry and index operations.
///
/// Every variant is caller-correctable; none of them leaves an index or the
/// registry in a modified state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndexError {
    /// No index is registered under the key
    #[error("Index with key '{0}' not found")]
    NotFound(String),

    /// An index is already registered under the key
    #[error("Index with key '{0}' already exists")]
    AlreadyExists(String),

    /// Vector or query length disagrees with the index dimension
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Malformed argument (non-positive dimension or k, empty batch, ...)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl IndexError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}
