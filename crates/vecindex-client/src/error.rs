//! Error types for the vecindex client.

use thiserror::Error;

/// Errors that can occur when using the vecindex client.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Failed to connect to the daemon
    #[error("Connection failed: {0}")]
    Connection(#[from] tonic::transport::Error),

    /// RPC call failed
    #[error("RPC failed: {0}")]
    Rpc(#[from] tonic::Status),

    /// Argument rejected before it was sent
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ClientError {
    /// gRPC status code, when the server answered with an error.
    pub fn code(&self) -> Option<tonic::Code> {
        match self {
            ClientError::Rpc(status) => Some(status.code()),
            _ => None,
        }
    }
}
