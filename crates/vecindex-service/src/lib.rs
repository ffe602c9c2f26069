//! gRPC service implementation for vecindex.
//!
//! Provides:
//! - CreateIndex, AddVectors, Search and GetIndexStats RPCs over an
//!   `IndexRegistry`
//! - Health check endpoint (tonic-health)
//! - Reflection endpoint for debugging (tonic-reflection)

pub mod server;
pub mod service;

pub mod pb {
    tonic::include_proto!("vecindex");

    pub const FILE_DESCRIPTOR_SET: &[u8] =
        tonic::include_file_descriptor_set!("vecindex_descriptor");
}

pub use server::{run_server, run_server_with_shutdown, ServerOptions};
pub use service::VectorIndexServiceImpl;
