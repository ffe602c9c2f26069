//! gRPC server setup with health check and reflection.

use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::Arc;

use tonic::transport::Server;
use tonic_health::server::health_reporter;
use tonic_reflection::server::Builder as ReflectionBuilder;
use tracing::info;

use vecindex_core::IndexRegistry;
use vecindex_types::{ConfigError, Settings};

use crate::pb::{vector_index_service_server::VectorIndexServiceServer, FILE_DESCRIPTOR_SET};
use crate::service::{VectorIndexServiceImpl, DEFAULT_K};

/// Server knobs taken from `Settings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerOptions {
    /// `k` used when a search leaves it unset
    pub default_top_k: NonZeroU32,
    /// Max encoded/decoded gRPC message size
    pub max_message_bytes: usize,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            default_top_k: DEFAULT_K,
            max_message_bytes: Settings::default().max_message_bytes,
        }
    }
}

impl TryFrom<&Settings> for ServerOptions {
    type Error = ConfigError;

    fn try_from(settings: &Settings) -> Result<Self, Self::Error> {
        settings.validate()?;
        let default_top_k = NonZeroU32::new(settings.default_top_k)
            .ok_or_else(|| ConfigError::Invalid("default_top_k must be > 0".to_string()))?;
        Ok(Self {
            default_top_k,
            max_message_bytes: settings.max_message_bytes,
        })
    }
}

/// Run the gRPC server until the process exits.
pub async fn run_server(
    addr: SocketAddr,
    registry: Arc<IndexRegistry>,
    options: ServerOptions,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    run_server_with_shutdown(addr, registry, options, std::future::pending()).await
}

/// Run the gRPC server with graceful shutdown support.
///
/// This function:
/// 1. Sets up the health check service
/// 2. Sets up the reflection service
/// 3. Registers the VectorIndexService over `registry`
/// 4. Serves on `addr` until `shutdown_signal` resolves
pub async fn run_server_with_shutdown<F>(
    addr: SocketAddr,
    registry: Arc<IndexRegistry>,
    options: ServerOptions,
    shutdown_signal: F,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    info!("Starting gRPC server on {}", addr);

    let (mut health_reporter, health_service) = health_reporter();
    health_reporter
        .set_serving::<VectorIndexServiceServer<VectorIndexServiceImpl>>()
        .await;

    let reflection_service = ReflectionBuilder::configure()
        .register_encoded_file_descriptor_set(FILE_DESCRIPTOR_SET)
        .build_v1()?;

    let index_service = VectorIndexServiceServer::new(
        VectorIndexServiceImpl::new(registry).with_default_top_k(options.default_top_k),
    )
    .max_decoding_message_size(options.max_message_bytes)
    .max_encoding_message_size(options.max_message_bytes);

    info!(
        default_top_k = options.default_top_k.get(),
        max_message_bytes = options.max_message_bytes,
        "gRPC server ready on {}",
        addr
    );

    Server::builder()
        .add_service(health_service)
        .add_service(reflection_service)
        .add_service(index_service)
        .serve_with_shutdown(addr, shutdown_signal)
        .await?;

    info!("gRPC server shutdown complete");
    Ok(())
}
