//! Vector index client for connecting to the daemon.

use tonic::transport::Channel;
use tracing::{debug, info};

use vecindex_service::pb::{
    vector_index_service_client::VectorIndexServiceClient, AddVectorsRequest, CreateIndexRequest,
    GetIndexStatsRequest, SearchRequest, Vector as ProtoVector,
};

use crate::error::ClientError;

/// Default endpoint for the vecindex daemon.
pub const DEFAULT_ENDPOINT: &str = "http://[::1]:50051";

/// Outcome of an AddVectors call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddVectorsResult {
    pub added_count: u64,
    pub first_id: u64,
    pub message: String,
}

/// Search hits as parallel sequences, best first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchHits {
    pub scores: Vec<f32>,
    pub ids: Vec<u64>,
}

impl SearchHits {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Dimension and size of a remote index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexStats {
    pub key: String,
    pub dimension: u32,
    pub vector_count: u64,
}

/// Client for communicating with the vecindex daemon.
#[derive(Debug, Clone)]
pub struct VectorIndexClient {
    inner: VectorIndexServiceClient<Channel>,
}

impl VectorIndexClient {
    /// Connect to the daemon.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Connection` if connection fails.
    pub async fn connect(endpoint: &str) -> Result<Self, ClientError> {
        info!("Connecting to vecindex daemon at {}", endpoint);
        let inner = VectorIndexServiceClient::connect(endpoint.to_string()).await?;
        Ok(Self { inner })
    }

    /// Connect to the default endpoint.
    pub async fn connect_default() -> Result<Self, ClientError> {
        Self::connect(DEFAULT_ENDPOINT).await
    }

    /// Create an index. Returns the confirmed dimension.
    pub async fn create_index(&mut self, key: &str, dimension: u32) -> Result<u32, ClientError> {
        let dimension = i32::try_from(dimension).map_err(|_| {
            ClientError::InvalidInput(format!("dimension {} is too large", dimension))
        })?;
        debug!(key, dimension, "CreateIndex request");

        let response = self
            .inner
            .create_index(tonic::Request::new(CreateIndexRequest {
                key: key.to_string(),
                dimension,
            }))
            .await?
            .into_inner();

        info!("{}", response.message);
        Ok(response.dimension as u32)
    }

    /// Append vectors to an index.
    pub async fn add_vectors(
        &mut self,
        key: &str,
        vectors: Vec<Vec<f32>>,
    ) -> Result<AddVectorsResult, ClientError> {
        debug!(key, batch = vectors.len(), "AddVectors request");

        let response = self
            .inner
            .add_vectors(tonic::Request::new(AddVectorsRequest {
                key: key.to_string(),
                vectors: vectors
                    .into_iter()
                    .map(|values| ProtoVector { values })
                    .collect(),
            }))
            .await?
            .into_inner();

        Ok(AddVectorsResult {
            added_count: response.added_count as u64,
            first_id: response.first_id as u64,
            message: response.message,
        })
    }

    /// Search an index. `None` uses the server's default `k`.
    pub async fn search(
        &mut self,
        key: &str,
        query: Vec<f32>,
        k: Option<u32>,
    ) -> Result<SearchHits, ClientError> {
        debug!(key, ?k, "Search request");

        let response = self
            .inner
            .search(tonic::Request::new(SearchRequest {
                key: key.to_string(),
                query,
                k: k.map(|k| i32::try_from(k).unwrap_or(i32::MAX)),
            }))
            .await?
            .into_inner();

        Ok(SearchHits {
            scores: response.scores,
            ids: response.ids.into_iter().map(|id| id as u64).collect(),
        })
    }

    /// Fetch dimension and size of an index.
    pub async fn index_stats(&mut self, key: &str) -> Result<IndexStats, ClientError> {
        let response = self
            .inner
            .get_index_stats(tonic::Request::new(GetIndexStatsRequest {
                key: key.to_string(),
            }))
            .await?
            .into_inner();

        Ok(IndexStats {
            key: response.key,
            dimension: response.dimension as u32,
            vector_count: response.vector_count as u64,
        })
    }
}
