//! VectorIndexService RPC implementation.
//!
//! Validates requests, maps them onto the shared `IndexRegistry`, and turns
//! `IndexError` into gRPC status codes. Normalization and scoring are CPU
//! bound, so appends and searches run on the blocking pool.

use std::num::NonZeroU32;
use std::sync::Arc;

use tonic::{Request, Response, Status};
use tracing::{debug, info, warn};

use vecindex_core::{IndexError, IndexRegistry, Vector};
use vecindex_types::DEFAULT_TOP_K;

use crate::pb::{
    vector_index_service_server::VectorIndexService, AddVectorsRequest, AddVectorsResponse,
    CreateIndexRequest, CreateIndexResponse, GetIndexStatsRequest, IndexStats as ProtoIndexStats,
    SearchRequest, SearchResponse,
};

/// Map a core error onto the status returned to the caller.
pub fn status_from_error(err: IndexError) -> Status {
    match err {
        IndexError::NotFound(_) => Status::not_found(err.to_string()),
        IndexError::AlreadyExists(_) => Status::already_exists(err.to_string()),
        IndexError::DimensionMismatch { .. } | IndexError::InvalidArgument(_) => {
            Status::invalid_argument(err.to_string())
        }
    }
}

fn rejected(op: &'static str, key: &str, err: IndexError) -> Status {
    warn!(op, key, error = %err, "Request rejected");
    status_from_error(err)
}

/// Implementation of the VectorIndexService gRPC service.
pub struct VectorIndexServiceImpl {
    registry: Arc<IndexRegistry>,
    default_top_k: NonZeroU32,
}

pub(crate) const DEFAULT_K: NonZeroU32 = match NonZeroU32::new(DEFAULT_TOP_K) {
    Some(k) => k,
    None => panic!("DEFAULT_TOP_K must be non-zero"),
};

impl VectorIndexServiceImpl {
    /// Create a service over the given registry.
    pub fn new(registry: Arc<IndexRegistry>) -> Self {
        Self {
            registry,
            default_top_k: DEFAULT_K,
        }
    }

    /// Override the `k` used when a search request leaves it unset.
    pub fn with_default_top_k(mut self, k: NonZeroU32) -> Self {
        self.default_top_k = k;
        self
    }

    pub fn registry(&self) -> &Arc<IndexRegistry> {
        &self.registry
    }

    /// `k` as requested, with the default filled in. Non-positive values
    /// come through as 0 and are rejected by the index after the key and
    /// dimension checks.
    fn requested_k(&self, k: Option<i32>) -> usize {
        match k {
            None => self.default_top_k.get() as usize,
            Some(k) => usize::try_from(k).unwrap_or(0),
        }
    }
}

#[tonic::async_trait]
impl VectorIndexService for VectorIndexServiceImpl {
    async fn create_index(
        &self,
        request: Request<CreateIndexRequest>,
    ) -> Result<Response<CreateIndexResponse>, Status> {
        let req = request.into_inner();
        debug!(key = %req.key, dimension = req.dimension, "CreateIndex request");

        let dimension = usize::try_from(req.dimension)
            .ok()
            .filter(|d| *d > 0)
            .ok_or_else(|| {
                IndexError::invalid(format!(
                    "dimension must be a positive integer, got {}",
                    req.dimension
                ))
            })
            .and_then(|d| self.registry.create_index(&req.key, d))
            .map_err(|e| rejected("create_index", &req.key, e))?;

        info!(key = %req.key, dimension, "Index created");

        Ok(Response::new(CreateIndexResponse {
            dimension: req.dimension,
            message: format!("Index '{}' created.", req.key),
        }))
    }

    async fn add_vectors(
        &self,
        request: Request<AddVectorsRequest>,
    ) -> Result<Response<AddVectorsResponse>, Status> {
        let req = request.into_inner();
        let key = req.key;
        debug!(key = %key, batch = req.vectors.len(), "AddVectors request");

        let index = self
            .registry
            .get_index(&key)
            .map_err(|e| rejected("add_vectors", &key, e))?;
        let vectors: Vec<Vector> = req.vectors.into_iter().map(|v| Vector::new(v.values)).collect();

        let added = tokio::task::spawn_blocking(move || index.add_vectors(vectors))
            .await
            .map_err(|e| Status::internal(format!("Task error: {}", e)))?
            .map_err(|e| rejected("add_vectors", &key, e))?;

        info!(
            key = %key,
            count = added.count,
            first_id = added.first_id,
            "Vectors added"
        );

        Ok(Response::new(AddVectorsResponse {
            added_count: added.count as i64,
            first_id: added.first_id as i64,
            message: format!("{} vectors added to index '{}'.", added.count, key),
        }))
    }

    async fn search(
        &self,
        request: Request<SearchRequest>,
    ) -> Result<Response<SearchResponse>, Status> {
        let req = request.into_inner();
        let key = req.key;

        let index = self
            .registry
            .get_index(&key)
            .map_err(|e| rejected("search", &key, e))?;
        let k = self.requested_k(req.k);
        let query = Vector::new(req.query);

        let results = tokio::task::spawn_blocking(move || index.search(&query, k))
            .await
            .map_err(|e| Status::internal(format!("Task error: {}", e)))?
            .map_err(|e| rejected("search", &key, e))?;

        debug!(key = %key, k, found = results.len(), "Search complete");

        Ok(Response::new(SearchResponse {
            scores: results.scores,
            ids: results.ids.into_iter().map(|id| id as i64).collect(),
        }))
    }

    async fn get_index_stats(
        &self,
        request: Request<GetIndexStatsRequest>,
    ) -> Result<Response<ProtoIndexStats>, Status> {
        let req = request.into_inner();
        let stats = self
            .registry
            .get_index(&req.key)
            .map_err(|e| rejected("get_index_stats", &req.key, e))?
            .stats();

        Ok(Response::new(ProtoIndexStats {
            key: req.key,
            dimension: stats.dimension as i32,
            vector_count: stats.vector_count as i64,
        }))
    }
}
