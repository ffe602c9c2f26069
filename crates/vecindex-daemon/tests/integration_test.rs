//! Integration tests for the vecindex service.
//!
//! These tests run the real gRPC server and drive it through the client
//! library, covering index creation, appends, search and error statuses.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;

use vecindex_client::{ClientError, VectorIndexClient};
use vecindex_core::IndexRegistry;
use vecindex_service::{run_server_with_shutdown, ServerOptions};

type ServerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Test harness that manages server lifecycle.
struct TestHarness {
    registry: Arc<IndexRegistry>,
    endpoint: String,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    _server_handle: tokio::task::JoinHandle<ServerResult>,
}

impl TestHarness {
    /// Create a new test harness with a running server.
    async fn new(port: u16) -> Self {
        let registry = Arc::new(IndexRegistry::new());

        let addr: SocketAddr = format!("127.0.0.1:{}", port).parse().unwrap();
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

        let service_registry = registry.clone();
        let server_handle = tokio::spawn(async move {
            run_server_with_shutdown(addr, service_registry, ServerOptions::default(), async {
                shutdown_rx.await.ok();
            })
            .await
        });

        // Wait for server to start
        sleep(Duration::from_millis(200)).await;

        Self {
            registry,
            endpoint: format!("http://127.0.0.1:{}", port),
            shutdown_tx: Some(shutdown_tx),
            _server_handle: server_handle,
        }
    }

    /// Create a client connected to this harness.
    async fn client(&self) -> VectorIndexClient {
        for _ in 0..5 {
            match VectorIndexClient::connect(&self.endpoint).await {
                Ok(client) => return client,
                Err(_) => sleep(Duration::from_millis(100)).await,
            }
        }
        panic!("Failed to connect to server at {}", self.endpoint);
    }
}

impl Drop for TestHarness {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

fn basis() -> Vec<Vec<f32>> {
    vec![
        vec![1.0, 0.0, 0.0],
        vec![0.0, 1.0, 0.0],
        vec![0.0, 0.0, 1.0],
    ]
}

// ==================== Lifecycle Tests ====================

#[tokio::test]
async fn test_docs_scenario_end_to_end() {
    let harness = TestHarness::new(50210).await;
    let mut client = harness.client().await;

    assert_eq!(client.create_index("docs", 3).await.unwrap(), 3);

    let added = client.add_vectors("docs", basis()).await.unwrap();
    assert_eq!(added.added_count, 3);
    assert_eq!(added.first_id, 0);
    assert_eq!(added.message, "3 vectors added to index 'docs'.");

    let hits = client
        .search("docs", vec![1.0, 0.0, 0.0], Some(2))
        .await
        .unwrap();
    assert_eq!(hits.ids, vec![0, 1]);
    assert!((hits.scores[0] - 1.0).abs() < 1e-6);
    assert_eq!(hits.scores[1], 0.0);

    // Wrong-length vector is rejected and nothing is stored
    let err = client
        .add_vectors("docs", vec![vec![1.0, 0.0]])
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(tonic::Code::InvalidArgument));

    let stats = client.index_stats("docs").await.unwrap();
    assert_eq!(stats.vector_count, 3);
    assert_eq!(stats.dimension, 3);
    assert_eq!(harness.registry.get_index("docs").unwrap().len(), 3);
}

#[tokio::test]
async fn test_duplicate_create_keeps_first_dimension() {
    let harness = TestHarness::new(50211).await;
    let mut client = harness.client().await;

    client.create_index("docs", 3).await.unwrap();
    let err = client.create_index("docs", 5).await.unwrap_err();
    assert_eq!(err.code(), Some(tonic::Code::AlreadyExists));

    let stats = client.index_stats("docs").await.unwrap();
    assert_eq!(stats.dimension, 3);
}

#[tokio::test]
async fn test_unknown_key_not_found() {
    let harness = TestHarness::new(50212).await;
    let mut client = harness.client().await;

    let err = client
        .search("missing", vec![1.0], None)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Rpc(ref s) if s.code() == tonic::Code::NotFound));

    let err = client.add_vectors("missing", vec![vec![1.0]]).await.unwrap_err();
    assert_eq!(err.code(), Some(tonic::Code::NotFound));

    assert!(harness.registry.is_empty());
}

#[tokio::test]
async fn test_search_default_k_and_clamp() {
    let harness = TestHarness::new(50213).await;
    let mut client = harness.client().await;

    client.create_index("wide", 2).await.unwrap();
    let vectors: Vec<Vec<f32>> = (0..8).map(|i| vec![1.0, i as f32]).collect();
    client.add_vectors("wide", vectors).await.unwrap();

    // Unset k falls back to the server default of 5
    let hits = client.search("wide", vec![1.0, 0.0], None).await.unwrap();
    assert_eq!(hits.len(), 5);
    assert_eq!(hits.ids[0], 0);
    for pair in hits.scores.windows(2) {
        assert!(pair[0] >= pair[1]);
    }

    // k larger than the index is clamped
    let hits = client.search("wide", vec![1.0, 0.0], Some(100)).await.unwrap();
    assert_eq!(hits.len(), 8);

    let err = client
        .search("wide", vec![1.0, 0.0], Some(0))
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(tonic::Code::InvalidArgument));
}

#[tokio::test]
async fn test_invalid_create_arguments() {
    let harness = TestHarness::new(50214).await;
    let mut client = harness.client().await;

    let err = client.create_index("zero", 0).await.unwrap_err();
    assert_eq!(err.code(), Some(tonic::Code::InvalidArgument));

    let err = client.create_index("", 4).await.unwrap_err();
    assert_eq!(err.code(), Some(tonic::Code::InvalidArgument));

    let err = client.create_index("huge", u32::MAX).await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidInput(_)));

    assert!(harness.registry.is_empty());
}

#[tokio::test]
async fn test_ids_continue_across_batches() {
    let harness = TestHarness::new(50215).await;
    let mut client = harness.client().await;

    client.create_index("docs", 3).await.unwrap();
    client.add_vectors("docs", basis()).await.unwrap();
    let second = client
        .add_vectors("docs", vec![vec![2.0, 2.0, 0.0], vec![0.0, 3.0, 3.0]])
        .await
        .unwrap();
    assert_eq!(second.first_id, 3);
    assert_eq!(second.added_count, 2);

    let hits = client
        .search("docs", vec![1.0, 1.0, 0.0], Some(1))
        .await
        .unwrap();
    assert_eq!(hits.ids, vec![3]);
    assert!((hits.scores[0] - 1.0).abs() < 1e-6);
}

#[tokio::test]
async fn test_concurrent_clients() {
    let harness = TestHarness::new(50216).await;
    let mut setup = harness.client().await;
    setup.create_index("shared", 4).await.unwrap();

    let mut tasks = Vec::new();
    for worker in 0..8 {
        let mut client = harness.client().await;
        tasks.push(tokio::spawn(async move {
            for i in 0..10 {
                let v = vec![worker as f32, i as f32, 1.0, 0.5];
                client.add_vectors("shared", vec![v.clone()]).await.unwrap();
                let hits = client.search("shared", v, Some(3)).await.unwrap();
                assert!(!hits.is_empty());
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    let stats = setup.index_stats("shared").await.unwrap();
    assert_eq!(stats.vector_count, 80);
}
