//! Client library for the vecindex daemon.
//!
//! # Example
//!
//! ```rust,no_run
//! use vecindex_client::VectorIndexClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = VectorIndexClient::connect("http://[::1]:50051").await?;
//!
//!     client.create_index("docs", 3).await?;
//!     client
//!         .add_vectors("docs", vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]])
//!         .await?;
//!
//!     let hits = client.search("docs", vec![1.0, 0.0, 0.0], Some(1)).await?;
//!     println!("best id {} score {}", hits.ids[0], hits.scores[0]);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;

pub use client::{AddVectorsResult, IndexStats, SearchHits, VectorIndexClient, DEFAULT_ENDPOINT};
pub use error::ClientError;
