//! # vecindex-core
//!
//! Keyed, in-memory vector indexes with exact cosine-similarity search.
//!
//! ## Features
//! - `IndexRegistry`: create-once, lookup-by-key collection of indexes
//! - `VectorIndex`: append-only flat storage of L2-normalized vectors
//! - Exact top-k search, O(n·d) per query, deterministic tie-break by id
//!
//! Nothing here logs or persists; callers own both concerns.

pub mod error;
pub mod index;
pub mod registry;
pub mod vector;

pub use error::IndexError;
pub use index::{AddedRange, IndexStats, SearchResult, SearchResults, VectorIndex};
pub use registry::IndexRegistry;
pub use vector::Vector;
