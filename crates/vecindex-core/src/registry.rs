//! Keyed registry of vector indexes.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::IndexError;
use crate::index::VectorIndex;

/// Process-wide mapping from caller-chosen keys to indexes.
///
/// Entries are only ever added. The registry lock covers key lookup and
/// creation; work on an index happens through the returned `Arc` without
/// holding it.
#[derive(Debug, Default)]
pub struct IndexRegistry {
    indices: RwLock<HashMap<String, Arc<VectorIndex>>>,
}

impl IndexRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new empty index under `key`.
    ///
    /// Returns the dimension on success. The absence check and the insert
    /// happen under one write lock, so of two racing creators for the same
    /// key exactly one succeeds.
    pub fn create_index(&self, key: &str, dimension: usize) -> Result<usize, IndexError> {
        if key.is_empty() {
            return Err(IndexError::invalid("key must not be empty"));
        }
        let index = VectorIndex::new(dimension)?;

        let mut indices = self
            .indices
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        match indices.entry(key.to_string()) {
            Entry::Occupied(_) => Err(IndexError::AlreadyExists(key.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(index));
                Ok(dimension)
            }
        }
    }

    /// Look up the index registered under `key`.
    pub fn get_index(&self, key: &str) -> Result<Arc<VectorIndex>, IndexError> {
        self.indices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
            .ok_or_else(|| IndexError::NotFound(key.to_string()))
    }

    /// Number of registered indexes.
    pub fn len(&self) -> usize {
        self.indices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
