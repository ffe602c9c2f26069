//! Flat vector index with exact cosine search.
//!
//! Vectors are L2-normalized on the way in, so the cosine similarity of two
//! original vectors is the dot product of their stored forms. Storage is a
//! single row-major buffer; the position of a row is the vector's id.

use std::cmp::Ordering;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::IndexError;
use crate::vector::{dot, normalize_in_place, Vector};

/// A single search hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchResult {
    /// Insertion-order id of the stored vector
    pub id: u64,
    /// Cosine similarity to the query, in [-1, 1]
    pub score: f32,
}

impl SearchResult {
    pub fn new(id: u64, score: f32) -> Self {
        Self { id, score }
    }
}

/// Search output as parallel score and id sequences, best first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    pub scores: Vec<f32>,
    pub ids: Vec<u64>,
}

impl SearchResults {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = SearchResult> + '_ {
        self.ids
            .iter()
            .zip(self.scores.iter())
            .map(|(&id, &score)| SearchResult::new(id, score))
    }
}

impl FromIterator<SearchResult> for SearchResults {
    fn from_iter<T: IntoIterator<Item = SearchResult>>(iter: T) -> Self {
        let mut out = SearchResults::default();
        for hit in iter {
            out.scores.push(hit.score);
            out.ids.push(hit.id);
        }
        out
    }
}

/// Ids assigned to a successfully appended batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddedRange {
    /// Id of the first vector in the batch
    pub first_id: u64,
    /// Number of vectors appended
    pub count: usize,
}

impl AddedRange {
    /// Id one past the last vector of the batch.
    pub fn end_id(&self) -> u64 {
        self.first_id + self.count as u64
    }
}

/// Index statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Number of vectors in the index
    pub vector_count: usize,
    /// Fixed vector dimension
    pub dimension: usize,
}

/// Append-only brute-force index over unit vectors of one dimension.
///
/// Searches share a read lock; appends take the write lock once per batch,
/// after the whole batch has been validated and normalized.
#[derive(Debug)]
pub struct VectorIndex {
    dimension: usize,
    data: RwLock<Vec<f32>>,
}

impl VectorIndex {
    /// Create an empty index. `dimension` must be positive.
    pub fn new(dimension: usize) -> Result<Self, IndexError> {
        if dimension == 0 {
            return Err(IndexError::invalid("dimension must be a positive integer"));
        }
        Ok(Self {
            dimension,
            data: RwLock::new(Vec::new()),
        })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of stored vectors.
    pub fn len(&self) -> usize {
        self.read().len() / self.dimension
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            vector_count: self.len(),
            dimension: self.dimension,
        }
    }

    /// Stored (normalized) form of the vector with the given id.
    pub fn vector(&self, id: u64) -> Option<Vector> {
        let data = self.read();
        let start = usize::try_from(id).ok()?.checked_mul(self.dimension)?;
        data.get(start..start + self.dimension)
            .map(|row| Vector::new(row.to_vec()))
    }

    /// Append a batch of vectors.
    ///
    /// The batch is all-or-nothing: if any vector has the wrong length or a
    /// non-finite component, nothing is stored.
    pub fn add_vectors(&self, vectors: Vec<Vector>) -> Result<AddedRange, IndexError> {
        if vectors.is_empty() {
            return Err(IndexError::invalid("vector batch is empty"));
        }
        for vector in &vectors {
            vector.validate(self.dimension)?;
        }

        let count = vectors.len();
        let mut rows = Vec::with_capacity(count * self.dimension);
        for vector in vectors {
            let start = rows.len();
            rows.extend_from_slice(&vector.values);
            normalize_in_place(&mut rows[start..]);
        }

        let mut data = self.write();
        let first_id = (data.len() / self.dimension) as u64;
        data.append(&mut rows);

        Ok(AddedRange { first_id, count })
    }

    /// Exact top-k cosine search.
    ///
    /// `k` is clamped to the number of stored vectors. Results are ordered by
    /// descending score; equal scores keep ascending id order.
    pub fn search(&self, query: &Vector, k: usize) -> Result<SearchResults, IndexError> {
        query.validate(self.dimension)?;
        if k == 0 {
            return Err(IndexError::invalid("k must be a positive integer"));
        }

        let mut normalized = query.values.clone();
        normalize_in_place(&mut normalized);

        let mut hits: Vec<SearchResult> = {
            let data = self.read();
            data.chunks_exact(self.dimension)
                .enumerate()
                .map(|(id, row)| SearchResult::new(id as u64, dot(&normalized, row)))
                .collect()
        };

        let k = k.min(hits.len());
        if k == 0 {
            return Ok(SearchResults::default());
        }
        if k < hits.len() {
            hits.select_nth_unstable_by(k - 1, rank_order);
            hits.truncate(k);
        }
        hits.sort_unstable_by(rank_order);

        Ok(hits.into_iter().collect())
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<f32>> {
        self.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<f32>> {
        self.data.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Best first: higher score, then lower id.
fn rank_order(a: &SearchResult, b: &SearchResult) -> Ordering {
    b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id))
}
