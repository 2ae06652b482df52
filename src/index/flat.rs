//! Flat (exact) vector index.
//!
//! Compares a query against every stored vector. No graph, no quantization,
//! no pruning: results are exact and ties resolve in insertion order.
//!
//! # Distance
//!
//! Distances are **squared** Euclidean distances, the scale a flat L2 index
//! reports and the scale the dedup threshold is calibrated on.
//!
//! # Performance
//!
//! | Operation | Cost |
//! |-----------|------|
//! | Build | O(n * d) copy |
//! | Search | O(n * d + n log n) |
//! | Memory | n * d * 4 bytes, one contiguous buffer |
//!
//! Meant for request-scoped batches of tens to hundreds of vectors.
//!
//! # Example
//!
//! ```rust
//! use percolate_signals::index::FlatIndex;
//!
//! let vectors = vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0, 3.0]];
//! let index = FlatIndex::build(&vectors).unwrap();
//!
//! let neighbors = index.search(&[0.0, 0.0], 2).unwrap();
//! assert_eq!(neighbors[0].index, 0);
//! assert_eq!(neighbors[1].index, 1);
//! assert_eq!(neighbors[1].distance, 1.0);
//! ```

use crate::types::{Result, SignalError};
use serde::Serialize;
use std::cmp::Ordering;

/// One search hit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Neighbor {
    /// Position of the stored vector in the build batch
    pub index: usize,

    /// Squared L2 distance to the query
    pub distance: f32,
}

/// Exact nearest-neighbor index over a fixed batch of vectors.
///
/// Immutable once built. Owned by whoever built it and dropped with them.
#[derive(Debug, Clone)]
pub struct FlatIndex {
    /// Row-major vector storage (len * dim floats)
    data: Vec<f32>,

    /// Vector dimensionality
    dim: usize,

    /// Number of stored vectors
    len: usize,
}

impl FlatIndex {
    /// Build an index from a batch of vectors.
    ///
    /// # Arguments
    ///
    /// * `vectors` - Vectors to index; position in the slice becomes the vector's index
    ///
    /// # Returns
    ///
    /// Index ready for search
    ///
    /// # Errors
    ///
    /// - `SignalError::SearchError` if the batch is empty or zero-dimensional
    /// - `SignalError::DimensionMismatch` if any vector's length differs from the first
    pub fn build(vectors: &[Vec<f32>]) -> Result<Self> {
        let first = vectors
            .first()
            .ok_or_else(|| SignalError::search("Cannot build index: no vectors provided"))?;

        let dim = first.len();
        if dim == 0 {
            return Err(SignalError::search(
                "Cannot build index: vectors have zero dimensions",
            ));
        }

        let mut data = Vec::with_capacity(vectors.len() * dim);
        for (index, vector) in vectors.iter().enumerate() {
            if vector.len() != dim {
                return Err(SignalError::DimensionMismatch {
                    index,
                    expected: dim,
                    actual: vector.len(),
                });
            }
            data.extend_from_slice(vector);
        }

        Ok(Self {
            data,
            dim,
            len: vectors.len(),
        })
    }

    /// Search for the k nearest stored vectors.
    ///
    /// # Arguments
    ///
    /// * `query` - Query vector (must match index dimensionality)
    /// * `k` - Number of results
    ///
    /// # Returns
    ///
    /// Up to `min(k, len)` neighbors, ascending by distance, ties by index
    ///
    /// # Errors
    ///
    /// Returns `SignalError::DimensionMismatch` if the query has the wrong length
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        let mut neighbors = self.scan(query)?;
        neighbors.sort_by(compare_neighbors);
        neighbors.truncate(k);
        Ok(neighbors)
    }

    /// Find every stored vector within `radius` of the query.
    ///
    /// # Arguments
    ///
    /// * `query` - Query vector (must match index dimensionality)
    /// * `radius` - Inclusive squared-distance bound
    ///
    /// # Returns
    ///
    /// Matching neighbors, ascending by distance, ties by index
    ///
    /// # Errors
    ///
    /// Returns `SignalError::DimensionMismatch` if the query has the wrong length
    pub fn range_search(&self, query: &[f32], radius: f32) -> Result<Vec<Neighbor>> {
        let mut neighbors: Vec<Neighbor> = self
            .scan(query)?
            .into_iter()
            .filter(|n| n.distance <= radius)
            .collect();
        neighbors.sort_by(compare_neighbors);
        Ok(neighbors)
    }

    /// Get stored vector by index.
    pub fn vector(&self, index: usize) -> Option<&[f32]> {
        if index >= self.len {
            return None;
        }
        let start = index * self.dim;
        Some(&self.data[start..start + self.dim])
    }

    /// Vector dimensionality.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of stored vectors.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the index holds no vectors (never true for a built index).
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Distance from the query to every stored vector, in insertion order.
    fn scan(&self, query: &[f32]) -> Result<Vec<Neighbor>> {
        if query.len() != self.dim {
            return Err(SignalError::DimensionMismatch {
                index: 0,
                expected: self.dim,
                actual: query.len(),
            });
        }

        Ok(self
            .data
            .chunks_exact(self.dim)
            .enumerate()
            .map(|(index, stored)| Neighbor {
                index,
                distance: squared_l2_distance(query, stored),
            })
            .collect())
    }
}

/// Ascending distance, then ascending index. NaN distances sort last.
fn compare_neighbors(a: &Neighbor, b: &Neighbor) -> Ordering {
    a.distance
        .total_cmp(&b.distance)
        .then_with(|| a.index.cmp(&b.index))
}

/// Compute squared L2 (Euclidean) distance between two vectors.
pub fn squared_l2_distance(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
}
