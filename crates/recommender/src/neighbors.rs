//! Neighbor Index - exhaustive cosine nearest-neighbor search over the
//! rows of the utility matrix.
//!
//! ## Algorithm
//! 1. At fit time, keep the matrix and precompute every row norm
//! 2. For a query row, compute cosine distance to every row in parallel
//! 3. Stable-sort by distance, ties by row position, and keep the first k
//!
//! The query row is part of the index, so it comes back as its own
//! nearest neighbor at distance 0. Callers ask for `k + 1` and drop it.

use crate::sparse::{CsrMatrix, SparseRow};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// One search hit: a row position and its cosine distance to the query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub row: usize,
    pub distance: f64,
}

/// Nearest-neighbor search over a fixed set of rows.
///
/// `BruteForceCosine` is the only implementation. An approximate index
/// can replace it behind this trait once the catalog outgrows an
/// exhaustive scan.
pub trait NeighborSearch: Send + Sync {
    /// Number of indexed rows
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Up to `k` nearest indexed rows to `query`, closest first
    fn neighbors(&self, query: SparseRow<'_>, k: usize) -> Vec<Neighbor>;

    /// Up to `k` nearest rows to indexed row `row` (itself included)
    fn neighbors_of_row(&self, row: usize, k: usize) -> Vec<Neighbor>;
}

/// Cosine distance between two rows given their precomputed norms.
///
/// A zero vector has similarity 0 to everything, so its distance is 1.
pub fn cosine_distance(a: &SparseRow<'_>, a_norm: f64, b: &SparseRow<'_>, b_norm: f64) -> f64 {
    if a_norm == 0.0 || b_norm == 0.0 {
        return 1.0;
    }
    let similarity = (a.dot(b) / (a_norm * b_norm)).clamp(-1.0, 1.0);
    // Rounding can leave a hair below zero for identical directions
    (1.0 - similarity).max(0.0)
}

/// Exhaustive cosine search, fitted once over a sparse matrix
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BruteForceCosine {
    matrix: CsrMatrix,
    norms: Vec<f64>,
}

impl BruteForceCosine {
    /// Fit the index: take ownership of the rows and precompute norms
    #[instrument(skip(matrix), fields(rows = matrix.n_rows(), nnz = matrix.nnz()))]
    pub fn fit(matrix: CsrMatrix) -> Self {
        let norms = matrix.row_norms();
        debug!("Fitted brute-force cosine index");
        Self { matrix, norms }
    }

    pub fn matrix(&self) -> &CsrMatrix {
        &self.matrix
    }

    /// Check that the matrix is well-formed and the norms cover every row
    pub fn validate(&self) -> Result<(), String> {
        self.matrix.validate()?;
        if self.norms.len() != self.matrix.n_rows() {
            return Err(format!(
                "{} norms for {} rows",
                self.norms.len(),
                self.matrix.n_rows()
            ));
        }
        Ok(())
    }

    /// Rank every row against `query`. `own_row`, when the query is an
    /// indexed row, is pinned at distance 0 and wins ties so it always
    /// comes first.
    fn search(
        &self,
        query: SparseRow<'_>,
        query_norm: f64,
        own_row: Option<usize>,
        k: usize,
    ) -> Vec<Neighbor> {
        if k == 0 {
            return Vec::new();
        }

        let mut hits: Vec<Neighbor> = (0..self.matrix.n_rows())
            .into_par_iter()
            .map(|row| {
                let distance = if Some(row) == own_row {
                    0.0
                } else {
                    cosine_distance(&query, query_norm, &self.matrix.row(row), self.norms[row])
                };
                Neighbor { row, distance }
            })
            .collect();

        // Stable sort keeps row order among equal distances
        hits.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| (Some(b.row) == own_row).cmp(&(Some(a.row) == own_row)))
        });
        hits.truncate(k);
        hits
    }
}

impl NeighborSearch for BruteForceCosine {
    fn len(&self) -> usize {
        self.matrix.n_rows()
    }

    fn neighbors(&self, query: SparseRow<'_>, k: usize) -> Vec<Neighbor> {
        self.search(query, query.norm(), None, k)
    }

    fn neighbors_of_row(&self, row: usize, k: usize) -> Vec<Neighbor> {
        if row >= self.len() {
            return Vec::new();
        }
        self.search(self.matrix.row(row), self.norms[row], Some(row), k)
    }
}
