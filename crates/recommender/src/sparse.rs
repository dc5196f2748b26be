//! Compressed sparse row (CSR) matrix of `f64` values.
//!
//! Only the operations the neighbor search needs: construction from
//! coordinate triplets, row access, dot products and norms.

use serde::{Deserialize, Serialize};

/// Row-major sparse matrix.
///
/// Row `r` owns `indices[indptr[r]..indptr[r + 1]]` (column positions,
/// strictly increasing) and the matching slice of `data`. Explicit zeros
/// are never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsrMatrix {
    n_rows: usize,
    n_cols: usize,
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<f64>,
}

/// Borrowed view of one sparse row
#[derive(Debug, Clone, Copy)]
pub struct SparseRow<'a> {
    pub indices: &'a [usize],
    pub values: &'a [f64],
}

impl CsrMatrix {
    /// An empty matrix with the given shape
    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            indptr: vec![0; n_rows + 1],
            indices: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Build from `(row, col, value)` triplets.
    ///
    /// Triplets may arrive in any order; duplicates at the same cell are
    /// summed and cells that end up zero are dropped.
    ///
    /// # Panics
    /// If a triplet lies outside `n_rows x n_cols`.
    pub fn from_triplets(
        n_rows: usize,
        n_cols: usize,
        mut triplets: Vec<(usize, usize, f64)>,
    ) -> Self {
        triplets.sort_unstable_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));

        let mut indptr = vec![0usize; n_rows + 1];
        let mut indices = Vec::with_capacity(triplets.len());
        let mut data = Vec::with_capacity(triplets.len());

        let mut iter = triplets.into_iter().peekable();
        while let Some((row, col, mut value)) = iter.next() {
            assert!(row < n_rows && col < n_cols, "triplet ({row}, {col}) out of bounds");
            while let Some(&(r, c, v)) = iter.peek() {
                if (r, c) != (row, col) {
                    break;
                }
                value += v;
                iter.next();
            }
            if value != 0.0 {
                indices.push(col);
                data.push(value);
                indptr[row + 1] += 1;
            }
        }

        // Per-row counts to offsets
        for r in 0..n_rows {
            indptr[r + 1] += indptr[r];
        }

        Self {
            n_rows,
            n_cols,
            indptr,
            indices,
            data,
        }
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Number of stored (non-zero) values
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    /// Borrow row `r`
    ///
    /// # Panics
    /// If `r >= n_rows`.
    pub fn row(&self, r: usize) -> SparseRow<'_> {
        let span = self.indptr[r]..self.indptr[r + 1];
        SparseRow {
            indices: &self.indices[span.clone()],
            values: &self.data[span],
        }
    }

    /// Value at `(r, c)`, zero when not stored
    pub fn get(&self, r: usize, c: usize) -> f64 {
        let row = self.row(r);
        row.indices
            .binary_search(&c)
            .map(|pos| row.values[pos])
            .unwrap_or(0.0)
    }

    /// Check the CSR invariants, e.g. after deserializing
    pub fn validate(&self) -> Result<(), String> {
        if self.indptr.len() != self.n_rows + 1 {
            return Err(format!(
                "indptr has {} entries for {} rows",
                self.indptr.len(),
                self.n_rows
            ));
        }
        if self.indices.len() != self.data.len() {
            return Err("indices and data lengths differ".to_string());
        }
        if self.indptr[0] != 0 || self.indptr[self.n_rows] != self.data.len() {
            return Err("indptr does not span the stored values".to_string());
        }
        for r in 0..self.n_rows {
            let (lo, hi) = (self.indptr[r], self.indptr[r + 1]);
            if lo > hi {
                return Err(format!("indptr decreases at row {r}"));
            }
            let cols = &self.indices[lo..hi];
            if cols.windows(2).any(|w| w[0] >= w[1]) {
                return Err(format!("row {r} has unsorted column indices"));
            }
            if cols.last().is_some_and(|&c| c >= self.n_cols) {
                return Err(format!("row {r} has a column outside {} columns", self.n_cols));
            }
        }
        Ok(())
    }

    /// Euclidean norm of every row
    pub fn row_norms(&self) -> Vec<f64> {
        (0..self.n_rows).map(|r| self.row(r).norm()).collect()
    }
}

impl SparseRow<'_> {
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    pub fn norm(&self) -> f64 {
        self.values.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// Dot product of two sparse rows (merge over sorted column indices)
    pub fn dot(&self, other: &SparseRow<'_>) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.indices.len() && j < other.indices.len() {
            match self.indices[i].cmp(&other.indices[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += self.values[i] * other.values[j];
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}
