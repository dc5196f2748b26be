//! Utility Matrix Builder
//!
//! Turns the long-form library table `(item, user, playtime)` into an
//! item-by-user playtime matrix, one row per item seen in any library and
//! one column per user. Absent cells are zero.
//!
//! ## Layout
//! - Rows are ordered by ascending item id, columns by ascending user id
//! - Both orderings are kept (`item_ids`, `user_ids`) so neighbor results
//!   can be mapped back to ids
//! - Repeated `(item, user)` rows are summed
//!
//! The matrix is assembled straight into CSR form from aggregated
//! triplets, so the dense item-by-user table never exists in memory.

use crate::sparse::CsrMatrix;
use data_loader::{ItemId, LibraryEntry, UserId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, instrument};

/// Row and column id mappings of the utility matrix
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixLabels {
    /// Row position -> item id
    item_ids: Vec<ItemId>,
    /// Column position -> user id
    user_ids: Vec<UserId>,
    /// Item id -> row position
    #[serde(skip)]
    item_rows: HashMap<ItemId, usize>,
}

impl MatrixLabels {
    fn new(item_ids: Vec<ItemId>, user_ids: Vec<UserId>) -> Self {
        let item_rows = position_map(&item_ids);
        Self {
            item_ids,
            user_ids,
            item_rows,
        }
    }

    /// Rebuild the id -> row map after deserialization
    pub(crate) fn restore_lookup(&mut self) {
        self.item_rows = position_map(&self.item_ids);
    }

    /// Row position of an item, `None` when it has no logged playtime
    pub fn row_of(&self, item_id: ItemId) -> Option<usize> {
        self.item_rows.get(&item_id).copied()
    }

    /// Item id stored at a row position
    pub fn item_at(&self, row: usize) -> Option<ItemId> {
        self.item_ids.get(row).copied()
    }

    /// Column position of a user
    pub fn col_of(&self, user_id: &str) -> Option<usize> {
        self.user_ids
            .binary_search_by(|u| u.as_str().cmp(user_id))
            .ok()
    }

    pub fn item_ids(&self) -> &[ItemId] {
        &self.item_ids
    }

    pub fn user_ids(&self) -> &[UserId] {
        &self.user_ids
    }
}

/// Item-by-user playtime matrix with its row/column id mappings
#[derive(Debug, Clone)]
pub struct UtilityMatrix {
    labels: MatrixLabels,
    matrix: CsrMatrix,
}

impl UtilityMatrix {
    /// Build the matrix from the full set of library entries
    ///
    /// An empty input gives an empty matrix; every item lookup against it
    /// then reports no row.
    #[instrument(skip(entries), fields(entries = entries.len()))]
    pub fn from_library(entries: &[LibraryEntry]) -> Self {
        // Sorted distinct ids give the stable row and column orders
        let item_ids: Vec<ItemId> = entries
            .iter()
            .map(|e| e.item_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let user_ids: Vec<UserId> = entries
            .iter()
            .map(|e| e.user_id.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect();

        let labels = MatrixLabels::new(item_ids, user_ids);
        let user_cols: HashMap<&str, usize> = labels
            .user_ids
            .iter()
            .enumerate()
            .map(|(col, id)| (id.as_str(), col))
            .collect();

        // Aggregate first so duplicate (item, user) rows add up
        let mut cells: BTreeMap<(usize, usize), f64> = BTreeMap::new();
        for entry in entries {
            let row = labels.item_rows[&entry.item_id];
            let col = user_cols[entry.user_id.as_str()];
            *cells.entry((row, col)).or_insert(0.0) += entry.playtime_forever;
        }

        let triplets = cells
            .into_iter()
            .map(|((row, col), value)| (row, col, value))
            .collect();
        let matrix = CsrMatrix::from_triplets(
            labels.item_ids.len(),
            labels.user_ids.len(),
            triplets,
        );

        debug!(
            items = labels.item_ids.len(),
            users = labels.user_ids.len(),
            nnz = matrix.nnz(),
            "Built utility matrix"
        );

        Self { labels, matrix }
    }

    /// Playtime for an (item, user) pair, zero when absent
    pub fn playtime(&self, item_id: ItemId, user_id: &str) -> f64 {
        match (self.labels.row_of(item_id), self.labels.col_of(user_id)) {
            (Some(row), Some(col)) => self.matrix.get(row, col),
            _ => 0.0,
        }
    }

    pub fn labels(&self) -> &MatrixLabels {
        &self.labels
    }

    pub fn matrix(&self) -> &CsrMatrix {
        &self.matrix
    }

    pub fn is_empty(&self) -> bool {
        self.labels.item_ids.is_empty()
    }

    /// Split into labels and the sparse body, e.g. to hand the body to a
    /// neighbor index without copying it
    pub fn into_parts(self) -> (MatrixLabels, CsrMatrix) {
        (self.labels, self.matrix)
    }
}

fn position_map(ids: &[ItemId]) -> HashMap<ItemId, usize> {
    ids.iter().enumerate().map(|(pos, &id)| (id, pos)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(item_id: ItemId, user: &str, playtime: f64) -> LibraryEntry {
        LibraryEntry {
            user_id: user.to_string(),
            item_id,
            playtime_forever: playtime,
        }
    }

    #[test]
    fn test_rows_and_columns_are_sorted() {
        let m = UtilityMatrix::from_library(&[
            entry(30, "zed", 1.0),
            entry(10, "amy", 2.0),
            entry(20, "bob", 3.0),
        ]);

        let labels = m.labels();
        assert_eq!(labels.item_ids(), &[10, 20, 30]);
        assert_eq!(labels.user_ids(), &["amy", "bob", "zed"]);
        assert_eq!(labels.row_of(20), Some(1));
        assert_eq!(labels.item_at(2), Some(30));
        assert_eq!(labels.col_of("bob"), Some(1));
    }

    #[test]
    fn test_missing_cells_default_to_zero() {
        let m = UtilityMatrix::from_library(&[entry(10, "A", 5.0), entry(20, "B", 7.0)]);

        assert_eq!(m.playtime(10, "A"), 5.0);
        assert_eq!(m.playtime(10, "B"), 0.0);
        assert_eq!(m.playtime(99, "A"), 0.0);
        assert_eq!(m.playtime(10, "nobody"), 0.0);
    }

    #[test]
    fn test_duplicate_pairs_are_summed() {
        let m = UtilityMatrix::from_library(&[entry(10, "A", 5.0), entry(10, "A", 2.5)]);
        assert_eq!(m.playtime(10, "A"), 7.5);
        assert_eq!(m.matrix().nnz(), 1);
    }

    #[test]
    fn test_zero_playtime_item_still_gets_a_row() {
        let m = UtilityMatrix::from_library(&[entry(10, "A", 0.0)]);
        assert_eq!(m.labels().row_of(10), Some(0));
        assert_eq!(m.matrix().row(0).nnz(), 0);
    }

    #[test]
    fn test_empty_library() {
        let m = UtilityMatrix::from_library(&[]);
        assert!(m.is_empty());
        assert_eq!(m.labels().row_of(10), None);
        assert_eq!(m.matrix().n_rows(), 0);
    }
}
