//! The fitted item model: utility-matrix labels plus the neighbor index.
//!
//! Normally fitted at startup from the library table. It can also be
//! written to a JSON file once and loaded later, skipping the build.

use crate::error::{RecommenderError, Result};
use crate::neighbors::{BruteForceCosine, NeighborSearch};
use crate::utility_matrix::{MatrixLabels, UtilityMatrix};
use data_loader::{ItemId, LibraryEntry};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::time::Instant;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemModel {
    labels: MatrixLabels,
    index: BruteForceCosine,
}

impl ItemModel {
    /// Fit the neighbor index over a utility matrix
    ///
    /// The matrix body moves into the index; only one copy of the sparse
    /// rows is ever held.
    pub fn fit(utility: UtilityMatrix) -> Self {
        let (labels, matrix) = utility.into_parts();
        let index = BruteForceCosine::fit(matrix);
        Self { labels, index }
    }

    /// Build the utility matrix from library entries and fit it
    pub fn from_library(entries: &[LibraryEntry]) -> Self {
        let start = Instant::now();
        let model = Self::fit(UtilityMatrix::from_library(entries));
        info!(
            items = model.labels.item_ids().len(),
            users = model.labels.user_ids().len(),
            "Fitted item model in {:.2?}",
            start.elapsed()
        );
        model
    }

    /// Row position of an item, `None` when it has no logged playtime
    pub fn row_of(&self, item_id: ItemId) -> Option<usize> {
        self.labels.row_of(item_id)
    }

    /// Item id stored at a row position
    pub fn item_at(&self, row: usize) -> Option<ItemId> {
        self.labels.item_at(row)
    }

    pub fn labels(&self) -> &MatrixLabels {
        &self.labels
    }

    pub fn index(&self) -> &dyn NeighborSearch {
        &self.index
    }

    /// Write the fitted model as JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(writer, self)?;
        info!("Saved item model to {}", path.display());
        Ok(())
    }

    /// Load a model written by `save`
    pub fn load(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let mut model: ItemModel = serde_json::from_reader(reader)?;
        model.labels.restore_lookup();
        model.check_shape()?;
        info!(
            items = model.labels.item_ids().len(),
            "Loaded item model from {}",
            path.display()
        );
        Ok(model)
    }

    fn check_shape(&self) -> Result<()> {
        self.index.validate().map_err(RecommenderError::InvalidModel)?;

        let matrix = self.index.matrix();
        if matrix.n_rows() != self.labels.item_ids().len() {
            return Err(RecommenderError::InvalidModel(format!(
                "{} item labels for {} matrix rows",
                self.labels.item_ids().len(),
                matrix.n_rows()
            )));
        }
        if matrix.n_cols() != self.labels.user_ids().len() {
            return Err(RecommenderError::InvalidModel(format!(
                "{} user labels for {} matrix columns",
                self.labels.user_ids().len(),
                matrix.n_cols()
            )));
        }
        // Rows are written in ascending item id order; anything else means
        // duplicates or a hand-edited file
        if !self.labels.item_ids().windows(2).all(|w| w[0] < w[1]) {
            return Err(RecommenderError::InvalidModel(
                "item ids are not strictly ascending".to_string(),
            ));
        }
        Ok(())
    }
}
