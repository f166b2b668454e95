//! Common types produced by the preprocessing step.
//!
//! - [`FeatureMatrix`]: the numeric design matrix X
//! - [`TargetVector`]: the label-encoded target y
//!
//! Both are plain owned buffers so the learning side can consume them
//! without depending on polars. Row ordering matches the source dataset;
//! feature column order is the dataset's original order minus the target.

use serde::{Deserialize, Serialize};

/// A numeric 2D feature matrix derived from a dataset.
///
/// Rows correspond one-to-one (and in order) with the rows of the source
/// dataset; columns are the dataset's columns minus the target, in their
/// original order. Categorical columns arrive already label-encoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatrix {
    /// Feature column names, in matrix column order.
    pub names: Vec<String>,

    /// Row-major values; every inner vector has `names.len()` entries.
    pub rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    /// Number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of feature columns.
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.names.len()
    }

    /// (rows, columns) shape tuple.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows(), self.n_cols())
    }

    /// Extract the subset of rows at the given indices, preserving the
    /// order of `indices`.
    #[must_use]
    pub fn take_rows(&self, indices: &[usize]) -> FeatureMatrix {
        FeatureMatrix {
            names: self.names.clone(),
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }
}

/// The designated target column, label-encoded and aligned row-for-row
/// with its [`FeatureMatrix`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetVector {
    /// Encoded class of each row: an integer in `0..classes.len()`.
    pub values: Vec<i32>,

    /// Class labels in encoding order, so `classes[v as usize]` recovers
    /// the original label of encoded value `v`.
    pub classes: Vec<String>,
}

impl TargetVector {
    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the target has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of distinct classes.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Extract the subset of values at the given indices, preserving the
    /// order of `indices`.
    #[must_use]
    pub fn take(&self, indices: &[usize]) -> TargetVector {
        TargetVector {
            values: indices.iter().map(|&i| self.values[i]).collect(),
            classes: self.classes.clone(),
        }
    }
}
