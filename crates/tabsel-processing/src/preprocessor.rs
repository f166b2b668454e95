//! Dataset preprocessing: from a raw [`DataFrame`] to `(X, y)`.
//!
//! The [`Preprocessor`] turns a loaded dataset into a numeric
//! [`FeatureMatrix`] and a label-encoded [`TargetVector`]:
//!
//! 1. Missing numeric values are filled with the per-column mean (see
//!    [`MeanImputer`] for the leak caveat).
//! 2. Categorical columns (string-typed columns plus any explicitly
//!    declared ones) are independently label-encoded in first-seen order.
//! 3. The target column is label-encoded the same way and removed from the
//!    feature set; feature column order is the dataset's original order.
//!
//! Schema problems (target or declared categorical column absent) abort the
//! whole operation with [`ProcessingError::ColumnNotFound`]: the target and
//! categorical declarations are structural, not advisory.

use crate::encoder::LabelEncoder;
use crate::error::{ProcessingError, Result};
use crate::imputer::MeanImputer;
use crate::types::{FeatureMatrix, TargetVector};
use polars::prelude::*;
use tracing::{debug, info};

/// Marker used when a categorical cell is null; encoded as its own category.
const MISSING_CATEGORY: &str = "__missing__";

/// Converts a dataset into a feature matrix and target vector.
///
/// # Example
///
/// ```rust,ignore
/// use tabsel_processing::Preprocessor;
///
/// let (x, y) = Preprocessor::new("Survived")
///     .with_categorical_columns(["Sex", "Embarked"])
///     .prepare(&df)?;
///
/// assert_eq!(x.n_rows(), df.height());
/// assert_eq!(x.n_cols(), df.width() - 1);
/// ```
#[derive(Debug, Clone)]
pub struct Preprocessor {
    target_column: String,
    categorical_columns: Vec<String>,
}

impl Preprocessor {
    /// Create a preprocessor for the given target column.
    #[must_use]
    pub fn new(target_column: impl Into<String>) -> Self {
        Self {
            target_column: target_column.into(),
            categorical_columns: Vec::new(),
        }
    }

    /// Declare columns that must be treated as categorical even when their
    /// storage type is numeric (e.g. integer-coded categories).
    ///
    /// String-typed columns are treated as categorical automatically.
    #[must_use]
    pub fn with_categorical_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categorical_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// The configured target column name.
    #[must_use]
    pub fn target_column(&self) -> &str {
        &self.target_column
    }

    /// Produce `(X, y)` from the dataset.
    ///
    /// # Errors
    ///
    /// - [`ProcessingError::ColumnNotFound`] if the target or a declared
    ///   categorical column is absent.
    /// - [`ProcessingError::EmptyDataset`] if the dataset has no rows or no
    ///   feature columns besides the target.
    /// - [`ProcessingError::NoValidValues`] if a numeric column is entirely
    ///   null.
    /// - [`ProcessingError::InvalidTarget`] if the target contains nulls.
    pub fn prepare(&self, df: &DataFrame) -> Result<(FeatureMatrix, TargetVector)> {
        if df.height() == 0 {
            return Err(ProcessingError::EmptyDataset("no rows".to_string()));
        }

        // Structural checks first, before any work happens.
        let target_series = df
            .column(&self.target_column)
            .map_err(|_| ProcessingError::ColumnNotFound(self.target_column.clone()))?
            .as_materialized_series();

        for col in &self.categorical_columns {
            if df.column(col).is_err() {
                return Err(ProcessingError::ColumnNotFound(col.clone()));
            }
        }

        info!(
            "Preprocessing dataset: {} rows x {} columns, target '{}'",
            df.height(),
            df.width(),
            self.target_column
        );

        let mut names: Vec<String> = Vec::new();
        let mut columns: Vec<Vec<f64>> = Vec::new();
        let mut total_filled = 0usize;

        for column in df.get_columns() {
            let name = column.name().to_string();
            if name == self.target_column {
                continue;
            }
            let series = column.as_materialized_series();

            let values = if self.is_categorical(&name, series.dtype()) {
                self.encode_categorical(series, &name)?
            } else {
                let (values, filled) = MeanImputer::fill_column(series)?;
                total_filled += filled;
                values
            };

            names.push(name);
            columns.push(values);
        }

        if names.is_empty() {
            return Err(ProcessingError::EmptyDataset(
                "no feature columns besides the target".to_string(),
            ));
        }

        if total_filled > 0 {
            info!("Imputed {} missing numeric values", total_filled);
        }

        // Column buffers to row-major matrix.
        let n_rows = df.height();
        let rows: Vec<Vec<f64>> = (0..n_rows)
            .map(|i| columns.iter().map(|col| col[i]).collect())
            .collect();

        let target = self.encode_target(target_series)?;
        debug!(
            "Target '{}' has {} classes: {:?}",
            self.target_column,
            target.n_classes(),
            target.classes
        );

        Ok((FeatureMatrix { names, rows }, target))
    }

    fn is_categorical(&self, name: &str, dtype: &DataType) -> bool {
        self.categorical_columns.iter().any(|c| c == name) || dtype == &DataType::String
    }

    /// Label-encode one categorical column in first-seen order. Nulls get
    /// their own category.
    fn encode_categorical(&self, series: &Series, name: &str) -> Result<Vec<f64>> {
        let casted =
            series
                .cast(&DataType::String)
                .map_err(|e| ProcessingError::TypeConversionFailed {
                    column: name.to_string(),
                    reason: e.to_string(),
                })?;
        let ca = casted.str()?;

        let mut encoder = LabelEncoder::new();
        let values: Vec<f64> = ca
            .into_iter()
            .map(|v| f64::from(encoder.encode(v.unwrap_or(MISSING_CATEGORY))))
            .collect();

        debug!(
            "Encoded categorical column '{}' ({} distinct values)",
            name,
            encoder.len()
        );
        Ok(values)
    }

    /// Label-encode the target column. Every value is stringified first so
    /// numeric and string targets share one code path.
    fn encode_target(&self, series: &Series) -> Result<TargetVector> {
        if series.null_count() > 0 {
            return Err(ProcessingError::InvalidTarget {
                column: self.target_column.clone(),
                reason: format!("contains {} missing values", series.null_count()),
            });
        }

        let casted =
            series
                .cast(&DataType::String)
                .map_err(|e| ProcessingError::InvalidTarget {
                    column: self.target_column.clone(),
                    reason: e.to_string(),
                })?;
        let ca = casted.str()?;

        let mut encoder = LabelEncoder::new();
        let mut values = Vec::with_capacity(series.len());
        for v in ca {
            let v = v.ok_or_else(|| ProcessingError::InvalidTarget {
                column: self.target_column.clone(),
                reason: "value not representable as a label".to_string(),
            })?;
            values.push(encoder.encode(v));
        }

        Ok(TargetVector {
            values,
            classes: encoder.classes().to_vec(),
        })
    }
}
