//! Mean imputation for numeric columns.
//!
//! Missing numeric values are filled with the per-column mean computed over
//! the *entire current dataset*, before any train/test split exists. This
//! mirrors the upstream workflow exactly, but it means the fill statistic
//! includes rows that later land in the test split, a mild information
//! leak. Callers that need split-safe statistics must impute after
//! splitting instead.

use crate::error::{ProcessingError, Result};
use polars::prelude::*;
use tracing::debug;

/// Fills missing numeric values with the column mean.
pub struct MeanImputer;

impl MeanImputer {
    /// Materialize a column as `f64` values with nulls replaced by the
    /// column mean.
    ///
    /// Returns the filled values together with the number of values that
    /// were imputed.
    ///
    /// # Errors
    ///
    /// - [`ProcessingError::NoValidValues`] if the column holds no non-null
    ///   values, so no mean exists.
    /// - [`ProcessingError::TypeConversionFailed`] if the column cannot be
    ///   cast to a floating-point representation.
    pub fn fill_column(series: &Series) -> Result<(Vec<f64>, usize)> {
        let name = series.name().to_string();
        let casted =
            series
                .cast(&DataType::Float64)
                .map_err(|e| ProcessingError::TypeConversionFailed {
                    column: name.clone(),
                    reason: e.to_string(),
                })?;

        let mean = casted
            .mean()
            .ok_or_else(|| ProcessingError::NoValidValues(name.clone()))?;

        let ca = casted.f64()?;
        let mut filled = 0usize;
        let values: Vec<f64> = ca
            .into_iter()
            .map(|v| match v {
                Some(v) if v.is_finite() => v,
                _ => {
                    filled += 1;
                    mean
                }
            })
            .collect();

        if filled > 0 {
            debug!(
                "Filled {} missing values in '{}' with mean {:.4}",
                filled, name, mean
            );
        }

        Ok((values, filled))
    }
}
