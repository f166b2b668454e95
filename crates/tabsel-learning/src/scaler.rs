//! Feature standardization.
//!
//! [`StandardScaler`] centers each feature column to zero mean and unit
//! variance. Statistics are computed from the training rows only and then
//! frozen, so validation and test rows are transformed with the training
//! distribution rather than their own.

use serde::{Deserialize, Serialize};

/// Per-column standardization: `(v - mean) / std`.
///
/// Columns with zero variance pass through unscaled; dividing by a zero
/// standard deviation would poison the whole column with NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    means: Vec<f64>,
    stds: Vec<f64>,
}

impl StandardScaler {
    /// Compute column statistics from training rows.
    ///
    /// All rows are assumed to share the same width; empty input produces
    /// a scaler with no columns, which transforms empty input back.
    #[must_use]
    pub fn fit(rows: &[Vec<f64>]) -> Self {
        let n_cols = rows.first().map_or(0, Vec::len);
        let n_rows = rows.len();

        let mut means = vec![0.0; n_cols];
        for row in rows {
            for (col, value) in row.iter().enumerate() {
                means[col] += value;
            }
        }
        for mean in &mut means {
            *mean /= n_rows.max(1) as f64;
        }

        let mut stds = vec![0.0; n_cols];
        for row in rows {
            for (col, value) in row.iter().enumerate() {
                let delta = value - means[col];
                stds[col] += delta * delta;
            }
        }
        for std in &mut stds {
            *std = (*std / n_rows.max(1) as f64).sqrt();
        }

        Self { means, stds }
    }

    /// Apply the frozen statistics to a set of rows.
    #[must_use]
    pub fn transform(&self, rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
        rows.iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(col, &value)| {
                        let std = self.stds[col];
                        if std > 0.0 {
                            (value - self.means[col]) / std
                        } else {
                            value
                        }
                    })
                    .collect()
            })
            .collect()
    }

    /// Number of columns the scaler was fitted on.
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.means.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fit_transform_centers_and_scales() {
        let rows = vec![vec![1.0], vec![2.0], vec![3.0]];
        let scaler = StandardScaler::fit(&rows);
        let out = scaler.transform(&rows);

        let mean: f64 = out.iter().map(|r| r[0]).sum::<f64>() / 3.0;
        assert!(mean.abs() < 1e-12);
        // population std of [1,2,3] is sqrt(2/3)
        let expected = (1.0 - 2.0) / (2.0f64 / 3.0).sqrt();
        assert!((out[0][0] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_zero_variance_column_passes_through() {
        let rows = vec![vec![5.0, 1.0], vec![5.0, 2.0], vec![5.0, 3.0]];
        let scaler = StandardScaler::fit(&rows);
        let out = scaler.transform(&rows);
        assert_eq!(out[0][0], 5.0);
        assert_eq!(out[2][0], 5.0);
        assert!(out.iter().all(|r| r[1].is_finite()));
    }

    #[test]
    fn test_transform_uses_training_statistics() {
        let train = vec![vec![0.0], vec![10.0]];
        let scaler = StandardScaler::fit(&train);
        // a test value equal to the training mean maps to exactly zero
        let out = scaler.transform(&[vec![5.0]]);
        assert!(out[0][0].abs() < 1e-12);
    }

    #[test]
    fn test_empty_input() {
        let scaler = StandardScaler::fit(&[]);
        assert_eq!(scaler.n_cols(), 0);
        assert!(scaler.transform(&[]).is_empty());
    }
}
