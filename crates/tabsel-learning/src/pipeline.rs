//! The two-stage model pipeline: standardize, then estimate.
//!
//! [`ModelPipeline`] is configuration-agnostic; the estimation stage is
//! swapped per candidate during search while the standardization stage
//! stays fixed. Fitting freezes the scaler statistics from the training
//! rows, so a [`FittedPipeline`] applies exactly the distribution it was
//! trained with to any future rows.

use crate::error::Result;
use crate::estimator::Estimator;
use crate::scaler::StandardScaler;
use crate::search_space::CandidateConfig;

/// Template for the standardize-then-estimate chain.
pub struct ModelPipeline;

impl ModelPipeline {
    /// Fit the pipeline: scaler statistics from `rows`, then the
    /// candidate's estimator on the scaled rows.
    pub fn fit(
        config: &CandidateConfig,
        rows: &[Vec<f64>],
        y: &[i32],
        seed: u64,
    ) -> Result<FittedPipeline> {
        let scaler = StandardScaler::fit(rows);
        let scaled = scaler.transform(rows);
        let estimator = config.fit(&scaled, y, seed)?;
        Ok(FittedPipeline {
            scaler,
            estimator,
            config: config.clone(),
        })
    }
}

/// A fitted pipeline: frozen scaler statistics plus a fitted estimator.
pub struct FittedPipeline {
    scaler: StandardScaler,
    estimator: Box<dyn Estimator>,
    config: CandidateConfig,
}

impl FittedPipeline {
    /// Predict class labels for raw (unscaled) feature rows.
    pub fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<i32>> {
        let scaled = self.scaler.transform(rows);
        self.estimator.predict(&scaled)
    }

    /// The configuration this pipeline was fitted with.
    #[must_use]
    pub fn config(&self) -> &CandidateConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_predict_roundtrip() {
        // features on wildly different scales, separable after scaling
        let rows: Vec<Vec<f64>> = (0..20)
            .map(|i| vec![i as f64 * 1000.0, i as f64 * 0.001])
            .collect();
        let y: Vec<i32> = (0..20).map(|i| i32::from(i >= 10)).collect();

        let config = CandidateConfig::NearestNeighbors { n_neighbors: 3 };
        let fitted = ModelPipeline::fit(&config, &rows, &y, 42).unwrap();

        assert_eq!(fitted.config(), &config);
        let preds = fitted.predict(&rows).unwrap();
        let correct = preds.iter().zip(&y).filter(|(p, t)| p == t).count();
        assert!(correct >= 18, "only {correct}/20 correct");
    }

    #[test]
    fn test_failing_config_propagates() {
        let rows = vec![vec![1.0], vec![2.0], vec![3.0]];
        let y = vec![0, 1, 2]; // three classes, binary-only backend
        let config = CandidateConfig::SupportVector {
            c: 1.0,
            kernel: crate::search_space::SvmKernel::Linear,
        };
        assert!(ModelPipeline::fit(&config, &rows, &y, 42).is_err());
    }
}
