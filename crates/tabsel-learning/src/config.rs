//! Configuration for the model selector.
//!
//! This module provides [`SelectionConfig`] with a builder for fluent
//! setup. The defaults reproduce the reference workflow: an 80/20
//! train/test split, 5-fold cross-validation, and a fixed seed so splits
//! are reproducible across runs.

use serde::{Deserialize, Serialize};

/// Configuration for a model-selection run.
///
/// Use [`SelectionConfig::builder()`] for fluent construction.
///
/// # Example
///
/// ```
/// use tabsel_learning::SelectionConfig;
///
/// let config = SelectionConfig::builder()
///     .cv_folds(3)
///     .seed(7)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.cv_folds, 3);
/// assert_eq!(config.test_fraction, 0.2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Fraction of rows held out as the final test split (0.0 - 1.0,
    /// exclusive). Default: 0.2.
    pub test_fraction: f64,

    /// Number of cross-validation folds over the training split.
    /// Default: 5.
    pub cv_folds: usize,

    /// Seed for the train/test shuffle and for seedable estimators, so
    /// repeated runs on the same data select the same configuration.
    /// Default: 42.
    pub seed: u64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            cv_folds: 5,
            seed: 42,
        }
    }
}

impl SelectionConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> SelectionConfigBuilder {
        SelectionConfigBuilder::default()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(ConfigValidationError::InvalidTestFraction(
                self.test_fraction,
            ));
        }
        if self.cv_folds < 2 {
            return Err(ConfigValidationError::InvalidFoldCount(self.cv_folds));
        }
        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid test fraction: {0} (must be strictly between 0.0 and 1.0)")]
    InvalidTestFraction(f64),

    #[error("Invalid fold count: {0} (must be at least 2)")]
    InvalidFoldCount(usize),
}

/// Builder for [`SelectionConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct SelectionConfigBuilder {
    test_fraction: Option<f64>,
    cv_folds: Option<usize>,
    seed: Option<u64>,
}

impl SelectionConfigBuilder {
    /// Set the held-out test fraction (e.g. 0.2 = 20%).
    #[must_use]
    pub fn test_fraction(mut self, fraction: f64) -> Self {
        self.test_fraction = Some(fraction);
        self
    }

    /// Set the number of cross-validation folds.
    #[must_use]
    pub fn cv_folds(mut self, folds: usize) -> Self {
        self.cv_folds = Some(folds);
        self
    }

    /// Set the random seed for splitting and seedable estimators.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<SelectionConfig, ConfigValidationError> {
        let defaults = SelectionConfig::default();
        let config = SelectionConfig {
            test_fraction: self.test_fraction.unwrap_or(defaults.test_fraction),
            cv_folds: self.cv_folds.unwrap_or(defaults.cv_folds),
            seed: self.seed.unwrap_or(defaults.seed),
        };
        config.validate()?;
        Ok(config)
    }
}
