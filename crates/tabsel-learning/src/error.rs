//! Error types for the model-selection crate.
//!
//! This module defines [`SelectionError`], the main error type used
//! throughout the crate. All public API functions return
//! `Result<T, SelectionError>`.
//!
//! # Propagation policy
//!
//! Candidate-level failures never surface as errors from the selector: a
//! configuration that cannot be fitted (wrong class count for its backend,
//! degenerate fold, hyperparameters incompatible with the data shape) is
//! recorded against that candidate and excluded from selection while the
//! search continues. Only total exhaustion (every candidate failed) is
//! fatal, as [`NoViableConfiguration`](SelectionError::NoViableConfiguration).

use thiserror::Error;

/// The main error type for model-selection operations.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SelectionError {
    /// Invalid configuration provided to the selector.
    ///
    /// Check the error message for which value is invalid and what values
    /// are accepted.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The feature matrix and target vector disagree on row count.
    #[error("Dimension mismatch: X has {x_rows} rows but y has {y_rows}")]
    DimensionMismatch { x_rows: usize, y_rows: usize },

    /// The search space enumerates no candidate configurations at all.
    ///
    /// This is distinct from every candidate failing to fit; an empty grid
    /// means there was nothing to try in the first place.
    #[error("Search space contains no candidate configurations")]
    EmptySearchSpace,

    /// The data is too small for the requested split and fold counts.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// An estimator backend failed to fit or predict.
    ///
    /// During search this is caught per-candidate; it only propagates when
    /// the already-selected winner fails to refit or predict.
    #[error("Estimator failure: {0}")]
    EstimatorFailure(String),

    /// Every candidate configuration failed to fit.
    #[error("No viable configuration: all {attempted} candidates failed")]
    NoViableConfiguration {
        /// How many candidates were attempted.
        attempted: usize,
    },

    /// The search was cancelled via its cancellation token.
    ///
    /// Not an error condition as such; it indicates the search was
    /// intentionally stopped before completion.
    #[error("Selection cancelled")]
    Cancelled,
}

impl SelectionError {
    /// Check if this error represents a cancellation.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<smartcore::error::Failed> for SelectionError {
    fn from(err: smartcore::error::Failed) -> Self {
        SelectionError::EstimatorFailure(err.to_string())
    }
}

/// Result type alias for selection operations.
pub type Result<T> = std::result::Result<T, SelectionError>;
