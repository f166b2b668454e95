//! Grid-search model selection over classical classifiers.
//!
//! This crate takes the numeric feature matrix and target vector produced
//! by `tabsel-processing` and finds the best classifier configuration for
//! them:
//!
//! 1. a seeded train/test split holds out rows for final scoring,
//! 2. every candidate in a [`SearchSpace`] is scored with k-fold
//!    cross-validation over the training subset (in parallel),
//! 3. the best mean score wins, ties going to the earlier candidate,
//! 4. the winner is refitted on the full training subset and evaluated on
//!    the held-out rows with four support-weighted metrics.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tabsel_learning::{SelectionConfig, run_selection};
//!
//! let (model, report) = run_selection(&x, &y, SelectionConfig::default())?;
//! println!("accuracy = {:.3}", report.accuracy);
//! let predictions = model.predict(&new_rows)?;
//! ```
//!
//! For progress events, cancellation, a custom grid, or the per-candidate
//! listing, drive [`ModelSelector`] directly:
//!
//! ```rust,ignore
//! use tabsel_learning::{ModelSelector, SearchSpace, evaluator};
//!
//! let selector = ModelSelector::builder()
//!     .search_space(SearchSpace::default().with_knn_n_neighbors([3, 5, 9]))
//!     .build();
//! let outcome = selector.select(&x, &y)?;
//! let report = evaluator::evaluate(&outcome.model, &outcome.x_test, &outcome.y_test)?;
//! ```
//!
//! # Failure isolation
//!
//! A candidate that cannot be fitted is recorded as failed and excluded;
//! the search only errors when the grid is empty, the data cannot support
//! the configured splits, or every single candidate failed.

pub mod config;
pub mod error;
pub mod estimator;
pub mod evaluator;
pub mod pipeline;
pub mod progress;
pub mod scaler;
pub mod search_space;
pub mod selector;
pub mod split;

// Re-exports for convenient access
pub use config::{SelectionConfig, SelectionConfigBuilder};
pub use error::{Result, SelectionError};
pub use estimator::Estimator;
pub use evaluator::{EvaluationReport, evaluate};
pub use pipeline::{FittedPipeline, ModelPipeline};
pub use progress::{
    CancellationToken, ClosureProgressReporter, ProgressReporter, ProgressUpdate, SelectionStage,
};
pub use search_space::{CandidateConfig, SearchSpace, SvmKernel};
pub use selector::{
    CandidateOutcome, CandidateReport, ModelSelector, ModelSelectorBuilder, SelectionOutcome,
};

use tabsel_processing::{FeatureMatrix, TargetVector};

/// Run the full selection workflow with the stock search space.
///
/// Splits, searches, refits the winner, and scores it on the held-out
/// rows in one call.
///
/// # Errors
///
/// See [`ModelSelector::select`] and [`evaluate`].
pub fn run_selection(
    x: &FeatureMatrix,
    y: &TargetVector,
    config: SelectionConfig,
) -> Result<(FittedPipeline, EvaluationReport)> {
    let selector = ModelSelector::builder().config(config).build();
    let outcome = selector.select(x, y)?;
    let report = evaluate(&outcome.model, &outcome.x_test, &outcome.y_test)?;
    Ok((outcome.model, report))
}

// The selector is shared with worker threads during the parallel search
static_assertions::assert_impl_all!(ModelSelector: Send, Sync);
static_assertions::assert_impl_all!(CandidateReport: Send, Sync);
