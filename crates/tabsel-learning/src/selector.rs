//! Grid-search model selection with cross-validated scoring.
//!
//! [`ModelSelector`] owns the search loop: split the data, score every
//! candidate configuration with k-fold cross-validation over the training
//! subset, pick the best mean score, refit the winner on the full
//! training subset, and hand back the fitted pipeline together with the
//! held-out test split and a per-candidate listing.
//!
//! The candidate grid is embarrassingly parallel and runs on rayon;
//! results collect back in enumeration order, so ties break by
//! first-encountered candidate regardless of which worker finishes first.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, warn};

use tabsel_processing::{FeatureMatrix, TargetVector};

use crate::config::SelectionConfig;
use crate::error::{Result, SelectionError};
use crate::evaluator::accuracy;
use crate::pipeline::{FittedPipeline, ModelPipeline};
use crate::progress::{CancellationToken, ProgressReporter, ProgressUpdate, SelectionStage};
use crate::search_space::{CandidateConfig, SearchSpace};
use crate::split::{KFold, train_test_split};

/// How a single candidate fared during the search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CandidateOutcome {
    /// Cross-validation completed on every fold.
    Scored { mean_cv_score: f64 },
    /// Fit or prediction failed on some fold; the whole candidate is
    /// discarded.
    Failed { reason: String },
    /// Not attempted because cancellation was requested first.
    Skipped,
}

/// Per-candidate record retained for the final comparison listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateReport {
    pub config: CandidateConfig,
    #[serde(flatten)]
    pub outcome: CandidateOutcome,
}

impl CandidateReport {
    /// The mean cross-validation score, if this candidate was scored.
    #[must_use]
    pub fn score(&self) -> Option<f64> {
        match self.outcome {
            CandidateOutcome::Scored { mean_cv_score } => Some(mean_cv_score),
            _ => None,
        }
    }
}

/// Everything a completed search produces.
pub struct SelectionOutcome {
    /// The winning configuration, refitted on the full training subset.
    pub model: FittedPipeline,
    /// Report for the winning candidate.
    pub best: CandidateReport,
    /// Reports for every candidate, in enumeration order.
    pub candidates: Vec<CandidateReport>,
    /// Held-out feature rows, untouched by any fitting.
    pub x_test: Vec<Vec<f64>>,
    /// Held-out labels aligned with `x_test`.
    pub y_test: Vec<i32>,
}

/// Grid-search engine. Build via [`ModelSelector::builder()`].
pub struct ModelSelector {
    config: SelectionConfig,
    search_space: SearchSpace,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    cancellation_token: Option<CancellationToken>,
}

impl ModelSelector {
    /// Create a new selector builder.
    #[must_use]
    pub fn builder() -> ModelSelectorBuilder {
        ModelSelectorBuilder::default()
    }

    fn report(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation_token
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    /// Run the search.
    ///
    /// # Errors
    ///
    /// - [`SelectionError::DimensionMismatch`] if `x` and `y` disagree on
    ///   row count.
    /// - [`SelectionError::EmptySearchSpace`] if the grid enumerates
    ///   nothing.
    /// - [`SelectionError::InsufficientData`] if the rows cannot support
    ///   the configured split and fold counts.
    /// - [`SelectionError::NoViableConfiguration`] if every candidate
    ///   failed.
    /// - [`SelectionError::Cancelled`] if the token fired mid-search.
    pub fn select(&self, x: &FeatureMatrix, y: &TargetVector) -> Result<SelectionOutcome> {
        self.report(ProgressUpdate::new(
            SelectionStage::Initializing,
            0.0,
            "Validating inputs",
        ));

        self.config
            .validate()
            .map_err(|e| SelectionError::InvalidConfig(e.to_string()))?;
        if x.n_rows() != y.len() {
            return Err(SelectionError::DimensionMismatch {
                x_rows: x.n_rows(),
                y_rows: y.len(),
            });
        }

        let candidates = self.search_space.candidates();
        if candidates.is_empty() {
            return Err(SelectionError::EmptySearchSpace);
        }
        info!(
            candidates = candidates.len(),
            rows = x.n_rows(),
            features = x.n_cols(),
            folds = self.config.cv_folds,
            "starting model selection"
        );

        self.report(ProgressUpdate::new(
            SelectionStage::Splitting,
            0.0,
            "Splitting into train and test subsets",
        ));
        let (train_idx, test_idx) =
            train_test_split(x.n_rows(), self.config.test_fraction, self.config.seed)?;
        let x_train = x.take_rows(&train_idx).rows;
        let y_train = y.take(&train_idx).values;
        let x_test = x.take_rows(&test_idx).rows;
        let y_test = y.take(&test_idx).values;

        let folds = KFold::new(self.config.cv_folds).split(x_train.len())?;

        let total = candidates.len();
        let done = AtomicUsize::new(0);
        let reports: Vec<CandidateReport> = candidates
            .into_par_iter()
            .map(|config| {
                if self.is_cancelled() {
                    return CandidateReport {
                        config,
                        outcome: CandidateOutcome::Skipped,
                    };
                }

                let outcome = self.cross_validate(&config, &x_train, &y_train, &folds);
                let finished = done.fetch_add(1, Ordering::SeqCst) + 1;
                self.report(ProgressUpdate::with_items(
                    SelectionStage::CrossValidation,
                    finished,
                    total,
                    format!("Evaluated {config}"),
                ));
                CandidateReport { config, outcome }
            })
            .collect();

        if self.is_cancelled() {
            self.report(ProgressUpdate::cancelled());
            return Err(SelectionError::Cancelled);
        }

        // strict greater-than keeps the first of any tie, in enumeration
        // order
        let mut best: Option<&CandidateReport> = None;
        for report in &reports {
            if let Some(score) = report.score() {
                if best.and_then(CandidateReport::score).is_none_or(|b| score > b) {
                    best = Some(report);
                }
            }
        }
        let Some(best) = best.cloned() else {
            self.report(ProgressUpdate::failed("All candidates failed"));
            return Err(SelectionError::NoViableConfiguration {
                attempted: reports.len(),
            });
        };
        info!(
            winner = %best.config,
            score = best.score(),
            "selected best candidate"
        );

        self.report(ProgressUpdate::new(
            SelectionStage::Refitting,
            0.0,
            format!("Refitting {}", best.config),
        ));
        let model = ModelPipeline::fit(&best.config, &x_train, &y_train, self.config.seed)?;

        self.report(ProgressUpdate::complete("Selection complete"));
        Ok(SelectionOutcome {
            model,
            best,
            candidates: reports,
            x_test,
            y_test,
        })
    }

    /// Score one candidate across all folds. All-or-nothing: a failure or
    /// non-finite score on any fold fails the whole candidate.
    fn cross_validate(
        &self,
        config: &CandidateConfig,
        x_train: &[Vec<f64>],
        y_train: &[i32],
        folds: &[(Vec<usize>, Vec<usize>)],
    ) -> CandidateOutcome {
        let mut scores = Vec::with_capacity(folds.len());
        for (fit_idx, val_idx) in folds {
            let x_fit = gather(x_train, fit_idx);
            let y_fit: Vec<i32> = fit_idx.iter().map(|&i| y_train[i]).collect();
            let x_val = gather(x_train, val_idx);
            let y_val: Vec<i32> = val_idx.iter().map(|&i| y_train[i]).collect();

            let fold_score = ModelPipeline::fit(config, &x_fit, &y_fit, self.config.seed)
                .and_then(|fitted| fitted.predict(&x_val))
                .map(|preds| accuracy(&preds, &y_val));

            match fold_score {
                Ok(score) if score.is_finite() => scores.push(score),
                Ok(score) => {
                    warn!(candidate = %config, score, "non-finite fold score");
                    return CandidateOutcome::Failed {
                        reason: format!("non-finite fold score: {score}"),
                    };
                }
                Err(e) => {
                    warn!(candidate = %config, error = %e, "candidate failed");
                    return CandidateOutcome::Failed {
                        reason: e.to_string(),
                    };
                }
            }
        }

        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        debug!(candidate = %config, mean_cv_score = mean, "candidate scored");
        CandidateOutcome::Scored { mean_cv_score: mean }
    }
}

fn gather(rows: &[Vec<f64>], indices: &[usize]) -> Vec<Vec<f64>> {
    indices.iter().map(|&i| rows[i].clone()).collect()
}

/// Builder for [`ModelSelector`].
#[derive(Default)]
pub struct ModelSelectorBuilder {
    config: Option<SelectionConfig>,
    search_space: Option<SearchSpace>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    cancellation_token: Option<CancellationToken>,
}

impl ModelSelectorBuilder {
    /// Set the selection configuration (defaults to
    /// [`SelectionConfig::default()`]).
    #[must_use]
    pub fn config(mut self, config: SelectionConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the candidate grid (defaults to [`SearchSpace::default()`]).
    #[must_use]
    pub fn search_space(mut self, space: SearchSpace) -> Self {
        self.search_space = Some(space);
        self
    }

    /// Inject a progress reporter.
    #[must_use]
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Inject a cancellation token.
    #[must_use]
    pub fn cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Build the selector.
    #[must_use]
    pub fn build(self) -> ModelSelector {
        ModelSelector {
            config: self.config.unwrap_or_default(),
            search_space: self.search_space.unwrap_or_default(),
            progress_reporter: self.progress_reporter,
            cancellation_token: self.cancellation_token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search_space::SvmKernel;

    /// 60-row, clearly separable two-class dataset.
    fn binary_data() -> (FeatureMatrix, TargetVector) {
        let mut rows = Vec::new();
        let mut values = Vec::new();
        for i in 0..30 {
            rows.push(vec![i as f64 * 0.1, 1.0]);
            values.push(0);
            rows.push(vec![20.0 + i as f64 * 0.1, -1.0]);
            values.push(1);
        }
        let x = FeatureMatrix {
            names: vec!["a".to_string(), "b".to_string()],
            rows,
        };
        let y = TargetVector {
            values,
            classes: vec!["no".to_string(), "yes".to_string()],
        };
        (x, y)
    }

    /// 90-row balanced three-class dataset; every cross-validation fold
    /// sees all three classes.
    fn three_class_data() -> (FeatureMatrix, TargetVector) {
        let mut rows = Vec::new();
        let mut values = Vec::new();
        for i in 0..30 {
            for class in 0..3 {
                rows.push(vec![class as f64 * 30.0 + i as f64 * 0.1]);
                values.push(class);
            }
        }
        let x = FeatureMatrix {
            names: vec!["a".to_string()],
            rows,
        };
        let y = TargetVector {
            values,
            classes: vec!["a".to_string(), "b".to_string(), "c".to_string()],
        };
        (x, y)
    }

    fn small_space() -> SearchSpace {
        SearchSpace::empty()
            .with_dt_max_depth([3, 5])
            .with_knn_n_neighbors([3])
    }

    #[test]
    fn test_select_returns_scored_winner() {
        let (x, y) = binary_data();
        let selector = ModelSelector::builder().search_space(small_space()).build();
        let outcome = selector.select(&x, &y).unwrap();

        assert!(outcome.best.score().is_some());
        assert_eq!(outcome.candidates.len(), 3);
        assert_eq!(outcome.x_test.len(), 12);
        assert_eq!(outcome.y_test.len(), 12);
        // a separable dataset should cross-validate near-perfectly
        assert!(outcome.best.score().unwrap() > 0.9);
    }

    #[test]
    fn test_same_seed_same_selection() {
        let (x, y) = binary_data();
        let build = || {
            ModelSelector::builder()
                .config(SelectionConfig::builder().seed(7).build().unwrap())
                .search_space(small_space())
                .build()
        };
        let a = build().select(&x, &y).unwrap();
        let b = build().select(&x, &y).unwrap();
        assert_eq!(a.best, b.best);
        assert_eq!(a.candidates, b.candidates);
        assert_eq!(a.y_test, b.y_test);
    }

    #[test]
    fn test_cv_mean_invariant_to_fold_order() {
        // flip some labels so fold accuracies actually differ
        let (x, mut y) = binary_data();
        for i in (0..y.values.len()).step_by(11) {
            y.values[i] = 1 - y.values[i];
        }
        let selector = ModelSelector::builder().build();
        let config = CandidateConfig::NearestNeighbors { n_neighbors: 3 };

        let folds = KFold::new(5).split(x.n_rows()).unwrap();
        let mut reversed = folds.clone();
        reversed.reverse();

        let forward = selector.cross_validate(&config, &x.rows, &y.values, &folds);
        let backward = selector.cross_validate(&config, &x.rows, &y.values, &reversed);

        let CandidateOutcome::Scored { mean_cv_score: a } = forward else {
            panic!("candidate should score on separable data");
        };
        let CandidateOutcome::Scored { mean_cv_score: b } = backward else {
            panic!("candidate should score on separable data");
        };
        // the reduction is a plain mean, so only summation order differs
        assert!((a - b).abs() < 1e-12, "fold order changed the mean: {a} vs {b}");
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let (x, mut y) = binary_data();
        y.values.pop();
        let selector = ModelSelector::builder().search_space(small_space()).build();
        assert!(matches!(
            selector.select(&x, &y),
            Err(SelectionError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_empty_search_space_rejected() {
        let (x, y) = binary_data();
        let selector = ModelSelector::builder()
            .search_space(SearchSpace::empty())
            .build();
        assert!(matches!(
            selector.select(&x, &y),
            Err(SelectionError::EmptySearchSpace)
        ));
    }

    #[test]
    fn test_all_failing_candidates_is_no_viable_configuration() {
        // three-class target with an SVC-only grid: the binary-only
        // backend fails every candidate
        let (x, y) = three_class_data();

        let selector = ModelSelector::builder()
            .search_space(
                SearchSpace::empty()
                    .with_svc_c([0.1, 1.0])
                    .with_svc_kernels([SvmKernel::Linear]),
            )
            .build();
        assert!(matches!(
            selector.select(&x, &y),
            Err(SelectionError::NoViableConfiguration { attempted: 2 })
        ));
    }

    #[test]
    fn test_failed_candidates_do_not_abort_search() {
        // mixed grid on 3-class data: SVC candidates fail, trees succeed
        let (x, y) = three_class_data();

        let selector = ModelSelector::builder()
            .search_space(
                SearchSpace::empty()
                    .with_svc_c([1.0])
                    .with_svc_kernels([SvmKernel::Linear])
                    .with_dt_max_depth([5]),
            )
            .build();
        let outcome = selector.select(&x, &y).unwrap();

        assert_eq!(outcome.best.config.family(), "decision_tree");
        let failed = outcome
            .candidates
            .iter()
            .filter(|c| matches!(c.outcome, CandidateOutcome::Failed { .. }))
            .count();
        assert_eq!(failed, 1);
    }

    #[test]
    fn test_pre_cancelled_token_aborts() {
        let (x, y) = binary_data();
        let token = CancellationToken::new();
        token.cancel();
        let selector = ModelSelector::builder()
            .search_space(small_space())
            .cancellation_token(token)
            .build();
        assert!(matches!(
            selector.select(&x, &y),
            Err(SelectionError::Cancelled)
        ));
    }
}
