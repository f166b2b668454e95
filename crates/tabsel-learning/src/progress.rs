//! Progress reporting and cancellation support for the model search.
//!
//! The selector takes an injected [`ProgressReporter`] instead of writing
//! to any global state; callers decide what to do with the events (log
//! them, drive a progress bar, forward them over IPC). A shared
//! [`CancellationToken`] lets another thread stop a running search.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Stages of a model-selection run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStage {
    /// Validating inputs and enumerating the candidate grid
    Initializing,
    /// Splitting the data into training and held-out test subsets
    Splitting,
    /// Cross-validating candidate configurations
    CrossValidation,
    /// Refitting the winning configuration on the full training subset
    Refitting,
    /// Search completed successfully
    Complete,
    /// Search was cancelled by the caller
    Cancelled,
    /// Search failed with an error
    Failed,
}

impl SelectionStage {
    /// Returns a human-readable name for the stage.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Initializing => "Initializing",
            Self::Splitting => "Splitting Data",
            Self::CrossValidation => "Cross-Validating Candidates",
            Self::Refitting => "Refitting Best Model",
            Self::Complete => "Complete",
            Self::Cancelled => "Cancelled",
            Self::Failed => "Failed",
        }
    }

    /// Typical weight of this stage in the overall run (0.0 - 1.0).
    ///
    /// Cross-validation dominates: it fits folds × candidates models,
    /// while every other stage fits at most one.
    #[must_use]
    pub fn weight(&self) -> f32 {
        match self {
            Self::Initializing => 0.02,
            Self::Splitting => 0.03,
            Self::CrossValidation => 0.80,
            Self::Refitting => 0.15,
            Self::Complete | Self::Cancelled | Self::Failed => 0.0,
        }
    }

    /// Cumulative progress at the start of this stage.
    #[must_use]
    pub fn base_progress(&self) -> f32 {
        match self {
            Self::Initializing => 0.0,
            Self::Splitting => 0.02,
            Self::CrossValidation => 0.05,
            Self::Refitting => 0.85,
            Self::Complete => 1.0,
            Self::Cancelled | Self::Failed => 0.0,
        }
    }
}

/// A progress event emitted during a selection run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Current stage
    pub stage: SelectionStage,

    /// Overall progress (0.0 - 1.0)
    pub progress: f32,

    /// Progress within the current stage (0.0 - 1.0)
    pub stage_progress: f32,

    /// Human-readable message describing current activity
    pub message: String,

    /// Candidates evaluated so far (cross-validation stage only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_processed: Option<usize>,

    /// Total candidates (cross-validation stage only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_total: Option<usize>,
}

impl ProgressUpdate {
    /// Create a progress update for a stage.
    pub fn new(stage: SelectionStage, stage_progress: f32, message: impl Into<String>) -> Self {
        let progress = stage.base_progress() + stage.weight() * stage_progress;
        Self {
            stage,
            progress: progress.clamp(0.0, 1.0),
            stage_progress: stage_progress.clamp(0.0, 1.0),
            message: message.into(),
            items_processed: None,
            items_total: None,
        }
    }

    /// Create a progress update with item counts (candidate i of n).
    pub fn with_items(
        stage: SelectionStage,
        current: usize,
        total: usize,
        message: impl Into<String>,
    ) -> Self {
        let stage_progress = if total > 0 {
            current as f32 / total as f32
        } else {
            0.0
        };
        let mut update = Self::new(stage, stage_progress, message);
        update.items_processed = Some(current);
        update.items_total = Some(total);
        update
    }

    /// Create a completion update.
    pub fn complete(message: impl Into<String>) -> Self {
        Self {
            stage: SelectionStage::Complete,
            progress: 1.0,
            stage_progress: 1.0,
            message: message.into(),
            items_processed: None,
            items_total: None,
        }
    }

    /// Create a cancelled update.
    #[must_use]
    pub fn cancelled() -> Self {
        Self {
            stage: SelectionStage::Cancelled,
            progress: 0.0,
            stage_progress: 0.0,
            message: "Selection cancelled".to_string(),
            items_processed: None,
            items_total: None,
        }
    }

    /// Create a failed update.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            stage: SelectionStage::Failed,
            progress: 0.0,
            stage_progress: 0.0,
            message: message.into(),
            items_processed: None,
            items_total: None,
        }
    }
}

/// Trait for receiving progress updates during a selection run.
///
/// Implementations must be `Send + Sync`: candidate evaluation runs on a
/// worker pool and events may be emitted from any worker thread. The
/// [`report`](Self::report) method may be called frequently, so
/// implementations should be quick and non-blocking.
pub trait ProgressReporter: Send + Sync {
    /// Called when progress is made during selection.
    fn report(&self, update: ProgressUpdate);
}

/// Wrapper that implements [`ProgressReporter`] using a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    /// Creates a new closure-based progress reporter.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

/// Token for cancelling a running selection.
///
/// Backed by an atomic boolean, so it is safe to clone and share across
/// threads. The selector checks the token before starting each candidate;
/// candidates already in flight may finish, but their results are
/// discarded and the run returns
/// [`SelectionError::Cancelled`](crate::SelectionError::Cancelled).
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

static_assertions::assert_impl_all!(CancellationToken: Send, Sync);
static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);

impl CancellationToken {
    /// Creates a new, not-yet-cancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Thread-safe; callable from any thread.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Check whether cancellation has been requested on this token or any
    /// of its clones.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
