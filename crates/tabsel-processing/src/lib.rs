//! Tabular data loading and preprocessing for model selection.
//!
//! This crate covers the first half of the model-selection workflow: it
//! reads a delimited tabular file into memory and turns it into the numeric
//! inputs the learning crate consumes.
//!
//! # Overview
//!
//! - **Loading**: [`load_csv`] reads a CSV with a header row into a polars
//!   `DataFrame`, loaded wholesale into memory.
//! - **Preprocessing**: [`Preprocessor`] fills missing numeric values with
//!   the per-column mean, label-encodes categorical columns in first-seen
//!   order, and splits off the target column, producing a
//!   [`FeatureMatrix`] and [`TargetVector`].
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tabsel_processing::{load_csv, Preprocessor};
//!
//! let df = load_csv("data.csv")?;
//!
//! let (x, y) = Preprocessor::new("target")
//!     .with_categorical_columns(["region"])
//!     .prepare(&df)?;
//!
//! assert_eq!(x.n_rows(), df.height());
//! assert_eq!(x.n_cols(), df.width() - 1);
//! ```
//!
//! # Guarantees
//!
//! - `X` has the dataset's row count and ordering; its columns are the
//!   dataset's columns minus the target, in original order.
//! - Label encoding is a bijection: k distinct values map onto exactly
//!   `{0, .., k-1}`.
//! - A missing target or declared categorical column fails fast with
//!   [`ProcessingError::ColumnNotFound`]; nothing downstream runs.
//!
//! # Caveat
//!
//! Mean imputation uses the full dataset, before any train/test split. This
//! is a documented information leak kept for parity with the upstream
//! workflow; see [`MeanImputer`].

pub mod encoder;
pub mod error;
pub mod imputer;
pub mod loader;
pub mod preprocessor;
pub mod types;

// Re-exports for convenient access
pub use encoder::LabelEncoder;
pub use error::{ProcessingError, Result as ProcessingResult};
pub use imputer::MeanImputer;
pub use loader::load_csv;
pub use preprocessor::Preprocessor;
pub use types::{FeatureMatrix, TargetVector};

// The matrix types cross thread boundaries during parallel search
static_assertions::assert_impl_all!(FeatureMatrix: Send, Sync);
static_assertions::assert_impl_all!(TargetVector: Send, Sync);
