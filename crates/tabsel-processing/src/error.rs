//! Custom error types for dataset loading and preprocessing.
//!
//! This module provides the error hierarchy for the processing crate using
//! `thiserror`. Schema problems (a referenced column missing from the
//! dataset) are structural and abort preprocessing entirely; they carry the
//! offending column name so callers can report it.
//!
//! Errors are serializable as `{code, message}` pairs for machine-readable
//! consumers.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for dataset loading and preprocessing.
#[derive(Error, Debug)]
pub enum ProcessingError {
    /// A referenced column (target or declared categorical) was not found
    /// in the dataset.
    ///
    /// Column names are case-sensitive. This is a schema error: the
    /// preprocessor aborts rather than producing a feature matrix with a
    /// different shape than the caller asked for.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// A column contained no non-null values, so no fill statistic could
    /// be computed for it.
    #[error("No valid values found in column '{0}'")]
    NoValidValues(String),

    /// The target column could not be converted to class labels.
    #[error("Target column '{column}' is not usable as a class label: {reason}")]
    InvalidTarget { column: String, reason: String },

    /// A feature column could not be converted to a numeric representation.
    #[error("Failed to convert column '{column}' to numeric: {reason}")]
    TypeConversionFailed { column: String, reason: String },

    /// The dataset has no rows, or no feature columns besides the target.
    #[error("Dataset is unusable: {0}")]
    EmptyDataset(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

impl ProcessingError {
    /// Get a stable error code for machine-readable handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::NoValidValues(_) => "NO_VALID_VALUES",
            Self::InvalidTarget { .. } => "INVALID_TARGET",
            Self::TypeConversionFailed { .. } => "TYPE_CONVERSION_FAILED",
            Self::EmptyDataset(_) => "EMPTY_DATASET",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
        }
    }

    /// Check if this error is a schema error (a referenced column is absent).
    pub fn is_schema_error(&self) -> bool {
        matches!(self, Self::ColumnNotFound(_))
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for ProcessingError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("ProcessingError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for processing operations.
pub type Result<T> = std::result::Result<T, ProcessingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            ProcessingError::ColumnNotFound("target".to_string()).error_code(),
            "COLUMN_NOT_FOUND"
        );
        assert_eq!(
            ProcessingError::NoValidValues("x1".to_string()).error_code(),
            "NO_VALID_VALUES"
        );
    }

    #[test]
    fn test_is_schema_error() {
        assert!(ProcessingError::ColumnNotFound("y".to_string()).is_schema_error());
        assert!(!ProcessingError::NoValidValues("x".to_string()).is_schema_error());
    }

    #[test]
    fn test_error_serialization() {
        let error = ProcessingError::ColumnNotFound("Age".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("COLUMN_NOT_FOUND"));
        assert!(json.contains("Age"));
    }
}
