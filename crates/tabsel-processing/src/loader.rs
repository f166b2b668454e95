//! CSV dataset loading.
//!
//! Reads a delimited tabular file wholesale into a polars [`DataFrame`].
//! The dataset is loaded once and treated as immutable afterwards.

use crate::error::Result;
use polars::io::csv::read::{CsvParseOptions, CsvReadOptions};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Number of rows used for schema inference.
const INFER_SCHEMA_ROWS: usize = 100;

/// Load a CSV file with a header row into a [`DataFrame`].
///
/// Schema inference looks at the first 100 rows. If standard quote
/// handling fails (ragged quoting is common in exported spreadsheets),
/// loading is retried without it.
///
/// # Errors
///
/// Returns [`ProcessingError::Polars`](crate::ProcessingError::Polars) if
/// the file cannot be parsed, or [`ProcessingError::Io`](crate::ProcessingError::Io)
/// if it cannot be opened.
pub fn load_csv(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    info!("Loading dataset from: {}", path.display());

    match CsvReadOptions::default()
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
    {
        Ok(df) => {
            info!("Dataset loaded: {:?}", df.shape());
            return Ok(df);
        }
        Err(e) => {
            debug!("Standard loading failed: {}", e);
        }
    }

    // Retry without quote handling
    let df = CsvReadOptions::default()
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()?;

    info!("Dataset loaded: {:?}", df.shape());
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_csv_basic() {
        let dir = std::env::temp_dir();
        let path = dir.join("tabsel_loader_test.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "x1,x2,target").unwrap();
        writeln!(file, "1.0,a,0").unwrap();
        writeln!(file, "2.0,b,1").unwrap();
        writeln!(file, "3.0,a,0").unwrap();
        drop(file);

        let df = load_csv(&path).unwrap();
        assert_eq!(df.shape(), (3, 3));
        assert_eq!(
            df.get_column_names()
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>(),
            vec!["x1", "x2", "target"]
        );

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_csv_missing_file() {
        let result = load_csv("/nonexistent/path/data.csv");
        assert!(result.is_err());
    }
}
