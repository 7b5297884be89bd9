use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Dataset not found at '{0}'")]
    SourceNotFound(PathBuf),

    #[error("Failed to read metadata for dataset '{0}'")]
    SourceMetadata(PathBuf, #[source] std::io::Error),

    #[error("Dataset path '{0}' is not a file")]
    NotAFile(PathBuf),

    #[error("Parsing error reading CSV '{path}'")]
    CsvRead {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },

    #[error("Required column '{column}' missing from '{path}'")]
    MissingColumn { path: PathBuf, column: String },

    #[error("Column '{column}' in '{path}' is not numeric")]
    NonNumericColumn {
        path: PathBuf,
        column: String,
        #[source]
        source: PolarsError,
    },

    #[error(
        "Row {row} of '{path}' has no valid timestamp \
         (year={year:?}, month={month:?}, day={day:?}, hour={hour:?})"
    )]
    InvalidTimestamp {
        path: PathBuf,
        row: usize,
        year: Option<i64>,
        month: Option<i64>,
        day: Option<i64>,
        hour: Option<i64>,
    },

    #[error("Failed building derived columns for '{path}': {source}")]
    DerivedColumns {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
}
