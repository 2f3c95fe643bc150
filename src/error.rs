use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Loading errors
// ---------------------------------------------------------------------------

/// Failure to turn a snapshot file into a [`BookTable`](crate::data::model::BookTable).
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// A single record could not be interpreted.
    #[error("record {row}: {message}")]
    Record { row: usize, message: String },

    /// The snapshot as a whole does not have a recognised shape.
    #[error("malformed snapshot: {0}")]
    Malformed(String),

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
}

impl LoadError {
    pub(crate) fn record(row: usize, message: impl Into<String>) -> Self {
        LoadError::Record {
            row,
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Query errors
// ---------------------------------------------------------------------------

/// Raised by the query engine; no computation has been performed when this is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("unknown query: {0}")]
    UnknownQuery(String),
}
