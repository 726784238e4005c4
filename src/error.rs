//! Error types for petrolog
//!
//! Structural problems (missing columns, uncoercible columns, bad parameters)
//! are reported with the offending names so the caller can show them as-is.
//! Numeric degeneracies never surface here: they resolve to NaN or a skipped
//! group inside the pipelines.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// petrolog error types
#[derive(Error, Debug)]
pub enum Error {
    /// Required columns absent from the sample table
    #[error("Missing required columns for {calculation}: {}", .columns.join(", "))]
    MissingColumns {
        /// Calculation that needed the columns
        calculation: String,
        /// Every missing column, in requirement order
        columns: Vec<String>,
    },

    /// Column exists but cannot be read as numbers
    #[error("Column '{column}' cannot be coerced to numeric (type {data_type})")]
    TypeCoercion {
        /// Column name
        column: String,
        /// Arrow data type found
        data_type: String,
    },

    /// Parameter value rejected
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name (or `params` when the whole set is malformed)
        name: String,
        /// What was wrong with it
        reason: String,
    },

    /// Invalid input (bad shape, unknown calculation, etc.)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A calculation aborted; no output table was produced
    #[error("{calculation} calculation error: {message}")]
    CalculationFailed {
        /// Calculation name
        calculation: String,
        /// Underlying failure
        message: String,
    },

    /// Dataset lookup failed
    #[error("Dataset not found: {0}")]
    DatasetNotFound(String),

    /// Session has no current table
    #[error("No dataset selected")]
    NoDatasetSelected,

    /// Storage error (Parquet/Arrow files)
    #[error("Storage error: {0}")]
    StorageError(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Parquet error
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Build a [`Error::MissingColumns`] from any list of names
    pub fn missing_columns<I, S>(calculation: &str, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MissingColumns {
            calculation: calculation.to_string(),
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the error describes the caller's input rather than a failure
    /// inside the computation.
    #[must_use]
    pub const fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::MissingColumns { .. } | Self::TypeCoercion { .. } | Self::InvalidParameter { .. }
        )
    }
}
