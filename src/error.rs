use chrono::NaiveDate;
use thiserror::Error;

/// Convenience result type for loading operations.
pub type DataSourceResult<T> = Result<T, DataSourceError>;

/// Error type returned when the transaction source cannot be loaded.
///
/// This is a single error enum shared across Excel/CSV/JSON loading. Any of these is fatal
/// for startup: there is no table to filter without a successful load.
#[derive(Debug, Error)]
pub enum DataSourceError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "excel")]
    /// Excel loading error (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// CSV loading error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON loading error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input does not have the transaction shape (missing required columns, etc.).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A cell could not be coerced into the column's type.
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    ParseError {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },
}

/// A user-supplied bound that falls outside its domain.
///
/// Raised at the input boundary (date picker, top-N slider) so that an invalid range is never
/// silently applied to a view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidRangeError {
    /// The lower date bound is after the upper bound.
    #[error("invalid date range: start {lower} is after end {upper}")]
    DateRange { lower: NaiveDate, upper: NaiveDate },

    /// More than two dates were supplied for a date range.
    #[error("a date range takes at most two dates, got {count}")]
    TooManyBounds { count: usize },

    /// Top-N count outside its allowed range.
    #[error("top-N value {value} is outside the allowed range {min}..={max}")]
    TopN { value: usize, min: usize, max: usize },
}

/// Error type returned by CSV export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Underlying I/O error while flushing the output.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
