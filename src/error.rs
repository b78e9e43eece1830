//! Error types for forecast-studio.

use thiserror::Error;

/// Result type alias for forecast-studio operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur while loading, cleaning, fitting or rendering.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for the requested model order.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A bounded model parameter is outside its allowed range.
    #[error("parameter {name} = {value} is outside [{min}, {max}]")]
    ParameterOutOfRange {
        name: &'static str,
        value: usize,
        min: usize,
        max: usize,
    },

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Timestamp-related error.
    #[error("timestamp error: {0}")]
    TimestampError(String),

    /// A value cell is neither numeric nor a missing-value marker.
    ///
    /// `row` is the 0-based data-row index in the uploaded table (header
    /// excluded); the message counts data rows from 1.
    #[error("data row {}: value {value:?} is not numeric", .row + 1)]
    NonNumericValue { row: usize, value: String },

    /// The named column does not exist in the table.
    #[error("column not found: {0:?}")]
    ColumnNotFound(String),

    /// Malformed CSV input.
    #[error("csv error: {0}")]
    Csv(String),

    /// Reading or writing a file failed.
    #[error("io error: {0}")]
    Io(String),

    /// Chart rendering failed.
    #[error("render error: {0}")]
    Render(String),

    /// Index out of bounds.
    #[error("index out of bounds: {index} (size: {size})")]
    IndexOutOfBounds { index: usize, size: usize },

    /// Model has not been fitted yet.
    #[error("model must be fitted before prediction")]
    FitRequired,

    /// Computation error (e.g., numerical issues).
    #[error("computation error: {0}")]
    ComputationError(String),
}

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        ForecastError::Csv(err.to_string())
    }
}

impl From<std::io::Error> for ForecastError {
    fn from(err: std::io::Error) -> Self {
        ForecastError::Io(err.to_string())
    }
}
