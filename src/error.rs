//! Error types for stackview
//!
//! Every fallible operation returns [`PlotError`]. The UI turns errors into a
//! banner via [`PlotError::title`] and [`PlotError::user_message`] instead of
//! propagating them further.

use thiserror::Error;

/// Main error type for stackview operations
#[derive(Error, Debug)]
pub enum PlotError {
    /// File I/O error
    #[error("Failed to access file: {0}")]
    FileIo(#[from] std::io::Error),

    /// Polars data processing error
    #[error("Data processing error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unsupported file format
    #[error("Unsupported file format: {extension}")]
    UnsupportedFormat { extension: String },

    /// NumPy archive could not be read
    #[error("NumPy archive error: {0}")]
    Npz(#[from] ndarray_npy::ReadNpzError),

    /// Named array missing from a NumPy archive
    #[error("Array '{name}' not found in archive")]
    MissingArray { name: String },

    /// Timestamp count and matrix row count disagree
    #[error("Shape mismatch: {timestamps} timestamps for {rows} rows")]
    ShapeMismatch { timestamps: usize, rows: usize },

    /// A matrix row has the wrong number of values
    #[error("Row {row} has {actual} values, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// Channel names and matrix columns disagree
    #[error("{names} channel names for {columns} columns")]
    ChannelCountMismatch { names: usize, columns: usize },

    /// Point budget must allow at least one point
    #[error("Invalid point budget: {0}")]
    InvalidPointBudget(usize),

    /// Empty dataset error
    #[error("Dataset is empty or has no rows")]
    EmptyDataset,

    /// Type conversion error
    #[error("Type conversion error: {0}")]
    TypeConversion(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Clipboard access error
    #[error("Clipboard error: {0}")]
    Clipboard(String),
}

/// Result type alias for stackview operations
pub type Result<T> = std::result::Result<T, PlotError>;

/// UI-friendly error message formatting
impl PlotError {
    /// Get a user-friendly error message suitable for displaying in UI
    pub fn user_message(&self) -> String {
        match self {
            PlotError::FileIo(e) => format!("File error: {}", e),
            PlotError::Polars(e) => format!("Data error: {}", e),
            PlotError::Config(msg) => format!("Config error: {}", msg),
            PlotError::UnsupportedFormat { extension } => {
                format!("Unsupported file format: '.{}'", extension)
            }
            PlotError::Npz(e) => format!("Archive error: {}", e),
            PlotError::MissingArray { name } => {
                format!("Array '{}' not found in archive", name)
            }
            PlotError::ShapeMismatch { timestamps, rows } => {
                format!("{} timestamps do not match {} data rows", timestamps, rows)
            }
            PlotError::RaggedRow {
                row,
                expected,
                actual,
            } => {
                format!("Row {} has {} values instead of {}", row, actual, expected)
            }
            PlotError::ChannelCountMismatch { names, columns } => {
                format!("{} channel names for {} data columns", names, columns)
            }
            PlotError::InvalidPointBudget(budget) => {
                format!("Point budget must be at least 1 (got {})", budget)
            }
            PlotError::EmptyDataset => "Dataset is empty".to_string(),
            PlotError::TypeConversion(msg) => format!("Type error: {}", msg),
            PlotError::Json(e) => format!("JSON error: {}", e),
            PlotError::Clipboard(msg) => format!("Clipboard error: {}", msg),
        }
    }

    /// Get a short title for the error (for the error banner)
    pub fn title(&self) -> &'static str {
        match self {
            PlotError::FileIo(_) => "File Error",
            PlotError::Polars(_) => "Data Error",
            PlotError::Config(_) => "Configuration Error",
            PlotError::UnsupportedFormat { .. } => "Unsupported Format",
            PlotError::Npz(_) => "Archive Error",
            PlotError::MissingArray { .. } => "Missing Array",
            PlotError::ShapeMismatch { .. }
            | PlotError::RaggedRow { .. }
            | PlotError::ChannelCountMismatch { .. } => "Shape Mismatch",
            PlotError::InvalidPointBudget(_) => "Invalid Point Budget",
            PlotError::EmptyDataset => "Empty Dataset",
            PlotError::TypeConversion(_) => "Type Error",
            PlotError::Json(_) => "JSON Error",
            PlotError::Clipboard(_) => "Clipboard Error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = PlotError::MissingArray {
            name: "data".to_string(),
        };
        assert_eq!(err.user_message(), "Array 'data' not found in archive");
        assert_eq!(err.title(), "Missing Array");

        let err = PlotError::ShapeMismatch {
            timestamps: 10,
            rows: 9,
        };
        assert_eq!(err.user_message(), "10 timestamps do not match 9 data rows");
        assert_eq!(err.title(), "Shape Mismatch");
        assert_eq!(err.to_string(), "Shape mismatch: 10 timestamps for 9 rows");
    }

    #[test]
    fn test_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let plot_err: PlotError = io_err.into();
        assert!(matches!(plot_err, PlotError::FileIo(_)));
    }
}
