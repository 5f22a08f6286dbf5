//! Error types for cauce-io.

use std::path::PathBuf;

/// Error type for all fallible operations in the cauce-io crate.
///
/// Library errors from NetCDF, CSV and JSON are carried as strings so the
/// type stays `Send + Sync` and comparable in tests.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Wraps an error originating from the NetCDF library.
    #[error("netcdf error: {reason}")]
    Netcdf {
        /// Description of the underlying NetCDF failure.
        reason: String,
    },

    /// Wraps an error originating from the CSV library.
    #[error("csv error: {reason}")]
    Csv {
        /// Description of the underlying CSV failure.
        reason: String,
    },

    /// Wraps a JSON serialization error.
    #[error("json error: {reason}")]
    Json {
        /// Description of the underlying failure.
        reason: String,
    },

    /// Wraps a filesystem error.
    #[error("i/o error on {}: {reason}", path.display())]
    File {
        /// Path being read or written.
        path: PathBuf,
        /// Description of the failure.
        reason: String,
    },

    /// Wraps an error originating from the cauce-calendar crate.
    #[error("calendar error: {reason}")]
    Calendar {
        /// Description of the underlying calendar failure.
        reason: String,
    },

    /// Returned when a configuration check fails.
    #[error("{count} validation error(s): {details}")]
    Validation {
        /// Number of accumulated validation failures.
        count: usize,
        /// Human-readable summary of the failures.
        details: String,
    },

    /// Returned when a required column is not present in a table.
    #[error("column '{name}' not found in {}", path.display())]
    MissingColumn {
        /// Name of the missing column.
        name: String,
        /// Path to the table that was inspected.
        path: PathBuf,
    },

    /// Returned when a time value cannot be parsed or is out of range.
    #[error("invalid time: {reason}")]
    InvalidTime {
        /// Description of the time parsing issue.
        reason: String,
    },

    /// Series error raised while assembling a dataset.
    #[error(transparent)]
    Series(#[from] cauce_series::SeriesError),
}

impl From<netcdf::Error> for IoError {
    fn from(e: netcdf::Error) -> Self {
        IoError::Netcdf {
            reason: e.to_string(),
        }
    }
}

impl From<csv::Error> for IoError {
    fn from(e: csv::Error) -> Self {
        IoError::Csv {
            reason: e.to_string(),
        }
    }
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        IoError::Json {
            reason: e.to_string(),
        }
    }
}

impl From<cauce_calendar::CalendarError> for IoError {
    fn from(e: cauce_calendar::CalendarError) -> Self {
        IoError::Calendar {
            reason: e.to_string(),
        }
    }
}
