//! Error types for the cauce-trend crate.

/// Error type for all fallible operations in the cauce-trend crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrendError {
    /// Returned when a series has too few finite values for the test.
    #[error("{id}: need at least {required} finite values, got {got}")]
    InsufficientData {
        /// Identifier of the tested series.
        id: String,
        /// Minimum number of values.
        required: usize,
        /// Number of finite values present.
        got: usize,
    },
}
