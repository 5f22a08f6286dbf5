//! Error types for the cauce-series crate.

/// Error type for all fallible operations in the cauce-series crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SeriesError {
    /// Returned when paired arrays have different lengths.
    #[error("{field}: expected {expected} elements, got {got}")]
    LengthMismatch {
        /// Name of the mismatched field.
        field: &'static str,
        /// Expected length.
        expected: usize,
        /// Actual length.
        got: usize,
    },

    /// Returned when timestamps go backwards.
    #[error("timestamps must be non-decreasing: index {index} precedes index {prev}")]
    NonMonotonic {
        /// Index of the out-of-order timestamp.
        index: usize,
        /// Index of the later timestamp it follows.
        prev: usize,
    },

    /// Returned when annual years are not strictly increasing.
    #[error("years must be strictly increasing: {year} follows {prev}")]
    UnorderedYears {
        /// The offending year.
        year: i32,
        /// The year it follows.
        prev: i32,
    },

    /// Returned when the requested variable is absent from a gridded dataset.
    #[error("variable '{name}' not found (available: {available})")]
    MissingVariable {
        /// Requested variable name.
        name: String,
        /// Comma-separated list of the variables present.
        available: String,
    },

    /// Returned when a variable lacks the expected dimensions.
    #[error("variable '{name}' has unexpected dimensions: {reason}")]
    DimensionMismatch {
        /// Variable name.
        name: String,
        /// Description of the mismatch.
        reason: String,
    },

    /// Returned when no yearly value falls inside the target period.
    #[error("no yearly values inside period {period}")]
    EmptyPeriod {
        /// `"YYYY-YYYY"` label of the period.
        period: String,
    },

    /// Returned when configuration is invalid.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// Calendar error.
    #[error(transparent)]
    Calendar(#[from] cauce_calendar::CalendarError),
}
