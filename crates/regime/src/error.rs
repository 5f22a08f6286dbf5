//! Error types for the cauce-regime crate.

/// Error type for all fallible operations in the cauce-regime crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegimeError {
    /// Returned when an interval ends before it starts.
    #[error("interval '{label}' ends before it starts: {first_year}..={last_year}")]
    InvalidInterval {
        /// Regime label of the interval.
        label: String,
        /// First year.
        first_year: i32,
        /// Last year.
        last_year: i32,
    },

    /// Returned when a test receives fewer than two groups.
    #[error("at least 2 groups are required, got {got}")]
    TooFewGroups {
        /// Number of groups given.
        got: usize,
    },

    /// Returned when a test group holds no finite value.
    #[error("group {index} has no finite values")]
    EmptyGroup {
        /// Position of the group.
        index: usize,
    },

    /// Returned when there are no residual degrees of freedom.
    #[error("need more samples than groups: {samples} samples in {groups} groups")]
    InsufficientSamples {
        /// Total finite samples.
        samples: usize,
        /// Number of groups.
        groups: usize,
    },

    /// Returned when a reference distribution cannot be built.
    #[error("distribution error: {reason}")]
    Distribution {
        /// Message from the distribution library.
        reason: String,
    },
}
