//! Error types for the cauce-calendar crate.

/// Error type for all fallible operations in the cauce-calendar crate.
///
/// Covers invalid month numbers, inverted period bounds and season
/// tables that do not partition the twelve months.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalendarError {
    /// Returned when a month number is outside the valid range 1..=12.
    #[error("invalid month: {month} (must be 1..=12)")]
    InvalidMonth {
        /// The invalid month number that was provided.
        month: u8,
    },

    /// Returned when a year/month/day triple is not a calendar date.
    #[error("invalid date: {year}-{month:02}-{day:02}")]
    InvalidDate {
        /// Year component.
        year: i32,
        /// Month component.
        month: u8,
        /// Day component.
        day: u8,
    },

    /// Returned when a period starts after it ends.
    #[error("invalid period: start {start} is after end {end}")]
    InvalidPeriod {
        /// Start bound as provided.
        start: String,
        /// End bound as provided.
        end: String,
    },

    /// Returned when a season table assigns a month twice.
    #[error("month {month} assigned to more than one season")]
    DuplicateMonth {
        /// The month that appeared twice.
        month: u8,
    },

    /// Returned when a season table leaves a month unassigned.
    #[error("month {month} is not assigned to any season")]
    UnassignedMonth {
        /// The month with no season.
        month: u8,
    },
}
