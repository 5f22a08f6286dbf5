//! Error types for the cauce-seasonal crate.

/// Error type for all fallible operations in the cauce-seasonal crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SeasonalError {
    /// Returned when a relative change would divide by a zero reference.
    #[error("reference mean is zero for {context}")]
    DivisionByZeroBaseline {
        /// Identifying keys of the failed row.
        context: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_division_by_zero() {
        let e = SeasonalError::DivisionByZeroBaseline {
            context: "basin=Maipo, season=JJA".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "reference mean is zero for basin=Maipo, season=JJA"
        );
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<SeasonalError>();
    }
}
