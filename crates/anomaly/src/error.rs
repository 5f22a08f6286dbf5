//! Error types for the cauce-anomaly crate.

/// Error type for all fallible operations in the cauce-anomaly crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnomalyError {
    /// Returned when a relative quantity would divide by a zero reference.
    #[error("baseline mean is zero for {context}")]
    DivisionByZeroBaseline {
        /// Identifying keys of the failed computation.
        context: String,
    },

    /// Returned when a grouping specification is empty or repeats a field.
    #[error("invalid grouping: {reason}")]
    InvalidGrouping {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a comparison window holds no finite yearly value.
    #[error("no finite yearly values in window {period}")]
    EmptyWindow {
        /// `"YYYY-YYYY"` label of the window.
        period: String,
    },

    /// Series error.
    #[error(transparent)]
    Series(#[from] cauce_series::SeriesError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_division_by_zero() {
        let e = AnomalyError::DivisionByZeroBaseline {
            context: "basin=057, variable=precipitation".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "baseline mean is zero for basin=057, variable=precipitation"
        );
    }

    #[test]
    fn display_invalid_grouping() {
        let e = AnomalyError::InvalidGrouping {
            reason: "no fields".to_string(),
        };
        assert_eq!(e.to_string(), "invalid grouping: no fields");
    }

    #[test]
    fn display_empty_window() {
        let e = AnomalyError::EmptyWindow {
            period: "1980-1989".to_string(),
        };
        assert_eq!(e.to_string(), "no finite yearly values in window 1980-1989");
    }

    #[test]
    fn from_series_error() {
        let se = cauce_series::SeriesError::EmptyPeriod {
            period: "2030-2060".to_string(),
        };
        let ae: AnomalyError = se.into();
        assert!(matches!(ae, AnomalyError::Series(_)));
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<AnomalyError>();
    }
}
