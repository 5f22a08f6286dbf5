//! Initial-versus-final window comparison of an annual series.

use cauce_calendar::Period;
use cauce_series::AnnualSeries;
use cauce_stats::{mean, sd};

use crate::error::AnomalyError;

/// Mean and sample standard deviation of two windows and their relative
/// difference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowComparison {
    pub initial_mean: f64,
    pub initial_std: f64,
    pub final_mean: f64,
    pub final_std: f64,
    /// `(final - initial) / initial`, as a fraction.
    pub percent_difference: f64,
}

fn window_values(annual: &AnnualSeries, period: &Period) -> Result<Vec<f64>, AnomalyError> {
    let values = annual.finite_in(period);
    if values.is_empty() {
        return Err(AnomalyError::EmptyWindow {
            period: period.label(),
        });
    }
    Ok(values)
}

/// Compares the finite yearly values of `annual` in two windows.
///
/// # Errors
///
/// - [`AnomalyError::EmptyWindow`] if either window has no finite value.
/// - [`AnomalyError::DivisionByZeroBaseline`] if the initial mean is zero.
pub fn compare_windows(
    annual: &AnnualSeries,
    initial: &Period,
    final_: &Period,
) -> Result<WindowComparison, AnomalyError> {
    let a = window_values(annual, initial)?;
    let b = window_values(annual, final_)?;
    let initial_mean = mean(&a);
    let final_mean = mean(&b);
    if initial_mean == 0.0 {
        return Err(AnomalyError::DivisionByZeroBaseline {
            context: format!("initial window {}", initial.label()),
        });
    }
    Ok(WindowComparison {
        initial_mean,
        initial_std: sd(&a),
        final_mean,
        final_std: sd(&b),
        percent_difference: (final_mean - initial_mean) / initial_mean,
    })
}
