//! Interquartile-range outlier screening.

use cauce_stats::{finite_values, quantile_type7, sort_finite};
use tracing::debug;

use crate::series::Series;

/// Tukey multiplier applied to the interquartile range.
pub const TUKEY_K: f64 = 1.5;

/// Closed acceptance interval `[lower, upper]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fence {
    pub lower: f64,
    pub upper: f64,
}

impl Fence {
    /// Whether `value` lies inside the fence.
    pub fn admits(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Tukey fence `[Q1 - 1.5 IQR, Q3 + 1.5 IQR]` over the finite values,
/// using type-7 (linear interpolation) quartiles.
///
/// Returns `None` if there are no finite values.
pub fn tukey_fence(values: &[f64]) -> Option<Fence> {
    let mut sorted = finite_values(values);
    if sorted.is_empty() {
        return None;
    }
    sort_finite(&mut sorted);
    let q1 = quantile_type7(&sorted, 0.25);
    let q3 = quantile_type7(&sorted, 0.75);
    let iqr = q3 - q1;
    Some(Fence {
        lower: q1 - TUKEY_K * iqr,
        upper: q3 + TUKEY_K * iqr,
    })
}

/// Masks out-of-fence values as `NaN`, keeping positions.
///
/// Masking shifts the quartiles, so a single pass can expose new
/// outliers. Passes repeat on the surviving values until one masks
/// nothing; the result is a fixed point, so filtering it again returns it
/// unchanged.
///
/// This can mask more than one fence pass would. In `[1, 2, 3, 10, 1000]`
/// the first pass masks only `1000`; the second, on `[1, 2, 3, 10]`,
/// also masks `10`. Use [`tukey_fence`] directly for single-pass
/// screening.
pub fn filter_outliers(series: &Series) -> Series {
    let mut values = series.values().to_vec();
    let mut passes = 0usize;
    let mut masked_total = 0usize;
    while let Some(fence) = tukey_fence(&values) {
        let mut masked = 0usize;
        for v in values.iter_mut().filter(|v| v.is_finite()) {
            if !fence.admits(*v) {
                *v = f64::NAN;
                masked += 1;
            }
        }
        passes += 1;
        if masked == 0 {
            break;
        }
        masked_total += masked;
    }
    debug!(passes, masked = masked_total, "outlier filter converged");
    series.with_values(values)
}
