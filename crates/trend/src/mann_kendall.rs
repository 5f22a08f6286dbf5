//! Mann-Kendall monotonic trend test.

use std::fmt;

use cauce_series::AnnualSeries;
use cauce_stats::{median, normal_cdf, sort_finite, tie_counts};
use tracing::debug;

use crate::error::TrendError;

/// Two-sided significance level used for every trend decision.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Minimum number of finite values the test accepts.
pub const MIN_POINTS: usize = 3;

/// Direction of a significant monotonic trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    NoTrend,
}

impl TrendDirection {
    pub fn label(self) -> &'static str {
        match self {
            Self::Increasing => "increasing",
            Self::Decreasing => "decreasing",
            Self::NoTrend => "no trend",
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of a Mann-Kendall test on one series.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendResult {
    pub id: String,
    /// Number of finite values tested.
    pub n: usize,
    /// Sum of pairwise difference signs.
    pub s: f64,
    /// Continuity-corrected normal score.
    pub z: f64,
    /// Kendall's tau, `S / (n (n - 1) / 2)`.
    pub tau: f64,
    /// Two-sided p-value.
    pub p_value: f64,
    /// Sen's slope in units per year.
    pub slope: f64,
    pub direction: TrendDirection,
    pub is_significant: bool,
}

/// Variance of S under the null hypothesis, with the tie correction.
fn variance_s(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let ties: f64 = tie_counts(values)
        .into_iter()
        .map(|t| {
            let t = t as f64;
            t * (t - 1.0) * (2.0 * t + 5.0)
        })
        .sum();
    (n * (n - 1.0) * (2.0 * n + 5.0) - ties) / 18.0
}

/// Median of the pairwise slopes `(v_j - v_i) / (year_j - year_i)`.
fn sens_slope(years: &[i32], values: &[f64]) -> f64 {
    let n = values.len();
    let mut slopes = Vec::with_capacity(n * (n - 1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            let dx = f64::from(years[j] - years[i]);
            slopes.push((values[j] - values[i]) / dx);
        }
    }
    sort_finite(&mut slopes);
    median(&slopes)
}

/// Runs the Mann-Kendall test on the finite values of `series`, in year
/// order.
///
/// # Errors
///
/// Returns [`TrendError::InsufficientData`] with fewer than three finite
/// values.
pub fn mann_kendall(id: &str, series: &AnnualSeries) -> Result<TrendResult, TrendError> {
    let (years, values): (Vec<i32>, Vec<f64>) = series.finite_pairs().unzip();
    let n = values.len();
    if n < MIN_POINTS {
        return Err(TrendError::InsufficientData {
            id: id.to_string(),
            required: MIN_POINTS,
            got: n,
        });
    }

    let mut s = 0.0;
    for i in 0..n - 1 {
        for j in (i + 1)..n {
            s += match values[j].partial_cmp(&values[i]) {
                Some(std::cmp::Ordering::Greater) => 1.0,
                Some(std::cmp::Ordering::Less) => -1.0,
                _ => 0.0,
            };
        }
    }

    let sigma = variance_s(&values).sqrt();
    let z = if sigma == 0.0 {
        0.0
    } else if s > 0.0 {
        (s - 1.0) / sigma
    } else if s < 0.0 {
        (s + 1.0) / sigma
    } else {
        0.0
    };
    let p_value = 2.0 * (1.0 - normal_cdf(z.abs()));
    let tau = s / (0.5 * n as f64 * (n as f64 - 1.0));
    let is_significant = p_value < SIGNIFICANCE_LEVEL;
    let direction = match (is_significant, z) {
        (true, z) if z > 0.0 => TrendDirection::Increasing,
        (true, z) if z < 0.0 => TrendDirection::Decreasing,
        _ => TrendDirection::NoTrend,
    };

    let result = TrendResult {
        id: id.to_string(),
        n,
        s,
        z,
        tau,
        p_value,
        slope: sens_slope(&years, &values),
        direction,
        is_significant,
    };
    debug!(id, n, tau, p_value, direction = %direction, "mann-kendall");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn series(values: Vec<f64>) -> AnnualSeries {
        let years = (2000..2000 + values.len() as i32).collect();
        AnnualSeries::new(years, values).unwrap()
    }

    #[test]
    fn increasing_series() {
        let s = series((1..=10).map(f64::from).collect());
        let r = mann_kendall("up", &s).unwrap();
        assert_eq!(r.n, 10);
        assert_relative_eq!(r.s, 45.0);
        assert_relative_eq!(r.tau, 1.0);
        assert_eq!(r.direction, TrendDirection::Increasing);
        assert!(r.is_significant);
        assert_relative_eq!(r.slope, 1.0);
        // var(S) = 10 * 9 * 25 / 18 = 125
        assert_relative_eq!(r.z, 44.0 / 125.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn decreasing_series() {
        let s = series((1..=10).rev().map(f64::from).collect());
        let r = mann_kendall("down", &s).unwrap();
        assert_relative_eq!(r.tau, -1.0);
        assert_eq!(r.direction, TrendDirection::Decreasing);
        assert_relative_eq!(r.slope, -1.0);
    }

    #[test]
    fn constant_series() {
        let r = mann_kendall("flat", &series(vec![4.2; 10])).unwrap();
        assert_eq!(r.tau, 0.0);
        assert_eq!(r.z, 0.0);
        assert_relative_eq!(r.p_value, 1.0);
        assert_eq!(r.direction, TrendDirection::NoTrend);
        assert!(!r.is_significant);
    }

    #[test]
    fn tie_correction_reduces_variance() {
        let tied = [1.0, 1.0, 2.0, 3.0, 3.0, 3.0];
        let n = 6.0_f64;
        let untied = n * (n - 1.0) * (2.0 * n + 5.0) / 18.0;
        // Groups of 2 and 3: 2*1*9 + 3*2*11 = 84
        assert_relative_eq!(variance_s(&tied), untied - 84.0 / 18.0);
    }

    #[test]
    fn short_noisy_series_not_significant() {
        let r = mann_kendall("noise", &series(vec![3.0, 1.0, 4.0, 1.0, 5.0])).unwrap();
        assert_eq!(r.direction, TrendDirection::NoTrend);
    }

    #[test]
    fn missing_years_are_dropped() {
        let s = AnnualSeries::new(vec![2000, 2001, 2002, 2003], vec![1.0, f64::NAN, 2.0, 3.0])
            .unwrap();
        let r = mann_kendall("gappy", &s).unwrap();
        assert_eq!(r.n, 3);
        // Slopes: (2-1)/2, (3-1)/3, (3-2)/1
        assert_relative_eq!(r.slope, 2.0 / 3.0);
    }

    #[test]
    fn insufficient_data() {
        let err = mann_kendall("short", &series(vec![1.0, f64::NAN, 2.0])).unwrap_err();
        assert_eq!(
            err,
            TrendError::InsufficientData {
                id: "short".to_string(),
                required: 3,
                got: 2
            }
        );
    }

    #[test]
    fn direction_labels() {
        assert_eq!(TrendDirection::NoTrend.to_string(), "no trend");
        assert_eq!(TrendDirection::Increasing.label(), "increasing");
    }
}
