//! Per-year summaries of raw table rows.

use std::collections::BTreeMap;

use cauce_stats::{mean, sd};

use crate::aggregate::AnnualSeries;
use crate::error::SeriesError;

/// Mean and sample standard deviation of the rows of one year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearSummary {
    pub year: i32,
    /// `NaN` when the year has no finite value.
    pub mean: f64,
    /// Sample standard deviation; 0 for fewer than two values.
    pub std: f64,
    /// Number of finite values.
    pub count: usize,
}

/// Groups `values` by `years` and summarises each year.
///
/// Rows without a year are skipped. Non-finite values do not count. With
/// `clip_negative`, negative values are raised to 0 first.
///
/// # Errors
///
/// Returns [`SeriesError::LengthMismatch`] if the slices differ in length.
pub fn summarize_by_year(
    years: &[Option<i32>],
    values: &[f64],
    clip_negative: bool,
) -> Result<Vec<YearSummary>, SeriesError> {
    if years.len() != values.len() {
        return Err(SeriesError::LengthMismatch {
            field: "values",
            expected: years.len(),
            got: values.len(),
        });
    }

    let mut groups: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
    for (year, &value) in years.iter().zip(values) {
        let Some(year) = *year else { continue };
        let bucket = groups.entry(year).or_default();
        if value.is_finite() {
            bucket.push(if clip_negative { value.max(0.0) } else { value });
        }
    }

    Ok(groups
        .into_iter()
        .map(|(year, vals)| YearSummary {
            year,
            mean: if vals.is_empty() { f64::NAN } else { mean(&vals) },
            std: sd(&vals),
            count: vals.len(),
        })
        .collect())
}

/// The yearly means as an [`AnnualSeries`].
pub fn annual_means(summaries: &[YearSummary]) -> Result<AnnualSeries, SeriesError> {
    AnnualSeries::new(
        summaries.iter().map(|s| s.year).collect(),
        summaries.iter().map(|s| s.mean).collect(),
    )
}
