//! Calendar-year resampling and period statistics.

use std::fmt;

use cauce_calendar::Period;
use cauce_stats::{mean, nan_mean, nan_sum, sd_ddof};
use chrono::Datelike;

use crate::error::SeriesError;
use crate::series::Series;

/// How monthly values collapse into one value per calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resampling {
    /// Mean of the finite monthly values.
    AnnualMean,
    /// Sum of the finite monthly values.
    AnnualSum,
}

/// Physical kind of an analysed variable. Selects the resampling rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VariableKind {
    Temperature,
    Precipitation,
    Runoff,
}

impl VariableKind {
    /// Resampling rule for this kind: precipitation accumulates, the rest
    /// average.
    pub fn resampling(self) -> Resampling {
        match self {
            Self::Temperature | Self::Runoff => Resampling::AnnualMean,
            Self::Precipitation => Resampling::AnnualSum,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Precipitation => "precipitation",
            Self::Runoff => "runoff",
        }
    }
}

impl fmt::Display for VariableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One value per calendar year, years strictly increasing. `NaN` marks a
/// year without data.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnualSeries {
    years: Vec<i32>,
    values: Vec<f64>,
}

impl AnnualSeries {
    /// # Errors
    ///
    /// Returns [`SeriesError::LengthMismatch`] or
    /// [`SeriesError::UnorderedYears`].
    pub fn new(years: Vec<i32>, values: Vec<f64>) -> Result<Self, SeriesError> {
        if years.len() != values.len() {
            return Err(SeriesError::LengthMismatch {
                field: "values",
                expected: years.len(),
                got: values.len(),
            });
        }
        if let Some(w) = years.windows(2).find(|w| w[1] <= w[0]) {
            return Err(SeriesError::UnorderedYears {
                year: w[1],
                prev: w[0],
            });
        }
        Ok(Self { years, values })
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// `(year, value)` pairs with finite values, in year order.
    pub fn finite_pairs(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.years
            .iter()
            .copied()
            .zip(self.values.iter().copied())
            .filter(|(_, v)| v.is_finite())
    }

    /// Finite values of the years inside `period`.
    pub fn finite_in(&self, period: &Period) -> Vec<f64> {
        self.finite_pairs()
            .filter(|(y, _)| period.contains_year(*y))
            .map(|(_, v)| v)
            .collect()
    }
}

/// Groups `series` by calendar year and reduces each year with `rule`,
/// skipping missing months.
pub fn annual(series: &Series, rule: Resampling) -> AnnualSeries {
    let mut years = Vec::new();
    let mut values = Vec::new();
    let mut bucket: Vec<f64> = Vec::with_capacity(12);
    let mut current: Option<i32> = None;

    let reduce = |bucket: &[f64]| match rule {
        Resampling::AnnualMean => nan_mean(bucket),
        Resampling::AnnualSum => nan_sum(bucket),
    };

    for (date, value) in series.iter() {
        let year = date.year();
        if current != Some(year) {
            if let Some(y) = current {
                years.push(y);
                values.push(reduce(&bucket));
                bucket.clear();
            }
            current = Some(year);
        }
        bucket.push(value);
    }
    if let Some(y) = current {
        years.push(y);
        values.push(reduce(&bucket));
    }

    AnnualSeries { years, values }
}

/// Settings for period statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatorConfig {
    ddof: usize,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self { ddof: 0 }
    }
}

impl AggregatorConfig {
    /// Delta degrees of freedom of the period standard deviation
    /// (0 = population, 1 = sample).
    pub fn with_ddof(mut self, ddof: usize) -> Self {
        self.ddof = ddof;
        self
    }

    pub fn ddof(&self) -> usize {
        self.ddof
    }

    /// # Errors
    ///
    /// Returns [`SeriesError::InvalidConfig`] if `ddof > 1`.
    pub fn validate(&self) -> Result<(), SeriesError> {
        if self.ddof > 1 {
            return Err(SeriesError::InvalidConfig {
                reason: format!("ddof must be 0 or 1, got {}", self.ddof),
            });
        }
        Ok(())
    }
}

/// Mean and dispersion of the yearly values inside a period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodStats {
    pub mean: f64,
    pub std: f64,
    /// Number of finite yearly values used.
    pub n_years: usize,
}

/// Statistics of the finite yearly values of `annual` inside `period`.
///
/// # Errors
///
/// Returns [`SeriesError::EmptyPeriod`] if no finite yearly value lies in
/// the period.
pub fn aggregate_annual(
    annual: &AnnualSeries,
    period: &Period,
    config: &AggregatorConfig,
) -> Result<PeriodStats, SeriesError> {
    let values = annual.finite_in(period);
    if values.is_empty() {
        return Err(SeriesError::EmptyPeriod {
            period: period.label(),
        });
    }
    Ok(PeriodStats {
        mean: mean(&values),
        std: sd_ddof(&values, config.ddof),
        n_years: values.len(),
    })
}

/// Resamples `series` to years with `rule`, then summarises the years in
/// `period`.
///
/// # Errors
///
/// Returns [`SeriesError::EmptyPeriod`] if no finite yearly value lies in
/// the period.
pub fn aggregate(
    series: &Series,
    rule: Resampling,
    period: &Period,
    config: &AggregatorConfig,
) -> Result<PeriodStats, SeriesError> {
    aggregate_annual(&annual(series, rule), period, config)
}
