//! The unified extract → screen → aggregate pipeline.

use cauce_calendar::Period;
use tracing::{debug, info};

use crate::aggregate::{AggregatorConfig, PeriodStats, VariableKind, aggregate};
use crate::error::SeriesError;
use crate::extract::{UnitConversion, extract};
use crate::grid::{GriddedDataset, SpatialDims};
use crate::outlier::filter_outliers;
use crate::series::Series;

/// Configuration of one variable's path from a gridded dataset to
/// period statistics.
///
/// # Example
///
/// ```ignore
/// let pipeline = AnomalyPipeline::new("pr", VariableKind::Precipitation)
///     .with_conversion(UnitConversion::MonthlyFluxToDepth)
///     .with_outlier_removal(true);
/// let stats = pipeline.run(&dataset, &projection)?;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AnomalyPipeline {
    variable: String,
    kind: VariableKind,
    conversion: UnitConversion,
    remove_outliers: bool,
    spatial: SpatialDims,
    aggregator: AggregatorConfig,
}

impl AnomalyPipeline {
    /// Creates a pipeline for `variable` with no conversion and no
    /// outlier screening.
    pub fn new(variable: impl Into<String>, kind: VariableKind) -> Self {
        Self {
            variable: variable.into(),
            kind,
            conversion: UnitConversion::None,
            remove_outliers: false,
            spatial: SpatialDims::default(),
            aggregator: AggregatorConfig::default(),
        }
    }

    pub fn with_conversion(mut self, conversion: UnitConversion) -> Self {
        self.conversion = conversion;
        self
    }

    pub fn with_outlier_removal(mut self, enabled: bool) -> Self {
        self.remove_outliers = enabled;
        self
    }

    pub fn with_spatial_dims(mut self, spatial: SpatialDims) -> Self {
        self.spatial = spatial;
        self
    }

    pub fn with_aggregator(mut self, aggregator: AggregatorConfig) -> Self {
        self.aggregator = aggregator;
        self
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn kind(&self) -> VariableKind {
        self.kind
    }

    pub fn conversion(&self) -> UnitConversion {
        self.conversion
    }

    pub fn remove_outliers(&self) -> bool {
        self.remove_outliers
    }

    pub fn aggregator(&self) -> &AggregatorConfig {
        &self.aggregator
    }

    /// # Errors
    ///
    /// Returns [`SeriesError::InvalidConfig`] for an empty variable name or
    /// an invalid aggregator.
    pub fn validate(&self) -> Result<(), SeriesError> {
        if self.variable.trim().is_empty() {
            return Err(SeriesError::InvalidConfig {
                reason: "variable name must not be empty".to_string(),
            });
        }
        self.aggregator.validate()
    }

    /// Extracts the basin series and applies outlier screening if enabled.
    ///
    /// # Errors
    ///
    /// Propagates extraction errors.
    pub fn series(&self, dataset: &GriddedDataset) -> Result<Series, SeriesError> {
        let series = extract(dataset, &self.variable, self.conversion, &self.spatial)?;
        if !self.remove_outliers {
            return Ok(series);
        }
        let screened = filter_outliers(&series);
        debug!(
            before = series.n_valid(),
            after = screened.n_valid(),
            "outliers masked"
        );
        Ok(screened)
    }

    /// Runs the full pipeline for one period.
    ///
    /// # Errors
    ///
    /// Returns any extraction error or [`SeriesError::EmptyPeriod`].
    #[tracing::instrument(
        skip_all,
        fields(variable = %self.variable, kind = %self.kind, period = %period.label())
    )]
    pub fn run(&self, dataset: &GriddedDataset, period: &Period) -> Result<PeriodStats, SeriesError> {
        self.validate()?;
        let series = self.series(dataset)?;
        let stats = aggregate(&series, self.kind.resampling(), period, &self.aggregator)?;
        info!(
            mean = stats.mean,
            std = stats.std,
            n_years = stats.n_years,
            "period aggregated"
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use approx::assert_relative_eq;
    use cauce_calendar::PeriodRole;

    fn dataset(values: Vec<f64>) -> GriddedDataset {
        let n = values.len();
        let dates = cauce_calendar::month_starts(2000, 1, n).unwrap();
        let grid = Grid::new(["time".into(), "lat".into(), "lon".into()], [n, 1, 1], values)
            .unwrap();
        GriddedDataset::new(dates).with_variable("tas", grid)
    }

    #[test]
    fn run_kelvin_series() {
        let mut v = vec![283.15; 12];
        v.extend(vec![285.15; 12]);
        let ds = dataset(v);
        let p = Period::years(PeriodRole::Baseline, 2000, 2001).unwrap();
        let stats = AnomalyPipeline::new("tas", VariableKind::Temperature)
            .with_conversion(UnitConversion::KelvinToCelsius)
            .run(&ds, &p)
            .unwrap();
        assert_relative_eq!(stats.mean, 11.0, epsilon = 1e-9);
        assert_relative_eq!(stats.std, 1.0, epsilon = 1e-9);
        assert_eq!(stats.n_years, 2);
    }

    #[test]
    fn outlier_removal_changes_mean() {
        let mut v = vec![1.0, 2.0, 3.0, 2.0, 1.0, 2.0, 3.0, 2.0, 1.0, 2.0, 3.0, 2.0];
        v[5] = 500.0;
        let ds = dataset(v);
        let p = Period::years(PeriodRole::Baseline, 2000, 2000).unwrap();
        let raw = AnomalyPipeline::new("tas", VariableKind::Temperature)
            .run(&ds, &p)
            .unwrap();
        let clean = AnomalyPipeline::new("tas", VariableKind::Temperature)
            .with_outlier_removal(true)
            .run(&ds, &p)
            .unwrap();
        assert!(raw.mean > 40.0);
        assert_relative_eq!(clean.mean, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn empty_variable_name_rejected() {
        let ds = dataset(vec![1.0]);
        let p = Period::years(PeriodRole::Baseline, 2000, 2000).unwrap();
        let err = AnomalyPipeline::new(" ", VariableKind::Runoff)
            .run(&ds, &p)
            .unwrap_err();
        assert!(matches!(err, SeriesError::InvalidConfig { .. }));
    }
}
