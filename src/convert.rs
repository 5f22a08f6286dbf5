//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Result, bail};

use cauce_anomaly::GroupField;
use cauce_calendar::{Period, PeriodRole};
use cauce_io::{GridReaderConfig, TimeAxis};
use cauce_regime::{IntervalTable, RegimeInterval};
use cauce_seasonal::{SeasonalConfig, StdCombination};
use cauce_series::{AggregatorConfig, AnomalyPipeline, SpatialDims, UnitConversion, VariableKind};

use crate::config::{RegimeToml, SourceToml};

/// Parses a variable kind name into the corresponding enum variant.
pub fn parse_kind(s: &str) -> Result<VariableKind> {
    match s.to_lowercase().as_str() {
        "temperature" | "tas" => Ok(VariableKind::Temperature),
        "precipitation" | "pr" => Ok(VariableKind::Precipitation),
        "runoff" => Ok(VariableKind::Runoff),
        other => bail!("unknown variable kind: {other:?}"),
    }
}

/// Parses a unit conversion name into the corresponding enum variant.
pub fn parse_conversion(s: &str) -> Result<UnitConversion> {
    match s.to_lowercase().as_str() {
        "none" => Ok(UnitConversion::None),
        "kelvin_to_celsius" => Ok(UnitConversion::KelvinToCelsius),
        "monthly_flux_to_depth" => Ok(UnitConversion::MonthlyFluxToDepth),
        other => bail!("unknown unit conversion: {other:?}"),
    }
}

/// Parses a cohort grouping field name.
pub fn parse_group_field(s: &str) -> Result<GroupField> {
    match s.to_lowercase().as_str() {
        "basin" => Ok(GroupField::Basin),
        "scenario" => Ok(GroupField::Scenario),
        "model" => Ok(GroupField::Model),
        "bias_correction" => Ok(GroupField::BiasCorrection),
        "variable" => Ok(GroupField::Variable),
        other => bail!("unknown grouping field: {other:?}"),
    }
}

/// Parses the seasonal standard deviation combination rule.
pub fn parse_combination(s: &str) -> Result<StdCombination> {
    match s.to_lowercase().as_str() {
        "propagated" => Ok(StdCombination::Propagated),
        "averaged" => Ok(StdCombination::Averaged),
        other => bail!("unknown std combination: {other:?}"),
    }
}

/// Builds the interval table named by `[regime].stratification`.
pub fn build_stratification(cfg: &RegimeToml) -> Result<IntervalTable> {
    match cfg.stratification.to_lowercase().as_str() {
        "enso" => Ok(IntervalTable::enso()),
        "megadrought" => Ok(IntervalTable::megadrought()),
        "custom" => {
            if cfg.intervals.is_empty() {
                bail!("custom stratification needs at least one [[regime.intervals]]");
            }
            let intervals = cfg
                .intervals
                .iter()
                .map(|i| RegimeInterval {
                    label: i.label.clone(),
                    first_year: i.years[0],
                    last_year: i.years[1],
                })
                .collect();
            Ok(IntervalTable::new(intervals, cfg.default_label.clone())?)
        }
        other => bail!("unknown stratification: {other:?}"),
    }
}

/// Builds a whole-year [`Period`] from `[first, last]`.
pub fn build_period(role: PeriodRole, years: [i32; 2]) -> Result<Period> {
    Ok(Period::years(role, years[0], years[1])?)
}

/// Builds a [`GridReaderConfig`] for one side of an anomaly.
pub fn build_reader_config(source: &SourceToml) -> Result<GridReaderConfig> {
    let mut cfg = GridReaderConfig::default().with_variables(vec![source.variable.clone()]);
    if let Some(ref t) = source.time_var {
        cfg = cfg.with_time_var(t);
    }
    if let Some([year, month]) = source.monthly_from {
        let Ok(month) = u8::try_from(month) else {
            bail!("monthly_from month out of range: {month}");
        };
        cfg = cfg.with_time_axis(TimeAxis::MonthlyFrom { year, month });
    }
    cfg.validate()?;
    Ok(cfg)
}

/// Builds the extraction pipeline for one side of an anomaly.
pub fn build_pipeline(
    kind: VariableKind,
    source: &SourceToml,
    remove_outliers: bool,
    ddof: usize,
) -> Result<AnomalyPipeline> {
    let defaults = SpatialDims::default();
    let spatial = SpatialDims::new(
        source
            .lat_dims
            .clone()
            .unwrap_or_else(|| defaults.lat_aliases().to_vec()),
        source
            .lon_dims
            .clone()
            .unwrap_or_else(|| defaults.lon_aliases().to_vec()),
    );
    let pipeline = AnomalyPipeline::new(&source.variable, kind)
        .with_conversion(parse_conversion(&source.conversion)?)
        .with_outlier_removal(remove_outliers)
        .with_spatial_dims(spatial)
        .with_aggregator(AggregatorConfig::default().with_ddof(ddof));
    pipeline.validate()?;
    Ok(pipeline)
}

/// Builds a [`SeasonalConfig`] from the combination rule name.
pub fn build_seasonal_config(combination: &str) -> Result<SeasonalConfig> {
    Ok(SeasonalConfig::default().with_combination(parse_combination(combination)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        assert_eq!(parse_kind("Temperature").unwrap(), VariableKind::Temperature);
        assert_eq!(parse_kind("pr").unwrap(), VariableKind::Precipitation);
        assert!(parse_kind("wind").is_err());
    }

    #[test]
    fn conversions() {
        assert_eq!(
            parse_conversion("monthly_flux_to_depth").unwrap(),
            UnitConversion::MonthlyFluxToDepth
        );
        assert!(parse_conversion("fahrenheit").is_err());
    }

    #[test]
    fn group_fields() {
        let fields: Vec<GroupField> = ["basin", "scenario", "bias_correction"]
            .iter()
            .map(|s| parse_group_field(s).unwrap())
            .collect();
        assert_eq!(
            fields,
            vec![
                GroupField::Basin,
                GroupField::Scenario,
                GroupField::BiasCorrection
            ]
        );
    }

    #[test]
    fn reader_config_relabel() {
        let source = SourceToml {
            variable: "pr".to_string(),
            conversion: "none".to_string(),
            time_var: None,
            monthly_from: Some([1980, 1]),
            lat_dims: None,
            lon_dims: None,
        };
        let cfg = build_reader_config(&source).unwrap();
        assert_eq!(
            cfg.time_axis(),
            TimeAxis::MonthlyFrom {
                year: 1980,
                month: 1
            }
        );
    }

    #[test]
    fn reader_config_bad_month() {
        let source = SourceToml {
            variable: "pr".to_string(),
            conversion: "none".to_string(),
            time_var: None,
            monthly_from: Some([1980, 13]),
            lat_dims: None,
            lon_dims: None,
        };
        assert!(build_reader_config(&source).is_err());
    }

    #[test]
    fn inverted_period_rejected() {
        assert!(build_period(PeriodRole::Baseline, [2010, 1980]).is_err());
    }

    fn regime(text: &str) -> RegimeToml {
        toml::from_str(text).unwrap()
    }

    #[test]
    fn named_stratifications() {
        let enso = build_stratification(&regime(r#"stratification = "ENSO""#)).unwrap();
        assert_eq!(enso, IntervalTable::enso());
        assert!(build_stratification(&regime(r#"stratification = "pdo""#)).is_err());
    }

    #[test]
    fn custom_stratification() {
        let table = build_stratification(&regime(
            r#"
            stratification = "custom"
            default_label = "other"
            intervals = [
                { label = "wet", years = [1980, 1999] },
                { label = "dry", years = [2000, 2020] },
            ]
            "#,
        ))
        .unwrap();
        assert_eq!(table.classify(1990), Some("wet"));
        assert_eq!(table.classify(2010), Some("dry"));
        assert_eq!(table.classify(2050), Some("other"));
        assert_eq!(table.labels(), vec!["wet", "dry", "other"]);
    }

    #[test]
    fn custom_stratification_rejects_bad_input() {
        assert!(build_stratification(&regime(r#"stratification = "custom""#)).is_err());
        let reversed = regime(
            r#"
            stratification = "custom"
            intervals = [{ label = "wet", years = [2000, 1990] }]
            "#,
        );
        assert!(build_stratification(&reversed).is_err());
    }
}
