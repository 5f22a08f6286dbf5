//! Anomalies from pipeline statistics through to cohort tables.

use approx::assert_relative_eq;
use cauce_anomaly::{AnomalyKey, GroupField, aggregate_cohorts, compute_anomaly};
use cauce_calendar::{Period, PeriodRole, month_starts};
use cauce_series::{AnomalyPipeline, Grid, GriddedDataset, UnitConversion, VariableKind};

fn dataset(start_year: i32, years: usize, kelvin: f64) -> GriddedDataset {
    let n = years * 12;
    let grid = Grid::new(
        ["time".into(), "lat".into(), "lon".into()],
        [n, 2, 2],
        vec![kelvin; n * 4],
    )
    .unwrap()
    .with_units("K");
    GriddedDataset::new(month_starts(start_year, 1, n).unwrap()).with_variable("tas", grid)
}

#[test]
fn end_to_end_temperature_anomaly() {
    let pipeline = AnomalyPipeline::new("tas", VariableKind::Temperature)
        .with_conversion(UnitConversion::KelvinToCelsius);
    let baseline = pipeline
        .run(
            &dataset(1980, 31, 283.15),
            &Period::years(PeriodRole::Baseline, 1980, 2010).unwrap(),
        )
        .unwrap();
    let projection = pipeline
        .run(
            &dataset(2030, 31, 284.65),
            &Period::years(PeriodRole::Projection, 2030, 2060).unwrap(),
        )
        .unwrap();

    let key = AnomalyKey::new("057", "ssp585", "CR2MET", "QDM");
    let record = compute_anomaly(&key, VariableKind::Temperature, &baseline, &projection).unwrap();
    assert_relative_eq!(record.absolute_anomaly, 1.5, epsilon = 1e-9);
    assert_relative_eq!(record.percent_anomaly, 0.15, epsilon = 1e-9);
}

#[test]
fn broad_table_over_models() {
    let baseline = cauce_series::PeriodStats {
        mean: 800.0,
        std: 50.0,
        n_years: 31,
    };
    let records: Vec<_> = [("CR2MET", 720.0), ("CHELSA", 680.0), ("BH5", 760.0)]
        .into_iter()
        .map(|(model, mean)| {
            let projection = cauce_series::PeriodStats {
                mean,
                std: 60.0,
                n_years: 31,
            };
            compute_anomaly(
                &AnomalyKey::new("054", "ssp585", model, "QDM"),
                VariableKind::Precipitation,
                &baseline,
                &projection,
            )
            .unwrap()
        })
        .collect();

    let broad = aggregate_cohorts(&records, &[GroupField::Basin, GroupField::Scenario]).unwrap();
    assert_eq!(broad.len(), 1);
    assert_eq!(broad[0].count, 3);
    assert_relative_eq!(broad[0].mean_absolute_anomaly, -80.0, epsilon = 1e-9);
    assert_relative_eq!(broad[0].std_absolute_anomaly, 40.0, epsilon = 1e-9);
    assert_relative_eq!(broad[0].mean_percent_anomaly, -0.1, epsilon = 1e-12);
}
