//! End-to-end runs of the extraction pipeline on synthetic grids.

use approx::assert_relative_eq;
use cauce_calendar::{Period, PeriodRole, month_starts};
use cauce_series::{
    AnomalyPipeline, Grid, GriddedDataset, Resampling, SpatialDims, UnitConversion, VariableKind,
    annual, extract, filter_outliers,
};

fn constant_grid(start_year: i32, years: usize, value: f64, cells: usize) -> GriddedDataset {
    let n = years * 12;
    let dates = month_starts(start_year, 1, n).unwrap();
    let grid = Grid::new(
        ["time".into(), "lat".into(), "lon".into()],
        [n, 1, cells],
        vec![value; n * cells],
    )
    .unwrap();
    GriddedDataset::new(dates).with_variable("tas", grid)
}

#[test]
fn baseline_and_projection_means() {
    let baseline = constant_grid(1980, 31, 283.15, 4);
    let projection = constant_grid(2030, 31, 284.65, 4);
    let pipeline = AnomalyPipeline::new("tas", VariableKind::Temperature)
        .with_conversion(UnitConversion::KelvinToCelsius)
        .with_outlier_removal(true);

    let b = pipeline
        .run(&baseline, &Period::years(PeriodRole::Baseline, 1980, 2010).unwrap())
        .unwrap();
    let p = pipeline
        .run(&projection, &Period::years(PeriodRole::Projection, 2030, 2060).unwrap())
        .unwrap();

    assert_relative_eq!(b.mean, 10.0, epsilon = 1e-9);
    assert_relative_eq!(p.mean, 11.5, epsilon = 1e-9);
    assert_eq!(b.n_years, 31);
    assert_relative_eq!(p.std, 0.0, epsilon = 1e-9);
}

#[test]
fn flux_summed_per_year() {
    let n = 12;
    let dates = month_starts(2030, 1, n).unwrap();
    let grid = Grid::new(["time".into(), "y".into(), "x".into()], [n, 1, 1], vec![1.0; n])
        .unwrap()
        .with_units("kg m-2 s-1");
    let ds = GriddedDataset::new(dates).with_variable("pr", grid);

    let series = extract(&ds, "pr", UnitConversion::MonthlyFluxToDepth, &SpatialDims::default())
        .unwrap();
    assert_relative_eq!(series.values()[0], 2_678_400.0);

    // 2030 is not a leap year.
    let yearly = annual(&series, Resampling::AnnualSum);
    assert_relative_eq!(yearly.values()[0], 365.0 * 86_400.0);
}

#[test]
fn screening_is_a_fixed_point() {
    let dates = month_starts(2000, 1, 24).unwrap();
    let values: Vec<f64> = (0..24)
        .map(|i| match i {
            3 => 90.0,
            17 => -60.0,
            20 => 25.0,
            _ => (i % 5) as f64,
        })
        .collect();
    let grid = Grid::new(["time".into(), "lat".into(), "lon".into()], [24, 1, 1], values)
        .unwrap();
    let ds = GriddedDataset::new(dates).with_variable("q", grid);
    let series = extract(&ds, "q", UnitConversion::None, &SpatialDims::default()).unwrap();

    let once = filter_outliers(&series);
    let twice = filter_outliers(&once);
    assert_eq!(once.len(), series.len());
    for (a, b) in once.values().iter().zip(twice.values()) {
        assert!((a.is_nan() && b.is_nan()) || a == b);
    }
    assert!(once.values()[3].is_nan());
    assert!(once.values()[17].is_nan());
}
