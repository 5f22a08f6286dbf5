//! Decomposition followed by change tables over several basins.

use approx::assert_relative_eq;
use cauce_calendar::{Season, SeasonTable};
use cauce_seasonal::{SeasonalConfig, SeasonalSample, decompose, seasonal_changes};

fn samples(basin: &str, decade: &str, level: f64) -> Vec<SeasonalSample> {
    (1..=12)
        .map(|month| SeasonalSample {
            basin: basin.to_string(),
            decade: decade.to_string(),
            month,
            value: level * f64::from(month),
            std: 1.0,
        })
        .collect()
}

#[test]
fn full_year_yields_four_seasons_per_decade() {
    let mut all = samples("Maipo", "1980-2020", 2.0);
    all.extend(samples("Maipo", "2030-2060", 1.0));
    let stats = decompose(&all, &SeasonTable::standard(), &SeasonalConfig::default());
    assert_eq!(stats.len(), 8);
    for s in &stats {
        // Three unit stds in a three-month season.
        assert_relative_eq!(s.propagated_std, 3.0_f64.sqrt() / 3.0);
    }

    let djf = &stats[0];
    assert_eq!(djf.season, Season::Djf);
    assert_relative_eq!(djf.mean, 2.0 * (12.0 + 1.0 + 2.0) / 3.0);

    let changes: Vec<_> = seasonal_changes(&stats, "1980-2020")
        .into_iter()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(changes.len(), 4);
    for c in &changes {
        assert_relative_eq!(c.percent_change, -0.5, epsilon = 1e-12);
    }
}

#[test]
fn custom_season_table() {
    let wet_dry = SeasonTable::new(&[
        (Season::Djf, &[12, 1, 2, 3]),
        (Season::Mam, &[4, 5]),
        (Season::Jja, &[6, 7, 8, 9]),
        (Season::Son, &[10, 11]),
    ])
    .unwrap();
    let stats = decompose(
        &samples("Rapel", "1980-2020", 1.0),
        &wet_dry,
        &SeasonalConfig::default(),
    );
    assert_relative_eq!(stats[0].propagated_std, 2.0 / 4.0);
    assert_relative_eq!(stats[1].propagated_std, 2.0_f64.sqrt() / 2.0);
}
