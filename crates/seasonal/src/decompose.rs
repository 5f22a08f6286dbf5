//! Per-decade, per-season means with combined dispersion.

use std::collections::BTreeMap;

use cauce_calendar::{Season, SeasonTable};
use cauce_stats::nan_mean;
use tracing::{debug, warn};

/// One monthly statistic of a basin within a decade.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalSample {
    pub basin: String,
    /// Upstream decade or period label, e.g. `"2030-2060"`.
    pub decade: String,
    /// Calendar month, 1..=12.
    pub month: u8,
    pub value: f64,
    /// Dispersion of `value`.
    pub std: f64,
}

/// How member standard deviations combine into a seasonal one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StdCombination {
    /// `sqrt(Σ std²) / season_len`: independent members, normalised by the
    /// number of months in the season.
    #[default]
    Propagated,
    /// Plain mean of the member standard deviations.
    Averaged,
}

/// Settings for [`decompose`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeasonalConfig {
    combination: StdCombination,
}

impl SeasonalConfig {
    pub fn with_combination(mut self, combination: StdCombination) -> Self {
        self.combination = combination;
        self
    }

    pub fn combination(&self) -> StdCombination {
        self.combination
    }
}

/// Seasonal statistic of one basin in one decade.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalStat {
    pub basin: String,
    pub decade: String,
    pub season: Season,
    /// Mean of the finite member values.
    pub mean: f64,
    pub propagated_std: f64,
    /// Number of member samples.
    pub n_samples: usize,
}

fn combine(stds: &[f64], season_len: usize, how: StdCombination) -> f64 {
    match how {
        StdCombination::Propagated => {
            let ss: f64 = stds.iter().filter(|s| s.is_finite()).map(|s| s * s).sum();
            ss.sqrt() / season_len as f64
        }
        StdCombination::Averaged => nan_mean(stds),
    }
}

/// Groups `samples` by (basin, decade, season) and summarises each group.
///
/// Samples whose month is not in `seasons` are dropped with a warning.
/// Output is ordered by basin, then decade, then season.
pub fn decompose(
    samples: &[SeasonalSample],
    seasons: &SeasonTable,
    config: &SeasonalConfig,
) -> Vec<SeasonalStat> {
    let mut groups: BTreeMap<(&str, &str, Season), (Vec<f64>, Vec<f64>)> = BTreeMap::new();
    for s in samples {
        let Ok(season) = seasons.season_of(s.month) else {
            warn!(
                basin = %s.basin,
                decade = %s.decade,
                month = s.month,
                "invalid month, sample skipped"
            );
            continue;
        };
        let entry = groups
            .entry((s.basin.as_str(), s.decade.as_str(), season))
            .or_default();
        entry.0.push(s.value);
        entry.1.push(s.std);
    }
    debug!(samples = samples.len(), groups = groups.len(), "seasonal groups");

    groups
        .into_iter()
        .map(|((basin, decade, season), (values, stds))| SeasonalStat {
            basin: basin.to_string(),
            decade: decade.to_string(),
            season,
            mean: nan_mean(&values),
            propagated_std: combine(&stds, seasons.season_len(season), config.combination),
            n_samples: values.len(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample(basin: &str, decade: &str, month: u8, value: f64, std: f64) -> SeasonalSample {
        SeasonalSample {
            basin: basin.to_string(),
            decade: decade.to_string(),
            month,
            value,
            std,
        }
    }

    #[test]
    fn propagated_std_two_members() {
        // Variances 4 and 9 in a three-month season.
        let samples = vec![
            sample("Maipo", "1980-2020", 12, 10.0, 2.0),
            sample("Maipo", "1980-2020", 1, 20.0, 3.0),
        ];
        let out = decompose(&samples, &SeasonTable::standard(), &SeasonalConfig::default());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].season, Season::Djf);
        assert_relative_eq!(out[0].mean, 15.0);
        assert_relative_eq!(out[0].propagated_std, 13.0_f64.sqrt() / 3.0);
        assert_relative_eq!(out[0].propagated_std, 1.2019, epsilon = 5e-5);
    }

    #[test]
    fn averaged_std() {
        let samples = vec![
            sample("Maipo", "2030-2060", 6, 1.0, 2.0),
            sample("Maipo", "2030-2060", 7, 1.0, 4.0),
        ];
        let cfg = SeasonalConfig::default().with_combination(StdCombination::Averaged);
        let out = decompose(&samples, &SeasonTable::standard(), &cfg);
        assert_relative_eq!(out[0].propagated_std, 3.0);
    }

    #[test]
    fn ordered_by_basin_decade_season() {
        let samples = vec![
            sample("Rapel", "1980-2020", 4, 1.0, 0.1),
            sample("Maipo", "2030-2060", 9, 1.0, 0.1),
            sample("Maipo", "1980-2020", 7, 1.0, 0.1),
            sample("Maipo", "1980-2020", 1, 1.0, 0.1),
        ];
        let out = decompose(&samples, &SeasonTable::standard(), &SeasonalConfig::default());
        let keys: Vec<_> = out
            .iter()
            .map(|s| format!("{}/{}/{}", s.basin, s.decade, s.season))
            .collect();
        assert_eq!(
            keys,
            vec![
                "Maipo/1980-2020/DJF",
                "Maipo/1980-2020/JJA",
                "Maipo/2030-2060/SON",
                "Rapel/1980-2020/MAM",
            ]
        );
    }

    #[test]
    fn missing_values_skipped() {
        let samples = vec![
            sample("Maule", "1980-2020", 3, f64::NAN, f64::NAN),
            sample("Maule", "1980-2020", 4, 6.0, 3.0),
        ];
        let out = decompose(&samples, &SeasonTable::standard(), &SeasonalConfig::default());
        assert_relative_eq!(out[0].mean, 6.0);
        assert_relative_eq!(out[0].propagated_std, 1.0);
        assert_eq!(out[0].n_samples, 2);
    }

    #[test]
    fn invalid_month_dropped() {
        let samples = vec![
            sample("Maipo", "1980-2020", 1, 10.0, 1.0),
            sample("Maipo", "1980-2020", 13, 5.0, 1.0),
            sample("Maule", "1980-2020", 6, 3.0, 1.0),
            sample("Maule", "1980-2020", 0, 7.0, 1.0),
        ];
        let out = decompose(&samples, &SeasonTable::standard(), &SeasonalConfig::default());
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].basin, "Maipo");
        assert_relative_eq!(out[0].mean, 10.0);
        assert_eq!(out[0].n_samples, 1);
        assert_eq!(out[1].season, Season::Jja);
        assert_relative_eq!(out[1].mean, 3.0);
    }
}
