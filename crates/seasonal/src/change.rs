//! Change of seasonal statistics relative to a reference decade.

use std::collections::BTreeMap;

use cauce_calendar::Season;
use tracing::warn;

use crate::decompose::SeasonalStat;
use crate::error::SeasonalError;

/// Change of one (basin, season) between the reference decade and another.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalChange {
    pub basin: String,
    pub season: Season,
    pub reference_decade: String,
    pub decade: String,
    pub reference_mean: f64,
    pub reference_std: f64,
    pub mean: f64,
    pub std: f64,
    pub absolute_change: f64,
    /// `sqrt(reference_std² + std²)`.
    pub absolute_std: f64,
    /// Fraction of the reference mean.
    pub percent_change: f64,
    pub percent_std: f64,
}

/// Joins every non-reference row of `stats` with the reference row of the
/// same basin and season.
///
/// Rows whose reference is missing are skipped with a warning. Each
/// remaining row carries its own result, so a zero reference mean
/// ([`SeasonalError::DivisionByZeroBaseline`]) fails only that row.
pub fn seasonal_changes(
    stats: &[SeasonalStat],
    reference_decade: &str,
) -> Vec<Result<SeasonalChange, SeasonalError>> {
    let reference: BTreeMap<(&str, Season), &SeasonalStat> = stats
        .iter()
        .filter(|s| s.decade == reference_decade)
        .map(|s| ((s.basin.as_str(), s.season), s))
        .collect();

    let mut changes = Vec::new();
    for s in stats.iter().filter(|s| s.decade != reference_decade) {
        let Some(r) = reference.get(&(s.basin.as_str(), s.season)) else {
            warn!(
                basin = %s.basin,
                season = %s.season,
                decade = %s.decade,
                reference_decade,
                "no reference row, skipping"
            );
            continue;
        };
        if r.mean == 0.0 {
            changes.push(Err(SeasonalError::DivisionByZeroBaseline {
                context: format!(
                    "basin={}, season={}, decade={reference_decade}",
                    s.basin, s.season
                ),
            }));
            continue;
        }
        let absolute_change = s.mean - r.mean;
        let absolute_std = r.propagated_std.hypot(s.propagated_std);
        changes.push(Ok(SeasonalChange {
            basin: s.basin.clone(),
            season: s.season,
            reference_decade: reference_decade.to_string(),
            decade: s.decade.clone(),
            reference_mean: r.mean,
            reference_std: r.propagated_std,
            mean: s.mean,
            std: s.propagated_std,
            absolute_change,
            absolute_std,
            percent_change: absolute_change / r.mean,
            percent_std: absolute_std / r.mean,
        }));
    }
    changes
}
