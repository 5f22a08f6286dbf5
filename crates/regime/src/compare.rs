//! Season-by-season comparison of regime groups.

use std::collections::BTreeMap;

use cauce_calendar::{Season, SeasonTable};
use tracing::{debug, warn};

use crate::error::RegimeError;
use crate::hypothesis::{TestOutcome, kruskal_wallis, one_way_anova};
use crate::interval::IntervalTable;

/// Minimum finite samples per group for a comparison to run.
pub const MIN_GROUP_SIZE: usize = 2;

/// Both group-difference tests on one set of groups.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupComparison {
    pub anova: TestOutcome,
    pub kruskal: TestOutcome,
}

/// Runs ANOVA and Kruskal-Wallis when at least two groups are given and
/// every group has at least two finite samples. Otherwise returns
/// `Ok(None)`.
///
/// # Errors
///
/// Propagates test errors.
pub fn compare_groups(groups: &[&[f64]]) -> Result<Option<GroupComparison>, RegimeError> {
    let sizes: Vec<usize> = groups
        .iter()
        .map(|g| g.iter().filter(|v| v.is_finite()).count())
        .collect();
    if groups.len() < 2 || sizes.iter().any(|&n| n < MIN_GROUP_SIZE) {
        debug!(?sizes, "comparison skipped");
        return Ok(None);
    }
    Ok(Some(GroupComparison {
        anova: one_way_anova(groups)?,
        kruskal: kruskal_wallis(groups)?,
    }))
}

/// One observation of a dataset, tagged with its date.
#[derive(Debug, Clone, PartialEq)]
pub struct RegimeSample {
    pub dataset: String,
    pub year: i32,
    pub month: u8,
    pub value: f64,
}

/// Test results for one (dataset, season) stratification.
#[derive(Debug, Clone, PartialEq)]
pub struct RegimeReport {
    pub dataset: String,
    pub season: Season,
    /// Finite samples per label, in label order.
    pub group_sizes: Vec<usize>,
    pub anova: TestOutcome,
    pub kruskal: TestOutcome,
}

/// Splits `samples` by dataset and season, groups each split by the
/// regime label of its year and compares the groups for `labels`.
///
/// Samples with a month outside the season table and splits whose groups
/// are too small or whose tests fail are left out with a log line. Reports
/// are ordered by dataset, then season.
pub fn compare_by_season(
    samples: &[RegimeSample],
    seasons: &SeasonTable,
    table: &IntervalTable,
    labels: &[&str],
) -> Vec<RegimeReport> {
    let mut splits: BTreeMap<(&str, Season), Vec<Vec<f64>>> = BTreeMap::new();
    for s in samples {
        let Ok(season) = seasons.season_of(s.month) else {
            warn!(
                dataset = %s.dataset,
                year = s.year,
                month = s.month,
                "invalid month, sample skipped"
            );
            continue;
        };
        let Some(label) = table.classify(s.year) else {
            continue;
        };
        let Some(slot) = labels.iter().position(|l| *l == label) else {
            continue;
        };
        let groups = splits
            .entry((s.dataset.as_str(), season))
            .or_insert_with(|| vec![Vec::new(); labels.len()]);
        groups[slot].push(s.value);
    }

    let mut reports = Vec::new();
    for ((dataset, season), groups) in splits {
        let views: Vec<&[f64]> = groups.iter().map(Vec::as_slice).collect();
        let cmp = match compare_groups(&views) {
            Ok(Some(cmp)) => cmp,
            Ok(None) => {
                debug!(dataset, season = %season, "too few samples per regime");
                continue;
            }
            Err(e) => {
                warn!(dataset, season = %season, error = %e, "regime comparison failed");
                continue;
            }
        };
        reports.push(RegimeReport {
            dataset: dataset.to_string(),
            season,
            group_sizes: groups
                .iter()
                .map(|g| g.iter().filter(|v| v.is_finite()).count())
                .collect(),
            anova: cmp.anova,
            kruskal: cmp.kruskal,
        });
    }
    reports
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_sample_group_is_skipped() {
        let a = [1.0, 2.0, 3.0];
        let b = [4.0];
        assert_eq!(compare_groups(&[&a, &b]).unwrap(), None);
    }

    #[test]
    fn single_group_is_skipped() {
        assert_eq!(compare_groups(&[&[1.0, 2.0, 3.0]]).unwrap(), None);
    }

    #[test]
    fn nan_does_not_count_towards_size() {
        assert_eq!(
            compare_groups(&[&[1.0, 2.0], &[3.0, f64::NAN]]).unwrap(),
            None
        );
    }

    #[test]
    fn runs_both_tests() {
        let cmp = compare_groups(&[&[1.0, 2.0, 3.0], &[7.0, 8.0, 9.0]])
            .unwrap()
            .unwrap();
        assert!(cmp.anova.p_value < 0.05);
        assert!(cmp.kruskal.statistic > 0.0);
    }
}
