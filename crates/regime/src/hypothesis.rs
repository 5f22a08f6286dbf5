//! One-way ANOVA and Kruskal-Wallis tests across independent groups.

use cauce_stats::{average_ranks, finite_values, mean, tie_counts};
use statrs::distribution::{ChiSquared, ContinuousCDF, FisherSnedecor};

use crate::error::RegimeError;

/// Statistic and p-value of a group-difference test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestOutcome {
    pub statistic: f64,
    pub p_value: f64,
}

impl TestOutcome {
    fn undefined() -> Self {
        Self {
            statistic: f64::NAN,
            p_value: f64::NAN,
        }
    }
}

/// Finite values of each group, checking there are at least two non-empty
/// groups and more samples than groups.
fn clean_groups(groups: &[&[f64]]) -> Result<(Vec<Vec<f64>>, usize), RegimeError> {
    if groups.len() < 2 {
        return Err(RegimeError::TooFewGroups { got: groups.len() });
    }
    let clean: Vec<Vec<f64>> = groups.iter().map(|g| finite_values(g)).collect();
    if let Some(index) = clean.iter().position(Vec::is_empty) {
        return Err(RegimeError::EmptyGroup { index });
    }
    let n: usize = clean.iter().map(Vec::len).sum();
    if n <= clean.len() {
        return Err(RegimeError::InsufficientSamples {
            samples: n,
            groups: clean.len(),
        });
    }
    Ok((clean, n))
}

/// One-way ANOVA F test on the finite values of each group.
///
/// Without within-group variation the statistic is infinite (p = 0) if the
/// group means differ, and undefined (`NaN`) if they do not.
///
/// # Errors
///
/// Returns [`RegimeError::TooFewGroups`], [`RegimeError::EmptyGroup`] or
/// [`RegimeError::InsufficientSamples`] for unusable input.
pub fn one_way_anova(groups: &[&[f64]]) -> Result<TestOutcome, RegimeError> {
    let (groups, n) = clean_groups(groups)?;
    let k = groups.len();
    let grand_mean = groups.iter().flatten().sum::<f64>() / n as f64;

    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for g in &groups {
        let m = mean(g);
        ss_between += g.len() as f64 * (m - grand_mean).powi(2);
        ss_within += g.iter().map(|v| (v - m).powi(2)).sum::<f64>();
    }

    let df_between = (k - 1) as f64;
    let df_within = (n - k) as f64;
    if ss_within == 0.0 {
        return Ok(if ss_between > 0.0 {
            TestOutcome {
                statistic: f64::INFINITY,
                p_value: 0.0,
            }
        } else {
            TestOutcome::undefined()
        });
    }

    let f = (ss_between / df_between) / (ss_within / df_within);
    let dist = FisherSnedecor::new(df_between, df_within).map_err(|e| RegimeError::Distribution {
        reason: e.to_string(),
    })?;
    Ok(TestOutcome {
        statistic: f,
        p_value: 1.0 - dist.cdf(f),
    })
}

/// Kruskal-Wallis H test with tie correction on the finite values of each
/// group.
///
/// If every value is tied the statistic is undefined (`NaN`).
///
/// # Errors
///
/// Returns [`RegimeError::TooFewGroups`], [`RegimeError::EmptyGroup`] or
/// [`RegimeError::InsufficientSamples`] for unusable input.
pub fn kruskal_wallis(groups: &[&[f64]]) -> Result<TestOutcome, RegimeError> {
    let (groups, n) = clean_groups(groups)?;
    let k = groups.len();
    let pooled: Vec<f64> = groups.iter().flatten().copied().collect();
    let ranks = average_ranks(&pooled);

    let mut offset = 0;
    let mut h = 0.0;
    for g in &groups {
        let r: f64 = ranks[offset..offset + g.len()].iter().sum();
        h += r * r / g.len() as f64;
        offset += g.len();
    }
    let nf = n as f64;
    h = 12.0 / (nf * (nf + 1.0)) * h - 3.0 * (nf + 1.0);

    let ties: f64 = tie_counts(&pooled)
        .into_iter()
        .map(|t| {
            let t = t as f64;
            t * t * t - t
        })
        .sum();
    let correction = 1.0 - ties / (nf * nf * nf - nf);
    if correction == 0.0 {
        return Ok(TestOutcome::undefined());
    }
    h /= correction;

    let dist = ChiSquared::new((k - 1) as f64).map_err(|e| RegimeError::Distribution {
        reason: e.to_string(),
    })?;
    Ok(TestOutcome {
        statistic: h,
        p_value: 1.0 - dist.cdf(h),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn anova_known_values() {
        // Group means 2, 5, 8; grand mean 5.
        // SSB = 3 * (9 + 0 + 9) = 54, SSW = 3 * 2 = 6, F = (54 / 2) / (6 / 6) = 27.
        let a = [1.0, 2.0, 3.0];
        let b = [4.0, 5.0, 6.0];
        let c = [7.0, 8.0, 9.0];
        let r = one_way_anova(&[&a, &b, &c]).unwrap();
        assert_relative_eq!(r.statistic, 27.0, epsilon = 1e-12);
        assert!(r.p_value < 0.01);
    }

    #[test]
    fn anova_identical_groups() {
        let a = [1.0, 2.0, 3.0];
        let r = one_way_anova(&[&a, &a]).unwrap();
        assert_relative_eq!(r.statistic, 0.0);
        assert_relative_eq!(r.p_value, 1.0);
    }

    #[test]
    fn anova_without_within_variation() {
        let r = one_way_anova(&[&[1.0, 1.0], &[2.0, 2.0]]).unwrap();
        assert!(r.statistic.is_infinite());
        assert_eq!(r.p_value, 0.0);

        let r = one_way_anova(&[&[1.0, 1.0], &[1.0, 1.0]]).unwrap();
        assert!(r.statistic.is_nan());
    }

    #[test]
    fn kruskal_separated_groups() {
        // Ranks 1..=9; rank sums 6, 15, 24.
        // H = 12 / 90 * (36 + 225 + 576) / 3 - 30 = 7.2
        let a = [1.0, 2.0, 3.0];
        let b = [4.0, 5.0, 6.0];
        let c = [7.0, 8.0, 9.0];
        let r = kruskal_wallis(&[&a, &b, &c]).unwrap();
        assert_relative_eq!(r.statistic, 7.2, epsilon = 1e-12);
        // Chi-squared survival with 2 df is exp(-H / 2).
        assert_relative_eq!(r.p_value, (-3.6_f64).exp(), epsilon = 1e-9);
    }

    #[test]
    fn kruskal_tie_correction() {
        // Pooled [1, 1, 2, 3]: ranks 1.5, 1.5, 3, 4.
        // Uncorrected H = 12/20 * (9/2 + 49/2) - 15 = 2.4; C = 1 - 6/60 = 0.9.
        let r = kruskal_wallis(&[&[1.0, 1.0], &[2.0, 3.0]]).unwrap();
        assert_relative_eq!(r.statistic, 2.4 / 0.9, epsilon = 1e-12);
    }

    #[test]
    fn kruskal_all_tied() {
        let r = kruskal_wallis(&[&[5.0, 5.0], &[5.0, 5.0]]).unwrap();
        assert!(r.statistic.is_nan());
        assert!(r.p_value.is_nan());
    }

    #[test]
    fn nan_values_ignored() {
        let with_nan = one_way_anova(&[&[1.0, f64::NAN, 2.0], &[3.0, 4.0]]).unwrap();
        let without = one_way_anova(&[&[1.0, 2.0], &[3.0, 4.0]]).unwrap();
        assert_eq!(with_nan, without);
    }

    #[test]
    fn unusable_input() {
        assert_eq!(
            one_way_anova(&[&[1.0, 2.0]]).unwrap_err(),
            RegimeError::TooFewGroups { got: 1 }
        );
        assert_eq!(
            kruskal_wallis(&[&[1.0, 2.0], &[f64::NAN]]).unwrap_err(),
            RegimeError::EmptyGroup { index: 1 }
        );
        assert!(matches!(
            one_way_anova(&[&[1.0], &[2.0]]),
            Err(RegimeError::InsufficientSamples { .. })
        ));
    }
}
