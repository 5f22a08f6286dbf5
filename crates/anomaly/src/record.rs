//! Per-run anomaly records.

use std::fmt;

use cauce_series::{PeriodStats, VariableKind};
use serde::{Serialize, Serializer};

use crate::error::AnomalyError;

/// Identifies one model run for one basin.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct AnomalyKey {
    pub basin: String,
    pub scenario: String,
    pub model: String,
    pub bias_correction: String,
}

impl AnomalyKey {
    pub fn new(
        basin: impl Into<String>,
        scenario: impl Into<String>,
        model: impl Into<String>,
        bias_correction: impl Into<String>,
    ) -> Self {
        Self {
            basin: basin.into(),
            scenario: scenario.into(),
            model: model.into(),
            bias_correction: bias_correction.into(),
        }
    }
}

impl fmt::Display for AnomalyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "basin={}, scenario={}, model={}, bias_correction={}",
            self.basin, self.scenario, self.model, self.bias_correction
        )
    }
}

fn serialize_kind<S: Serializer>(kind: &VariableKind, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(kind.label())
}

/// Change of one variable between a baseline and a projection period.
///
/// Percentages are fractions of the baseline mean.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalyRecord {
    pub basin: String,
    pub scenario: String,
    pub model: String,
    pub bias_correction: String,
    #[serde(serialize_with = "serialize_kind")]
    pub variable: VariableKind,
    pub baseline_mean: f64,
    pub projection_mean: f64,
    pub absolute_anomaly: f64,
    pub percent_anomaly: f64,
    /// Projection-period standard deviation. The baseline's dispersion is
    /// not folded in.
    pub standard_deviation: f64,
    pub percent_standard_deviation: f64,
}

impl AnomalyRecord {
    pub fn key(&self) -> AnomalyKey {
        AnomalyKey::new(
            self.basin.clone(),
            self.scenario.clone(),
            self.model.clone(),
            self.bias_correction.clone(),
        )
    }
}

/// Computes the anomaly of `projection` relative to `baseline`.
///
/// # Errors
///
/// Returns [`AnomalyError::DivisionByZeroBaseline`] if the baseline mean is
/// zero.
pub fn compute_anomaly(
    key: &AnomalyKey,
    variable: VariableKind,
    baseline: &PeriodStats,
    projection: &PeriodStats,
) -> Result<AnomalyRecord, AnomalyError> {
    if baseline.mean == 0.0 {
        return Err(AnomalyError::DivisionByZeroBaseline {
            context: format!("{key}, variable={variable}"),
        });
    }
    let absolute = projection.mean - baseline.mean;
    Ok(AnomalyRecord {
        basin: key.basin.clone(),
        scenario: key.scenario.clone(),
        model: key.model.clone(),
        bias_correction: key.bias_correction.clone(),
        variable,
        baseline_mean: baseline.mean,
        projection_mean: projection.mean,
        absolute_anomaly: absolute,
        percent_anomaly: absolute / baseline.mean,
        standard_deviation: projection.std,
        percent_standard_deviation: projection.std / baseline.mean,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn stats(mean: f64, std: f64) -> PeriodStats {
        PeriodStats {
            mean,
            std,
            n_years: 31,
        }
    }

    fn key() -> AnomalyKey {
        AnomalyKey::new("057", "ssp585", "CR2MET", "QDM")
    }

    #[test]
    fn temperature_anomaly() {
        let r = compute_anomaly(
            &key(),
            VariableKind::Temperature,
            &stats(10.0, 0.3),
            &stats(11.5, 0.4),
        )
        .unwrap();
        assert_relative_eq!(r.absolute_anomaly, 1.5, epsilon = 1e-9);
        assert_relative_eq!(r.percent_anomaly, 0.15, epsilon = 1e-9);
        assert_relative_eq!(r.standard_deviation, 0.4);
        assert_relative_eq!(r.percent_standard_deviation, 0.04, epsilon = 1e-12);
        assert_eq!(r.key(), key());
    }

    #[test]
    fn percent_is_ratio_to_baseline() {
        let r = compute_anomaly(
            &key(),
            VariableKind::Precipitation,
            &stats(-812.5, 40.0),
            &stats(640.25, 55.0),
        )
        .unwrap();
        assert_relative_eq!(
            r.percent_anomaly,
            r.absolute_anomaly / -812.5,
            epsilon = 1e-9
        );
    }

    #[test]
    fn zero_baseline_is_an_error() {
        for projection in [0.0, 5.0, -3.0] {
            let err = compute_anomaly(
                &key(),
                VariableKind::Precipitation,
                &stats(0.0, 1.0),
                &stats(projection, 1.0),
            )
            .unwrap_err();
            match err {
                AnomalyError::DivisionByZeroBaseline { context } => {
                    assert!(context.contains("basin=057"));
                    assert!(context.contains("variable=precipitation"));
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }
}
