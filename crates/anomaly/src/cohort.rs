//! Grouped mean and dispersion of anomaly records ("broad" tables).

use std::collections::BTreeMap;
use std::fmt;

use cauce_stats::{mean, sd};
use tracing::debug;

use crate::error::AnomalyError;
use crate::record::AnomalyRecord;

/// A categorical field of [`AnomalyRecord`] usable as a grouping key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupField {
    Basin,
    Scenario,
    Model,
    BiasCorrection,
    Variable,
}

impl GroupField {
    pub fn label(self) -> &'static str {
        match self {
            Self::Basin => "basin",
            Self::Scenario => "scenario",
            Self::Model => "model",
            Self::BiasCorrection => "bias_correction",
            Self::Variable => "variable",
        }
    }

    /// The value of this field in `record`.
    pub fn value_of(self, record: &AnomalyRecord) -> String {
        match self {
            Self::Basin => record.basin.clone(),
            Self::Scenario => record.scenario.clone(),
            Self::Model => record.model.clone(),
            Self::BiasCorrection => record.bias_correction.clone(),
            Self::Variable => record.variable.label().to_string(),
        }
    }
}

impl fmt::Display for GroupField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Summary of the records sharing one key tuple.
#[derive(Debug, Clone, PartialEq)]
pub struct CohortSummary {
    /// Key values, in the order of the grouping fields.
    pub key: Vec<String>,
    /// Number of member records.
    pub count: usize,
    pub mean_absolute_anomaly: f64,
    /// Sample standard deviation; 0 for a single record.
    pub std_absolute_anomaly: f64,
    pub mean_percent_anomaly: f64,
    pub std_percent_anomaly: f64,
}

fn validate_fields(fields: &[GroupField]) -> Result<(), AnomalyError> {
    if fields.is_empty() {
        return Err(AnomalyError::InvalidGrouping {
            reason: "at least one grouping field is required".to_string(),
        });
    }
    for (i, f) in fields.iter().enumerate() {
        if fields[..i].contains(f) {
            return Err(AnomalyError::InvalidGrouping {
                reason: format!("field '{f}' appears more than once"),
            });
        }
    }
    Ok(())
}

/// Groups `records` by the values of `fields` and summarises each group.
///
/// Groups are returned sorted by key tuple.
///
/// # Errors
///
/// Returns [`AnomalyError::InvalidGrouping`] if `fields` is empty or
/// repeats a field.
pub fn aggregate_cohorts(
    records: &[AnomalyRecord],
    fields: &[GroupField],
) -> Result<Vec<CohortSummary>, AnomalyError> {
    validate_fields(fields)?;

    let mut groups: BTreeMap<Vec<String>, Vec<&AnomalyRecord>> = BTreeMap::new();
    for r in records {
        let key = fields.iter().map(|f| f.value_of(r)).collect();
        groups.entry(key).or_default().push(r);
    }
    debug!(records = records.len(), groups = groups.len(), "cohorts grouped");

    Ok(groups
        .into_iter()
        .map(|(key, members)| {
            let abs: Vec<f64> = members.iter().map(|r| r.absolute_anomaly).collect();
            let pct: Vec<f64> = members.iter().map(|r| r.percent_anomaly).collect();
            CohortSummary {
                key,
                count: members.len(),
                mean_absolute_anomaly: mean(&abs),
                std_absolute_anomaly: sd(&abs),
                mean_percent_anomaly: mean(&pct),
                std_percent_anomaly: sd(&pct),
            }
        })
        .collect())
}
