//! Totals of glacier area or volume loss per scenario and model.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::AnomalyError;

/// Glacier extent of one basin in the initial and final periods.
#[derive(Debug, Clone, PartialEq)]
pub struct LossRecord {
    pub scenario: String,
    pub model: String,
    pub basin: String,
    pub initial: f64,
    pub remaining: f64,
}

/// Basin-summed loss for one (scenario, model).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LossTotal {
    pub scenario: String,
    pub model: String,
    pub basins: usize,
    pub initial: f64,
    pub remaining: f64,
    pub loss: f64,
    /// `loss / initial`, as a fraction.
    pub loss_fraction: f64,
}

/// Sums `records` per (scenario, model), sorted by that pair.
///
/// # Errors
///
/// Returns [`AnomalyError::DivisionByZeroBaseline`] if a group's initial
/// total is zero.
pub fn total_losses(records: &[LossRecord]) -> Result<Vec<LossTotal>, AnomalyError> {
    let mut groups: BTreeMap<(&str, &str), (usize, f64, f64)> = BTreeMap::new();
    for r in records {
        let entry = groups
            .entry((r.scenario.as_str(), r.model.as_str()))
            .or_insert((0, 0.0, 0.0));
        entry.0 += 1;
        entry.1 += r.initial;
        entry.2 += r.remaining;
    }

    groups
        .into_iter()
        .map(|((scenario, model), (basins, initial, remaining))| {
            if initial == 0.0 {
                return Err(AnomalyError::DivisionByZeroBaseline {
                    context: format!("scenario={scenario}, model={model}"),
                });
            }
            let loss = initial - remaining;
            Ok(LossTotal {
                scenario: scenario.to_string(),
                model: model.to_string(),
                basins,
                initial,
                remaining,
                loss,
                loss_fraction: loss / initial,
            })
        })
        .collect()
}
