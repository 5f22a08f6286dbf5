use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use tracing::{info, warn};

use cauce_anomaly::{LossRecord, LossTotal, total_losses};
use cauce_io::{Table, write_csv};

use crate::config::{CauceConfig, LossesToml};

#[derive(Serialize)]
struct LossRow {
    measure: String,
    scenario: String,
    model: String,
    basins: usize,
    initial: f64,
    remaining: f64,
    loss: f64,
    loss_percent: f64,
}

impl LossRow {
    fn new(measure: &str, t: LossTotal) -> Self {
        Self {
            measure: measure.to_string(),
            scenario: t.scenario,
            model: t.model,
            basins: t.basins,
            initial: t.initial,
            remaining: t.remaining,
            loss: t.loss,
            loss_percent: t.loss_fraction * 100.0,
        }
    }
}

fn read_records(path: &Path, cfg: &LossesToml) -> Result<Vec<LossRecord>> {
    let table = Table::read_csv(path)?;
    let scenarios = table.str_column(&cfg.scenario_column)?;
    let models = table.str_column(&cfg.model_column)?;
    let basins = table.str_column(&cfg.basin_column)?;
    let initial = table.f64_column(&cfg.initial_column)?;
    let remaining = table.f64_column(&cfg.remaining_column)?;

    Ok((0..table.len())
        .map(|i| LossRecord {
            scenario: scenarios[i].to_string(),
            model: models[i].to_string(),
            basin: basins[i].to_string(),
            initial: initial[i],
            remaining: remaining[i],
        })
        .collect())
}

/// Run the glacier loss totals.
pub fn run(config: &CauceConfig, output: &Path) -> Result<()> {
    let cfg = config
        .losses
        .as_ref()
        .ok_or_else(|| anyhow!("no [losses] section in config"))?;

    let mut rows = Vec::new();
    for table in &cfg.tables {
        let totals = read_records(&table.path, cfg)
            .with_context(|| format!("failed to read {}", table.path.display()))
            .and_then(|records| {
                if records.is_empty() {
                    warn!(measure = %table.label, "loss table is empty");
                }
                Ok(total_losses(&records)?)
            });
        let totals = match totals {
            Ok(totals) => totals,
            Err(e) => {
                warn!(measure = %table.label, error = %format!("{e:#}"), "measure skipped");
                continue;
            }
        };
        info!(measure = %table.label, groups = totals.len(), "loss totals");
        rows.extend(totals.into_iter().map(|t| LossRow::new(&table.label, t)));
    }

    write_csv(&output.join("losses.csv"), &rows)?;
    info!(rows = rows.len(), output = %output.display(), "loss outputs written");
    Ok(())
}
