use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use tracing::{info, info_span, warn};

use cauce_calendar::SeasonTable;
use cauce_io::{Table, write_csv};
use cauce_regime::{RegimeReport, RegimeSample, compare_by_season};

use crate::config::{CauceConfig, RegimeToml};
use crate::convert;

#[derive(Serialize)]
struct RegimeRow {
    dataset: String,
    season: &'static str,
    stratification: String,
    groups: String,
    group_sizes: String,
    anova_f: f64,
    anova_p: f64,
    kruskal_h: f64,
    kruskal_p: f64,
}

impl RegimeRow {
    fn new(report: RegimeReport, stratification: &str, labels: &[&str]) -> Self {
        Self {
            dataset: report.dataset,
            season: report.season.label(),
            stratification: stratification.to_string(),
            groups: labels.join("|"),
            group_sizes: report
                .group_sizes
                .iter()
                .map(usize::to_string)
                .collect::<Vec<_>>()
                .join("|"),
            anova_f: report.anova.statistic,
            anova_p: report.anova.p_value,
            kruskal_h: report.kruskal.statistic,
            kruskal_p: report.kruskal.p_value,
        }
    }
}

fn read_samples(label: &str, path: &Path, cfg: &RegimeToml) -> Result<Vec<RegimeSample>> {
    let table = Table::read_csv(path)?;
    let years = table.i32_column(&cfg.year_column)?;
    let months = table.u8_column(&cfg.month_column)?;
    let values = table.f64_column(&cfg.value_column)?;
    Ok(years
        .into_iter()
        .zip(months)
        .zip(values)
        .filter_map(|((year, month), value)| {
            Some(RegimeSample {
                dataset: label.to_string(),
                year: year?,
                month: month?,
                value,
            })
        })
        .collect())
}

/// Run the regime-stratified group tests.
pub fn run(config: &CauceConfig, output: &Path) -> Result<()> {
    let cfg = config
        .regime
        .as_ref()
        .ok_or_else(|| anyhow!("no [regime] section in config"))?;
    let intervals = convert::build_stratification(cfg)?;
    let labels = intervals.labels();
    let seasons = SeasonTable::standard();

    let _span = info_span!("regime", stratification = %cfg.stratification).entered();
    let mut samples = Vec::new();
    for dataset in &cfg.datasets {
        let rows = match read_samples(&dataset.label, &dataset.path, cfg)
            .with_context(|| format!("failed to read {}", dataset.path.display()))
        {
            Ok(rows) => rows,
            Err(e) => {
                warn!(dataset = %dataset.label, error = %format!("{e:#}"), "dataset skipped");
                continue;
            }
        };
        info!(dataset = %dataset.label, samples = rows.len(), "regime samples");
        samples.extend(rows);
    }

    let reports = compare_by_season(&samples, &seasons, &intervals, &labels);
    let rows: Vec<RegimeRow> = reports
        .into_iter()
        .map(|r| RegimeRow::new(r, &cfg.stratification, &labels))
        .collect();
    write_csv(&output.join("regime_tests.csv"), &rows)?;
    info!(tests = rows.len(), output = %output.display(), "regime outputs written");
    Ok(())
}
