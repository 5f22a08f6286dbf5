use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use tracing::{debug, info, info_span, warn};

use cauce_calendar::SeasonTable;
use cauce_io::{LatexTable, Table, format_pm, latex_table, write_csv, write_text};
use cauce_seasonal::{
    SeasonalConfig, SeasonalSample, SeasonalStat, decompose, seasonal_changes,
};

use crate::config::{CauceConfig, SeasonalToml};
use crate::convert;

#[derive(Serialize)]
struct StatRow {
    dataset: String,
    basin: String,
    decade: String,
    season: &'static str,
    mean: f64,
    std: f64,
    n_samples: usize,
}

#[derive(Serialize)]
struct ChangeRow {
    dataset: String,
    basin: String,
    season: &'static str,
    reference_decade: String,
    decade: String,
    reference_mean: f64,
    reference_std: f64,
    mean: f64,
    std: f64,
    absolute_change: f64,
    absolute_std: f64,
    percent_change: f64,
    percent_std: f64,
}

/// Basin codes arrive as `54` or `54.0` depending on the writer.
fn basin_code(cell: &str) -> String {
    match cell.trim().parse::<f64>() {
        Ok(v) if v.fract() == 0.0 && v.abs() < 1e9 => format!("{}", v as i64),
        _ => cell.trim().to_string(),
    }
}

fn file_slug(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

fn read_samples(
    path: &Path,
    cfg: &SeasonalToml,
    config: &CauceConfig,
) -> Result<Vec<SeasonalSample>> {
    let table = Table::read_csv(path)?;
    let basins = table.str_column(&cfg.basin_column)?;
    let decades = table.str_column(&cfg.decade_column)?;
    let months = table.u8_column(&cfg.month_column)?;
    let means = table.f64_column(&cfg.mean_column)?;
    let stds = table.f64_column(&cfg.std_column)?;

    let mut samples = Vec::with_capacity(table.len());
    for i in 0..table.len() {
        let Some(month) = months[i] else { continue };
        let code = basin_code(basins[i]);
        if cfg.named_basins_only && !config.basins.contains_key(&code) {
            continue;
        }
        samples.push(SeasonalSample {
            basin: config.basin_name(&code).to_string(),
            decade: decades[i].to_string(),
            month,
            value: means[i],
            std: stds[i],
        });
    }
    debug!(rows = table.len(), samples = samples.len(), "seasonal samples");
    Ok(samples)
}

/// Change rows of one dataset. Rows that cannot be computed are logged
/// with their keys and left out.
fn change_rows(dataset: &str, stats: &[SeasonalStat], reference: &str) -> Vec<ChangeRow> {
    let mut rows = Vec::new();
    for result in seasonal_changes(stats, reference) {
        match result {
            Ok(c) => rows.push(ChangeRow {
                dataset: dataset.to_string(),
                basin: c.basin,
                season: c.season.label(),
                reference_decade: c.reference_decade,
                decade: c.decade,
                reference_mean: c.reference_mean,
                reference_std: c.reference_std,
                mean: c.mean,
                std: c.std,
                absolute_change: c.absolute_change,
                absolute_std: c.absolute_std,
                percent_change: c.percent_change,
                percent_std: c.percent_std,
            }),
            Err(e) => warn!(dataset, error = %e, "seasonal change skipped"),
        }
    }
    rows
}

/// Run the seasonal decomposition.
pub fn run(config: &CauceConfig, output: &Path) -> Result<()> {
    let cfg = config
        .seasonal
        .as_ref()
        .ok_or_else(|| anyhow!("no [seasonal] section in config"))?;
    let seasonal_cfg: SeasonalConfig = convert::build_seasonal_config(&cfg.combination)?;
    let seasons = SeasonTable::standard();

    let mut stat_rows = Vec::new();
    let mut all_changes = Vec::new();
    for dataset in &cfg.datasets {
        let _span = info_span!("seasonal", dataset = %dataset.label).entered();
        let samples = match read_samples(&dataset.path, cfg, config)
            .with_context(|| format!("failed to read {}", dataset.path.display()))
        {
            Ok(samples) => samples,
            Err(e) => {
                warn!(error = %format!("{e:#}"), "dataset skipped");
                continue;
            }
        };
        let stats = decompose(&samples, &seasons, &seasonal_cfg);
        let changes = change_rows(&dataset.label, &stats, &cfg.reference_decade);
        info!(stats = stats.len(), changes = changes.len(), "dataset decomposed");

        stat_rows.extend(stats.into_iter().map(|s| StatRow {
            dataset: dataset.label.clone(),
            basin: s.basin,
            decade: s.decade,
            season: s.season.label(),
            mean: s.mean,
            std: s.propagated_std,
            n_samples: s.n_samples,
        }));
        all_changes.extend(changes);
    }

    write_csv(&output.join("seasonal_stats.csv"), &stat_rows)?;
    write_csv(&output.join("seasonal_changes.csv"), &all_changes)?;

    let mut by_basin: BTreeMap<&str, Vec<&ChangeRow>> = BTreeMap::new();
    for row in &all_changes {
        by_basin.entry(row.basin.as_str()).or_default().push(row);
    }
    for (basin, rows) in &by_basin {
        let table = basin_latex(basin, &cfg.reference_decade, rows);
        write_text(
            &output.join(format!("seasonal_{}.tex", file_slug(basin))),
            &latex_table(&table),
        )?;
    }
    info!(
        stats = stat_rows.len(),
        changes = all_changes.len(),
        basins = by_basin.len(),
        output = %output.display(),
        "seasonal outputs written"
    );
    Ok(())
}

fn basin_latex(basin: &str, reference: &str, rows: &[&ChangeRow]) -> LatexTable {
    LatexTable {
        caption: format!("Seasonal runoff changes relative to {reference}, {basin}"),
        label: format!("tab:seasonal_{}", file_slug(basin)),
        headers: vec![
            "Dataset".to_string(),
            "Season".to_string(),
            "Period".to_string(),
            format!("Mean ({reference}) ± Std"),
            "Mean ± Std".to_string(),
            "Difference (%) ± Std".to_string(),
            "Absolute change ± Std".to_string(),
        ],
        rows: rows
            .iter()
            .map(|r| {
                vec![
                    r.dataset.clone(),
                    r.season.to_string(),
                    r.decade.clone(),
                    format_pm(r.reference_mean, r.reference_std, 2),
                    format_pm(r.mean, r.std, 2),
                    format_pm(r.percent_change * 100.0, r.percent_std * 100.0, 2),
                    format_pm(r.absolute_change, r.absolute_std, 2),
                ]
            })
            .collect(),
    }
}
