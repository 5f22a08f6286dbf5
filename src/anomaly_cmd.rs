use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, info_span, warn};

use cauce_anomaly::{AnomalyKey, AnomalyRecord, CohortSummary, aggregate_cohorts, compute_anomaly};
use cauce_calendar::{Period, PeriodRole};
use cauce_io::{
    GridReaderConfig, LatexTable, format_pm, latex_table, read_gridded, write_csv, write_json,
    write_records, write_text,
};
use cauce_series::{AnomalyPipeline, PeriodStats, VariableKind};

use crate::config::{AnomalyToml, BasinPath, CauceConfig, RunToml};
use crate::convert;

#[derive(Serialize)]
struct BaselineFailure {
    basin: String,
    error: String,
}

#[derive(Serialize)]
struct RunFailure {
    basin: String,
    scenario: String,
    model: String,
    bias_correction: String,
    error: String,
}

#[derive(Serialize)]
struct AnomalySummary {
    variable: String,
    baseline_period: String,
    projection_period: String,
    runs: usize,
    succeeded: usize,
    failed_baselines: Vec<BaselineFailure>,
    failed_runs: Vec<RunFailure>,
}

/// One side of the anomaly: where the file is read and how it is reduced.
struct Side {
    reader: GridReaderConfig,
    pipeline: AnomalyPipeline,
    period: Period,
}

impl Side {
    fn stats(&self, path: &Path) -> Result<PeriodStats> {
        let dataset = read_gridded(path, &self.reader)
            .with_context(|| format!("failed to read NetCDF: {}", path.display()))?;
        Ok(self.pipeline.run(&dataset, &self.period)?)
    }
}

fn map_items<T: Sync, R: Send>(
    items: &[T],
    parallel: bool,
    f: impl Fn(&T) -> R + Sync + Send,
) -> Vec<R> {
    if parallel {
        items.par_iter().map(f).collect()
    } else {
        items.iter().map(f).collect()
    }
}

/// Builds the baseline and projection sides. Only projections are
/// screened for outliers.
fn build_sides(cfg: &AnomalyToml, kind: VariableKind) -> Result<(Side, Side)> {
    let baseline = Side {
        reader: convert::build_reader_config(&cfg.baseline)?,
        pipeline: convert::build_pipeline(kind, &cfg.baseline, false, cfg.ddof)?,
        period: convert::build_period(PeriodRole::Baseline, cfg.baseline_period)?,
    };
    let projection = Side {
        reader: convert::build_reader_config(&cfg.projection)?,
        pipeline: convert::build_pipeline(kind, &cfg.projection, cfg.remove_outliers, cfg.ddof)?,
        period: convert::build_period(PeriodRole::Projection, cfg.projection_period)?,
    };
    Ok((baseline, projection))
}

/// Run the anomaly batch.
pub fn run(config: &CauceConfig, output: &Path) -> Result<()> {
    let cfg = config
        .anomaly
        .as_ref()
        .ok_or_else(|| anyhow!("no [anomaly] section in config"))?;
    if cfg.runs.is_empty() {
        bail!("[anomaly] has no runs");
    }

    let kind = convert::parse_kind(&cfg.kind)?;
    let fields = cfg
        .group_by
        .iter()
        .map(|f| convert::parse_group_field(f))
        .collect::<Result<Vec<_>>>()?;
    let (baseline, projection) = build_sides(cfg, kind)?;

    let _span = info_span!("anomaly", variable = kind.label()).entered();
    info!(
        baselines = cfg.baselines.len(),
        runs = cfg.runs.len(),
        parallel = cfg.parallel,
        "starting anomaly batch"
    );

    // -- Baselines -----------------------------------------------------------

    let baseline_results = map_items(&cfg.baselines, cfg.parallel, |b: &BasinPath| {
        baseline.stats(&b.path)
    });
    let mut baselines: BTreeMap<String, PeriodStats> = BTreeMap::new();
    let mut failed_baselines = Vec::new();
    for (b, result) in cfg.baselines.iter().zip(baseline_results) {
        match result {
            Ok(stats) => {
                baselines.insert(b.basin.clone(), stats);
            }
            Err(e) => {
                warn!(
                    basin = %b.basin,
                    variable = kind.label(),
                    error = %format!("{e:#}"),
                    "baseline failed"
                );
                failed_baselines.push(BaselineFailure {
                    basin: b.basin.clone(),
                    error: format!("{e:#}"),
                });
            }
        }
    }

    // -- Projection runs -----------------------------------------------------

    let run_one = |run: &RunToml| -> Result<AnomalyRecord> {
        let base = baselines
            .get(&run.basin)
            .ok_or_else(|| anyhow!("no baseline for basin {}", run.basin))?;
        let proj = projection.stats(&run.path)?;
        let key = AnomalyKey::new(&run.basin, &run.scenario, &run.model, &run.bias_correction);
        Ok(compute_anomaly(&key, kind, base, &proj)?)
    };
    let run_results = map_items(&cfg.runs, cfg.parallel, run_one);

    let mut records = Vec::new();
    let mut failed_runs = Vec::new();
    for (run, result) in cfg.runs.iter().zip(run_results) {
        match result {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!(
                    basin = %run.basin,
                    scenario = %run.scenario,
                    model = %run.model,
                    variable = kind.label(),
                    error = %format!("{e:#}"),
                    "run failed"
                );
                failed_runs.push(RunFailure {
                    basin: run.basin.clone(),
                    scenario: run.scenario.clone(),
                    model: run.model.clone(),
                    bias_correction: run.bias_correction.clone(),
                    error: format!("{e:#}"),
                });
            }
        }
    }
    records.sort_by(|a, b| a.key().cmp(&b.key()));
    info!(
        succeeded = records.len(),
        failed = failed_runs.len(),
        "anomaly runs finished"
    );

    // -- Output --------------------------------------------------------------

    let rendered: Vec<AnomalyRecord> = records
        .iter()
        .map(|r| AnomalyRecord {
            basin: config.basin_name(&r.basin).to_string(),
            ..r.clone()
        })
        .collect();
    let label = kind.label();
    write_csv(&output.join(format!("anomalies_{label}_full.csv")), &rendered)?;

    let cohorts = aggregate_cohorts(&rendered, &fields)?;
    let key_headers: Vec<String> = fields.iter().map(|f| f.label().to_string()).collect();
    let header: Vec<String> = key_headers
        .iter()
        .cloned()
        .chain(
            [
                "count",
                "mean_absolute_anomaly",
                "std_absolute_anomaly",
                "mean_percent_anomaly",
                "std_percent_anomaly",
            ]
            .map(String::from),
        )
        .collect();
    let rows: Vec<Vec<String>> = cohorts.iter().map(cohort_row).collect();
    write_records(&output.join(format!("anomalies_{label}_broad.csv")), &header, &rows)?;
    write_text(
        &output.join(format!("anomalies_{label}_broad.tex")),
        &latex_table(&broad_latex(cfg, label, &key_headers, &cohorts)),
    )?;

    let summary = AnomalySummary {
        variable: label.to_string(),
        baseline_period: baseline.period.label(),
        projection_period: projection.period.label(),
        runs: cfg.runs.len(),
        succeeded: records.len(),
        failed_baselines,
        failed_runs,
    };
    write_json(&output.join("anomaly_summary.json"), &summary)?;

    info!(output = %output.display(), cohorts = cohorts.len(), "anomaly outputs written");
    Ok(())
}

fn cohort_row(c: &CohortSummary) -> Vec<String> {
    let mut row = c.key.clone();
    row.push(c.count.to_string());
    row.push(c.mean_absolute_anomaly.to_string());
    row.push(c.std_absolute_anomaly.to_string());
    row.push(c.mean_percent_anomaly.to_string());
    row.push(c.std_percent_anomaly.to_string());
    row
}

fn broad_latex(
    cfg: &AnomalyToml,
    label: &str,
    key_headers: &[String],
    cohorts: &[CohortSummary],
) -> LatexTable {
    let mut headers = key_headers.to_vec();
    headers.push("Absolute anomaly".to_string());
    headers.push("Anomaly (%)".to_string());
    LatexTable {
        caption: format!(
            "{label} anomalies {}-{} relative to {}-{}",
            cfg.projection_period[0],
            cfg.projection_period[1],
            cfg.baseline_period[0],
            cfg.baseline_period[1]
        ),
        label: format!("tab:anomalies_{label}"),
        headers,
        rows: cohorts
            .iter()
            .map(|c| {
                let mut row = c.key.clone();
                row.push(format_pm(c.mean_absolute_anomaly, c.std_absolute_anomaly, 2));
                row.push(format_pm(
                    c.mean_percent_anomaly * 100.0,
                    c.std_percent_anomaly * 100.0,
                    2,
                ));
                row
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anomaly_section(extra: &str) -> AnomalyToml {
        let text = format!(
            r#"
            [anomaly]
            kind = "precipitation"
            {extra}
            baseline = {{ variable = "pr" }}
            projection = {{ variable = "pr", conversion = "monthly_flux_to_depth" }}
            "#
        );
        let cfg: CauceConfig = toml::from_str(&text).unwrap();
        cfg.anomaly.unwrap()
    }

    #[test]
    fn baseline_never_screened_for_outliers() {
        let cfg = anomaly_section("remove_outliers = true");
        let (baseline, projection) = build_sides(&cfg, VariableKind::Precipitation).unwrap();
        assert!(!baseline.pipeline.remove_outliers());
        assert!(projection.pipeline.remove_outliers());
    }

    #[test]
    fn projection_screening_can_be_disabled() {
        let cfg = anomaly_section("remove_outliers = false");
        let (baseline, projection) = build_sides(&cfg, VariableKind::Precipitation).unwrap();
        assert!(!baseline.pipeline.remove_outliers());
        assert!(!projection.pipeline.remove_outliers());
    }

    #[test]
    fn sides_carry_their_periods() {
        let cfg = anomaly_section("");
        let (baseline, projection) = build_sides(&cfg, VariableKind::Precipitation).unwrap();
        assert_eq!(baseline.period.label(), "1980-2010");
        assert_eq!(projection.period.label(), "2030-2060");
    }
}
