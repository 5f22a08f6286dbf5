use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use serde::Serialize;
use tracing::{debug, info, info_span, warn};

use cauce_io::{Table, write_csv};
use cauce_series::{YearSummary, annual_means, summarize_by_year};
use cauce_stats::{describe, nan_mean, nan_sum};
use cauce_trend::mann_kendall;

use crate::config::{CauceConfig, TrendToml};

#[derive(Serialize)]
struct AnnualRow<'a> {
    label: &'a str,
    year: i32,
    mean: f64,
    std: f64,
    count: usize,
}

#[derive(Serialize)]
struct TrendRow<'a> {
    label: &'a str,
    n: usize,
    s: f64,
    z: f64,
    tau: f64,
    p_value: f64,
    sen_slope: f64,
    trend: &'static str,
    significant: bool,
}

#[derive(Serialize)]
struct ComparisonRow<'a> {
    label: &'a str,
    years: usize,
    mean: f64,
    sd: f64,
    min: f64,
    max: f64,
}

#[derive(Serialize)]
struct VariabilityRow<'a> {
    label: &'a str,
    mean_std: f64,
}

fn matching<'a>(headers: &'a [String], patterns: &[String]) -> Vec<&'a String> {
    headers
        .iter()
        .filter(|h| patterns.iter().any(|p| h.contains(p.as_str())))
        .collect()
}

/// Runoff value of each row: the configured columns summed, the first
/// column matching a value pattern, or the sum of the columns matching a
/// sum pattern.
fn runoff_values(table: &Table, cfg: &TrendToml) -> Result<Vec<f64>> {
    let columns: Vec<String> = match &cfg.value_columns {
        Some(cols) if !cols.is_empty() => cols.clone(),
        Some(_) => bail!("value_columns must not be empty"),
        None => {
            let headers = table.headers();
            if let Some(found) = matching(headers, &cfg.value_patterns).first() {
                vec![(*found).clone()]
            } else {
                let summed = matching(headers, &cfg.sum_patterns);
                if summed.is_empty() {
                    bail!(
                        "no column matches any of {:?} or {:?}; set value_columns",
                        cfg.value_patterns,
                        cfg.sum_patterns
                    );
                }
                debug!(columns = ?summed, "summing matched columns");
                summed.into_iter().cloned().collect()
            }
        }
    };

    let data = columns
        .iter()
        .map(|c| table.f64_column(c))
        .collect::<Result<Vec<_>, _>>()?;
    if let [single] = data.as_slice() {
        return Ok(single.clone());
    }
    Ok((0..table.len())
        .map(|i| {
            let row: Vec<f64> = data.iter().map(|col| col[i]).collect();
            nan_sum(&row)
        })
        .collect())
}

fn year_summaries(path: &Path, cfg: &TrendToml) -> Result<Vec<YearSummary>> {
    let table = Table::read_csv(path)?;
    let years = table.year_column(&cfg.year_column, &cfg.date_column)?;
    let values = runoff_values(&table, cfg)?;
    Ok(summarize_by_year(&years, &values, cfg.clip_negative)?)
}

/// Run the annual trend analysis.
pub fn run(config: &CauceConfig, output: &Path) -> Result<()> {
    let cfg = config
        .trend
        .as_ref()
        .ok_or_else(|| anyhow!("no [trend] section in config"))?;

    let mut annual_rows = Vec::new();
    let mut trend_rows = Vec::new();
    let mut comparison_rows = Vec::new();
    let mut variability_rows = Vec::new();

    for table in &cfg.tables {
        let label = table.label.as_str();
        let _span = info_span!("trend", label).entered();
        let summaries = match year_summaries(&table.path, cfg)
            .with_context(|| format!("failed to summarise {}", table.path.display()))
        {
            Ok(summaries) => summaries,
            Err(e) => {
                warn!(label, error = %format!("{e:#}"), "table skipped");
                continue;
            }
        };
        info!(years = summaries.len(), "annual summary");

        annual_rows.extend(summaries.iter().map(|s| AnnualRow {
            label,
            year: s.year,
            mean: s.mean,
            std: s.std,
            count: s.count,
        }));

        let annual = match annual_means(&summaries) {
            Ok(annual) => annual,
            Err(e) => {
                warn!(label, error = %e, "annual series rejected");
                continue;
            }
        };
        match mann_kendall(label, &annual) {
            Ok(t) => trend_rows.push(TrendRow {
                label,
                n: t.n,
                s: t.s,
                z: t.z,
                tau: t.tau,
                p_value: t.p_value,
                sen_slope: t.slope,
                trend: t.direction.label(),
                significant: t.is_significant,
            }),
            Err(e) => warn!(label, error = %e, "trend test skipped"),
        }

        if let Some(d) = describe(annual.values()) {
            comparison_rows.push(ComparisonRow {
                label,
                years: d.count,
                mean: d.mean,
                sd: d.sd,
                min: d.min,
                max: d.max,
            });
        }
        let stds: Vec<f64> = summaries.iter().map(|s| s.std).collect();
        variability_rows.push(VariabilityRow {
            label,
            mean_std: nan_mean(&stds),
        });
    }

    write_csv(&output.join("annual_summary.csv"), &annual_rows)?;
    write_csv(&output.join("trends.csv"), &trend_rows)?;
    write_csv(&output.join("model_comparison.csv"), &comparison_rows)?;
    write_csv(&output.join("variability.csv"), &variability_rows)?;
    info!(
        tables = cfg.tables.len(),
        trends = trend_rows.len(),
        output = %output.display(),
        "trend outputs written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tempfile::tempdir;

    fn trend_cfg(value_columns: Option<Vec<String>>) -> TrendToml {
        let mut cfg: TrendToml = toml::from_str("").unwrap();
        cfg.value_columns = value_columns;
        cfg
    }

    #[test]
    fn detects_runoff_column_and_year_from_date() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("runoff.csv");
        std::fs::write(
            &path,
            "Fecha,Runoff_Total,Other\n1990-01-01,2.0,9\n1990-02-01,-1.0,9\n1991-01-01,4.0,9\n",
        )
        .unwrap();

        let summaries = year_summaries(&path, &trend_cfg(None)).unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].year, 1990);
        // -1 is clipped to 0
        assert_relative_eq!(summaries[0].mean, 1.0);
        assert_relative_eq!(summaries[1].mean, 4.0);
    }

    #[test]
    fn sums_configured_columns() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bh5.csv");
        std::fs::write(&path, "Year,RIO_A,RIO_B\n2000,1.0,2.0\n2000,3.0,\n").unwrap();

        let cfg = trend_cfg(Some(vec!["RIO_A".to_string(), "RIO_B".to_string()]));
        let summaries = year_summaries(&path, &cfg).unwrap();
        assert_eq!(summaries.len(), 1);
        assert_relative_eq!(summaries[0].mean, 3.0);
    }

    #[test]
    fn falls_back_to_summing_river_columns() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bh5.csv");
        std::fs::write(
            &path,
            "Year,RIO_MAIPO,RIO_COLORADO,Temp\n2000,1.0,2.0,30\n2001,4.0,,30\n",
        )
        .unwrap();

        let summaries = year_summaries(&path, &trend_cfg(None)).unwrap();
        assert_eq!(summaries.len(), 2);
        assert_relative_eq!(summaries[0].mean, 3.0);
        assert_relative_eq!(summaries[1].mean, 4.0);
    }

    #[test]
    fn missing_value_column_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "Year,Q\n2000,1.0\n").unwrap();
        assert!(year_summaries(&path, &trend_cfg(None)).is_err());
    }

    #[test]
    fn unreadable_table_does_not_stop_the_batch() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("good.csv");
        let mut csv = String::from("Year,Runoff\n");
        for (i, y) in (1990..2000).enumerate() {
            csv.push_str(&format!("{y},{}\n", i + 1));
        }
        std::fs::write(&good, csv).unwrap();

        let text = format!(
            r#"
            [trend]
            [[trend.tables]]
            label = "missing"
            path = "{missing}"
            [[trend.tables]]
            label = "good"
            path = "{good}"
            "#,
            missing = dir.path().join("absent.csv").display(),
            good = good.display(),
        );
        let config: CauceConfig = toml::from_str(&text).unwrap();
        let out = dir.path().join("out");
        run(&config, &out).unwrap();

        let trends = std::fs::read_to_string(out.join("trends.csv")).unwrap();
        assert!(trends.contains("good"));
        assert!(!trends.contains("missing"));
    }
}
