use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level Cauce configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CauceConfig {
    /// Directory every command writes into.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Basin code -> display name.
    #[serde(default)]
    pub basins: BTreeMap<String, String>,

    #[serde(default)]
    pub anomaly: Option<AnomalyToml>,
    #[serde(default)]
    pub trend: Option<TrendToml>,
    #[serde(default)]
    pub compare: Option<CompareToml>,
    #[serde(default)]
    pub seasonal: Option<SeasonalToml>,
    #[serde(default)]
    pub regime: Option<RegimeToml>,
    #[serde(default)]
    pub losses: Option<LossesToml>,
}

impl CauceConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let toml_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&toml_str).context("failed to parse TOML config")
    }

    /// Display name of a basin code, or the code itself.
    pub fn basin_name<'a>(&'a self, code: &'a str) -> &'a str {
        self.basins.get(code).map_or(code, String::as_str)
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("results")
}
fn default_true() -> bool {
    true
}
fn default_none() -> String {
    "none".to_string()
}
fn default_year_column() -> String {
    "Year".to_string()
}
fn default_month_column() -> String {
    "Month".to_string()
}

/// A labelled input file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LabelledPath {
    pub label: String,
    pub path: PathBuf,
}

// -- anomaly -----------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnomalyToml {
    /// `"temperature"`, `"precipitation"` or `"runoff"`.
    pub kind: String,
    #[serde(default = "default_baseline_period")]
    pub baseline_period: [i32; 2],
    #[serde(default = "default_projection_period")]
    pub projection_period: [i32; 2],
    /// Tukey-fence screening of projection series. Baselines are not screened.
    #[serde(default = "default_true")]
    pub remove_outliers: bool,
    /// Degrees of freedom subtracted in period standard deviations.
    #[serde(default)]
    pub ddof: usize,
    #[serde(default = "default_group_by")]
    pub group_by: Vec<String>,
    #[serde(default = "default_true")]
    pub parallel: bool,
    /// Variable read from baseline files.
    pub baseline: SourceToml,
    /// Variable read from projection files.
    pub projection: SourceToml,
    #[serde(default)]
    pub baselines: Vec<BasinPath>,
    #[serde(default)]
    pub runs: Vec<RunToml>,
}

fn default_baseline_period() -> [i32; 2] {
    [1980, 2010]
}
fn default_projection_period() -> [i32; 2] {
    [2030, 2060]
}
fn default_group_by() -> Vec<String> {
    vec!["basin".to_string(), "scenario".to_string()]
}

/// How one side of the anomaly reads its gridded variable.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceToml {
    pub variable: String,
    /// `"none"`, `"kelvin_to_celsius"` or `"monthly_flux_to_depth"`.
    #[serde(default = "default_none")]
    pub conversion: String,
    #[serde(default)]
    pub time_var: Option<String>,
    /// Relabel the time axis as months from `[year, month]`.
    #[serde(default)]
    pub monthly_from: Option<[i32; 2]>,
    #[serde(default)]
    pub lat_dims: Option<Vec<String>>,
    #[serde(default)]
    pub lon_dims: Option<Vec<String>>,
}

/// A file belonging to one basin.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BasinPath {
    pub basin: String,
    pub path: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunToml {
    pub basin: String,
    pub scenario: String,
    pub model: String,
    #[serde(default = "default_none")]
    pub bias_correction: String,
    pub path: PathBuf,
}

// -- trend -------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrendToml {
    #[serde(default = "default_year_column")]
    pub year_column: String,
    /// Parsed for the year when `year_column` is absent.
    #[serde(default = "default_date_column")]
    pub date_column: String,
    /// Columns summed into the runoff value. When unset the first column
    /// whose name contains one of `value_patterns` is used, and failing
    /// that every column whose name contains one of `sum_patterns` is
    /// summed.
    #[serde(default)]
    pub value_columns: Option<Vec<String>>,
    #[serde(default = "default_value_patterns")]
    pub value_patterns: Vec<String>,
    #[serde(default = "default_sum_patterns")]
    pub sum_patterns: Vec<String>,
    #[serde(default = "default_true")]
    pub clip_negative: bool,
    #[serde(default)]
    pub tables: Vec<LabelledPath>,
}

fn default_date_column() -> String {
    "Fecha".to_string()
}
fn default_value_patterns() -> Vec<String> {
    vec!["Runoff".to_string(), "Mean".to_string()]
}
fn default_sum_patterns() -> Vec<String> {
    vec!["RIO".to_string()]
}

// -- compare -----------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompareToml {
    #[serde(default = "default_initial_window")]
    pub initial_window: [i32; 2],
    #[serde(default = "default_final_window")]
    pub final_window: [i32; 2],
    /// Year column; the first column when unset.
    #[serde(default)]
    pub year_column: Option<String>,
    pub models: Vec<String>,
    #[serde(default)]
    pub basins: Vec<BasinPath>,
}

fn default_initial_window() -> [i32; 2] {
    [1980, 1989]
}
fn default_final_window() -> [i32; 2] {
    [2051, 2060]
}

// -- seasonal ----------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeasonalToml {
    #[serde(default = "default_basin_column")]
    pub basin_column: String,
    #[serde(default = "default_decade_column")]
    pub decade_column: String,
    #[serde(default = "default_month_column")]
    pub month_column: String,
    #[serde(default = "default_mean_column")]
    pub mean_column: String,
    #[serde(default = "default_std_column")]
    pub std_column: String,
    #[serde(default = "default_reference_decade")]
    pub reference_decade: String,
    /// `"propagated"` or `"averaged"`.
    #[serde(default = "default_combination")]
    pub combination: String,
    /// Keep only basins listed in `[basins]`.
    #[serde(default = "default_true")]
    pub named_basins_only: bool,
    #[serde(default)]
    pub datasets: Vec<LabelledPath>,
}

fn default_basin_column() -> String {
    "COD_CUEN".to_string()
}
fn default_decade_column() -> String {
    "Decade".to_string()
}
fn default_mean_column() -> String {
    "Mean".to_string()
}
fn default_std_column() -> String {
    "Std".to_string()
}
fn default_reference_decade() -> String {
    "1980-2020".to_string()
}
fn default_combination() -> String {
    "propagated".to_string()
}

// -- regime ------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegimeToml {
    /// `"enso"`, `"megadrought"` or `"custom"`.
    pub stratification: String,
    /// Year ranges used by the `"custom"` stratification, first match wins.
    #[serde(default)]
    pub intervals: Vec<IntervalToml>,
    /// Label of years outside every custom interval; unset drops them.
    #[serde(default)]
    pub default_label: Option<String>,
    #[serde(default = "default_year_column")]
    pub year_column: String,
    #[serde(default = "default_month_column")]
    pub month_column: String,
    #[serde(default = "default_regime_value_column")]
    pub value_column: String,
    #[serde(default)]
    pub datasets: Vec<LabelledPath>,
}

/// A labelled closed year range.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IntervalToml {
    pub label: String,
    pub years: [i32; 2],
}

fn default_regime_value_column() -> String {
    "Mean_Runoff".to_string()
}

// -- losses ------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LossesToml {
    #[serde(default = "default_scenario_column")]
    pub scenario_column: String,
    #[serde(default = "default_model_column")]
    pub model_column: String,
    #[serde(default = "default_basin_name_column")]
    pub basin_column: String,
    #[serde(default = "default_initial_column")]
    pub initial_column: String,
    #[serde(default = "default_remaining_column")]
    pub remaining_column: String,
    /// One table per measure, e.g. `surface` and `volume`.
    #[serde(default)]
    pub tables: Vec<LabelledPath>,
}

fn default_scenario_column() -> String {
    "scenario".to_string()
}
fn default_model_column() -> String {
    "model".to_string()
}
fn default_basin_name_column() -> String {
    "basin".to_string()
}
fn default_initial_column() -> String {
    "initial".to_string()
}
fn default_remaining_column() -> String {
    "remaining".to_string()
}
