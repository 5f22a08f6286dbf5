//! Gridded NetCDF reader configuration and orchestration.

use std::path::Path;

use cauce_calendar::month_starts;
use cauce_series::{Grid, GriddedDataset};
use tracing::{debug, info};

use crate::error::IoError;
use crate::netcdf_read;

/// How the time axis of a gridded file is labelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeAxis {
    /// Decode the CF `units`/`calendar` attributes of the time variable.
    #[default]
    Decode,
    /// Ignore the stored values and label steps as consecutive months
    /// starting at `year`-`month`.
    MonthlyFrom {
        /// First year.
        year: i32,
        /// First month, 1..=12.
        month: u8,
    },
}

/// Configuration for reading a gridded NetCDF file.
///
/// The [`Default`] implementation decodes a CF time variable called
/// `"time"` and loads every 3-D variable.
#[derive(Debug, Clone, Default)]
pub struct GridReaderConfig {
    /// Name of the time variable and dimension.
    time_var: Option<String>,
    /// Labelling of the time axis.
    time_axis: TimeAxis,
    /// Variables to load; `None` loads every 3-D variable.
    variables: Option<Vec<String>>,
}

impl GridReaderConfig {
    /// Set the time variable name.
    pub fn with_time_var(mut self, name: impl Into<String>) -> Self {
        self.time_var = Some(name.into());
        self
    }

    /// Set how the time axis is labelled.
    pub fn with_time_axis(mut self, axis: TimeAxis) -> Self {
        self.time_axis = axis;
        self
    }

    /// Restrict loading to the named variables.
    pub fn with_variables(mut self, names: Vec<String>) -> Self {
        self.variables = Some(names);
        self
    }

    pub fn time_var(&self) -> &str {
        self.time_var.as_deref().unwrap_or("time")
    }

    pub fn time_axis(&self) -> TimeAxis {
        self.time_axis
    }

    /// Validate that the configuration is internally consistent.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] if a relabelling month is outside
    /// 1..=12 or the variable list is empty.
    pub fn validate(&self) -> Result<(), IoError> {
        let mut problems = Vec::new();
        if let TimeAxis::MonthlyFrom { month, .. } = self.time_axis
            && !(1..=12).contains(&month)
        {
            problems.push(format!("relabel month must be 1..=12, got {month}"));
        }
        if matches!(&self.variables, Some(v) if v.is_empty()) {
            problems.push("variable list must not be empty".to_string());
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(IoError::Validation {
                count: problems.len(),
                details: problems.join("; "),
            })
        }
    }
}

/// Read the 3-D variables of a NetCDF file into a [`GriddedDataset`].
///
/// `_FillValue` and `missing_value` sentinels become `NaN`. Variables
/// with other ranks (coordinates, bounds) are skipped.
///
/// # Errors
///
/// Returns [`IoError`] on a missing file, NetCDF failures, an undecodable
/// time axis or an invalid configuration.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn read_gridded(path: &Path, config: &GridReaderConfig) -> Result<GriddedDataset, IoError> {
    config.validate()?;
    let file = netcdf_read::open_file(path)?;
    let time_var = config.time_var();

    // -- Time ---------------------------------------------------------------

    let dates = match config.time_axis {
        TimeAxis::Decode => {
            let offsets = netcdf_read::read_1d_f64(&file, time_var)?;
            let units = netcdf_read::read_time_units(&file, time_var)?;
            netcdf_read::time_offsets_to_dates(&units, &offsets)?
        }
        TimeAxis::MonthlyFrom { year, month } => {
            let nt = file
                .dimension(time_var)
                .map(|d| d.len())
                .ok_or_else(|| IoError::InvalidTime {
                    reason: format!("time dimension '{time_var}' not found"),
                })?;
            debug!(year, month, nt, "relabelling time axis as monthly steps");
            month_starts(year, month, nt)?
        }
    };

    // -- 3-D variables ------------------------------------------------------

    let mut dataset = GriddedDataset::new(dates);
    let mut n_loaded = 0usize;
    for var in file.variables() {
        let name = var.name();
        if let Some(wanted) = &config.variables
            && !wanted.contains(&name)
        {
            continue;
        }
        let dims = var.dimensions();
        if dims.len() != 3 {
            continue;
        }
        let dim_names = [dims[0].name(), dims[1].name(), dims[2].name()];
        let shape = [dims[0].len(), dims[1].len(), dims[2].len()];

        let mut data = var.get_values::<f64, _>(..)?;
        let masked = netcdf_read::mask_fill_values(&var, &mut data);
        let mut grid = Grid::new(dim_names, shape, data)?;
        if let Some(units) = netcdf_read::string_attribute(&var, "units") {
            grid = grid.with_units(units);
        }
        debug!(variable = %name, ?shape, masked, "variable loaded");
        dataset.insert(name, grid);
        n_loaded += 1;
    }

    info!(
        variables = n_loaded,
        steps = dataset.dates().len(),
        "gridded dataset read"
    );
    Ok(dataset)
}
