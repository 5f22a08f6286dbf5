//! Spatial reduction of a gridded variable to a basin series.

use cauce_calendar::seconds_in_month;
use chrono::Datelike;
use tracing::{debug, warn};

use crate::error::SeriesError;
use crate::grid::{GriddedDataset, SpatialDims};
use crate::series::{Series, Unit};

/// Kelvin offset of the Celsius scale.
pub const KELVIN_OFFSET: f64 = 273.15;

/// Unit conversion applied after spatial averaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitConversion {
    /// Keep source units.
    #[default]
    None,
    /// Subtract 273.15.
    KelvinToCelsius,
    /// Multiply each monthly rate by the seconds in its calendar month.
    MonthlyFluxToDepth,
}

impl UnitConversion {
    /// The unit a series ends up in after this conversion.
    fn target_unit(self, source: Option<&str>) -> Unit {
        match self {
            Self::None => source.map(Unit::from_cf).unwrap_or(Unit::Other(String::new())),
            Self::KelvinToCelsius => Unit::Celsius,
            Self::MonthlyFluxToDepth => Unit::Depth,
        }
    }

    /// The source unit this conversion expects, if it constrains one.
    fn expected_source(self) -> Option<Unit> {
        match self {
            Self::None => None,
            Self::KelvinToCelsius => Some(Unit::Kelvin),
            Self::MonthlyFluxToDepth => Some(Unit::FluxPerSecond),
        }
    }
}

/// Reduces variable `name` of `dataset` to a series by an unweighted mean
/// over all finite cells of each time step, then applies `conversion`.
///
/// Cells are not area-weighted. A time step with no finite cell yields
/// `NaN`.
///
/// # Errors
///
/// - [`SeriesError::MissingVariable`] if `name` is not in the dataset.
/// - [`SeriesError::DimensionMismatch`] if the variable has no latitude or
///   longitude dimension, or its time length differs from the dataset's
///   time axis.
/// - [`SeriesError::Calendar`] if a date cannot be converted.
pub fn extract(
    dataset: &GriddedDataset,
    name: &str,
    conversion: UnitConversion,
    spatial: &SpatialDims,
) -> Result<Series, SeriesError> {
    let grid = dataset.get(name).ok_or_else(|| SeriesError::MissingVariable {
        name: name.to_string(),
        available: dataset.names().collect::<Vec<_>>().join(", "),
    })?;

    let mismatch = |reason: String| SeriesError::DimensionMismatch {
        name: name.to_string(),
        reason,
    };

    let (lat_axis, lon_axis) = spatial.locate(grid);
    let lat_axis = lat_axis.ok_or_else(|| {
        mismatch(format!(
            "no latitude dimension among {:?} (accepted: {:?})",
            grid.dims(),
            spatial.lat_aliases()
        ))
    })?;
    let lon_axis = lon_axis.ok_or_else(|| {
        mismatch(format!(
            "no longitude dimension among {:?} (accepted: {:?})",
            grid.dims(),
            spatial.lon_aliases()
        ))
    })?;
    if lat_axis == lon_axis {
        return Err(mismatch(format!(
            "dimension '{}' matches both latitude and longitude",
            grid.dims()[lat_axis]
        )));
    }
    let time_axis = 3 - lat_axis - lon_axis;

    let shape = grid.shape();
    let nt = shape[time_axis];
    let dates = dataset.dates();
    if nt != dates.len() {
        return Err(mismatch(format!(
            "time length {nt} does not match time axis of length {}",
            dates.len()
        )));
    }

    if let (Some(expected), Some(units)) = (conversion.expected_source(), grid.units()) {
        let found = Unit::from_cf(units);
        if found != expected {
            warn!(
                variable = name,
                units,
                expected = %expected,
                "source units differ from those expected by the conversion"
            );
        }
    }

    // Row-major strides.
    let strides = [shape[1] * shape[2], shape[2], 1];
    let stride_t = strides[time_axis];
    let mut sums = vec![0.0; nt];
    let mut counts = vec![0usize; nt];
    for (idx, &v) in grid.data().iter().enumerate() {
        if v.is_finite() {
            let t = (idx / stride_t) % nt;
            sums[t] += v;
            counts[t] += 1;
        }
    }

    let mut values = Vec::with_capacity(nt);
    for (t, date) in dates.iter().enumerate() {
        let mean = if counts[t] == 0 {
            f64::NAN
        } else {
            sums[t] / counts[t] as f64
        };
        let converted = match conversion {
            UnitConversion::None => mean,
            UnitConversion::KelvinToCelsius => mean - KELVIN_OFFSET,
            UnitConversion::MonthlyFluxToDepth => {
                mean * f64::from(seconds_in_month(date.year(), date.month() as u8)?)
            }
        };
        values.push(converted);
    }

    debug!(
        variable = name,
        steps = nt,
        cells = shape[lat_axis] * shape[lon_axis],
        "extracted basin series"
    );

    Series::new(dates.to_vec(), values, conversion.target_unit(grid.units()))
}
