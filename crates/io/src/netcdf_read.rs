//! Low-level NetCDF extraction helpers.

use std::path::Path;

use chrono::{Datelike, NaiveDate};
use netcdf::AttributeValue;

use crate::error::IoError;

/// Open a NetCDF file at `path`, returning [`IoError::FileNotFound`] if the
/// path does not exist on disk.
pub(crate) fn open_file(path: &Path) -> Result<netcdf::File, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(netcdf::open(path)?)
}

/// Read a 1-D `f64` variable.
pub(crate) fn read_1d_f64(file: &netcdf::File, name: &str) -> Result<Vec<f64>, IoError> {
    let var = file.variable(name).ok_or_else(|| IoError::InvalidTime {
        reason: format!("time variable '{name}' not found"),
    })?;
    Ok(var.get_values::<f64, _>(..)?)
}

/// First value of a numeric attribute, widened to `f64`.
pub(crate) fn numeric_attribute(var: &netcdf::Variable<'_>, name: &str) -> Option<f64> {
    match var.attribute_value(name)?.ok()? {
        AttributeValue::Double(v) => Some(v),
        AttributeValue::Float(v) => Some(f64::from(v)),
        AttributeValue::Int(v) => Some(f64::from(v)),
        AttributeValue::Short(v) => Some(f64::from(v)),
        AttributeValue::Doubles(v) => v.first().copied(),
        AttributeValue::Floats(v) => v.first().map(|&x| f64::from(x)),
        _ => None,
    }
}

/// A string attribute, if present.
pub(crate) fn string_attribute(var: &netcdf::Variable<'_>, name: &str) -> Option<String> {
    match var.attribute_value(name)?.ok()? {
        AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}

/// Replace `_FillValue` and `missing_value` sentinels with `NaN`.
pub(crate) fn mask_fill_values(var: &netcdf::Variable<'_>, data: &mut [f64]) -> usize {
    let sentinels: Vec<f64> = ["_FillValue", "missing_value"]
        .iter()
        .filter_map(|a| numeric_attribute(var, a))
        .collect();
    let mut masked = 0;
    for v in data.iter_mut() {
        if sentinels.contains(v) {
            *v = f64::NAN;
            masked += 1;
        }
    }
    masked
}

/// Step of a CF time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimeStep {
    Days,
    Hours,
}

/// Calendar of a CF time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimeCalendar {
    Gregorian,
    NoLeap,
}

/// Parsed `units` and `calendar` attributes of a time variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TimeUnits {
    pub step: TimeStep,
    pub base: NaiveDate,
    pub calendar: TimeCalendar,
}

/// Parse CF-convention strings like `"days since YYYY-MM-DD"` or
/// `"hours since YYYY-M-D HH:MM:SS"`.
pub(crate) fn parse_time_units(units: &str, calendar: &str) -> Result<TimeUnits, IoError> {
    let parts: Vec<&str> = units.split_whitespace().collect();
    if parts.len() < 3 || parts[1] != "since" {
        return Err(IoError::InvalidTime {
            reason: format!("unexpected time units format: '{units}'"),
        });
    }
    let step = match parts[0] {
        "days" | "day" | "d" => TimeStep::Days,
        "hours" | "hour" | "h" => TimeStep::Hours,
        other => {
            return Err(IoError::InvalidTime {
                reason: format!("unsupported time step '{other}'"),
            });
        }
    };

    // Date portion only; a trailing "T00:00:00" or time-of-day is ignored.
    let date_str = parts[2].split('T').next().unwrap_or(parts[2]);
    let base = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
        IoError::InvalidTime {
            reason: format!("failed to parse base date '{date_str}': {e}"),
        }
    })?;

    let calendar = match calendar.to_ascii_lowercase().as_str() {
        "standard" | "gregorian" | "proleptic_gregorian" => TimeCalendar::Gregorian,
        "noleap" | "365_day" => TimeCalendar::NoLeap,
        other => {
            return Err(IoError::InvalidTime {
                reason: format!("unsupported calendar '{other}'"),
            });
        }
    };

    Ok(TimeUnits {
        step,
        base,
        calendar,
    })
}

/// Read the `units` and optional `calendar` attributes of `time_var`.
///
/// The calendar defaults to `"standard"`.
pub(crate) fn read_time_units(file: &netcdf::File, time_var: &str) -> Result<TimeUnits, IoError> {
    let var = file.variable(time_var).ok_or_else(|| IoError::InvalidTime {
        reason: format!("time variable '{time_var}' not found"),
    })?;
    let units = string_attribute(&var, "units").ok_or_else(|| IoError::InvalidTime {
        reason: format!("time variable '{time_var}' has no string 'units' attribute"),
    })?;
    let calendar = string_attribute(&var, "calendar").unwrap_or_else(|| "standard".to_string());
    parse_time_units(&units, &calendar)
}

/// Days before each month in a 365-day year.
const NOLEAP_CUMULATIVE: [i64; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

fn noleap_add_days(base: NaiveDate, days: i64) -> Result<NaiveDate, IoError> {
    if base.month() == 2 && base.day() == 29 {
        return Err(IoError::InvalidTime {
            reason: format!("base date {base} does not exist in a 365-day calendar"),
        });
    }
    let start = i64::from(base.year()) * 365
        + NOLEAP_CUMULATIVE[base.month0() as usize]
        + i64::from(base.day0());
    let total = start.checked_add(days).ok_or_else(|| IoError::InvalidTime {
        reason: format!("date overflow adding {days} days to {base}"),
    })?;
    let year = total.div_euclid(365);
    let doy = total.rem_euclid(365);
    let month0 = NOLEAP_CUMULATIVE
        .iter()
        .rposition(|&c| c <= doy)
        .unwrap_or(0);
    let day = doy - NOLEAP_CUMULATIVE[month0] + 1;
    i32::try_from(year)
        .ok()
        .and_then(|y| NaiveDate::from_ymd_opt(y, month0 as u32 + 1, day as u32))
        .ok_or_else(|| IoError::InvalidTime {
            reason: format!("date overflow adding {days} days to {base}"),
        })
}

/// Convert time offsets into calendar dates.
///
/// Offsets are floored to whole days.
pub(crate) fn time_offsets_to_dates(
    units: &TimeUnits,
    offsets: &[f64],
) -> Result<Vec<NaiveDate>, IoError> {
    offsets
        .iter()
        .map(|&offset| {
            if !offset.is_finite() {
                return Err(IoError::InvalidTime {
                    reason: format!("non-finite time offset {offset}"),
                });
            }
            let days = match units.step {
                TimeStep::Days => offset.floor() as i64,
                TimeStep::Hours => (offset / 24.0).floor() as i64,
            };
            match units.calendar {
                TimeCalendar::Gregorian => chrono::TimeDelta::try_days(days)
                    .and_then(|delta| units.base.checked_add_signed(delta))
                    .ok_or_else(|| IoError::InvalidTime {
                        reason: format!("date overflow adding {days} days to {}", units.base),
                    }),
                TimeCalendar::NoLeap => noleap_add_days(units.base, days),
            }
        })
        .collect()
}
