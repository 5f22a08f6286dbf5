//! Monthly basin series with explicit units.

use std::fmt;

use chrono::NaiveDate;

use crate::error::SeriesError;

/// Physical unit of a series.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Unit {
    /// Kelvin.
    Kelvin,
    /// Degrees Celsius.
    Celsius,
    /// Mass flux per second (`kg m-2 s-1`).
    FluxPerSecond,
    /// Accumulated depth (mm per time step).
    Depth,
    /// Any other unit string, kept verbatim.
    Other(String),
}

impl Unit {
    /// Maps a CF `units` attribute to a [`Unit`].
    pub fn from_cf(units: &str) -> Self {
        match units.trim() {
            "K" | "k" | "kelvin" | "Kelvin" => Self::Kelvin,
            "degC" | "degree_Celsius" | "degrees_Celsius" | "C" | "°C" | "celsius" => {
                Self::Celsius
            }
            "kg m-2 s-1" | "kg/m2/s" | "kg m**-2 s**-1" | "mm/s" | "mm s-1" => {
                Self::FluxPerSecond
            }
            "mm" | "mm/month" | "mm month-1" => Self::Depth,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kelvin => f.write_str("K"),
            Self::Celsius => f.write_str("degC"),
            Self::FluxPerSecond => f.write_str("kg m-2 s-1"),
            Self::Depth => f.write_str("mm"),
            Self::Other(s) => f.write_str(s),
        }
    }
}

/// An ordered sequence of `(date, value)` observations for one basin.
///
/// Missing observations are `NaN`. Dates are non-decreasing.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
    unit: Unit,
}

impl Series {
    /// Creates a series, validating that lengths match and dates are
    /// non-decreasing.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::LengthMismatch`] or [`SeriesError::NonMonotonic`].
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>, unit: Unit) -> Result<Self, SeriesError> {
        if dates.len() != values.len() {
            return Err(SeriesError::LengthMismatch {
                field: "values",
                expected: dates.len(),
                got: values.len(),
            });
        }
        if let Some(i) = dates.windows(2).position(|w| w[1] < w[0]) {
            return Err(SeriesError::NonMonotonic {
                index: i + 1,
                prev: i,
            });
        }
        Ok(Self {
            dates,
            values,
            unit,
        })
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of non-missing observations.
    pub fn n_valid(&self) -> usize {
        self.values.iter().filter(|v| v.is_finite()).count()
    }

    /// Iterates over `(date, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }

    /// Replaces the values, keeping dates and unit.
    pub(crate) fn with_values(&self, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), self.dates.len());
        Self {
            dates: self.dates.clone(),
            values,
            unit: self.unit.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    #[test]
    fn new_valid() {
        let s = Series::new(vec![d(2000, 1), d(2000, 2)], vec![1.0, f64::NAN], Unit::Celsius)
            .unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(s.n_valid(), 1);
        assert_eq!(s.unit(), &Unit::Celsius);
    }

    #[test]
    fn new_rejects_length_mismatch() {
        let err = Series::new(vec![d(2000, 1)], vec![1.0, 2.0], Unit::Depth).unwrap_err();
        assert!(matches!(
            err,
            SeriesError::LengthMismatch {
                expected: 1,
                got: 2,
                ..
            }
        ));
    }

    #[test]
    fn new_rejects_backwards_dates() {
        let err = Series::new(
            vec![d(2000, 1), d(2000, 3), d(2000, 2)],
            vec![1.0, 2.0, 3.0],
            Unit::Depth,
        )
        .unwrap_err();
        assert_eq!(err, SeriesError::NonMonotonic { index: 2, prev: 1 });
    }

    #[test]
    fn repeated_dates_allowed() {
        assert!(Series::new(vec![d(2000, 1), d(2000, 1)], vec![1.0, 2.0], Unit::Depth).is_ok());
    }

    #[test]
    fn unit_from_cf() {
        assert_eq!(Unit::from_cf("K"), Unit::Kelvin);
        assert_eq!(Unit::from_cf("kg m-2 s-1"), Unit::FluxPerSecond);
        assert_eq!(Unit::from_cf("mm"), Unit::Depth);
        assert_eq!(Unit::from_cf("m3/s"), Unit::Other("m3/s".to_string()));
    }
}
