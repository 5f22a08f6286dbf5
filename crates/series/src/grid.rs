//! In-memory gridded datasets: a shared time axis plus named 3-D variables.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::error::SeriesError;

/// A dense 3-D array in row-major order with named dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    dims: [String; 3],
    shape: [usize; 3],
    data: Vec<f64>,
    units: Option<String>,
}

impl Grid {
    /// Creates a grid.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::LengthMismatch`] if `data.len()` is not the
    /// product of `shape`.
    pub fn new(dims: [String; 3], shape: [usize; 3], data: Vec<f64>) -> Result<Self, SeriesError> {
        let expected = shape.iter().product::<usize>();
        if data.len() != expected {
            return Err(SeriesError::LengthMismatch {
                field: "grid data",
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            dims,
            shape,
            data,
            units: None,
        })
    }

    /// Attaches the CF `units` attribute.
    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    pub fn dims(&self) -> &[String; 3] {
        &self.dims
    }

    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn units(&self) -> Option<&str> {
        self.units.as_deref()
    }

    /// Index of the dimension called `name`, if any.
    pub fn axis_of(&self, name: &str) -> Option<usize> {
        self.dims.iter().position(|d| d == name)
    }
}

/// A set of gridded variables sharing one monthly time axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GriddedDataset {
    dates: Vec<NaiveDate>,
    variables: BTreeMap<String, Grid>,
}

impl GriddedDataset {
    /// Creates an empty dataset on the given time axis.
    pub fn new(dates: Vec<NaiveDate>) -> Self {
        Self {
            dates,
            variables: BTreeMap::new(),
        }
    }

    /// Adds a variable, replacing any previous one of the same name.
    pub fn insert(&mut self, name: impl Into<String>, grid: Grid) {
        self.variables.insert(name.into(), grid);
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_variable(mut self, name: impl Into<String>, grid: Grid) -> Self {
        self.insert(name, grid);
        self
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn get(&self, name: &str) -> Option<&Grid> {
        self.variables.get(name)
    }

    /// Variable names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }
}

/// Accepted names for the latitude and longitude dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpatialDims {
    lat: Vec<String>,
    lon: Vec<String>,
}

impl Default for SpatialDims {
    fn default() -> Self {
        Self {
            lat: vec!["lat".into(), "latitude".into(), "y".into()],
            lon: vec!["lon".into(), "longitude".into(), "x".into()],
        }
    }
}

impl SpatialDims {
    /// Creates a dimension alias set from explicit lists.
    pub fn new(lat: Vec<String>, lon: Vec<String>) -> Self {
        Self { lat, lon }
    }

    pub fn lat_aliases(&self) -> &[String] {
        &self.lat
    }

    pub fn lon_aliases(&self) -> &[String] {
        &self.lon
    }

    /// Returns `(lat_axis, lon_axis)` within `grid`, if both are present.
    pub(crate) fn locate(&self, grid: &Grid) -> (Option<usize>, Option<usize>) {
        let find = |aliases: &[String]| aliases.iter().find_map(|a| grid.axis_of(a));
        (find(&self.lat), find(&self.lon))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims() -> [String; 3] {
        ["time".into(), "lat".into(), "lon".into()]
    }

    #[test]
    fn grid_rejects_bad_length() {
        let err = Grid::new(dims(), [2, 2, 2], vec![0.0; 7]).unwrap_err();
        assert!(matches!(
            err,
            SeriesError::LengthMismatch {
                expected: 8,
                got: 7,
                ..
            }
        ));
    }

    #[test]
    fn dataset_names_sorted() {
        let g = Grid::new(dims(), [1, 1, 1], vec![0.0]).unwrap();
        let ds = GriddedDataset::new(vec![])
            .with_variable("tas", g.clone())
            .with_variable("pr", g);
        let names: Vec<_> = ds.names().collect();
        assert_eq!(names, vec!["pr", "tas"]);
    }

    #[test]
    fn spatial_dims_locate() {
        let g = Grid::new(
            ["time".into(), "latitude".into(), "x".into()],
            [1, 1, 1],
            vec![0.0],
        )
        .unwrap();
        assert_eq!(SpatialDims::default().locate(&g), (Some(1), Some(2)));
    }
}
