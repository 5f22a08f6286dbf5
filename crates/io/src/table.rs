//! Header-keyed CSV tables with typed column access.

use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::error::IoError;

/// Options for reading a CSV table.
#[derive(Debug, Clone)]
pub struct TableConfig {
    delimiter: u8,
    trim: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim: true,
        }
    }
}

impl TableConfig {
    /// Set the field delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Trim whitespace around headers and fields.
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }
}

/// A CSV table held as strings. Columns are parsed on access; cells that
/// do not parse become missing values rather than errors.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    path: PathBuf,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Read a comma-separated file with a header row.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::FileNotFound`] or [`IoError::Csv`].
    pub fn read_csv(path: &Path) -> Result<Self, IoError> {
        Self::read_csv_with(path, &TableConfig::default())
    }

    /// Read a delimited file with a header row using `config`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::FileNotFound`] or [`IoError::Csv`].
    pub fn read_csv_with(path: &Path, config: &TableConfig) -> Result<Self, IoError> {
        if !path.exists() {
            return Err(IoError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(config.delimiter)
            .trim(if config.trim {
                csv::Trim::All
            } else {
                csv::Trim::None
            })
            .flexible(true)
            .from_path(path)?;

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        debug!(path = %path.display(), columns = headers.len(), rows = rows.len(), "table read");
        Ok(Self {
            path: path.to_path_buf(),
            headers,
            rows,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    fn index_of(&self, name: &str) -> Result<usize, IoError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| IoError::MissingColumn {
                name: name.to_string(),
                path: self.path.clone(),
            })
    }

    fn cells(&self, name: &str) -> Result<impl Iterator<Item = &str> + '_, IoError> {
        let idx = self.index_of(name)?;
        Ok(self
            .rows
            .iter()
            .map(move |row| row.get(idx).map(String::as_str).unwrap_or("")))
    }

    /// Column as strings; short rows yield `""`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::MissingColumn`] if the column is absent.
    pub fn str_column(&self, name: &str) -> Result<Vec<&str>, IoError> {
        Ok(self.cells(name)?.collect())
    }

    /// Column as floats; unparseable cells become `NaN`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::MissingColumn`] if the column is absent.
    pub fn f64_column(&self, name: &str) -> Result<Vec<f64>, IoError> {
        Ok(self
            .cells(name)?
            .map(|c| c.parse::<f64>().unwrap_or(f64::NAN))
            .collect())
    }

    /// Column as integers; unparseable cells become `None`. Integral floats
    /// such as `"1990.0"` are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::MissingColumn`] if the column is absent.
    pub fn i32_column(&self, name: &str) -> Result<Vec<Option<i32>>, IoError> {
        Ok(self.cells(name)?.map(parse_integer).collect())
    }

    /// Column as small unsigned integers (months, codes).
    ///
    /// # Errors
    ///
    /// Returns [`IoError::MissingColumn`] if the column is absent.
    pub fn u8_column(&self, name: &str) -> Result<Vec<Option<u8>>, IoError> {
        Ok(self
            .cells(name)?
            .map(|c| parse_integer(c).and_then(|v| u8::try_from(v).ok()))
            .collect())
    }

    /// Year of each row, from the `year` column if present, otherwise parsed
    /// from the leading `YYYY` of the `date_fallback` column.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::MissingColumn`] if neither column exists.
    pub fn year_column(&self, year: &str, date_fallback: &str) -> Result<Vec<Option<i32>>, IoError> {
        if self.has_column(year) {
            return self.i32_column(year);
        }
        if !self.has_column(date_fallback) {
            return Err(IoError::MissingColumn {
                name: format!("{year} or {date_fallback}"),
                path: self.path.clone(),
            });
        }
        Ok(self.cells(date_fallback)?.map(parse_year).collect())
    }
}

fn parse_integer(cell: &str) -> Option<i32> {
    if let Ok(v) = cell.parse::<i32>() {
        return Some(v);
    }
    let f = cell.parse::<f64>().ok()?;
    if f.fract() == 0.0 && f >= f64::from(i32::MIN) && f <= f64::from(i32::MAX) {
        Some(f as i32)
    } else {
        None
    }
}

fn parse_year(cell: &str) -> Option<i32> {
    let date_part = cell.split([' ', 'T']).next().unwrap_or(cell);
    if let Ok(d) = NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        return Some(d.year());
    }
    cell.get(..4).and_then(|y| y.parse().ok())
}
