//! CSV and JSON output.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::error::IoError;

fn create(path: &Path) -> Result<File, IoError> {
    let file_err = |e: std::io::Error| IoError::File {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(file_err)?;
    }
    File::create(path).map_err(file_err)
}

/// Write serializable rows to a CSV file with a header derived from the
/// row type's field names. Parent directories are created as needed.
///
/// An empty slice produces an empty file.
///
/// # Errors
///
/// Returns [`IoError::File`] if the file cannot be created or
/// [`IoError::Csv`] if a row fails to serialize.
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), IoError> {
    let mut writer = csv::Writer::from_writer(BufWriter::new(create(path)?));
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(|e| IoError::File {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    debug!(path = %path.display(), rows = rows.len(), "csv written");
    Ok(())
}

/// Write a CSV file from an explicit header and pre-formatted rows.
///
/// Used for tables whose columns are only known at run time.
///
/// # Errors
///
/// Returns [`IoError::Validation`] if a row's width differs from the header,
/// [`IoError::File`] or [`IoError::Csv`] on write failure.
pub fn write_records(path: &Path, header: &[String], rows: &[Vec<String>]) -> Result<(), IoError> {
    let bad: Vec<String> = rows
        .iter()
        .enumerate()
        .filter(|(_, r)| r.len() != header.len())
        .map(|(i, r)| format!("row {i} has {} fields, expected {}", r.len(), header.len()))
        .collect();
    if !bad.is_empty() {
        return Err(IoError::Validation {
            count: bad.len(),
            details: bad.join("; "),
        });
    }

    let mut writer = csv::Writer::from_writer(BufWriter::new(create(path)?));
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush().map_err(|e| IoError::File {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    debug!(path = %path.display(), rows = rows.len(), "csv written");
    Ok(())
}

/// Write `value` as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`IoError::File`] or [`IoError::Json`].
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), IoError> {
    let writer = BufWriter::new(create(path)?);
    serde_json::to_writer_pretty(writer, value)?;
    debug!(path = %path.display(), "json written");
    Ok(())
}

/// Write a text document (LaTeX tables and the like).
///
/// # Errors
///
/// Returns [`IoError::File`] on failure.
pub fn write_text(path: &Path, text: &str) -> Result<(), IoError> {
    create(path)?
        .write_all(text.as_bytes())
        .map_err(|e| IoError::File {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_width_mismatch_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let header = vec!["a".to_string(), "b".to_string()];
        let rows = vec![vec!["1".to_string()]];
        let err = write_records(&dir.path().join("x.csv"), &header, &rows).unwrap_err();
        match err {
            IoError::Validation { count, details } => {
                assert_eq!(count, 1);
                assert!(details.contains("row 0"));
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn parent_directories_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("out.json");
        write_json(&path, &vec![1, 2, 3]).unwrap();
        assert!(path.exists());
    }
}
