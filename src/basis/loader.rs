//! Delimited-text loader for the measurement basis.
//!
//! The file format is one matrix row per line, fields separated by a
//! caller-configured single-byte delimiter (comma by default). The format is
//! not self-describing: there is no header, and the column count is fixed by
//! the first row. Blank lines are skipped.

use std::path::Path;

use tracing::debug;

use super::BasisMatrix;
use crate::error::{AppResult, CsError};

impl BasisMatrix {
    /// Loads a basis matrix from a delimited text file.
    ///
    /// Fails with [`CsError::BasisNotFound`] when the path does not resolve
    /// to a regular file, and with [`CsError::Parse`] /
    /// [`CsError::RaggedRow`] when the contents are not a rectangular
    /// numeric table. No side effects beyond reading the file.
    pub fn from_path<P: AsRef<Path>>(path: P, delimiter: u8) -> AppResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(CsError::BasisNotFound {
                path: path.to_path_buf(),
            });
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .delimiter(delimiter)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)?;

        let mut rows: Vec<Vec<f64>> = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let record = record?;
            let mut row = Vec::with_capacity(record.len());
            for (j, field) in record.iter().enumerate() {
                let value: f64 = field.parse().map_err(|_| CsError::Parse {
                    row: i + 1,
                    col: j + 1,
                    reason: format!("invalid number '{field}'"),
                })?;
                row.push(value);
            }
            rows.push(row);
        }

        let matrix = Self::from_rows(rows)?;
        debug!(
            rows = matrix.rows(),
            cols = matrix.cols(),
            path = %path.display(),
            "parsed basis file"
        );
        Ok(matrix)
    }
}
