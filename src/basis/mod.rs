//! Measurement-basis handling.
//!
//! The basis is the measurement matrix of the compressed-sensing scheme: a
//! rectangular grid of pre-scaled real values, loaded once from a delimited
//! text file and immutable afterwards. This module owns the in-memory
//! representation ([`BasisMatrix`]), the file loader, and the stable
//! identifier ([`BasisId`]) derived from the matrix contents.

mod hash;
mod loader;

pub use hash::BasisId;

use crate::error::{AppResult, CsError};

/// A rectangular measurement matrix, stored row-major.
///
/// Invariants, enforced at construction: at least one row and one column,
/// every row the same length, every cell finite.
#[derive(Debug, Clone, PartialEq)]
pub struct BasisMatrix {
    values: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl BasisMatrix {
    /// Builds a matrix from parsed rows, validating the shape invariants.
    ///
    /// Rows are 1-indexed in error positions, matching the basis file.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> AppResult<Self> {
        let Some(first) = rows.first() else {
            return Err(CsError::EmptyBasis);
        };
        let cols = first.len();
        if cols == 0 {
            return Err(CsError::EmptyBasis);
        }

        let mut values = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(CsError::RaggedRow {
                    row: i + 1,
                    expected: cols,
                    found: row.len(),
                });
            }
            for (j, &value) in row.iter().enumerate() {
                if !value.is_finite() {
                    return Err(CsError::Parse {
                        row: i + 1,
                        col: j + 1,
                        reason: format!("non-finite value {value}"),
                    });
                }
                values.push(value);
            }
        }

        Ok(Self {
            values,
            rows: rows.len(),
            cols,
        })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cell value at 0-based `(row, col)`.
    ///
    /// Returns `None` outside the matrix bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            self.values.get(row * self.cols + col).copied()
        } else {
            None
        }
    }

    /// Iterates over the rows as slices, top to bottom.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks_exact(self.cols)
    }

    /// The raw cell values, row-major.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}
