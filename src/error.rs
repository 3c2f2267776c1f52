//! Custom error types for the application.
//!
//! This module defines the primary error type, `CsError`, for the entire
//! crate. Using the `thiserror` crate, it provides a centralized and
//! consistent way to handle the failure modes of a basis-preparation run:
//!
//! - **`BasisNotFound`**: the configured basis file does not resolve to a
//!   readable file.
//! - **`EmptyBasis` / `RaggedRow` / `Parse`**: the basis file exists but its
//!   contents do not form a rectangular numeric matrix. These carry 1-based
//!   row (and where known, column) positions so the offending line can be
//!   fixed by hand.
//! - **`Range`**: a matrix value does not fit the signed 16-bit storage used
//!   on the device after quantization. Out-of-range values are an error, not
//!   a clamp; callers are expected to pre-scale the basis.
//! - **`PropertyNotAvailable`**: a host-bridge property lookup missed. Note
//!   that readiness checks (`hub_status`) deliberately degrade instead of
//!   surfacing this; only direct property reads propagate it.
//! - **`Config` / `Configuration` / `Io` / `Csv`**: wrapped sources from the
//!   `config` crate, semantic settings validation, file I/O, and the CSV
//!   reader respectively.
//!
//! By using `#[from]`, `CsError` can be seamlessly created from underlying
//! error types, so `?` works throughout the crate.

use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias for results using the application error type.
pub type AppResult<T> = std::result::Result<T, CsError>;

/// Error type covering every failure mode of a basis-preparation run.
#[derive(Error, Debug)]
pub enum CsError {
    /// The configured basis file does not exist or is not a regular file.
    #[error("Basis file not found: {}", .path.display())]
    BasisNotFound {
        /// Path as configured, before any resolution.
        path: PathBuf,
    },

    /// The basis file parsed to zero rows.
    #[error("Basis file contains no rows")]
    EmptyBasis,

    /// A row's column count differs from the first row's.
    #[error("Basis row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        /// 1-based row number in the file.
        row: usize,
        /// Column count established by the first row.
        expected: usize,
        /// Column count actually found.
        found: usize,
    },

    /// A field failed to parse as a finite number.
    #[error("Basis row {row}, column {col}: {reason}")]
    Parse {
        /// 1-based row number in the file.
        row: usize,
        /// 1-based column number in the row.
        col: usize,
        /// Human-readable description of the bad field.
        reason: String,
    },

    /// A quantized matrix value falls outside the signed 16-bit range.
    #[error("Basis value at row {row}, column {col} does not fit int16_t: {value}")]
    Range {
        /// 1-based row number of the offending cell.
        row: usize,
        /// 1-based column number of the offending cell.
        col: usize,
        /// The original (unquantized) value.
        value: f64,
    },

    /// A host-bridge property lookup missed.
    #[error("Device '{device}' has no readable property '{property}'")]
    PropertyNotAvailable {
        /// Device name as passed to the host.
        device: String,
        /// Property name as passed to the host.
        property: String,
    },

    /// Parse or file errors from the `config` crate.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Semantic errors in values that parsed but are logically invalid.
    #[error("Configuration validation error: {0}")]
    Configuration(String),

    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure inside the CSV reader (encoding, record framing).
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
