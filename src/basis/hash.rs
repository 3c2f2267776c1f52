//! Stable identifier for a loaded basis.
//!
//! The device stores the identifier of the matrix burned into its firmware
//! and reports it back through the `CSBasisId` hub property; matching that
//! value against the locally loaded matrix is the only consumer. The
//! identifier therefore only needs to be deterministic across runs and
//! platforms, not collision-resistant.

use std::fmt;

use sha2::{Digest, Sha256};

use super::BasisMatrix;

/// Deterministic identifier of a basis matrix.
///
/// Derived from the matrix shape and cell values; equal matrices always
/// produce the same id. Displays as its decimal form, which is also the
/// form embedded in generated firmware and reported by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BasisId(u32);

impl BasisId {
    /// Wraps a raw identifier value.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw identifier value.
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for BasisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl BasisMatrix {
    /// Computes the identifier of this matrix.
    ///
    /// SHA-256 over the shape (rows, cols as little-endian `u32`) followed
    /// by every cell row-major as the little-endian bytes of its
    /// `f64::to_bits`, truncated to the first four digest bytes. Negative
    /// zero is normalized so that matrices equal by value hash equally.
    pub fn id(&self) -> BasisId {
        let mut hasher = Sha256::new();
        hasher.update((self.rows() as u32).to_le_bytes());
        hasher.update((self.cols() as u32).to_le_bytes());
        for &value in self.values() {
            let canonical = if value == 0.0 { 0.0_f64 } else { value };
            hasher.update(canonical.to_bits().to_le_bytes());
        }
        let digest = hasher.finalize();
        BasisId(u32::from_be_bytes([
            digest[0], digest[1], digest[2], digest[3],
        ]))
    }
}
