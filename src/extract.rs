#![forbid(unsafe_code)]
//! Row → canonical byte stream.
//!
//! Multi-byte integers are written little-endian with `to_le_bytes`, so the
//! stream is the same on every host. 8-bit and `char` elements contribute
//! their low byte. Floats are rounded half away from zero and reduced to
//! their value mod 256; this is lossy (`256.0` and `0.0` collide) and kept only
//! for compatibility with existing hash tables.

use crate::error::{HashError, Result};
use crate::matrix::{Elements, Matrix};

/// Writes matrix rows into a reusable scratch buffer.
#[derive(Debug)]
pub struct ByteExtractor {
    scratch: Vec<u8>,
}

impl ByteExtractor {
    /// Prepares an extractor for `matrix`.
    ///
    /// Fails with `UnsupportedElementType` before touching any row. The
    /// scratch buffer holds `cols * width` bytes; a matrix without rows gets
    /// no buffer at all.
    pub fn for_matrix(matrix: &Matrix<'_>) -> Result<Self> {
        let width = matrix.element_type().ensure_supported()?;
        if matrix.rows() == 0 {
            return Ok(Self {
                scratch: Vec::new(),
            });
        }
        let len = matrix
            .cols()
            .checked_mul(width)
            .ok_or(HashError::ShapeMismatch {
                rows: matrix.rows(),
                cols: matrix.cols(),
                len: matrix.elements().len(),
            })?;
        Ok(Self {
            scratch: vec![0; len],
        })
    }

    /// Canonical bytes of `row`. The returned slice is overwritten by the
    /// next call.
    ///
    /// # Panics
    ///
    /// Panics if `row >= matrix.rows()` or if `matrix` is not the shape this
    /// extractor was prepared for.
    pub fn extract<'s>(&'s mut self, matrix: &Matrix<'_>, row: usize) -> &'s [u8] {
        assert!(
            row < matrix.rows(),
            "row {row} out of range ({} rows)",
            matrix.rows()
        );
        match matrix.element_type().hashed_width() {
            Some(width) if width.checked_mul(matrix.cols()) == Some(self.scratch.len()) => {}
            _ => panic!("extractor was prepared for a different matrix shape"),
        }
        let out = self.scratch.as_mut_slice();
        let idx = matrix.row_indices(row);
        match matrix.elements() {
            Elements::Char(v) => fill(out, idx.map(|i| [low_byte_char(v[i])])),
            Elements::Int8(v) => fill(out, idx.map(|i| v[i].to_le_bytes())),
            Elements::Uint8(v) => fill(out, idx.map(|i| [v[i]])),
            Elements::Int16(v) => fill(out, idx.map(|i| v[i].to_le_bytes())),
            Elements::Uint16(v) => fill(out, idx.map(|i| v[i].to_le_bytes())),
            Elements::Int32(v) => fill(out, idx.map(|i| v[i].to_le_bytes())),
            Elements::Uint32(v) => fill(out, idx.map(|i| v[i].to_le_bytes())),
            Elements::Int64(v) => fill(out, idx.map(|i| v[i].to_le_bytes())),
            Elements::Uint64(v) => fill(out, idx.map(|i| v[i].to_le_bytes())),
            Elements::Single(v) => fill(out, idx.map(|i| [low_byte_f64(f64::from(v[i]))])),
            Elements::Double(v) => fill(out, idx.map(|i| [low_byte_f64(v[i])])),
            // Rejected by the width check above.
            Elements::Logical(_) | Elements::Complex(_) => {
                unreachable!("unsupported element type reached extraction")
            }
        }
        out
    }
}

fn fill<const N: usize>(out: &mut [u8], values: impl Iterator<Item = [u8; N]>) {
    debug_assert_eq!(out.len() % N.max(1), 0);
    for (chunk, bytes) in out.chunks_exact_mut(N).zip(values) {
        chunk.copy_from_slice(&bytes);
    }
}

#[inline]
pub(crate) fn low_byte_char(c: char) -> u8 {
    (u32::from(c) & 0xff) as u8
}

/// Round half away from zero, then reduce mod 256. Floats of magnitude 2^60
/// or more are multiples of 256 and map to 0, as do NaN and the infinities.
#[inline]
fn low_byte_f64(value: f64) -> u8 {
    value.round().rem_euclid(256.0) as u8
}
