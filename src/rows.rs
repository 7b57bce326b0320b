#![forbid(unsafe_code)]
//! Per-row hashing of a matrix.

use tracing::debug;

use crate::error::Result;
use crate::extract::{low_byte_char, ByteExtractor};
use crate::hash::{OneAtATime, RowHasher};
use crate::matrix::Matrix;

/// Hashes every row of `matrix` with the one-at-a-time hash.
///
/// Returns one value per row, in row order. An unsupported element type
/// fails before any row is read, so there is never partial output.
pub fn hash_rows(matrix: &Matrix<'_>) -> Result<Vec<u32>> {
    hash_rows_with::<OneAtATime>(matrix)
}

/// [`hash_rows`] with a caller-chosen hasher.
pub fn hash_rows_with<H: RowHasher + Default>(matrix: &Matrix<'_>) -> Result<Vec<u32>> {
    let mut extractor = ByteExtractor::for_matrix(matrix)?;
    debug!(
        rows = matrix.rows(),
        cols = matrix.cols(),
        element_type = %matrix.element_type(),
        layout = ?matrix.layout(),
        "hashing matrix rows"
    );
    let mut hasher = H::default();
    let mut out = Vec::with_capacity(matrix.rows());
    for row in 0..matrix.rows() {
        hasher.reset();
        hasher.update(extractor.extract(matrix, row));
        out.push(hasher.finalize());
    }
    Ok(out)
}

/// Hashes `text` as a single `char` row: the low byte of each scalar value.
pub fn hash_text(text: &str) -> u32 {
    let mut hasher = OneAtATime::new();
    for c in text.chars() {
        hasher.update(&[low_byte_char(c)]);
    }
    hasher.finalize()
}
