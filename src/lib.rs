//! Jenkins one-at-a-time hashing of numeric matrix rows.
//!
//! Each row of a matrix is turned into a canonical byte stream
//! ([`extract`]) and reduced to a 32-bit value ([`hash`]). The byte stream
//! does not depend on host byte order: multi-byte integers are always
//! written little-endian.
//!
//! ```
//! use jenkinshash::{hash_rows, Elements, Matrix};
//!
//! let data = ['a', 'b', 'c'];
//! let m = Matrix::row_major(1, 3, Elements::Char(&data)).unwrap();
//! assert_eq!(hash_rows(&m).unwrap(), vec![0xed13_1f5b]);
//! ```

#![warn(missing_docs)]

pub mod cli;
pub mod error;
pub mod extract;
pub mod hash;
pub mod logging;
pub mod matrix;
pub mod rows;

pub use error::{HashError, Result};
pub use extract::ByteExtractor;
pub use hash::{one_at_a_time, BuildOneAtATime, OneAtATime, RowHasher};
pub use matrix::{ElementType, Elements, Layout, Matrix, OwnedElements, OwnedMatrix};
pub use rows::{hash_rows, hash_rows_with, hash_text};
