#![forbid(unsafe_code)]

//! Command-line adapter: delimited text in, one hash per row out.
//!
//! The binary in `src/bin/jenkinshash.rs` is a thin shell over these
//! functions so they can be tested without spawning a process.

use thiserror::Error;

use crate::error::HashError;
use crate::matrix::ElementType;

/// Reading matrices and raw bytes from files or stdin.
pub mod input;

/// Rendering hash results as text or JSON.
pub mod report;

/// Error type for CLI input handling.
#[derive(Error, Debug)]
pub enum CliError {
    /// Generic error message.
    #[error("{0}")]
    Message(String),
    /// IO error from file operations.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// CSV parsing error.
    #[error(transparent)]
    Csv(#[from] csv::Error),
    /// Hashing pipeline error.
    #[error(transparent)]
    Hash(#[from] HashError),
    /// A cell could not be parsed as the requested element type.
    #[error("line {line}, column {column}: '{value}' is not a valid {element_type} value")]
    InvalidCell {
        /// 1-based input line.
        line: u64,
        /// 1-based column.
        column: usize,
        /// Offending cell text.
        value: String,
        /// Requested element type.
        element_type: ElementType,
    },
    /// A row has a different number of cells than the first row.
    #[error("line {line}: expected {expected} columns, found {found}")]
    RaggedRow {
        /// 1-based input line.
        line: u64,
        /// Column count of the first row.
        expected: usize,
        /// Column count of this row.
        found: usize,
    },
}

impl From<&str> for CliError {
    fn from(value: &str) -> Self {
        CliError::Message(value.to_string())
    }
}

impl From<String> for CliError {
    fn from(value: String) -> Self {
        CliError::Message(value)
    }
}
