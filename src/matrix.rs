#![forbid(unsafe_code)]
//! Matrix views over homogeneous numeric row data.
//!
//! A [`Matrix`] borrows its elements and never copies them. [`OwnedMatrix`]
//! is the owned counterpart produced by input adapters such as the CSV
//! reader in [`crate::cli`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{unsupported, HashError, Result};

/// Element representation of a matrix.
///
/// Names follow the numeric-host class names (`single`, `double`,
/// `logical`, ...). `Logical` and `Complex` can be described but are
/// rejected by the hashing pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    /// Character data; only the low byte of each scalar value is hashed.
    Char,
    /// Signed 8-bit integer.
    Int8,
    /// Unsigned 8-bit integer.
    Uint8,
    /// Signed 16-bit integer.
    Int16,
    /// Unsigned 16-bit integer.
    Uint16,
    /// Signed 32-bit integer.
    Int32,
    /// Unsigned 32-bit integer.
    Uint32,
    /// Signed 64-bit integer.
    Int64,
    /// Unsigned 64-bit integer.
    Uint64,
    /// 32-bit float.
    Single,
    /// 64-bit float.
    Double,
    /// Boolean data (unsupported).
    Logical,
    /// Complex double data (unsupported).
    Complex,
}

impl ElementType {
    /// Every element type, supported or not.
    pub const ALL: [ElementType; 13] = [
        ElementType::Char,
        ElementType::Int8,
        ElementType::Uint8,
        ElementType::Int16,
        ElementType::Uint16,
        ElementType::Int32,
        ElementType::Uint32,
        ElementType::Int64,
        ElementType::Uint64,
        ElementType::Single,
        ElementType::Double,
        ElementType::Logical,
        ElementType::Complex,
    ];

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            ElementType::Char => "char",
            ElementType::Int8 => "int8",
            ElementType::Uint8 => "uint8",
            ElementType::Int16 => "int16",
            ElementType::Uint16 => "uint16",
            ElementType::Int32 => "int32",
            ElementType::Uint32 => "uint32",
            ElementType::Int64 => "int64",
            ElementType::Uint64 => "uint64",
            ElementType::Single => "single",
            ElementType::Double => "double",
            ElementType::Logical => "logical",
            ElementType::Complex => "complex",
        }
    }

    /// Number of canonical bytes each element contributes to a row, or
    /// `None` when the type has no extraction policy.
    ///
    /// Floats contribute a single byte: they are rounded and reduced mod
    /// 256, which loses information for anything outside `0..=255`.
    pub fn hashed_width(self) -> Option<usize> {
        match self {
            ElementType::Char
            | ElementType::Int8
            | ElementType::Uint8
            | ElementType::Single
            | ElementType::Double => Some(1),
            ElementType::Int16 | ElementType::Uint16 => Some(2),
            ElementType::Int32 | ElementType::Uint32 => Some(4),
            ElementType::Int64 | ElementType::Uint64 => Some(8),
            ElementType::Logical | ElementType::Complex => None,
        }
    }

    /// Whether rows of this type can be hashed.
    pub fn is_supported(self) -> bool {
        self.hashed_width().is_some()
    }

    /// Fails with [`HashError::UnsupportedElementType`] for types that
    /// cannot be hashed.
    pub fn ensure_supported(self) -> Result<usize> {
        self.hashed_width().ok_or_else(|| unsupported(self))
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown element type name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown element type '{0}'")]
pub struct ParseElementTypeError(pub String);

impl FromStr for ElementType {
    type Err = ParseElementTypeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let ty = match s.trim().to_ascii_lowercase().as_str() {
            "char" => ElementType::Char,
            "int8" | "i8" => ElementType::Int8,
            "uint8" | "u8" => ElementType::Uint8,
            "int16" | "i16" => ElementType::Int16,
            "uint16" | "u16" => ElementType::Uint16,
            "int32" | "i32" => ElementType::Int32,
            "uint32" | "u32" => ElementType::Uint32,
            "int64" | "i64" => ElementType::Int64,
            "uint64" | "u64" => ElementType::Uint64,
            "single" | "float32" | "f32" => ElementType::Single,
            "double" | "float64" | "f64" => ElementType::Double,
            "logical" | "bool" => ElementType::Logical,
            "complex" => ElementType::Complex,
            _ => return Err(ParseElementTypeError(s.to_string())),
        };
        Ok(ty)
    }
}

/// Storage order of a matrix's elements.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    /// Element `(i, j)` lives at `i * cols + j`.
    #[default]
    RowMajor,
    /// Element `(i, j)` lives at `i + j * rows`; the numeric host's native order.
    ColumnMajor,
}

impl Layout {
    #[inline]
    fn index(self, rows: usize, cols: usize, row: usize, col: usize) -> usize {
        match self {
            Layout::RowMajor => row * cols + col,
            Layout::ColumnMajor => row + col * rows,
        }
    }
}

/// Borrowed, homogeneous element storage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Elements<'a> {
    /// Character elements.
    Char(&'a [char]),
    /// `int8` elements.
    Int8(&'a [i8]),
    /// `uint8` elements.
    Uint8(&'a [u8]),
    /// `int16` elements.
    Int16(&'a [i16]),
    /// `uint16` elements.
    Uint16(&'a [u16]),
    /// `int32` elements.
    Int32(&'a [i32]),
    /// `uint32` elements.
    Uint32(&'a [u32]),
    /// `int64` elements.
    Int64(&'a [i64]),
    /// `uint64` elements.
    Uint64(&'a [u64]),
    /// `single` elements.
    Single(&'a [f32]),
    /// `double` elements.
    Double(&'a [f64]),
    /// `logical` elements.
    Logical(&'a [bool]),
    /// `complex` elements as `(re, im)` pairs.
    Complex(&'a [(f64, f64)]),
}

impl Elements<'_> {
    /// Element type of the storage.
    pub fn element_type(&self) -> ElementType {
        match self {
            Elements::Char(_) => ElementType::Char,
            Elements::Int8(_) => ElementType::Int8,
            Elements::Uint8(_) => ElementType::Uint8,
            Elements::Int16(_) => ElementType::Int16,
            Elements::Uint16(_) => ElementType::Uint16,
            Elements::Int32(_) => ElementType::Int32,
            Elements::Uint32(_) => ElementType::Uint32,
            Elements::Int64(_) => ElementType::Int64,
            Elements::Uint64(_) => ElementType::Uint64,
            Elements::Single(_) => ElementType::Single,
            Elements::Double(_) => ElementType::Double,
            Elements::Logical(_) => ElementType::Logical,
            Elements::Complex(_) => ElementType::Complex,
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        match self {
            Elements::Char(v) => v.len(),
            Elements::Int8(v) => v.len(),
            Elements::Uint8(v) => v.len(),
            Elements::Int16(v) => v.len(),
            Elements::Uint16(v) => v.len(),
            Elements::Int32(v) => v.len(),
            Elements::Uint32(v) => v.len(),
            Elements::Int64(v) => v.len(),
            Elements::Uint64(v) => v.len(),
            Elements::Single(v) => v.len(),
            Elements::Double(v) => v.len(),
            Elements::Logical(v) => v.len(),
            Elements::Complex(v) => v.len(),
        }
    }

    /// Returns `true` when there are no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A `rows x cols` view over borrowed elements.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix<'a> {
    rows: usize,
    cols: usize,
    layout: Layout,
    elements: Elements<'a>,
}

impl<'a> Matrix<'a> {
    /// Creates a matrix view, checking that `rows * cols` matches the
    /// number of elements.
    pub fn new(rows: usize, cols: usize, layout: Layout, elements: Elements<'a>) -> Result<Self> {
        let len = elements.len();
        match rows.checked_mul(cols) {
            Some(expected) if expected == len => Ok(Self {
                rows,
                cols,
                layout,
                elements,
            }),
            _ => Err(HashError::ShapeMismatch { rows, cols, len }),
        }
    }

    /// Row-major view.
    pub fn row_major(rows: usize, cols: usize, elements: Elements<'a>) -> Result<Self> {
        Self::new(rows, cols, Layout::RowMajor, elements)
    }

    /// Column-major view.
    pub fn column_major(rows: usize, cols: usize, elements: Elements<'a>) -> Result<Self> {
        Self::new(rows, cols, Layout::ColumnMajor, elements)
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Storage order.
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Underlying elements.
    pub fn elements(&self) -> Elements<'a> {
        self.elements
    }

    /// Element type shorthand.
    pub fn element_type(&self) -> ElementType {
        self.elements.element_type()
    }

    /// Storage indices of `row`'s elements, in column order.
    pub(crate) fn row_indices(&self, row: usize) -> impl Iterator<Item = usize> {
        let (rows, cols, layout) = (self.rows, self.cols, self.layout);
        (0..cols).map(move |col| layout.index(rows, cols, row, col))
    }
}

/// Owned element storage, the counterpart of [`Elements`].
#[derive(Clone, Debug, PartialEq)]
pub enum OwnedElements {
    /// Character elements.
    Char(Vec<char>),
    /// `int8` elements.
    Int8(Vec<i8>),
    /// `uint8` elements.
    Uint8(Vec<u8>),
    /// `int16` elements.
    Int16(Vec<i16>),
    /// `uint16` elements.
    Uint16(Vec<u16>),
    /// `int32` elements.
    Int32(Vec<i32>),
    /// `uint32` elements.
    Uint32(Vec<u32>),
    /// `int64` elements.
    Int64(Vec<i64>),
    /// `uint64` elements.
    Uint64(Vec<u64>),
    /// `single` elements.
    Single(Vec<f32>),
    /// `double` elements.
    Double(Vec<f64>),
}

impl OwnedElements {
    /// Empty storage for a supported element type.
    pub fn empty(element_type: ElementType) -> Result<Self> {
        let elements = match element_type {
            ElementType::Char => OwnedElements::Char(Vec::new()),
            ElementType::Int8 => OwnedElements::Int8(Vec::new()),
            ElementType::Uint8 => OwnedElements::Uint8(Vec::new()),
            ElementType::Int16 => OwnedElements::Int16(Vec::new()),
            ElementType::Uint16 => OwnedElements::Uint16(Vec::new()),
            ElementType::Int32 => OwnedElements::Int32(Vec::new()),
            ElementType::Uint32 => OwnedElements::Uint32(Vec::new()),
            ElementType::Int64 => OwnedElements::Int64(Vec::new()),
            ElementType::Uint64 => OwnedElements::Uint64(Vec::new()),
            ElementType::Single => OwnedElements::Single(Vec::new()),
            ElementType::Double => OwnedElements::Double(Vec::new()),
            ElementType::Logical | ElementType::Complex => return Err(unsupported(element_type)),
        };
        Ok(elements)
    }

    /// Parses `text` as one element and appends it. Returns `false`, leaving
    /// the storage untouched, when the text is not a valid element.
    ///
    /// `char` cells must hold exactly one character.
    pub fn push_parsed(&mut self, text: &str) -> bool {
        fn parse<T: FromStr>(out: &mut Vec<T>, text: &str) -> bool {
            match text.parse() {
                Ok(value) => {
                    out.push(value);
                    true
                }
                Err(_) => false,
            }
        }

        match self {
            OwnedElements::Char(v) => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => {
                        v.push(c);
                        true
                    }
                    _ => false,
                }
            }
            OwnedElements::Int8(v) => parse(v, text),
            OwnedElements::Uint8(v) => parse(v, text),
            OwnedElements::Int16(v) => parse(v, text),
            OwnedElements::Uint16(v) => parse(v, text),
            OwnedElements::Int32(v) => parse(v, text),
            OwnedElements::Uint32(v) => parse(v, text),
            OwnedElements::Int64(v) => parse(v, text),
            OwnedElements::Uint64(v) => parse(v, text),
            OwnedElements::Single(v) => parse(v, text),
            OwnedElements::Double(v) => parse(v, text),
        }
    }

    /// Borrows the storage.
    pub fn as_elements(&self) -> Elements<'_> {
        match self {
            OwnedElements::Char(v) => Elements::Char(v),
            OwnedElements::Int8(v) => Elements::Int8(v),
            OwnedElements::Uint8(v) => Elements::Uint8(v),
            OwnedElements::Int16(v) => Elements::Int16(v),
            OwnedElements::Uint16(v) => Elements::Uint16(v),
            OwnedElements::Int32(v) => Elements::Int32(v),
            OwnedElements::Uint32(v) => Elements::Uint32(v),
            OwnedElements::Int64(v) => Elements::Int64(v),
            OwnedElements::Uint64(v) => Elements::Uint64(v),
            OwnedElements::Single(v) => Elements::Single(v),
            OwnedElements::Double(v) => Elements::Double(v),
        }
    }
}

/// Row-major matrix that owns its elements.
#[derive(Clone, Debug, PartialEq)]
pub struct OwnedMatrix {
    rows: usize,
    cols: usize,
    elements: OwnedElements,
}

impl OwnedMatrix {
    /// Wraps row-major storage, checking the shape.
    pub fn new(rows: usize, cols: usize, elements: OwnedElements) -> Result<Self> {
        Matrix::row_major(rows, cols, elements.as_elements())?;
        Ok(Self {
            rows,
            cols,
            elements,
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

    /// Element type of the storage.
    pub fn element_type(&self) -> ElementType {
        self.elements.as_elements().element_type()
    }

    /// Borrowed view.
    pub fn as_matrix(&self) -> Matrix<'_> {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            layout: Layout::RowMajor,
            elements: self.elements.as_elements(),
        }
    }
}
