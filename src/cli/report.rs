use std::fmt::Write as _;

use serde::Serialize;

use crate::matrix::ElementType;

/// How hash values are printed in text mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Radix {
    /// Unsigned decimal.
    #[default]
    Decimal,
    /// Zero-padded lowercase hex, eight digits.
    Hex,
}

impl Radix {
    /// Renders a single hash.
    pub fn format(self, hash: u32) -> String {
        match self {
            Radix::Decimal => hash.to_string(),
            Radix::Hex => format!("{hash:08x}"),
        }
    }
}

/// Result of hashing a matrix, as emitted by `--format json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HashReport {
    /// Element type rows were interpreted as.
    pub element_type: ElementType,
    /// Number of rows hashed.
    pub rows: usize,
    /// Number of columns per row.
    pub columns: usize,
    /// One hash per row, in row order.
    pub hashes: Vec<u32>,
}

impl HashReport {
    /// One line per hash.
    pub fn to_text(&self, radix: Radix) -> String {
        let mut out = String::with_capacity(self.hashes.len() * 11);
        for &hash in &self.hashes {
            let _ = writeln!(out, "{}", radix.format(hash));
        }
        out
    }
}

/// A labelled hash, used for `text` and `bytes` results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelledHash {
    /// The input the hash was computed over (string or file name).
    pub input: String,
    /// Hash value.
    pub hash: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_lines_per_radix() {
        let report = HashReport {
            element_type: ElementType::Char,
            rows: 2,
            columns: 1,
            hashes: vec![0xca2e_9442, 7],
        };
        assert_eq!(report.to_text(Radix::Decimal), "3392050242\n7\n");
        assert_eq!(report.to_text(Radix::Hex), "ca2e9442\n00000007\n");
    }

    #[test]
    fn json_uses_host_type_names() {
        let report = HashReport {
            element_type: ElementType::Uint16,
            rows: 1,
            columns: 2,
            hashes: vec![1],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["element_type"], "uint16");
        assert_eq!(json["hashes"][0], 1);
    }
}
