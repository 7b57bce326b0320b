use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use tracing::debug;

use super::CliError;
use crate::matrix::{ElementType, OwnedElements, OwnedMatrix};

/// Where input bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Standard input.
    Stdin,
    /// A file on disk.
    Path(PathBuf),
}

impl InputSource {
    /// `None` and `-` mean stdin.
    pub fn from_arg(arg: Option<&Path>) -> Self {
        match arg {
            Some(path) if path != Path::new("-") => InputSource::Path(path.to_path_buf()),
            _ => InputSource::Stdin,
        }
    }

    /// Opens the source for reading.
    pub fn open(&self) -> Result<Box<dyn Read>, CliError> {
        match self {
            InputSource::Stdin => Ok(Box::new(io::stdin().lock())),
            InputSource::Path(path) => {
                let file = File::open(path).map_err(|err| {
                    CliError::Message(format!("failed to open {}: {err}", path.display()))
                })?;
                Ok(Box::new(BufReader::new(file)))
            }
        }
    }
}

/// How delimited matrix text is interpreted.
#[derive(Debug, Clone)]
pub struct MatrixInputConfig {
    /// Element type every cell is parsed as.
    pub element_type: ElementType,
    /// Field delimiter.
    pub delimiter: u8,
    /// Whether the first record is a header line to skip.
    pub has_headers: bool,
}

impl Default for MatrixInputConfig {
    fn default() -> Self {
        Self {
            element_type: ElementType::Uint8,
            delimiter: b',',
            has_headers: false,
        }
    }
}

/// Reads a delimited matrix, one matrix row per record.
///
/// The element type is checked before any input is consumed. Every record
/// must have as many cells as the first one. Cells are trimmed unless the
/// element type is `char`, where whitespace is data.
pub fn read_matrix<R: Read>(reader: R, cfg: &MatrixInputConfig) -> Result<OwnedMatrix, CliError> {
    let mut elements = OwnedElements::empty(cfg.element_type)?;
    let trim = if cfg.element_type == ElementType::Char {
        Trim::None
    } else {
        Trim::All
    };
    let mut reader = ReaderBuilder::new()
        .delimiter(cfg.delimiter)
        .has_headers(cfg.has_headers)
        .flexible(true)
        .trim(trim)
        .from_reader(reader);

    let mut rows = 0usize;
    let mut cols: Option<usize> = None;
    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let expected = *cols.get_or_insert(record.len());
        if record.len() != expected {
            return Err(CliError::RaggedRow {
                line,
                expected,
                found: record.len(),
            });
        }
        for (idx, cell) in record.iter().enumerate() {
            if !elements.push_parsed(cell) {
                return Err(CliError::InvalidCell {
                    line,
                    column: idx + 1,
                    value: cell.to_string(),
                    element_type: cfg.element_type,
                });
            }
        }
        rows += 1;
    }

    let cols = cols.unwrap_or(0);
    debug!(rows, cols, element_type = %cfg.element_type, "parsed matrix input");
    Ok(OwnedMatrix::new(rows, cols, elements)?)
}

/// Opens `source` and reads a matrix from it.
pub fn read_matrix_from(
    source: &InputSource,
    cfg: &MatrixInputConfig,
) -> Result<OwnedMatrix, CliError> {
    cfg.element_type.ensure_supported()?;
    read_matrix(source.open()?, cfg)
}

/// Reads every byte of `source`.
pub fn read_bytes(source: &InputSource) -> Result<Vec<u8>, CliError> {
    let mut buf = Vec::new();
    source.open()?.read_to_end(&mut buf)?;
    Ok(buf)
}

/// Parses a single-byte delimiter argument. `\t` and `tab` mean tab.
pub fn parse_delimiter(raw: &str) -> Result<u8, CliError> {
    match raw {
        "\\t" | "tab" => return Ok(b'\t'),
        "space" => return Ok(b' '),
        _ => {}
    }
    match raw.as_bytes() {
        [b] => Ok(*b),
        _ => Err(CliError::Message(format!(
            "delimiter must be a single byte, got '{raw}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HashError;
    use crate::rows::hash_rows;

    fn cfg(element_type: ElementType) -> MatrixInputConfig {
        MatrixInputConfig {
            element_type,
            ..MatrixInputConfig::default()
        }
    }

    #[test]
    fn reads_rows_in_order() {
        let text = "1, 2, 3\n4, 5, 6\n";
        let m = read_matrix(text.as_bytes(), &cfg(ElementType::Uint16)).unwrap();
        assert_eq!((m.rows(), m.cols()), (2, 3));
        assert_eq!(m.element_type(), ElementType::Uint16);
        assert_eq!(hash_rows(&m.as_matrix()).unwrap().len(), 2);
    }

    #[test]
    fn header_line_is_skipped() {
        let text = "a\tb\n97\t98\n";
        let mut config = cfg(ElementType::Uint8);
        config.delimiter = b'\t';
        config.has_headers = true;
        let m = read_matrix(text.as_bytes(), &config).unwrap();
        assert_eq!((m.rows(), m.cols()), (1, 2));
    }

    #[test]
    fn char_cells_keep_whitespace() {
        let text = "a, ,c\n";
        let m = read_matrix(text.as_bytes(), &cfg(ElementType::Char)).unwrap();
        let hashes = hash_rows(&m.as_matrix()).unwrap();
        assert_eq!(hashes, vec![crate::hash::one_at_a_time(b"a c")]);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let text = "1,2\n3\n";
        let err = read_matrix(text.as_bytes(), &cfg(ElementType::Int32)).unwrap_err();
        assert!(matches!(
            err,
            CliError::RaggedRow {
                line: 2,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn bad_cells_report_position() {
        let text = "1,2\n3,300\n";
        let err = read_matrix(text.as_bytes(), &cfg(ElementType::Uint8)).unwrap_err();
        match err {
            CliError::InvalidCell {
                line,
                column,
                value,
                element_type,
            } => {
                assert_eq!((line, column), (2, 2));
                assert_eq!(value, "300");
                assert_eq!(element_type, ElementType::Uint8);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unsupported_type_rejected_before_reading() {
        let err = read_matrix_from(
            &InputSource::Path(PathBuf::from("/definitely/not/here.csv")),
            &cfg(ElementType::Logical),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CliError::Hash(HashError::UnsupportedElementType(ElementType::Logical))
        ));
    }

    #[test]
    fn empty_input_is_an_empty_matrix() {
        let m = read_matrix("".as_bytes(), &cfg(ElementType::Double)).unwrap();
        assert_eq!((m.rows(), m.cols()), (0, 0));
    }

    #[test]
    fn delimiter_aliases() {
        assert_eq!(parse_delimiter(",").unwrap(), b',');
        assert_eq!(parse_delimiter("tab").unwrap(), b'\t');
        assert_eq!(parse_delimiter("\\t").unwrap(), b'\t');
        assert!(parse_delimiter(";;").is_err());
    }

    #[test]
    fn dash_means_stdin() {
        assert_eq!(InputSource::from_arg(None), InputSource::Stdin);
        assert_eq!(
            InputSource::from_arg(Some(Path::new("-"))),
            InputSource::Stdin
        );
        assert_eq!(
            InputSource::from_arg(Some(Path::new("m.csv"))),
            InputSource::Path(PathBuf::from("m.csv"))
        );
    }
}
