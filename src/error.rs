//! Error types for docxstyle library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for docxstyle operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of an [`Error`].
///
/// Callers use this to tell bad input apart from a bad value that could not
/// be degraded and from a fault in the document itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request was malformed (missing file, bad index, bad range).
    Validation,
    /// A domain value (color, keyword) was rejected by a strict parser.
    DomainValue,
    /// The package or markup tree could not be read, written, or mutated.
    Structural,
    /// Underlying I/O failure.
    Io,
}

/// Error types that can occur while formatting a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file is not a Word document package.
    #[error("Unknown file format: not a valid .docx package")]
    UnknownFormat,

    /// Error reading or writing the zip container.
    #[error("Package error: {0}")]
    Zip(String),

    /// Error parsing or interpreting XML markup.
    #[error("XML error: {0}")]
    Xml(String),

    /// A required part or element is missing.
    #[error("Missing required part: {0}")]
    MissingPart(String),

    /// The document file does not exist.
    #[error("Document {} does not exist", .0.display())]
    FileNotFound(PathBuf),

    /// The document file cannot be written.
    #[error("Cannot modify document: {1}. Consider creating a copy first.")]
    NotWritable(PathBuf, String),

    /// A request parameter could not be interpreted.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Paragraph index is out of range.
    #[error("Invalid paragraph index {index}. Document has {count} paragraphs")]
    ParagraphOutOfRange { index: i64, count: usize },

    /// Table index is out of range.
    #[error("Invalid table index {index}. Document has {count} tables")]
    TableOutOfRange { index: i64, count: usize },

    /// Row index is out of range.
    #[error("Invalid row index {index}. Table has {count} rows")]
    RowOutOfRange { index: i64, count: usize },

    /// Column index is out of range.
    #[error("Invalid column index {index}. Row has {count} cells")]
    ColumnOutOfRange { index: i64, count: usize },

    /// Text range does not fit the paragraph.
    #[error("Invalid text positions {start}..{end}. Paragraph has {len} characters")]
    InvalidTextRange { start: i64, end: i64, len: usize },

    /// A style with the same name already exists.
    #[error("Style '{0}' already exists")]
    StyleExists(String),

    /// A color string is not a 6-digit hex value.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// A single cell failed during a table-wide operation.
    #[error("Cell ({row}, {col}) failed: {message}")]
    CellFailed {
        row: usize,
        col: usize,
        message: String,
    },

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) => ErrorKind::Io,
            Error::UnknownFormat
            | Error::FileNotFound(_)
            | Error::NotWritable(..)
            | Error::InvalidParameter(_)
            | Error::ParagraphOutOfRange { .. }
            | Error::TableOutOfRange { .. }
            | Error::RowOutOfRange { .. }
            | Error::ColumnOutOfRange { .. }
            | Error::InvalidTextRange { .. }
            | Error::StyleExists(_) => ErrorKind::Validation,
            Error::InvalidColor(_) => ErrorKind::DomainValue,
            Error::Zip(_)
            | Error::Xml(_)
            | Error::MissingPart(_)
            | Error::CellFailed { .. }
            | Error::Other(_) => ErrorKind::Structural,
        }
    }

    /// Whether the error was caused by caller input rather than the document.
    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            zip::result::ZipError::InvalidArchive(_) => Error::UnknownFormat,
            _ => Error::Zip(err.to_string()),
        }
    }
}

impl From<roxmltree::Error> for Error {
    fn from(err: roxmltree::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::TableOutOfRange { index: 3, count: 2 };
        assert_eq!(err.to_string(), "Invalid table index 3. Document has 2 tables");

        let err = Error::InvalidTextRange {
            start: 4,
            end: 2,
            len: 11,
        };
        assert_eq!(
            err.to_string(),
            "Invalid text positions 4..2. Paragraph has 11 characters"
        );
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(Error::UnknownFormat.kind(), ErrorKind::Validation);
        assert_eq!(
            Error::InvalidColor("zz".into()).kind(),
            ErrorKind::DomainValue
        );
        assert_eq!(
            Error::CellFailed {
                row: 0,
                col: 1,
                message: "x".into()
            }
            .kind(),
            ErrorKind::Structural
        );
        assert!(Error::StyleExists("Quote".into()).is_validation());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
