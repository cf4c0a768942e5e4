//! .docx format detection and validation.

use crate::error::{Error, Result};
use crate::package::{Package, CONTENT_TYPES_PART, DOCUMENT_PART};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Zip local file header magic: PK\x03\x04
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// .docx format information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocxFormat {
    /// Whether the package carries a style definitions part
    pub has_styles: bool,
    /// Whether the main document is macro-enabled (.docm)
    pub macro_enabled: bool,
}

impl std::fmt::Display for DocxFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.macro_enabled {
            write!(f, "Word macro-enabled document")
        } else {
            write!(f, "Word document")
        }
    }
}

/// Detect the format from a file path.
///
/// # Returns
/// * `Ok(DocxFormat)` if the file is a Word package
/// * `Err(Error::UnknownFormat)` otherwise
///
/// # Example
/// ```no_run
/// use docxstyle::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("report.docx").unwrap();
/// println!("{}", format);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<DocxFormat> {
    let path = path.as_ref();
    let mut header = [0u8; 4];
    let mut reader = BufReader::new(File::open(path)?);
    if reader.read_exact(&mut header).is_err() || !is_zip_bytes(&header) {
        return Err(Error::UnknownFormat);
    }
    let package = Package::open(path)?;
    detect_format_from_package(&package)
}

/// Detect the format from the complete file contents.
pub fn detect_format_from_bytes(data: &[u8]) -> Result<DocxFormat> {
    if !is_zip_bytes(data) {
        return Err(Error::UnknownFormat);
    }
    let package = Package::from_bytes(data)?;
    detect_format_from_package(&package)
}

/// Detect the format of an already opened package.
pub fn detect_format_from_package(package: &Package) -> Result<DocxFormat> {
    if !package.contains(DOCUMENT_PART) || !package.contains(CONTENT_TYPES_PART) {
        return Err(Error::UnknownFormat);
    }

    let macro_enabled = package
        .part_str(CONTENT_TYPES_PART)?
        .is_some_and(|types| types.contains("application/vnd.ms-word.document.macroEnabled"));

    Ok(DocxFormat {
        has_styles: package.contains(crate::package::STYLES_PART),
        macro_enabled,
    })
}

/// Check if a file is a Word package.
pub fn is_docx<P: AsRef<Path>>(path: P) -> bool {
    detect_format_from_path(path).is_ok()
}

/// Check if bytes start like a zip archive.
pub fn is_zip_bytes(data: &[u8]) -> bool {
    data.starts_with(ZIP_MAGIC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Document;

    #[test]
    fn test_detect_blank_document() {
        let bytes = Document::new().to_bytes().unwrap();
        let format = detect_format_from_bytes(&bytes).unwrap();
        assert!(format.has_styles);
        assert!(!format.macro_enabled);
        assert_eq!(format.to_string(), "Word document");
    }

    #[test]
    fn test_detect_not_zip() {
        let result = detect_format_from_bytes(b"%PDF-1.7\n");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_detect_zip_without_document() {
        let mut package = Package::new();
        package.set_part("readme.txt", b"hello".to_vec());
        let bytes = package.to_bytes().unwrap();

        let result = detect_format_from_bytes(&bytes);
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_is_zip_bytes() {
        assert!(is_zip_bytes(b"PK\x03\x04rest"));
        assert!(!is_zip_bytes(b"PK"));
        assert!(!is_zip_bytes(b""));
    }
}
