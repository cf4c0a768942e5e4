//! # docxstyle
//!
//! Style-mutation engine for Word (`.docx`) documents.
//!
//! This library opens a WordprocessingML package, edits the property trees
//! of tables, cells, runs and style definitions in place, and saves the
//! package again. It covers table borders, cell shading, alternating row
//! colors, header highlighting, character-range formatting and custom
//! style creation.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docxstyle::style::{highlight_header_row, ColorInput, FormatOptions};
//!
//! fn main() -> docxstyle::Result<()> {
//!     let mut doc = docxstyle::open("report.docx")?;
//!
//!     if let Some(mut table) = doc.table(0) {
//!         let header = ColorInput::from("4472C4");
//!         let report = highlight_header_row(&mut table, &header, "FFFFFF", &FormatOptions::default())?;
//!         println!("{} cells shaded", report.cells);
//!     }
//!
//!     doc.save("report.docx")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Borders**: four-edge cell borders, idempotent or accumulating
//! - **Shading**: per-cell, by grid position, alternating rows, header rows
//! - **Text formatting**: bold, italic, underline, color, size and font over
//!   any character range, splitting runs as needed
//! - **Styles**: paragraph and character styles with an optional base style
//! - **Tools**: status-string operations driven by JSON requests
//! - **Failure policy**: all-or-nothing or best-effort table operations

pub mod detect;
pub mod error;
pub mod model;
pub mod package;
pub mod style;
pub mod tools;
pub mod xml;

// Re-export commonly used types
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_docx, DocxFormat};
pub use error::{Error, ErrorKind, Result};
pub use model::{Cell, Document, Paragraph, Row, Run, StyleKind, StyleRegistry, Table};
pub use style::{
    ApplyReport, BorderMode, BorderSpec, BorderStyle, ColorInput, FailurePolicy, FormatOptions,
    Rgb, RowColorPolicy, RunFormat, ShadingSpec, SplitMode,
};
pub use tools::{ToolOutput, ToolRequest, Toolbox};

use std::path::Path;

/// Open a Word document from a file.
///
/// # Example
///
/// ```no_run
/// let doc = docxstyle::open("document.docx").unwrap();
/// println!("Tables: {}", doc.table_count());
/// ```
pub fn open<P: AsRef<Path>>(path: P) -> Result<Document> {
    Document::open(path)
}

/// Open a Word document from bytes.
///
/// # Example
///
/// ```no_run
/// let data = std::fs::read("document.docx").unwrap();
/// let doc = docxstyle::open_bytes(&data).unwrap();
/// ```
pub fn open_bytes(data: &[u8]) -> Result<Document> {
    Document::from_bytes(data)
}

/// Run a JSON tool request with the given options.
///
/// Malformed JSON is reported as a failed [`ToolOutput`], like any other
/// tool failure.
///
/// # Example
///
/// ```no_run
/// use docxstyle::{run_json, FormatOptions};
///
/// let output = run_json(
///     r#"{"tool": "apply_table_alternating_rows", "filename": "report.docx", "table_index": 0}"#,
///     FormatOptions::default(),
/// );
/// println!("{}", output);
/// ```
pub fn run_json(request: &str, options: FormatOptions) -> ToolOutput {
    match serde_json::from_str::<ToolRequest>(request) {
        Ok(request) => Toolbox::with_options(options).dispatch(&request),
        Err(e) => {
            log::warn!("Rejected tool request: {}", e);
            ToolOutput {
                success: false,
                message: format!("Invalid request: {}", e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_bytes() {
        let bytes = Document::new().to_bytes().unwrap();
        let doc = open_bytes(&bytes).unwrap();
        assert_eq!(doc.table_count(), 0);
    }

    #[test]
    fn test_run_json_malformed() {
        let output = run_json("{not json", FormatOptions::default());
        assert!(!output.success);
        assert!(output.message.starts_with("Invalid request"));

        let output = run_json(r#"{"tool": "paint", "filename": "a"}"#, FormatOptions::default());
        assert!(!output.success);
    }
}
