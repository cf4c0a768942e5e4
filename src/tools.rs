//! Document formatting tools.
//!
//! Each tool takes a document path and a handful of loosely typed values,
//! opens the document, applies one style operation, saves it in place, and
//! reports the outcome as a human-readable status string. Tools never panic
//! and never return an error: every failure becomes a message, and a failed
//! call leaves the file untouched.
//!
//! Requests can be built in code or deserialized from JSON:
//!
//! ```no_run
//! use docxstyle::tools::{ToolRequest, Toolbox};
//!
//! let request: ToolRequest = serde_json::from_str(
//!     r#"{"tool": "highlight_table_header", "filename": "report.docx", "table_index": "0"}"#,
//! ).unwrap();
//! let output = Toolbox::default().dispatch(&request);
//! println!("{}", output.message);
//! ```

use std::fmt;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{Document, StyleKind, Table};
use crate::style::{
    apply_alternating_row_shading, apply_table_style, create_style, format_text_range,
    highlight_header_row, resolve_text_color, shade_cell_at_position, ApplyReport, ColorInput,
    FormatOptions, RowColorPolicy, RunFormat,
};

/// Result of a tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOutput {
    /// Whether the document was modified and saved
    pub success: bool,

    /// Status message
    pub message: String,
}

impl ToolOutput {
    fn success(message: String) -> Self {
        Self {
            success: true,
            message,
        }
    }

    fn failure(message: String) -> Self {
        Self {
            success: false,
            message,
        }
    }
}

impl fmt::Display for ToolOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// An integer parameter that may arrive as a number or as numeric text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coercible {
    /// JSON integer
    Int(i64),
    /// JSON float with no fractional part (e.g., `2.0`)
    Float(f64),
    /// Numeric string (e.g., `"2"`)
    Text(String),
}

impl Coercible {
    /// The value as an integer, if it is one.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Coercible::Int(n) => Some(*n),
            Coercible::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(*f as i64),
            Coercible::Float(_) => None,
            Coercible::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl From<i64> for Coercible {
    fn from(n: i64) -> Self {
        Coercible::Int(n)
    }
}

impl From<&str> for Coercible {
    fn from(s: &str) -> Self {
        Coercible::Text(s.to_string())
    }
}

fn coerce_all(values: &[&Coercible], names: &str) -> Result<Vec<i64>> {
    values
        .iter()
        .map(|v| v.as_i64())
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| Error::InvalidParameter(names.to_string()))
}

/// Parameters of [`Toolbox::format_text`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatTextRequest {
    pub filename: String,
    pub paragraph_index: Coercible,
    pub start_pos: Coercible,
    pub end_pos: Coercible,
    #[serde(default)]
    pub bold: Option<bool>,
    #[serde(default)]
    pub italic: Option<bool>,
    #[serde(default)]
    pub underline: Option<bool>,
    /// Color name (`red`, `blue`, ...) or hex
    #[serde(default)]
    pub color: Option<String>,
    /// Font size in points
    #[serde(default)]
    pub font_size: Option<Coercible>,
    #[serde(default)]
    pub font_name: Option<String>,
}

impl FormatTextRequest {
    /// Create a request with no formatting set.
    pub fn new(filename: impl Into<String>, paragraph_index: i64, start_pos: i64, end_pos: i64) -> Self {
        Self {
            filename: filename.into(),
            paragraph_index: paragraph_index.into(),
            start_pos: start_pos.into(),
            end_pos: end_pos.into(),
            bold: None,
            italic: None,
            underline: None,
            color: None,
            font_size: None,
            font_name: None,
        }
    }

    pub fn bold(mut self, on: bool) -> Self {
        self.bold = Some(on);
        self
    }

    pub fn italic(mut self, on: bool) -> Self {
        self.italic = Some(on);
        self
    }

    pub fn underline(mut self, on: bool) -> Self {
        self.underline = Some(on);
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn font_size(mut self, points: i64) -> Self {
        self.font_size = Some(points.into());
        self
    }

    pub fn font_name(mut self, name: impl Into<String>) -> Self {
        self.font_name = Some(name.into());
        self
    }
}

/// Parameters of [`Toolbox::create_custom_style`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateStyleRequest {
    pub filename: String,
    pub style_name: String,
    #[serde(default)]
    pub bold: Option<bool>,
    #[serde(default)]
    pub italic: Option<bool>,
    #[serde(default)]
    pub font_size: Option<Coercible>,
    #[serde(default)]
    pub font_name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    /// Existing style name or id to inherit from
    #[serde(default)]
    pub base_style: Option<String>,
}

impl CreateStyleRequest {
    /// Create a request with no font properties.
    pub fn new(filename: impl Into<String>, style_name: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            style_name: style_name.into(),
            bold: None,
            italic: None,
            font_size: None,
            font_name: None,
            color: None,
            base_style: None,
        }
    }

    pub fn bold(mut self, on: bool) -> Self {
        self.bold = Some(on);
        self
    }

    pub fn italic(mut self, on: bool) -> Self {
        self.italic = Some(on);
        self
    }

    pub fn font_size(mut self, points: i64) -> Self {
        self.font_size = Some(points.into());
        self
    }

    pub fn font_name(mut self, name: impl Into<String>) -> Self {
        self.font_name = Some(name.into());
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn base_style(mut self, name: impl Into<String>) -> Self {
        self.base_style = Some(name.into());
        self
    }
}

/// Parameters of [`Toolbox::format_table`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatTableRequest {
    pub filename: String,
    pub table_index: Coercible,
    #[serde(default)]
    pub has_header_row: Option<bool>,
    /// `none`, `single`, `double` or `thick`
    #[serde(default)]
    pub border_style: Option<String>,
    /// Fill colors by row and grid column
    #[serde(default)]
    pub shading: Option<Vec<Vec<String>>>,
}

impl FormatTableRequest {
    /// Create a request that changes nothing.
    pub fn new(filename: impl Into<String>, table_index: i64) -> Self {
        Self {
            filename: filename.into(),
            table_index: table_index.into(),
            has_header_row: None,
            border_style: None,
            shading: None,
        }
    }

    pub fn header_row(mut self, on: bool) -> Self {
        self.has_header_row = Some(on);
        self
    }

    pub fn border_style(mut self, style: impl Into<String>) -> Self {
        self.border_style = Some(style.into());
        self
    }

    pub fn shading(mut self, grid: Vec<Vec<String>>) -> Self {
        self.shading = Some(grid);
        self
    }
}

fn default_pattern() -> String {
    "clear".to_string()
}

/// Parameters of [`Toolbox::set_table_cell_shading`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellShadingRequest {
    pub filename: String,
    pub table_index: Coercible,
    pub row_index: Coercible,
    pub col_index: Coercible,
    pub fill_color: String,
    #[serde(default = "default_pattern")]
    pub pattern: String,
}

impl CellShadingRequest {
    /// Create a request with the `clear` pattern.
    pub fn new(
        filename: impl Into<String>,
        table_index: i64,
        row_index: i64,
        col_index: i64,
        fill_color: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            table_index: table_index.into(),
            row_index: row_index.into(),
            col_index: col_index.into(),
            fill_color: fill_color.into(),
            pattern: default_pattern(),
        }
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }
}

fn default_color1() -> String {
    "FFFFFF".to_string()
}

fn default_color2() -> String {
    "F2F2F2".to_string()
}

/// Parameters of [`Toolbox::apply_table_alternating_rows`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternatingRowsRequest {
    pub filename: String,
    pub table_index: Coercible,
    /// Color of rows 0, 2, 4, ...
    #[serde(default = "default_color1")]
    pub color1: String,
    /// Color of rows 1, 3, 5, ...
    #[serde(default = "default_color2")]
    pub color2: String,
}

impl AlternatingRowsRequest {
    /// Create a request with the default white / light gray colors.
    pub fn new(filename: impl Into<String>, table_index: i64) -> Self {
        Self {
            filename: filename.into(),
            table_index: table_index.into(),
            color1: default_color1(),
            color2: default_color2(),
        }
    }

    pub fn colors(mut self, color1: impl Into<String>, color2: impl Into<String>) -> Self {
        self.color1 = color1.into();
        self.color2 = color2.into();
        self
    }
}

fn default_header_color() -> String {
    "4472C4".to_string()
}

fn default_text_color() -> String {
    "FFFFFF".to_string()
}

/// Parameters of [`Toolbox::highlight_table_header`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderHighlightRequest {
    pub filename: String,
    pub table_index: Coercible,
    #[serde(default = "default_header_color")]
    pub header_color: String,
    /// Hex color, or `auto` to keep the current text color
    #[serde(default = "default_text_color")]
    pub text_color: String,
}

impl HeaderHighlightRequest {
    /// Create a request with the default blue / white colors.
    pub fn new(filename: impl Into<String>, table_index: i64) -> Self {
        Self {
            filename: filename.into(),
            table_index: table_index.into(),
            header_color: default_header_color(),
            text_color: default_text_color(),
        }
    }

    pub fn colors(mut self, header_color: impl Into<String>, text_color: impl Into<String>) -> Self {
        self.header_color = header_color.into();
        self.text_color = text_color.into();
        self
    }
}

/// Any tool call, tagged by tool name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tool", rename_all = "snake_case")]
pub enum ToolRequest {
    FormatText(FormatTextRequest),
    CreateCustomStyle(CreateStyleRequest),
    FormatTable(FormatTableRequest),
    SetTableCellShading(CellShadingRequest),
    ApplyTableAlternatingRows(AlternatingRowsRequest),
    HighlightTableHeader(HeaderHighlightRequest),
}

impl ToolRequest {
    /// Tool name as used in the `tool` tag.
    pub fn name(&self) -> &'static str {
        match self {
            ToolRequest::FormatText(_) => "format_text",
            ToolRequest::CreateCustomStyle(_) => "create_custom_style",
            ToolRequest::FormatTable(_) => "format_table",
            ToolRequest::SetTableCellShading(_) => "set_table_cell_shading",
            ToolRequest::ApplyTableAlternatingRows(_) => "apply_table_alternating_rows",
            ToolRequest::HighlightTableHeader(_) => "highlight_table_header",
        }
    }
}

/// Runs tool requests with a fixed set of [`FormatOptions`].
#[derive(Debug, Clone, Default)]
pub struct Toolbox {
    options: FormatOptions,
}

impl Toolbox {
    /// Create a toolbox with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a toolbox with the given options.
    pub fn with_options(options: FormatOptions) -> Self {
        Self { options }
    }

    /// The options in use.
    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    /// Run any tool request.
    pub fn dispatch(&self, request: &ToolRequest) -> ToolOutput {
        log::debug!("Dispatching {}", request.name());
        match request {
            ToolRequest::FormatText(r) => self.format_text(r),
            ToolRequest::CreateCustomStyle(r) => self.create_custom_style(r),
            ToolRequest::FormatTable(r) => self.format_table(r),
            ToolRequest::SetTableCellShading(r) => self.set_table_cell_shading(r),
            ToolRequest::ApplyTableAlternatingRows(r) => self.apply_table_alternating_rows(r),
            ToolRequest::HighlightTableHeader(r) => self.highlight_table_header(r),
        }
    }

    /// Format a character range within a paragraph.
    pub fn format_text(&self, request: &FormatTextRequest) -> ToolOutput {
        finish("Failed to format text", self.run_format_text(request))
    }

    /// Create a paragraph style.
    pub fn create_custom_style(&self, request: &CreateStyleRequest) -> ToolOutput {
        finish("Failed to create style", self.run_create_style(request))
    }

    /// Format a table with header bolding, borders and shading.
    pub fn format_table(&self, request: &FormatTableRequest) -> ToolOutput {
        finish("Failed to format table", self.run_format_table(request))
    }

    /// Shade one table cell.
    pub fn set_table_cell_shading(&self, request: &CellShadingRequest) -> ToolOutput {
        finish("Failed to apply cell shading", self.run_cell_shading(request))
    }

    /// Shade table rows in alternating colors.
    pub fn apply_table_alternating_rows(&self, request: &AlternatingRowsRequest) -> ToolOutput {
        finish(
            "Failed to apply alternating row shading",
            self.run_alternating_rows(request),
        )
    }

    /// Highlight a table's header row.
    pub fn highlight_table_header(&self, request: &HeaderHighlightRequest) -> ToolOutput {
        finish(
            "Failed to apply header highlighting",
            self.run_highlight_header(request),
        )
    }

    fn run_format_text(&self, request: &FormatTextRequest) -> Result<String> {
        let path = ensure_docx_extension(&request.filename);
        let mut values = vec![&request.paragraph_index, &request.start_pos, &request.end_pos];
        values.extend(request.font_size.as_ref());
        let ints = coerce_all(
            &values,
            "paragraph_index, start_pos, end_pos, and font_size must be integers",
        )?;
        let (index, start, end) = (ints[0], ints[1], ints[2]);

        let mut doc = open_for_edit(&path)?;
        let count = doc.paragraph_count();
        let position = checked_index(index, count)
            .ok_or(Error::ParagraphOutOfRange { index, count })?;
        let mut paragraph = doc
            .paragraph(position)
            .ok_or(Error::ParagraphOutOfRange { index, count })?;

        let mut format = RunFormat {
            bold: request.bold,
            italic: request.italic,
            underline: request.underline,
            font_size: ints.get(3).filter(|&&size| size > 0).map(|&size| size as f32),
            ..RunFormat::default()
        };
        if let Some(color) = request.color.as_deref().filter(|c| !c.is_empty()) {
            format = format.color_name(color);
        }
        if let Some(name) = request.font_name.as_deref().filter(|n| !n.is_empty()) {
            format = format.font_name(name);
        }

        let target = format_text_range(&mut paragraph, start, end, &format, self.options.split_mode)?;
        doc.save(&path)?;
        Ok(format!(
            "Text '{}' formatted successfully in paragraph {}.",
            target, index
        ))
    }

    fn run_create_style(&self, request: &CreateStyleRequest) -> Result<String> {
        let path = ensure_docx_extension(&request.filename);
        let size = match &request.font_size {
            Some(v) => Some(
                v.as_i64()
                    .ok_or_else(|| Error::InvalidParameter("font_size must be an integer".into()))?,
            ),
            None => None,
        };

        let mut doc = open_for_edit(&path)?;
        let font = RunFormat {
            bold: request.bold,
            italic: request.italic,
            font_size: size.filter(|&s| s > 0).map(|s| s as f32),
            font_name: request.font_name.clone(),
            color: request.color.as_deref().map(resolve_text_color),
            ..RunFormat::default()
        };

        let report = create_style(
            &mut doc,
            &request.style_name,
            StyleKind::Paragraph,
            request.base_style.as_deref(),
            &font,
        )?;
        doc.save(&path)?;
        Ok(format!(
            "Style '{}' created successfully.{}",
            request.style_name,
            describe(&report)
        ))
    }

    fn run_format_table(&self, request: &FormatTableRequest) -> Result<String> {
        let path = ensure_docx_extension(&request.filename);
        let index = coerce_all(&[&request.table_index], "table_index must be an integer")?[0];

        let mut doc = open_for_edit(&path)?;
        let mut table = table_at(&mut doc, index)?;
        let report = apply_table_style(
            &mut table,
            request.has_header_row.unwrap_or(false),
            request.border_style.as_deref(),
            request.shading.as_deref(),
            &self.options,
        )?;

        doc.save(&path)?;
        Ok(format!(
            "Table at index {} formatted successfully.{}",
            index,
            describe(&report)
        ))
    }

    fn run_cell_shading(&self, request: &CellShadingRequest) -> Result<String> {
        let path = ensure_docx_extension(&request.filename);
        let ints = coerce_all(
            &[&request.table_index, &request.row_index, &request.col_index],
            "table_index, row_index, and col_index must be integers",
        )?;
        let (table_index, row_index, col_index) = (ints[0], ints[1], ints[2]);

        let mut doc = open_for_edit(&path)?;
        let mut table = table_at(&mut doc, table_index)?;

        let row_count = table.row_count();
        let row = checked_index(row_index, row_count).ok_or(Error::RowOutOfRange {
            index: row_index,
            count: row_count,
        })?;
        let cell_count = table.row(row).map(|r| r.cell_count()).unwrap_or(0);
        let col = checked_index(col_index, cell_count).ok_or(Error::ColumnOutOfRange {
            index: col_index,
            count: cell_count,
        })?;

        let fill = ColorInput::from(request.fill_color.as_str());
        let report = shade_cell_at_position(&mut table, row, col, &fill, &request.pattern)?;

        doc.save(&path)?;
        Ok(format!(
            "Cell shading applied successfully to table {}, row {}, column {}.{}",
            table_index,
            row_index,
            col_index,
            describe(&report)
        ))
    }

    fn run_alternating_rows(&self, request: &AlternatingRowsRequest) -> Result<String> {
        let path = ensure_docx_extension(&request.filename);
        let index = coerce_all(&[&request.table_index], "table_index must be an integer")?[0];

        let mut doc = open_for_edit(&path)?;
        let mut table = table_at(&mut doc, index)?;
        let policy = RowColorPolicy::new(request.color1.as_str(), request.color2.as_str());
        let report = apply_alternating_row_shading(&mut table, &policy, &self.options)?;

        doc.save(&path)?;
        Ok(format!(
            "Alternating row shading applied successfully to table {}.{}",
            index,
            describe(&report)
        ))
    }

    fn run_highlight_header(&self, request: &HeaderHighlightRequest) -> Result<String> {
        let path = ensure_docx_extension(&request.filename);
        let index = coerce_all(&[&request.table_index], "table_index must be an integer")?[0];

        let mut doc = open_for_edit(&path)?;
        let mut table = table_at(&mut doc, index)?;
        let header = ColorInput::from(request.header_color.as_str());
        let report = highlight_header_row(&mut table, &header, &request.text_color, &self.options)?;

        doc.save(&path)?;
        Ok(format!(
            "Header highlighting applied successfully to table {}.{}",
            index,
            describe(&report)
        ))
    }
}

/// Format text with default options. See [`Toolbox::format_text`].
pub fn format_text(request: &FormatTextRequest) -> String {
    Toolbox::default().format_text(request).message
}

/// Create a style with default options. See [`Toolbox::create_custom_style`].
pub fn create_custom_style(request: &CreateStyleRequest) -> String {
    Toolbox::default().create_custom_style(request).message
}

/// Format a table with default options. See [`Toolbox::format_table`].
pub fn format_table(request: &FormatTableRequest) -> String {
    Toolbox::default().format_table(request).message
}

/// Shade a cell with default options. See [`Toolbox::set_table_cell_shading`].
pub fn set_table_cell_shading(request: &CellShadingRequest) -> String {
    Toolbox::default().set_table_cell_shading(request).message
}

/// Alternate row colors with default options.
/// See [`Toolbox::apply_table_alternating_rows`].
pub fn apply_table_alternating_rows(request: &AlternatingRowsRequest) -> String {
    Toolbox::default().apply_table_alternating_rows(request).message
}

/// Highlight a header row with default options.
/// See [`Toolbox::highlight_table_header`].
pub fn highlight_table_header(request: &HeaderHighlightRequest) -> String {
    Toolbox::default().highlight_table_header(request).message
}

/// Append `.docx` unless the name already ends with it.
pub fn ensure_docx_extension(filename: &str) -> PathBuf {
    if filename.ends_with(".docx") {
        PathBuf::from(filename)
    } else {
        PathBuf::from(format!("{}.docx", filename))
    }
}

/// Check that an existing file can be opened for writing.
pub fn check_file_writeable(path: &Path) -> std::result::Result<(), String> {
    let metadata = path.metadata().map_err(|e| e.to_string())?;
    if metadata.permissions().readonly() {
        return Err(format!("Permission denied: {} is read-only", path.display()));
    }
    OpenOptions::new()
        .append(true)
        .open(path)
        .map(|_| ())
        .map_err(|e| format!("Permission denied: {}", e))
}

fn open_for_edit(path: &Path) -> Result<Document> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }
    check_file_writeable(path).map_err(|msg| Error::NotWritable(path.to_path_buf(), msg))?;
    Document::open(path)
}

fn checked_index(index: i64, count: usize) -> Option<usize> {
    usize::try_from(index).ok().filter(|&i| i < count)
}

fn table_at(doc: &mut Document, index: i64) -> Result<Table<'_>> {
    let count = doc.table_count();
    match checked_index(index, count) {
        Some(i) => doc.table(i).ok_or(Error::TableOutOfRange { index, count }),
        None => Err(Error::TableOutOfRange { index, count }),
    }
}

/// Suffix noting degraded values and failed cells.
fn describe(report: &ApplyReport) -> String {
    let mut notes: Vec<String> = report
        .degraded
        .iter()
        .map(|d| format!("{} '{}' replaced by {}", d.field, d.value, d.fallback))
        .collect();
    if !report.failures.is_empty() {
        notes.push(format!("{} cells failed", report.failures.len()));
    }
    if notes.is_empty() {
        String::new()
    } else {
        format!(" ({})", notes.join("; "))
    }
}

fn finish(context: &str, result: Result<String>) -> ToolOutput {
    match result {
        Ok(message) => {
            log::info!("{}", message);
            ToolOutput::success(message)
        }
        Err(e) if e.is_validation() => {
            log::warn!("{}", e);
            ToolOutput::failure(e.to_string())
        }
        Err(e) => {
            log::error!("{}: {}", context, e);
            ToolOutput::failure(format!("{}: {}", context, e))
        }
    }
}
