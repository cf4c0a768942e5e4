//! Cell shading, row patterns and header highlighting.

use super::borders::{apply_table_borders, table_border_spec};
use super::{
    apply_to_cells, ApplyReport, ColorInput, FailurePolicy, FormatOptions, Rgb, RowColorPolicy,
    RunFormat, ShadingSpec,
};
use crate::error::{Error, Result};
use crate::model::{Cell, Table};
use crate::xml::editor::{replace_fragment_ordered, TC_PR_ORDER};

/// Replace the cell's shading with `spec`.
pub fn set_cell_shading(cell: &mut Cell<'_>, spec: &ShadingSpec) {
    replace_fragment_ordered(cell.properties(), spec.to_element(), TC_PR_ORDER);
}

/// Shade one cell from caller values.
///
/// A malformed `fill` drops only the `w:fill` attribute; an unknown
/// `pattern` becomes `clear` and a malformed `pattern_color` becomes `auto`.
/// Each substitution is listed in the returned report.
pub fn shade_cell(
    cell: &mut Cell<'_>,
    fill: Option<&ColorInput>,
    pattern: &str,
    pattern_color: &str,
) -> ApplyReport {
    let mut report = ApplyReport::new();
    let spec = ShadingSpec::resolve(fill, pattern, pattern_color, &mut report);
    set_cell_shading(cell, &spec);
    report.cells = 1;
    report
}

/// Shade the cell covering grid position (`row`, `col`).
pub fn shade_cell_at_position(
    table: &mut Table<'_>,
    row: usize,
    col: usize,
    fill: &ColorInput,
    pattern: &str,
) -> Result<ApplyReport> {
    let row_count = table.row_count();
    let mut tr = table.row(row).ok_or(Error::RowOutOfRange {
        index: row as i64,
        count: row_count,
    })?;
    let cell_count = tr.cell_count();
    let mut cell = tr.cell(col).ok_or(Error::ColumnOutOfRange {
        index: col as i64,
        count: cell_count,
    })?;

    log::debug!("Shading cell ({}, {}) with {}", row, col, fill);
    Ok(shade_cell(&mut cell, Some(fill), pattern, "auto"))
}

/// Shade rows alternately with the policy's even and odd colors.
pub fn apply_alternating_row_shading(
    table: &mut Table<'_>,
    policy: &RowColorPolicy,
    options: &FormatOptions,
) -> Result<ApplyReport> {
    let mut report = ApplyReport::new();
    let specs = [0, 1].map(|parity| {
        ShadingSpec::resolve(Some(policy.color_for(parity)), "clear", "auto", &mut report)
    });

    let cells = apply_to_cells(table, options, None, |pos, cell, _| {
        set_cell_shading(cell, &specs[pos.row % 2]);
        Ok(())
    })?;
    report.merge(cells);
    Ok(report)
}

/// Shade the first row and make its text bold, optionally recoloring it.
///
/// `text_color` of `auto` leaves font colors unchanged. A malformed
/// `text_color` is recorded once in the report and also leaves them
/// unchanged. An empty table is a no-op.
pub fn highlight_header_row(
    table: &mut Table<'_>,
    header_color: &ColorInput,
    text_color: &str,
    options: &FormatOptions,
) -> Result<ApplyReport> {
    let mut report = ApplyReport::new();
    if table.is_empty() {
        log::debug!("Table has no rows; nothing to highlight");
        return Ok(report);
    }

    let spec = ShadingSpec::resolve(Some(header_color), "clear", "auto", &mut report);
    let mut format = RunFormat::new().bold(true);
    let text_color = text_color.trim();
    if !text_color.is_empty() && !text_color.eq_ignore_ascii_case("auto") {
        match Rgb::from_hex(text_color) {
            Ok(rgb) => format = format.color(rgb),
            Err(_) => report.degrade("text_color", text_color, "unchanged"),
        }
    }

    let cells = apply_to_cells(table, options, Some(0), |_, cell, cell_report| {
        set_cell_shading(cell, &spec);
        cell_report.runs += bold_runs(cell, &format);
        Ok(())
    })?;
    report.merge(cells);
    Ok(report)
}

/// Table formatting in one call: header bolding, borders and a shading grid.
///
/// `shading[i][j]` is applied to the cell at grid position (`i`, `j`);
/// entries outside the table are ignored. Under
/// [`FailurePolicy::Atomic`] a failure in any step restores the whole table.
pub fn apply_table_style(
    table: &mut Table<'_>,
    has_header_row: bool,
    border_style: Option<&str>,
    shading: Option<&[Vec<String>]>,
    options: &FormatOptions,
) -> Result<ApplyReport> {
    let snapshot = match options.failure_policy {
        FailurePolicy::Atomic => Some(table.element().clone()),
        FailurePolicy::BestEffort => None,
    };

    let result = style_table(table, has_header_row, border_style, shading, options);
    if let (Err(_), Some(snapshot)) = (&result, snapshot) {
        *table.element_mut() = snapshot;
    }
    result
}

fn style_table(
    table: &mut Table<'_>,
    has_header_row: bool,
    border_style: Option<&str>,
    shading: Option<&[Vec<String>]>,
    options: &FormatOptions,
) -> Result<ApplyReport> {
    let mut report = ApplyReport::new();

    if has_header_row && !table.is_empty() {
        let bold = RunFormat::new().bold(true);
        let header = apply_to_cells(table, options, Some(0), |_, cell, cell_report| {
            cell_report.runs += bold_runs(cell, &bold);
            Ok(())
        })?;
        report.runs += header.runs;
        report.failures.extend(header.failures);
    }

    if let Some(keyword) = border_style.filter(|k| !k.trim().is_empty()) {
        let spec = table_border_spec(keyword, options, &mut report);
        report.merge(apply_table_borders(table, &spec, options)?);
    }

    if let Some(grid) = shading {
        let row_count = table.row_count();
        for (i, colors) in grid.iter().enumerate().take(row_count) {
            let Some(mut row) = table.row(i) else { break };
            let width = row.cell_count();
            for (j, color) in colors.iter().enumerate().take(width) {
                if let Some(mut cell) = row.cell(j) {
                    let fill = ColorInput::from(color.as_str());
                    report.merge(shade_cell(&mut cell, Some(&fill), "clear", "auto"));
                }
            }
        }
    }

    Ok(report)
}

/// Apply `format` to every run of every paragraph in the cell.
fn bold_runs(cell: &mut Cell<'_>, format: &RunFormat) -> usize {
    let mut count = 0;
    for mut paragraph in cell.paragraphs() {
        for mut run in paragraph.runs() {
            run.apply(format);
            count += 1;
        }
    }
    count
}
