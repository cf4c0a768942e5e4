//! Style operations.
//!
//! Each operation takes a borrowed view of its target, builds typed
//! fragments from the caller's values, and writes them through the
//! [`xml::editor`](crate::xml::editor) primitives. Bad domain values are
//! degraded to documented fallbacks and listed in the returned
//! [`ApplyReport`]; only structural problems and bad indices are errors.

mod borders;
mod color;
mod options;
mod registration;
mod shading;
mod spec;
mod text;

pub use borders::{apply_table_borders, set_cell_border, table_border_spec};
pub use color::{named_color, normalize_hex, resolve_text_color, ColorInput, Rgb};
pub use options::{BorderMode, FailurePolicy, FormatOptions, SplitMode};
pub use registration::create_style;
pub use shading::{
    apply_alternating_row_shading, apply_table_style, highlight_header_row, set_cell_shading,
    shade_cell, shade_cell_at_position,
};
pub use spec::{
    ApplyReport, BorderEdge, BorderSpec, BorderStyle, CellFailure, Degradation, PatternColor,
    RowColorPolicy, RunFormat, ShadingPattern, ShadingSpec,
};
pub use text::format_text_range;

use crate::error::{Error, Result};
use crate::model::{Cell, Table};

/// Grid position of a cell passed to [`apply_to_cells`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPos {
    /// Zero-based row index
    pub row: usize,
    /// Grid column where the cell starts
    pub col: usize,
}

/// Run `f` on every cell of `table` (or of one row), under the failure
/// policy in `options`.
///
/// Merged cells are visited once, at the grid column where they start. With
/// [`FailurePolicy::Atomic`] the first error restores the table to its state
/// before the call and is returned as [`Error::CellFailed`]. With
/// [`FailurePolicy::BestEffort`] failures are collected in the report and the
/// remaining cells are still processed.
pub fn apply_to_cells<F>(
    table: &mut Table<'_>,
    options: &FormatOptions,
    only_row: Option<usize>,
    mut f: F,
) -> Result<ApplyReport>
where
    F: FnMut(CellPos, &mut Cell<'_>, &mut ApplyReport) -> Result<()>,
{
    let snapshot = match options.failure_policy {
        FailurePolicy::Atomic => Some(table.element().clone()),
        FailurePolicy::BestEffort => None,
    };

    let mut report = ApplyReport::new();
    let mut failed = None;

    'rows: for (row_index, mut row) in table.rows().enumerate() {
        if only_row.is_some_and(|only| only != row_index) {
            continue;
        }

        let mut col = 0;
        for mut cell in row.cells() {
            let span = cell.grid_span();
            let pos = CellPos {
                row: row_index,
                col,
            };
            col = col.saturating_add(span);

            if let Err(e) = f(pos, &mut cell, &mut report) {
                log::warn!("Cell ({}, {}) failed: {}", pos.row, pos.col, e);
                let failure = CellFailure {
                    row: pos.row,
                    col: pos.col,
                    message: e.to_string(),
                };
                match options.failure_policy {
                    FailurePolicy::Atomic => {
                        failed = Some(failure);
                        break 'rows;
                    }
                    FailurePolicy::BestEffort => report.failures.push(failure),
                }
                continue;
            }
            report.cells += 1;
        }
    }

    if let Some(failure) = failed {
        if let Some(snapshot) = snapshot {
            *table.element_mut() = snapshot;
        }
        return Err(Error::CellFailed {
            row: failure.row,
            col: failure.col,
            message: failure.message,
        });
    }

    Ok(report)
}
