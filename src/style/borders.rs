//! Cell and table borders.

use super::{apply_to_cells, ApplyReport, BorderEdge, BorderMode, BorderSpec, BorderStyle};
use super::{FormatOptions, Rgb};
use crate::error::Result;
use crate::model::{Cell, Table};
use crate::xml::editor::{
    append_border_edge, find_or_create_child_ordered, replace_fragment_ordered, TC_BORDERS_ORDER,
    TC_PR_ORDER,
};

/// Write `spec` to the given edges of one cell.
///
/// In [`BorderMode::Replace`] an existing edge of the same name is replaced,
/// so applying the same borders twice leaves one element per edge. In
/// [`BorderMode::Accumulate`] edges are always appended.
pub fn set_cell_border(cell: &mut Cell<'_>, edges: &[BorderEdge], spec: &BorderSpec, mode: BorderMode) {
    let borders = find_or_create_child_ordered(cell.properties(), "w:tcBorders", TC_PR_ORDER);
    for &edge in edges {
        match mode {
            BorderMode::Replace => {
                replace_fragment_ordered(borders, spec.to_element(edge), TC_BORDERS_ORDER);
            }
            BorderMode::Accumulate => {
                append_border_edge(borders, edge, spec);
            }
        }
    }
}

/// Border spec used by table formatting: black lines of the configured
/// width, style taken from a caller keyword.
///
/// Unknown keywords fall back to `single` and are recorded in `report`.
pub fn table_border_spec(keyword: &str, options: &FormatOptions, report: &mut ApplyReport) -> BorderSpec {
    BorderSpec::new(BorderStyle::from_keyword(keyword, report))
        .with_size(options.border_size)
        .with_color(Rgb::BLACK)
}

/// Write all four edges of every cell in the table.
pub fn apply_table_borders(
    table: &mut Table<'_>,
    spec: &BorderSpec,
    options: &FormatOptions,
) -> Result<ApplyReport> {
    log::debug!(
        "Applying {} borders to {} rows",
        spec.style.as_val(),
        table.row_count()
    );
    apply_to_cells(table, options, None, |_, cell, _| {
        set_cell_border(cell, &BorderEdge::ALL, spec, options.border_mode);
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Document;

    fn edge_names(cell: &Cell<'_>) -> Vec<String> {
        cell.properties_ref()
            .and_then(|p| p.child("w:tcBorders"))
            .map(|b| b.elements().map(|e| e.name.clone()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_borders_idempotent() {
        let mut doc = Document::new();
        doc.add_table(2, 2);
        let mut table = doc.table(0).unwrap();
        let spec = BorderSpec::new(BorderStyle::Double).with_color(Rgb::BLACK);
        let options = FormatOptions::default();

        apply_table_borders(&mut table, &spec, &options).unwrap();
        let report = apply_table_borders(&mut table, &spec, &options).unwrap();
        assert_eq!(report.cells, 4);

        for row in 0..2 {
            for col in 0..2 {
                let cell = table.cell(row, col).unwrap();
                assert_eq!(edge_names(&cell), ["w:top", "w:left", "w:bottom", "w:right"]);
            }
        }

        let cell = table.cell(0, 0).unwrap();
        let top = cell
            .properties_ref()
            .and_then(|p| p.child("w:tcBorders"))
            .and_then(|b| b.child("w:top"))
            .unwrap();
        assert_eq!(top.attr("w:val"), Some("double"));
        assert_eq!(top.attr("w:color"), Some("000000"));
    }

    #[test]
    fn test_borders_accumulate() {
        let mut doc = Document::new();
        doc.add_table(1, 1);
        let mut table = doc.table(0).unwrap();
        let spec = BorderSpec::new(BorderStyle::Single);
        let options = FormatOptions::new().with_border_mode(BorderMode::Accumulate);

        apply_table_borders(&mut table, &spec, &options).unwrap();
        apply_table_borders(&mut table, &spec, &options).unwrap();

        let cell = table.cell(0, 0).unwrap();
        let borders = cell.properties_ref().and_then(|p| p.child("w:tcBorders")).unwrap();
        assert_eq!(borders.count_children("w:top"), 2);
        assert_eq!(borders.count_children("w:right"), 2);
        assert_eq!(cell.properties_ref().unwrap().count_children("w:tcBorders"), 1);
    }

    #[test]
    fn test_borders_after_width() {
        let mut doc = Document::new();
        doc.add_table(1, 1);
        let mut table = doc.table(0).unwrap();
        {
            let mut cell = table.cell(0, 0).unwrap();
            cell.properties().push(crate::xml::Element::new("w:vAlign"));
        }

        let spec = BorderSpec::new(BorderStyle::Thick);
        apply_table_borders(&mut table, &spec, &FormatOptions::default()).unwrap();

        let cell = table.cell(0, 0).unwrap();
        let names: Vec<_> = cell
            .properties_ref()
            .unwrap()
            .elements()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, ["w:tcW", "w:tcBorders", "w:vAlign"]);
    }

    #[test]
    fn test_single_edge() {
        let mut doc = Document::new();
        doc.add_table(1, 1);
        let mut table = doc.table(0).unwrap();
        let mut cell = table.cell(0, 0).unwrap();

        set_cell_border(
            &mut cell,
            &[BorderEdge::Bottom],
            &BorderSpec::new(BorderStyle::None),
            BorderMode::Replace,
        );
        assert_eq!(edge_names(&cell), ["w:bottom"]);
    }

    #[test]
    fn test_table_border_spec_fallback() {
        let mut report = ApplyReport::new();
        let options = FormatOptions::new().with_border_size(12);
        let spec = table_border_spec("wavy", &options, &mut report);

        assert_eq!(spec.style, BorderStyle::Single);
        assert_eq!(spec.size, 12);
        assert_eq!(spec.color, "000000");
        assert_eq!(report.degraded.len(), 1);
    }
}
