//! Integration tests for table styling through saved documents.

use docxstyle::style::{
    apply_alternating_row_shading, apply_table_borders, apply_table_style, apply_to_cells,
    highlight_header_row, shade_cell_at_position, BorderEdge, CellPos,
};
use docxstyle::{
    BorderMode, BorderSpec, BorderStyle, ColorInput, Document, Error, FormatOptions, Rgb,
    RowColorPolicy,
};

/// A document with one 3x3 table whose middle row starts with a merged cell.
fn merged_table_doc() -> Document {
    let mut doc = Document::new();
    doc.add_paragraph("Quarterly figures");
    {
        let mut table = doc.add_table(3, 3);
        for row in 0..3 {
            for col in 0..3 {
                table
                    .cell(row, col)
                    .unwrap()
                    .set_text(&format!("{}{}", row, col));
            }
        }

        // Merge (1,0) and (1,1) into one cell spanning two grid columns.
        let tr = table
            .element_mut()
            .children_named_mut("w:tr")
            .nth(1)
            .unwrap();
        let mut cells: Vec<_> = tr.children_named_mut("w:tc").collect();
        cells[0]
            .child_mut("w:tcPr")
            .unwrap()
            .push(docxstyle::xml::Element::new("w:gridSpan").with_attr("w:val", "2"));
        drop(cells);
        let second = tr.position("w:tc").unwrap() + 1;
        tr.children.remove(second);
    }
    doc
}

fn reopen(doc: &Document) -> Document {
    Document::from_bytes(&doc.to_bytes().unwrap()).unwrap()
}

#[test]
fn test_merged_cell_positions() {
    let mut doc = merged_table_doc();
    let mut table = doc.table(0).unwrap();

    let mut row = table.row(1).unwrap();
    assert_eq!(row.cell_count(), 3);
    assert_eq!(row.physical_cell_count(), 2);
    assert_eq!(row.cell(1).unwrap().text(), "10");
    assert_eq!(row.cell(2).unwrap().text(), "12");
}

#[test]
fn test_shade_merged_cell_by_position() {
    let mut doc = merged_table_doc();
    let fill = ColorInput::from("#c00000");
    {
        let mut table = doc.table(0).unwrap();
        shade_cell_at_position(&mut table, 1, 1, &fill, "solid").unwrap();
    }

    let mut doc = reopen(&doc);
    let mut table = doc.table(0).unwrap();
    assert_eq!(table.cell(1, 0).unwrap().shading_fill(), Some("C00000"));
    assert_eq!(table.cell(1, 2).unwrap().shading_fill(), None);

    let err = shade_cell_at_position(&mut table, 1, 3, &fill, "clear").unwrap_err();
    assert!(matches!(err, Error::ColumnOutOfRange { index: 3, count: 3 }));
}

#[test]
fn test_borders_survive_save() {
    let mut doc = merged_table_doc();
    let spec = BorderSpec::new(BorderStyle::Thick).with_color(Rgb::BLACK);
    {
        let mut table = doc.table(0).unwrap();
        let report = apply_table_borders(&mut table, &spec, &FormatOptions::default()).unwrap();
        assert_eq!(report.cells, 8);
    }

    let mut doc = reopen(&doc);
    let mut table = doc.table(0).unwrap();
    for row in 0..3 {
        let cell = table.cell(row, 2).unwrap();
        let borders = cell
            .properties_ref()
            .and_then(|p| p.child("w:tcBorders"))
            .unwrap();
        for edge in BorderEdge::ALL {
            let el = borders.child(edge.tag()).unwrap();
            assert_eq!(el.attr("w:val"), Some("thick"));
            assert_eq!(borders.count_children(edge.tag()), 1);
        }
    }
}

#[test]
fn test_legacy_border_accumulation_survives_save() {
    let mut doc = merged_table_doc();
    let options = FormatOptions::new().with_border_mode(BorderMode::Accumulate);
    let spec = BorderSpec::new(BorderStyle::Single);
    {
        let mut table = doc.table(0).unwrap();
        apply_table_borders(&mut table, &spec, &options).unwrap();
        apply_table_borders(&mut table, &spec, &options).unwrap();
    }

    let mut doc = reopen(&doc);
    let mut table = doc.table(0).unwrap();
    let cell = table.cell(0, 0).unwrap();
    let borders = cell
        .properties_ref()
        .and_then(|p| p.child("w:tcBorders"))
        .unwrap();
    assert_eq!(borders.count_children("w:left"), 2);
}

#[test]
fn test_alternating_then_header() {
    let mut doc = merged_table_doc();
    {
        let mut table = doc.table(0).unwrap();
        let options = FormatOptions::default();
        apply_alternating_row_shading(&mut table, &RowColorPolicy::new("FFFFFF", "EEEEEE"), &options)
            .unwrap();
        highlight_header_row(&mut table, &"1F3864".into(), "FFFFFF", &options).unwrap();
    }

    let mut doc = reopen(&doc);
    let mut table = doc.table(0).unwrap();
    assert_eq!(table.cell(0, 0).unwrap().shading_fill(), Some("1F3864"));
    assert_eq!(table.cell(0, 0).unwrap().shading_count(), 1);
    assert_eq!(table.cell(1, 0).unwrap().shading_fill(), Some("EEEEEE"));
    assert_eq!(table.cell(2, 2).unwrap().shading_fill(), Some("FFFFFF"));

    let mut header = table.cell(0, 2).unwrap();
    let mut paragraph = header.paragraphs().next().unwrap();
    let run = paragraph.run(0).unwrap();
    assert_eq!(run.bold(), Some(true));
    assert_eq!(run.color(), Some("FFFFFF"));
}

#[test]
fn test_table_style_atomic_vs_best_effort() {
    let failing = |pos: CellPos| pos.row == 2 && pos.col == 1;

    let mut doc = merged_table_doc();
    let mut table = doc.table(0).unwrap();
    let before = table.element().clone();
    let result = apply_to_cells(&mut table, &FormatOptions::default(), None, |pos, cell, _| {
        if failing(pos) {
            return Err(Error::Other("locked cell".into()));
        }
        docxstyle::style::set_cell_shading(cell, &docxstyle::ShadingSpec::fill(Rgb::WHITE));
        Ok(())
    });
    assert!(matches!(result, Err(Error::CellFailed { row: 2, col: 1, .. })));
    assert_eq!(table.element(), &before);

    let options = FormatOptions::new().best_effort();
    let report = apply_to_cells(&mut table, &options, None, |pos, cell, _| {
        if failing(pos) {
            return Err(Error::Other("locked cell".into()));
        }
        docxstyle::style::set_cell_shading(cell, &docxstyle::ShadingSpec::fill(Rgb::WHITE));
        Ok(())
    })
    .unwrap();
    assert_eq!(report.cells, 7);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(table.cell(2, 2).unwrap().shading_fill(), Some("FFFFFF"));
}

#[test]
fn test_format_table_full() {
    let mut doc = merged_table_doc();
    {
        let mut table = doc.table(0).unwrap();
        let grid = vec![
            vec!["D9E2F3".to_string(); 3],
            vec!["FFF2CC".to_string(), "E2EFDA".to_string(), "FCE4D6".to_string()],
        ];
        let report = apply_table_style(
            &mut table,
            true,
            Some("NONE"),
            Some(&grid),
            &FormatOptions::default(),
        )
        .unwrap();
        assert!(report.is_clean());
    }

    let mut doc = reopen(&doc);
    let mut table = doc.table(0).unwrap();

    // The merged cell covers positions 0 and 1; the later entry wins.
    assert_eq!(table.cell(1, 0).unwrap().shading_fill(), Some("E2EFDA"));
    assert_eq!(table.cell(1, 2).unwrap().shading_fill(), Some("FCE4D6"));
    assert_eq!(table.cell(2, 0).unwrap().shading_fill(), None);

    let cell = table.cell(0, 0).unwrap();
    let top = cell
        .properties_ref()
        .and_then(|p| p.child("w:tcBorders"))
        .and_then(|b| b.child("w:top"))
        .unwrap();
    assert_eq!(top.attr("w:val"), Some("nil"));
}

#[test]
fn test_copy_table_between_documents() {
    let mut source = merged_table_doc();
    let mut target = Document::new();
    target.add_paragraph("Appendix");
    {
        let table = source.table(0).unwrap();
        let copy = target.copy_table(&table);
        assert_eq!(copy.style_id(), Some("TableGrid"));
    }

    let mut target = reopen(&target);
    assert_eq!(target.table_count(), 1);
    let mut copy = target.table(0).unwrap();
    assert_eq!(copy.row_count(), 3);
    assert_eq!(copy.column_count(), 3);

    // The merged source cell is split back into plain cells.
    assert_eq!(copy.row(1).unwrap().physical_cell_count(), 3);
    assert_eq!(copy.cell(1, 0).unwrap().text(), "10");
    assert_eq!(copy.cell(1, 1).unwrap().text(), "10");
    assert_eq!(copy.cell(1, 2).unwrap().text(), "12");
    assert_eq!(copy.cell(2, 2).unwrap().text(), "22");
}
