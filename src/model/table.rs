//! Table, row and cell views.

use super::paragraph::{build_run, run_text, Paragraph};
use crate::xml::{editor, Element};

/// A table (`w:tbl`) borrowed from the document tree.
#[derive(Debug)]
pub struct Table<'a> {
    el: &'a mut Element,
}

impl<'a> Table<'a> {
    pub(crate) fn new(el: &'a mut Element) -> Self {
        Self { el }
    }

    /// The underlying element.
    pub fn element(&self) -> &Element {
        &*self.el
    }

    /// The underlying element, mutably.
    pub fn element_mut(&mut self) -> &mut Element {
        &mut *self.el
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.el.count_children("w:tr")
    }

    /// Get the number of grid columns.
    ///
    /// Taken from `w:tblGrid` when present, otherwise from the first row.
    pub fn column_count(&self) -> usize {
        match self.el.child("w:tblGrid") {
            Some(grid) => grid.count_children("w:gridCol"),
            None => self
                .el
                .child("w:tr")
                .map(row_grid_width)
                .unwrap_or(0),
        }
    }

    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Iterate over rows.
    pub fn rows(&mut self) -> impl Iterator<Item = Row<'_>> {
        self.el.children_named_mut("w:tr").map(Row::new)
    }

    /// Get a row by index.
    pub fn row(&mut self, index: usize) -> Option<Row<'_>> {
        self.el.children_named_mut("w:tr").nth(index).map(Row::new)
    }

    /// Get the cell at a grid position.
    pub fn cell(&mut self, row: usize, col: usize) -> Option<Cell<'_>> {
        let row = self.el.children_named_mut("w:tr").nth(row)?;
        cell_at_position(row, col).map(Cell::new)
    }

    /// Id of the table style (`w:tblStyle`), if any.
    pub fn style_id(&self) -> Option<&str> {
        self.el
            .child("w:tblPr")
            .and_then(|p| p.child("w:tblStyle"))
            .and_then(|s| s.attr("w:val"))
    }

    /// Cell text by grid position, one entry per row.
    ///
    /// A merged cell's text is repeated at every position it covers. Empty
    /// paragraphs are skipped; the rest are joined by newlines.
    pub fn grid_texts(&self) -> Vec<Vec<String>> {
        self.el
            .children_named("w:tr")
            .map(|tr| {
                let mut texts = Vec::new();
                for tc in tr.children_named("w:tc") {
                    let text = tc
                        .children_named("w:p")
                        .map(|p| p.children_named("w:r").map(run_text).collect::<String>())
                        .filter(|t| !t.is_empty())
                        .collect::<Vec<_>>()
                        .join("\n");
                    let span = grid_span(tc);
                    texts.extend(std::iter::repeat(text).take(span));
                }
                texts
            })
            .collect()
    }

    /// Plain text of every row, tab-separated cells.
    pub fn plain_text(&self) -> String {
        self.el
            .children_named("w:tr")
            .map(|tr| {
                tr.children_named("w:tc")
                    .map(cell_text)
                    .collect::<Vec<_>>()
                    .join("\t")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A table row (`w:tr`).
#[derive(Debug)]
pub struct Row<'a> {
    el: &'a mut Element,
}

impl<'a> Row<'a> {
    pub(crate) fn new(el: &'a mut Element) -> Self {
        Self { el }
    }

    /// The underlying element.
    pub fn element(&self) -> &Element {
        &*self.el
    }

    /// Number of grid positions in the row.
    ///
    /// A cell spanning `n` grid columns occupies `n` positions.
    pub fn cell_count(&self) -> usize {
        row_grid_width(self.el)
    }

    /// Number of `w:tc` elements in the row.
    pub fn physical_cell_count(&self) -> usize {
        self.el.count_children("w:tc")
    }

    /// Iterate over the row's cells, each merged cell once.
    pub fn cells(&mut self) -> impl Iterator<Item = Cell<'_>> {
        self.el.children_named_mut("w:tc").map(Cell::new)
    }

    /// Get the cell covering a grid position.
    pub fn cell(&mut self, position: usize) -> Option<Cell<'_>> {
        cell_at_position(self.el, position).map(Cell::new)
    }
}

/// A table cell (`w:tc`).
#[derive(Debug)]
pub struct Cell<'a> {
    el: &'a mut Element,
}

impl<'a> Cell<'a> {
    pub(crate) fn new(el: &'a mut Element) -> Self {
        Self { el }
    }

    /// The underlying element.
    pub fn element(&self) -> &Element {
        &*self.el
    }

    /// Get or create the cell properties (`w:tcPr`).
    pub fn properties(&mut self) -> &mut Element {
        editor::properties(self.el, "w:tcPr")
    }

    /// Cell properties, if present.
    pub fn properties_ref(&self) -> Option<&Element> {
        self.el.child("w:tcPr")
    }

    /// Number of grid columns this cell spans.
    pub fn grid_span(&self) -> usize {
        grid_span(self.el)
    }

    /// Current `w:shd` fill, if any.
    pub fn shading_fill(&self) -> Option<&str> {
        self.properties_ref()
            .and_then(|p| p.child("w:shd"))
            .and_then(|s| s.attr("w:fill"))
    }

    /// Number of `w:shd` fragments in the cell properties.
    pub fn shading_count(&self) -> usize {
        self.properties_ref()
            .map(|p| p.count_children("w:shd"))
            .unwrap_or(0)
    }

    /// Number of paragraphs.
    pub fn paragraph_count(&self) -> usize {
        self.el.count_children("w:p")
    }

    /// Iterate over the cell's paragraphs.
    pub fn paragraphs(&mut self) -> impl Iterator<Item = Paragraph<'_>> {
        self.el.children_named_mut("w:p").map(Paragraph::new)
    }

    /// Plain text, paragraphs joined by newlines.
    pub fn text(&self) -> String {
        cell_text(self.el)
    }

    /// Replace the cell content with a single paragraph holding `text`.
    pub fn set_text(&mut self, text: &str) {
        editor::remove_children(self.el, "w:p");
        let p = Element::new("w:p").with_child(build_run(None, text));
        self.el.push(p);
    }
}

fn cell_text(tc: &Element) -> String {
    tc.children_named("w:p")
        .map(|p| p.children_named("w:r").map(run_text).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Widest grid a Word table can have.
pub const MAX_GRID_COLUMNS: usize = 63;

/// `w:gridSpan` of a cell, clamped to `1..=MAX_GRID_COLUMNS`.
fn grid_span(tc: &Element) -> usize {
    tc.child("w:tcPr")
        .and_then(|p| p.child("w:gridSpan"))
        .and_then(|g| g.attr("w:val"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(1)
        .clamp(1, MAX_GRID_COLUMNS)
}

fn row_grid_width(tr: &Element) -> usize {
    tr.children_named("w:tc")
        .map(grid_span)
        .fold(0, usize::saturating_add)
}

fn cell_at_position(tr: &mut Element, position: usize) -> Option<&mut Element> {
    let mut start: usize = 0;
    for tc in tr.children_named_mut("w:tc") {
        let end = start.saturating_add(grid_span(tc));
        if position < end {
            return Some(tc);
        }
        start = end;
    }
    None
}
