//! Document-level type.

use std::path::Path;

use super::paragraph::build_run;
use super::styles::{default_styles, StyleRegistry};
use super::{Paragraph, Table};
use crate::error::{Error, Result};
use crate::package::{
    Package, CONTENT_TYPES_PART, DOCUMENT_PART, DOCUMENT_RELS_PART, STYLES_PART,
};
use crate::xml::{self, editor, Element, W_NS};

const RELS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const CONTENT_TYPES_NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const OFFICE_DOCUMENT_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const STYLES_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
const DOCUMENT_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
const STYLES_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";

/// Text width of a Letter page with 1" margins, in twentieths of a point.
const TEXT_WIDTH: usize = 9360;

/// Style id given to new tables when the document defines it.
const TABLE_GRID_STYLE: &str = "TableGrid";

/// An opened Word document.
///
/// The main document part and the style definitions are parsed once and
/// edited in place; everything else in the package is carried through
/// untouched on save.
#[derive(Debug, Clone)]
pub struct Document {
    package: Package,
    root: Element,
    styles: Option<Element>,
    styles_created: bool,
}

impl Document {
    /// Create a blank document.
    pub fn new() -> Self {
        let mut package = Package::new();
        package.set_part(CONTENT_TYPES_PART, xml_bytes(&blank_content_types()));
        package.set_part("_rels/.rels", xml_bytes(&blank_package_rels()));
        package.set_part(DOCUMENT_RELS_PART, xml_bytes(&blank_document_rels()));

        Self {
            package,
            root: blank_document(),
            styles: Some(default_styles()),
            styles_created: false,
        }
    }

    /// Open a document from a file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Opening {}", path.display());
        Self::from_package(Package::open(path)?)
    }

    /// Open a document from the bytes of a .docx file.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_package(Package::from_bytes(data)?)
    }

    /// Open a document from a package.
    pub fn from_package(package: Package) -> Result<Self> {
        let source = package
            .part_str(DOCUMENT_PART)?
            .ok_or_else(|| Error::MissingPart(DOCUMENT_PART.to_string()))?;
        let root = xml::parse(source)?;
        if !root.is("w:document") {
            return Err(Error::Xml(format!(
                "expected w:document root in {}, found {}",
                DOCUMENT_PART, root.name
            )));
        }

        let styles = match package.part_str(STYLES_PART)? {
            Some(source) => Some(xml::parse(source)?),
            None => None,
        };

        Ok(Self {
            package,
            root,
            styles,
            styles_created: false,
        })
    }

    /// Save the document to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.to_package()?.save(path)
    }

    /// Serialize the document to .docx bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.to_package()?.to_bytes()
    }

    /// The root `w:document` element.
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Get the number of body-level tables.
    pub fn table_count(&self) -> usize {
        self.body().map(|b| b.count_children("w:tbl")).unwrap_or(0)
    }

    /// Get a body-level table by index.
    pub fn table(&mut self, index: usize) -> Option<Table<'_>> {
        self.body_mut().children_named_mut("w:tbl").nth(index).map(Table::new)
    }

    /// Iterate over body-level tables.
    pub fn tables(&mut self) -> impl Iterator<Item = Table<'_>> {
        self.body_mut().children_named_mut("w:tbl").map(Table::new)
    }

    /// Get the number of body-level paragraphs.
    pub fn paragraph_count(&self) -> usize {
        self.body().map(|b| b.count_children("w:p")).unwrap_or(0)
    }

    /// Get a body-level paragraph by index.
    pub fn paragraph(&mut self, index: usize) -> Option<Paragraph<'_>> {
        self.body_mut().children_named_mut("w:p").nth(index).map(Paragraph::new)
    }

    /// Iterate over body-level paragraphs.
    pub fn paragraphs(&mut self) -> impl Iterator<Item = Paragraph<'_>> {
        self.body_mut().children_named_mut("w:p").map(Paragraph::new)
    }

    /// Append a paragraph holding `text` to the end of the body.
    pub fn add_paragraph(&mut self, text: &str) -> Paragraph<'_> {
        let mut p = Element::new("w:p");
        if !text.is_empty() {
            p.push(build_run(None, text));
        }
        Paragraph::new(self.append_block(p))
    }

    /// Append an empty `rows` x `cols` table to the end of the body.
    pub fn add_table(&mut self, rows: usize, cols: usize) -> Table<'_> {
        let cols = cols.max(1);
        let width = (TEXT_WIDTH / cols).to_string();

        let mut tbl_pr = Element::new("w:tblPr");
        if self.defines_style(TABLE_GRID_STYLE) {
            tbl_pr.push(Element::new("w:tblStyle").with_attr("w:val", TABLE_GRID_STYLE));
        }
        tbl_pr.push(
            Element::new("w:tblW")
                .with_attr("w:w", "0")
                .with_attr("w:type", "auto"),
        );

        let grid = (0..cols).fold(Element::new("w:tblGrid"), |g, _| {
            g.with_child(Element::new("w:gridCol").with_attr("w:w", width.as_str()))
        });

        let mut tbl = Element::new("w:tbl").with_child(tbl_pr).with_child(grid);
        for _ in 0..rows {
            let tr = (0..cols).fold(Element::new("w:tr"), |tr, _| {
                tr.with_child(
                    Element::new("w:tc")
                        .with_child(Element::new("w:tcPr").with_child(
                            Element::new("w:tcW")
                                .with_attr("w:w", width.as_str())
                                .with_attr("w:type", "dxa"),
                        ))
                        .with_child(Element::new("w:p")),
                )
            });
            tbl.push(tr);
        }

        log::debug!("Adding {}x{} table", rows, cols);
        Table::new(self.append_block(tbl))
    }

    /// Append a copy of `source`, typically a table of another document.
    ///
    /// The copy has the source's grid size and the text of each cell by grid
    /// position (merged source cells repeat their text). It keeps the
    /// source's table style when this document defines that style id and
    /// gets Table Grid otherwise. Cell formatting is not copied.
    pub fn copy_table(&mut self, source: &Table<'_>) -> Table<'_> {
        let texts = source.grid_texts();
        let cols = texts
            .iter()
            .map(Vec::len)
            .max()
            .unwrap_or(0)
            .max(source.column_count());
        let style = source
            .style_id()
            .filter(|id| self.defines_style(id))
            .map(str::to_string);

        let mut table = self.add_table(texts.len(), cols);
        if let Some(id) = style {
            let tbl_pr = editor::find_or_create_child(table.element_mut(), "w:tblPr");
            match tbl_pr.child_mut("w:tblStyle") {
                Some(el) => el.set_attr("w:val", id),
                None => {
                    tbl_pr.insert(0, Element::new("w:tblStyle").with_attr("w:val", id));
                }
            }
        }

        for (i, row) in texts.iter().enumerate() {
            for (j, text) in row.iter().enumerate().filter(|(_, t)| !t.is_empty()) {
                if let Some(mut cell) = table.cell(i, j) {
                    cell.set_text(text);
                }
            }
        }

        log::debug!("Copied {}x{} table", texts.len(), cols);
        table
    }

    /// Check if the document has style definitions.
    pub fn has_styles(&self) -> bool {
        self.styles.is_some()
    }

    /// The style definitions, created when the package has none.
    pub fn styles(&mut self) -> StyleRegistry<'_> {
        if self.styles.is_none() {
            log::debug!("Document has no styles part; creating one");
            self.styles_created = true;
        }
        StyleRegistry::new(self.styles.get_or_insert_with(default_styles))
    }

    fn defines_style(&self, id: &str) -> bool {
        self.styles.as_ref().is_some_and(|s| {
            s.children_named("w:style")
                .any(|st| st.attr("w:styleId") == Some(id))
        })
    }

    fn body(&self) -> Option<&Element> {
        self.root.child("w:body")
    }

    fn body_mut(&mut self) -> &mut Element {
        editor::find_or_create_child(&mut self.root, "w:body")
    }

    /// Insert a block element before the section properties.
    fn append_block(&mut self, block: Element) -> &mut Element {
        let body = self.body_mut();
        match body.position("w:sectPr") {
            Some(index) => body.insert(index, block),
            None => body.push(block),
        }
    }

    /// Copy of the package with the edited parts written back.
    fn to_package(&self) -> Result<Package> {
        let mut package = self.package.clone();
        package.set_part(DOCUMENT_PART, xml_bytes(&self.root));

        if let Some(styles) = &self.styles {
            package.set_part(STYLES_PART, xml_bytes(styles));
            if self.styles_created {
                register_styles_part(&mut package)?;
            }
        }

        Ok(package)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Add the content-type override and relationship for a new styles part.
fn register_styles_part(package: &mut Package) -> Result<()> {
    let mut types = match package.part_str(CONTENT_TYPES_PART)? {
        Some(source) => xml::parse(source)?,
        None => return Err(Error::MissingPart(CONTENT_TYPES_PART.to_string())),
    };
    let part_name = format!("/{}", STYLES_PART);
    if !types
        .children_named("Override")
        .any(|o| o.attr("PartName") == Some(part_name.as_str()))
    {
        types.push(
            Element::new("Override")
                .with_attr("PartName", part_name)
                .with_attr("ContentType", STYLES_CONTENT_TYPE),
        );
        package.set_part(CONTENT_TYPES_PART, xml_bytes(&types));
    }

    let mut rels = match package.part_str(DOCUMENT_RELS_PART)? {
        Some(source) => xml::parse(source)?,
        None => Element::new("Relationships").with_attr("xmlns", RELS_NS),
    };
    if !rels
        .children_named("Relationship")
        .any(|r| r.attr("Type") == Some(STYLES_REL))
    {
        let id = (1..)
            .map(|n| format!("rId{}", n))
            .find(|id| {
                !rels
                    .children_named("Relationship")
                    .any(|r| r.attr("Id") == Some(id.as_str()))
            })
            .unwrap_or_else(|| "rIdStyles".to_string());
        rels.push(
            Element::new("Relationship")
                .with_attr("Id", id)
                .with_attr("Type", STYLES_REL)
                .with_attr("Target", "styles.xml"),
        );
        package.set_part(DOCUMENT_RELS_PART, xml_bytes(&rels));
    }

    log::debug!("Registered {} in package", STYLES_PART);
    Ok(())
}

fn xml_bytes(element: &Element) -> Vec<u8> {
    xml::to_string_with_declaration(element).into_bytes()
}

fn blank_document() -> Element {
    let sect_pr = Element::new("w:sectPr")
        .with_child(
            Element::new("w:pgSz")
                .with_attr("w:w", "12240")
                .with_attr("w:h", "15840"),
        )
        .with_child(
            ["w:top", "w:right", "w:bottom", "w:left"]
                .into_iter()
                .fold(Element::new("w:pgMar"), |m, side| m.with_attr(side, "1440"))
                .with_attr("w:header", "720")
                .with_attr("w:footer", "720")
                .with_attr("w:gutter", "0"),
        );

    Element::new("w:document")
        .with_attr("xmlns:w", W_NS)
        .with_child(Element::new("w:body").with_child(sect_pr))
}

fn blank_content_types() -> Element {
    Element::new("Types")
        .with_attr("xmlns", CONTENT_TYPES_NS)
        .with_child(
            Element::new("Default")
                .with_attr("Extension", "rels")
                .with_attr(
                    "ContentType",
                    "application/vnd.openxmlformats-package.relationships+xml",
                ),
        )
        .with_child(
            Element::new("Default")
                .with_attr("Extension", "xml")
                .with_attr("ContentType", "application/xml"),
        )
        .with_child(
            Element::new("Override")
                .with_attr("PartName", format!("/{}", DOCUMENT_PART))
                .with_attr("ContentType", DOCUMENT_CONTENT_TYPE),
        )
        .with_child(
            Element::new("Override")
                .with_attr("PartName", format!("/{}", STYLES_PART))
                .with_attr("ContentType", STYLES_CONTENT_TYPE),
        )
}

fn blank_package_rels() -> Element {
    Element::new("Relationships")
        .with_attr("xmlns", RELS_NS)
        .with_child(
            Element::new("Relationship")
                .with_attr("Id", "rId1")
                .with_attr("Type", OFFICE_DOCUMENT_REL)
                .with_attr("Target", DOCUMENT_PART),
        )
}

fn blank_document_rels() -> Element {
    Element::new("Relationships")
        .with_attr("xmlns", RELS_NS)
        .with_child(
            Element::new("Relationship")
                .with_attr("Id", "rId1")
                .with_attr("Type", STYLES_REL)
                .with_attr("Target", "styles.xml"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StyleKind;
    use crate::style::{ApplyReport, RunFormat};

    #[test]
    fn test_blank_document() {
        let doc = Document::new();
        assert_eq!(doc.paragraph_count(), 0);
        assert_eq!(doc.table_count(), 0);
        assert!(doc.has_styles());
    }

    #[test]
    fn test_add_blocks_before_section() {
        let mut doc = Document::new();
        doc.add_paragraph("Intro");
        doc.add_table(2, 3);
        doc.add_paragraph("Outro");

        let body = doc.root().child("w:body").unwrap();
        let names: Vec<_> = body.elements().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["w:p", "w:tbl", "w:p", "w:sectPr"]);

        assert_eq!(doc.paragraph_count(), 2);
        let table = doc.table(0).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 3);
    }

    #[test]
    fn test_roundtrip_bytes() {
        let mut doc = Document::new();
        doc.add_paragraph("Hello world");
        {
            let mut table = doc.add_table(1, 2);
            table.cell(0, 1).unwrap().set_text("B");
        }

        let bytes = doc.to_bytes().unwrap();
        let mut reopened = Document::from_bytes(&bytes).unwrap();

        assert_eq!(reopened.paragraph(0).unwrap().text(), "Hello world");
        assert_eq!(reopened.table(0).unwrap().cell(0, 1).unwrap().text(), "B");
        assert!(reopened.styles().contains("Table Grid"));
    }

    #[test]
    fn test_missing_document_part() {
        let mut package = Package::new();
        package.set_part(CONTENT_TYPES_PART, b"<Types/>".to_vec());

        let result = Document::from_package(package);
        assert!(matches!(result, Err(Error::MissingPart(_))));
    }

    #[test]
    fn test_wrong_root() {
        let mut package = Package::new();
        package.set_part(DOCUMENT_PART, b"<html/>".to_vec());

        let result = Document::from_package(package);
        assert!(matches!(result, Err(Error::Xml(_))));
    }

    #[test]
    fn test_styles_part_created_on_demand() {
        let mut package = Document::new().to_package().unwrap();
        // Drop the styles part and its registrations.
        package.set_part(CONTENT_TYPES_PART, xml_bytes(&{
            let mut types = blank_content_types();
            types.children.pop();
            types
        }));
        package.set_part(
            DOCUMENT_RELS_PART,
            xml_bytes(&Element::new("Relationships").with_attr("xmlns", RELS_NS)),
        );
        let mut stripped = Package::new();
        for name in package.part_names().filter(|n| *n != STYLES_PART) {
            stripped.set_part(name, package.part(name).unwrap().to_vec());
        }

        let mut doc = Document::from_package(stripped).unwrap();
        assert!(!doc.has_styles());

        let mut report = ApplyReport::new();
        doc.styles()
            .add_style("Callout", StyleKind::Paragraph, None, &RunFormat::new(), &mut report)
            .unwrap();

        let saved = doc.to_package().unwrap();
        assert!(saved.contains(STYLES_PART));
        let types = saved.part_str(CONTENT_TYPES_PART).unwrap().unwrap();
        assert!(types.contains("/word/styles.xml"));
        let rels = saved.part_str(DOCUMENT_RELS_PART).unwrap().unwrap();
        assert!(rels.contains(STYLES_REL));
        assert!(rels.contains("rId1"));
    }

    fn styled_source() -> Document {
        let mut doc = Document::new();
        let mut table = doc.add_table(2, 3);
        table.cell(0, 0).unwrap().set_text("Region");
        table.cell(0, 2).unwrap().set_text("Total");
        table.cell(1, 1).unwrap().set_text("North");
        table
            .element_mut()
            .child_mut("w:tblPr")
            .and_then(|p| p.child_mut("w:tblStyle"))
            .unwrap()
            .set_attr("w:val", "LightShading");
        doc
    }

    #[test]
    fn test_copy_table_falls_back_to_grid() {
        let mut source = styled_source();
        let mut target = Document::new();
        target.add_paragraph("Copied below");

        let table = source.table(0).unwrap();
        let copy = target.copy_table(&table);
        assert_eq!(copy.style_id(), Some("TableGrid"));
        assert_eq!(
            copy.grid_texts(),
            [vec!["Region", "", "Total"], vec!["", "North", ""]]
        );
        assert_eq!(target.table_count(), 1);
    }

    #[test]
    fn test_copy_table_keeps_known_style() {
        let mut source = styled_source();
        let mut target = Document::new();
        target
            .styles()
            .add_style(
                "Light Shading",
                StyleKind::Table,
                None,
                &RunFormat::new(),
                &mut ApplyReport::new(),
            )
            .unwrap();

        let table = source.table(0).unwrap();
        let copy = target.copy_table(&table);
        assert_eq!(copy.style_id(), Some("LightShading"));
        assert_eq!(copy.column_count(), 3);
    }
}
