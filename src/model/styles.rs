//! Style definitions part (`word/styles.xml`).

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::style::{ApplyReport, RunFormat};
use crate::xml::editor::{find_or_create_child_ordered, STYLE_ORDER};
use crate::xml::{Element, W_NS};

/// Kind of a named style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleKind {
    /// Paragraph style (default)
    #[default]
    Paragraph,
    /// Character style
    Character,
    /// Table style
    Table,
    /// Numbering style
    Numbering,
}

impl StyleKind {
    /// Value of `w:style/@w:type`.
    pub fn as_val(self) -> &'static str {
        match self {
            StyleKind::Paragraph => "paragraph",
            StyleKind::Character => "character",
            StyleKind::Table => "table",
            StyleKind::Numbering => "numbering",
        }
    }
}

/// The style definitions of a document.
#[derive(Debug)]
pub struct StyleRegistry<'a> {
    root: &'a mut Element,
}

impl<'a> StyleRegistry<'a> {
    pub(crate) fn new(root: &'a mut Element) -> Self {
        Self { root }
    }

    /// Number of style definitions.
    pub fn len(&self) -> usize {
        self.root.count_children("w:style")
    }

    /// Check if there are no style definitions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Display names of all styles.
    pub fn names(&self) -> Vec<String> {
        self.root
            .children_named("w:style")
            .filter_map(style_name)
            .map(str::to_string)
            .collect()
    }

    /// Find a style by display name (case-insensitive) or by style id.
    pub fn find(&self, name_or_id: &str) -> Option<&Element> {
        self.root
            .children_named("w:style")
            .find(|s| style_name(s).is_some_and(|n| n.eq_ignore_ascii_case(name_or_id)))
            .or_else(|| {
                self.root
                    .children_named("w:style")
                    .find(|s| s.attr("w:styleId") == Some(name_or_id))
            })
    }

    /// Check if a style with this display name or id exists.
    pub fn contains(&self, name_or_id: &str) -> bool {
        self.find(name_or_id).is_some()
    }

    /// Style id for a display name or id.
    pub fn style_id(&self, name_or_id: &str) -> Option<&str> {
        self.find(name_or_id).and_then(|s| s.attr("w:styleId"))
    }

    /// Add a custom style and return its style id.
    ///
    /// `base_style` is resolved by name or id; an unknown base is recorded in
    /// `report` and left out.
    pub fn add_style(
        &mut self,
        name: &str,
        kind: StyleKind,
        base_style: Option<&str>,
        font: &RunFormat,
        report: &mut ApplyReport,
    ) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidParameter("style name must not be empty".into()));
        }
        if self
            .root
            .children_named("w:style")
            .any(|s| style_name(s).is_some_and(|n| n.eq_ignore_ascii_case(name)))
        {
            return Err(Error::StyleExists(name.to_string()));
        }

        let based_on = base_style.and_then(|base| match self.style_id(base) {
            Some(id) => Some(id.to_string()),
            None => {
                report.degrade("base_style", base, "none");
                None
            }
        });

        let style_id = self.unique_id(name);
        let mut style = Element::new("w:style")
            .with_attr("w:type", kind.as_val())
            .with_attr("w:customStyle", "1")
            .with_attr("w:styleId", style_id.as_str())
            .with_child(Element::new("w:name").with_attr("w:val", name));
        if let Some(id) = based_on {
            style.push(Element::new("w:basedOn").with_attr("w:val", id));
        }
        style.push(Element::new("w:qFormat"));
        if !font.is_empty() {
            let rpr = find_or_create_child_ordered(&mut style, "w:rPr", STYLE_ORDER);
            font.apply_to(rpr);
        }

        log::debug!("Adding {} style '{}' ({})", kind.as_val(), name, style_id);
        self.root.push(style);
        Ok(style_id)
    }

    fn unique_id(&self, name: &str) -> String {
        let base = id_regex().replace_all(name, "").into_owned();
        let base = if base.is_empty() { "Style".to_string() } else { base };
        let taken = |id: &str| {
            self.root
                .children_named("w:style")
                .any(|s| s.attr("w:styleId") == Some(id))
        };
        if !taken(&base) {
            return base;
        }
        (1..)
            .map(|n| format!("{}{}", base, n))
            .find(|candidate| !taken(candidate))
            .unwrap_or(base)
    }
}

fn id_regex() -> &'static Regex {
    static ID: OnceLock<Regex> = OnceLock::new();
    ID.get_or_init(|| Regex::new(r"[^\p{L}\p{N}_-]+").expect("valid style id pattern"))
}

fn style_name(style: &Element) -> Option<&str> {
    style.child("w:name").and_then(|n| n.attr("w:val"))
}

/// Style definitions for a blank document.
pub(crate) fn default_styles() -> Element {
    let rpr_default = Element::new("w:rPrDefault").with_child(
        Element::new("w:rPr")
            .with_child(
                Element::new("w:rFonts")
                    .with_attr("w:ascii", "Calibri")
                    .with_attr("w:hAnsi", "Calibri"),
            )
            .with_child(Element::new("w:sz").with_attr("w:val", "22")),
    );

    let edge = |tag: &str| {
        Element::new(tag)
            .with_attr("w:val", "single")
            .with_attr("w:sz", "4")
            .with_attr("w:space", "0")
            .with_attr("w:color", "auto")
    };
    let grid_borders = ["w:top", "w:left", "w:bottom", "w:right", "w:insideH", "w:insideV"]
        .into_iter()
        .fold(Element::new("w:tblBorders"), |b, tag| b.with_child(edge(tag)));

    Element::new("w:styles")
        .with_attr("xmlns:w", W_NS)
        .with_child(Element::new("w:docDefaults").with_child(rpr_default))
        .with_child(
            Element::new("w:style")
                .with_attr("w:type", "paragraph")
                .with_attr("w:default", "1")
                .with_attr("w:styleId", "Normal")
                .with_child(Element::new("w:name").with_attr("w:val", "Normal"))
                .with_child(Element::new("w:qFormat")),
        )
        .with_child(
            Element::new("w:style")
                .with_attr("w:type", "character")
                .with_attr("w:default", "1")
                .with_attr("w:styleId", "DefaultParagraphFont")
                .with_child(Element::new("w:name").with_attr("w:val", "Default Paragraph Font"))
                .with_child(Element::new("w:uiPriority").with_attr("w:val", "1"))
                .with_child(Element::new("w:semiHidden"))
                .with_child(Element::new("w:unhideWhenUsed")),
        )
        .with_child(
            Element::new("w:style")
                .with_attr("w:type", "table")
                .with_attr("w:default", "1")
                .with_attr("w:styleId", "TableNormal")
                .with_child(Element::new("w:name").with_attr("w:val", "Normal Table"))
                .with_child(Element::new("w:semiHidden"))
                .with_child(Element::new("w:unhideWhenUsed")),
        )
        .with_child(
            Element::new("w:style")
                .with_attr("w:type", "table")
                .with_attr("w:styleId", "TableGrid")
                .with_child(Element::new("w:name").with_attr("w:val", "Table Grid"))
                .with_child(Element::new("w:basedOn").with_attr("w:val", "TableNormal"))
                .with_child(Element::new("w:tblPr").with_child(grid_borders)),
        )
}
