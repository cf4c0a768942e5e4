//! Paragraph and run views.

use crate::style::RunFormat;
use crate::xml::{editor, Element, Node};

/// A paragraph (`w:p`) borrowed from the document tree.
#[derive(Debug)]
pub struct Paragraph<'a> {
    el: &'a mut Element,
}

impl<'a> Paragraph<'a> {
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

    /// Text of the paragraph: its direct runs, concatenated.
    pub fn text(&self) -> String {
        self.el.children_named("w:r").map(run_text).collect()
    }

    /// Length of [`Paragraph::text`] in characters.
    pub fn char_len(&self) -> usize {
        self.el
            .children_named("w:r")
            .map(|r| run_text(r).chars().count())
            .sum()
    }

    /// Number of direct runs.
    pub fn run_count(&self) -> usize {
        self.el.count_children("w:r")
    }

    /// Iterate over direct runs.
    pub fn runs(&mut self) -> impl Iterator<Item = Run<'_>> {
        self.el.children_named_mut("w:r").map(Run::new)
    }

    /// Get a run by index.
    pub fn run(&mut self, index: usize) -> Option<Run<'_>> {
        self.el.children_named_mut("w:r").nth(index).map(Run::new)
    }

    /// Append a plain run with the given text.
    pub fn add_run(&mut self, text: &str) -> Run<'_> {
        Run::new(self.el.push(build_run(None, text)))
    }

    /// Remove every direct run. Returns how many were removed.
    pub fn clear_runs(&mut self) -> usize {
        editor::remove_children(self.el, "w:r")
    }
}

/// A run (`w:r`) borrowed from the document tree.
#[derive(Debug)]
pub struct Run<'a> {
    el: &'a mut Element,
}

impl<'a> Run<'a> {
    pub(crate) fn new(el: &'a mut Element) -> Self {
        Self { el }
    }

    /// The underlying element.
    pub fn element(&self) -> &Element {
        &*self.el
    }

    /// Text of the run.
    pub fn text(&self) -> String {
        run_text(self.el)
    }

    /// Get or create the run properties (`w:rPr`).
    pub fn properties(&mut self) -> &mut Element {
        editor::properties(self.el, "w:rPr")
    }

    /// Apply a partial format.
    pub fn apply(&mut self, format: &RunFormat) {
        if !format.is_empty() {
            format.apply_to(self.properties());
        }
    }

    /// Bold state, if set on the run.
    pub fn bold(&self) -> Option<bool> {
        self.toggle("w:b")
    }

    /// Italic state, if set on the run.
    pub fn italic(&self) -> Option<bool> {
        self.toggle("w:i")
    }

    /// Underline keyword, if set on the run.
    pub fn underline(&self) -> Option<&str> {
        self.prop("w:u").and_then(|u| u.attr("w:val"))
    }

    /// Font color hex, if set on the run.
    pub fn color(&self) -> Option<&str> {
        self.prop("w:color").and_then(|c| c.attr("w:val"))
    }

    /// Font size in points, if set on the run.
    pub fn font_size(&self) -> Option<f32> {
        self.prop("w:sz")
            .and_then(|s| s.attr("w:val"))
            .and_then(|v| v.parse::<f32>().ok())
            .map(|half_points| half_points / 2.0)
    }

    /// Font family, if set on the run.
    pub fn font_name(&self) -> Option<&str> {
        self.prop("w:rFonts").and_then(|f| f.attr("w:ascii"))
    }

    fn prop(&self, tag: &str) -> Option<&Element> {
        self.el.child("w:rPr").and_then(|rpr| rpr.child(tag))
    }

    fn toggle(&self, tag: &str) -> Option<bool> {
        self.prop(tag).map(|el| {
            !matches!(
                el.attr("w:val"),
                Some("0") | Some("false") | Some("off")
            )
        })
    }
}

/// Text contributed by a run: `w:t` text, tabs and breaks.
pub(crate) fn run_text(run: &Element) -> String {
    let mut text = String::new();
    for child in run.elements() {
        match child.name.as_str() {
            "w:t" => text.push_str(&child.text()),
            "w:tab" => text.push('\t'),
            "w:br" | "w:cr" => text.push('\n'),
            _ => {}
        }
    }
    text
}

/// Whether a run child carries text (and is rebuilt when a run is split).
pub(crate) fn is_text_child(el: &Element) -> bool {
    matches!(el.name.as_str(), "w:t" | "w:tab" | "w:br" | "w:cr")
}

/// Build a run from optional properties and text.
pub(crate) fn build_run(properties: Option<&Element>, text: &str) -> Element {
    let mut run = Element::new("w:r");
    if let Some(rpr) = properties {
        run.push(rpr.clone());
    }
    for child in text_content(text) {
        run.push(child);
    }
    run
}

/// Markup for a text span: `w:t` segments separated by `w:tab`/`w:br`.
pub(crate) fn text_content(text: &str) -> Vec<Element> {
    let mut out = Vec::new();
    let mut segment = String::new();
    for c in text.chars() {
        let special = match c {
            '\t' => Some("w:tab"),
            '\n' => Some("w:br"),
            _ => None,
        };
        match special {
            Some(tag) => {
                flush_segment(&mut segment, &mut out);
                out.push(Element::new(tag));
            }
            None => segment.push(c),
        }
    }
    flush_segment(&mut segment, &mut out);
    out
}

fn flush_segment(segment: &mut String, out: &mut Vec<Element>) {
    if segment.is_empty() {
        return;
    }
    let mut t = Element::new("w:t");
    if segment.starts_with(char::is_whitespace) || segment.ends_with(char::is_whitespace) {
        t.set_attr("xml:space", "preserve");
    }
    t.children.push(Node::Text(std::mem::take(segment)));
    out.push(t);
}
