//! Typed style fragments and operation reports.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::color::{resolve_text_color, ColorInput, Rgb};
use crate::xml::editor::{replace_fragment_ordered, R_PR_ORDER};
use crate::xml::Element;

/// Border line style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    /// No border (`nil`)
    None,
    /// Single line (default)
    #[default]
    Single,
    /// Double line
    Double,
    /// Thick line
    Thick,
}

impl BorderStyle {
    /// Markup keyword written to `w:val`.
    pub fn as_val(self) -> &'static str {
        match self {
            BorderStyle::None => "nil",
            BorderStyle::Single => "single",
            BorderStyle::Double => "double",
            BorderStyle::Thick => "thick",
        }
    }

    /// Parse a caller keyword (case-insensitive).
    pub fn parse(keyword: &str) -> Option<Self> {
        match keyword.trim().to_ascii_lowercase().as_str() {
            "none" => Some(BorderStyle::None),
            "single" => Some(BorderStyle::Single),
            "double" => Some(BorderStyle::Double),
            "thick" => Some(BorderStyle::Thick),
            _ => None,
        }
    }

    /// Parse a keyword, falling back to `Single` for anything unknown.
    pub fn from_keyword(keyword: &str, report: &mut ApplyReport) -> Self {
        Self::parse(keyword).unwrap_or_else(|| {
            report.degrade("border_style", keyword, "single");
            BorderStyle::Single
        })
    }
}

/// One edge of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderEdge {
    Top,
    Left,
    Bottom,
    Right,
}

impl BorderEdge {
    /// All four edges, in schema order.
    pub const ALL: [BorderEdge; 4] = [
        BorderEdge::Top,
        BorderEdge::Left,
        BorderEdge::Bottom,
        BorderEdge::Right,
    ];

    /// Element name inside `w:tcBorders`.
    pub fn tag(self) -> &'static str {
        match self {
            BorderEdge::Top => "w:top",
            BorderEdge::Left => "w:left",
            BorderEdge::Bottom => "w:bottom",
            BorderEdge::Right => "w:right",
        }
    }
}

/// Line definition for a cell edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorderSpec {
    /// Line style
    pub style: BorderStyle,

    /// Width in eighths of a point
    pub size: u32,

    /// Spacing in points
    pub space: u32,

    /// Hex color or `auto`
    pub color: String,
}

impl BorderSpec {
    /// Create a spec with default width 4, spacing 0, color `auto`.
    pub fn new(style: BorderStyle) -> Self {
        Self {
            style,
            size: 4,
            space: 0,
            color: "auto".to_string(),
        }
    }

    /// Set the width (eighths of a point).
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    /// Set the color.
    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color.to_hex();
        self
    }

    /// Build the edge element.
    pub fn to_element(&self, edge: BorderEdge) -> Element {
        Element::new(edge.tag())
            .with_attr("w:val", self.style.as_val())
            .with_attr("w:sz", self.size.to_string())
            .with_attr("w:space", self.space.to_string())
            .with_attr("w:color", self.color.as_str())
    }
}

/// Recognized `w:shd/@w:val` keywords.
const SHADING_PATTERNS: &[&str] = &[
    "clear",
    "solid",
    "nil",
    "horzStripe",
    "vertStripe",
    "reverseDiagStripe",
    "diagStripe",
    "horzCross",
    "diagCross",
    "thinHorzStripe",
    "thinVertStripe",
    "thinReverseDiagStripe",
    "thinDiagStripe",
    "thinHorzCross",
    "thinDiagCross",
    "pct5",
    "pct10",
    "pct12",
    "pct15",
    "pct20",
    "pct25",
    "pct30",
    "pct35",
    "pct37",
    "pct40",
    "pct45",
    "pct50",
    "pct55",
    "pct60",
    "pct62",
    "pct65",
    "pct70",
    "pct75",
    "pct80",
    "pct85",
    "pct87",
    "pct90",
    "pct95",
];

/// A shading pattern keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShadingPattern(&'static str);

impl ShadingPattern {
    /// Plain background fill.
    pub const CLEAR: ShadingPattern = ShadingPattern("clear");

    /// Parse a keyword. Matching ignores ASCII case.
    pub fn parse(keyword: &str) -> Option<Self> {
        let keyword = keyword.trim();
        SHADING_PATTERNS
            .iter()
            .find(|p| p.eq_ignore_ascii_case(keyword))
            .map(|p| ShadingPattern(*p))
    }

    /// Markup keyword.
    pub fn as_str(self) -> &'static str {
        self.0
    }
}

impl Default for ShadingPattern {
    fn default() -> Self {
        Self::CLEAR
    }
}

impl fmt::Display for ShadingPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl Serialize for ShadingPattern {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

/// Foreground color of a shading pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternColor {
    #[default]
    Auto,
    Rgb(Rgb),
}

impl fmt::Display for PatternColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternColor::Auto => f.write_str("auto"),
            PatternColor::Rgb(rgb) => rgb.fmt(f),
        }
    }
}

/// Cell background shading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShadingSpec {
    /// Pattern keyword
    pub pattern: ShadingPattern,

    /// Background fill; omitted from markup when absent
    pub fill: Option<Rgb>,

    /// Pattern foreground color
    pub pattern_color: PatternColor,
}

impl ShadingSpec {
    /// Clear pattern with a solid background fill.
    pub fn fill(color: Rgb) -> Self {
        Self {
            fill: Some(color),
            ..Self::default()
        }
    }

    /// Build a spec from caller values, degrading bad ones.
    ///
    /// A malformed fill drops only the fill; an unknown pattern becomes
    /// `clear`; a malformed pattern color becomes `auto`.
    pub fn resolve(
        fill: Option<&ColorInput>,
        pattern: &str,
        pattern_color: &str,
        report: &mut ApplyReport,
    ) -> Self {
        let fill = fill.and_then(|input| match input.to_hex().and_then(|h| Rgb::from_hex(&h)) {
            Ok(rgb) => Some(rgb),
            Err(_) => {
                report.degrade("fill_color", &input.to_string(), "none");
                None
            }
        });

        let pattern = ShadingPattern::parse(pattern).unwrap_or_else(|| {
            report.degrade("pattern", pattern, "clear");
            ShadingPattern::CLEAR
        });

        let pattern_color = if pattern_color.trim().eq_ignore_ascii_case("auto") {
            PatternColor::Auto
        } else {
            match Rgb::from_hex(pattern_color) {
                Ok(rgb) => PatternColor::Rgb(rgb),
                Err(_) => {
                    report.degrade("pattern_color", pattern_color, "auto");
                    PatternColor::Auto
                }
            }
        };

        Self {
            pattern,
            fill,
            pattern_color,
        }
    }

    /// Build the `w:shd` element.
    pub fn to_element(&self) -> Element {
        let mut shd = Element::new("w:shd")
            .with_attr("w:val", self.pattern.as_str())
            .with_attr("w:color", self.pattern_color.to_string());
        if let Some(fill) = self.fill {
            shd.set_attr("w:fill", fill.to_hex());
        }
        shd
    }
}

/// Partial run formatting. Unset fields leave a run as it was.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunFormat {
    /// Bold on/off
    pub bold: Option<bool>,

    /// Italic on/off
    pub italic: Option<bool>,

    /// Single underline on/off
    pub underline: Option<bool>,

    /// Font color
    pub color: Option<Rgb>,

    /// Font size in points
    pub font_size: Option<f32>,

    /// Font family
    pub font_name: Option<String>,
}

impl RunFormat {
    /// Create an empty format.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set bold.
    pub fn bold(mut self, on: bool) -> Self {
        self.bold = Some(on);
        self
    }

    /// Set italic.
    pub fn italic(mut self, on: bool) -> Self {
        self.italic = Some(on);
        self
    }

    /// Set underline.
    pub fn underline(mut self, on: bool) -> Self {
        self.underline = Some(on);
        self
    }

    /// Set the font color.
    pub fn color(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }

    /// Set the font color from a name or hex string; see
    /// [`resolve_text_color`].
    pub fn color_name(mut self, name: &str) -> Self {
        self.color = Some(resolve_text_color(name));
        self
    }

    /// Set the font size in points. Sizes that are not positive are ignored.
    pub fn font_size(mut self, points: f32) -> Self {
        self.font_size = Some(points).filter(|p| *p > 0.0);
        self
    }

    /// Set the font family.
    pub fn font_name(mut self, name: impl Into<String>) -> Self {
        self.font_name = Some(name.into());
        self
    }

    /// Check if no field is set.
    pub fn is_empty(&self) -> bool {
        self.bold.is_none()
            && self.italic.is_none()
            && self.underline.is_none()
            && self.color.is_none()
            && self.font_size.is_none()
            && self.font_name.is_none()
    }

    /// Write the set fields into a `w:rPr` container.
    pub fn apply_to(&self, rpr: &mut Element) {
        if let Some(name) = &self.font_name {
            let fonts = crate::xml::editor::find_or_create_child_ordered(rpr, "w:rFonts", R_PR_ORDER);
            fonts.set_attr("w:ascii", name.as_str());
            fonts.set_attr("w:hAnsi", name.as_str());
        }
        if let Some(on) = self.bold {
            replace_fragment_ordered(rpr, toggle("w:b", on), R_PR_ORDER);
        }
        if let Some(on) = self.italic {
            replace_fragment_ordered(rpr, toggle("w:i", on), R_PR_ORDER);
        }
        if let Some(color) = self.color {
            replace_fragment_ordered(
                rpr,
                Element::new("w:color").with_attr("w:val", color.to_hex()),
                R_PR_ORDER,
            );
        }
        if let Some(points) = self.font_size.filter(|p| *p > 0.0) {
            let half_points = (points * 2.0).round().max(1.0) as u32;
            replace_fragment_ordered(
                rpr,
                Element::new("w:sz").with_attr("w:val", half_points.to_string()),
                R_PR_ORDER,
            );
        }
        if let Some(on) = self.underline {
            let val = if on { "single" } else { "none" };
            replace_fragment_ordered(rpr, Element::new("w:u").with_attr("w:val", val), R_PR_ORDER);
        }
    }
}

fn toggle(tag: &str, on: bool) -> Element {
    let el = Element::new(tag);
    if on {
        el
    } else {
        el.with_attr("w:val", "0")
    }
}

/// Two-color alternation keyed by zero-based row parity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowColorPolicy {
    /// Color for rows 0, 2, 4, ...
    pub even: ColorInput,

    /// Color for rows 1, 3, 5, ...
    pub odd: ColorInput,
}

impl RowColorPolicy {
    /// Create a policy.
    pub fn new(even: impl Into<ColorInput>, odd: impl Into<ColorInput>) -> Self {
        Self {
            even: even.into(),
            odd: odd.into(),
        }
    }

    /// Color for the given row.
    pub fn color_for(&self, row: usize) -> &ColorInput {
        if row % 2 == 0 {
            &self.even
        } else {
            &self.odd
        }
    }
}

impl Default for RowColorPolicy {
    fn default() -> Self {
        Self::new("FFFFFF", "F2F2F2")
    }
}

/// A domain value that was ignored or replaced by a fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Degradation {
    /// Parameter name
    pub field: String,
    /// Rejected value
    pub value: String,
    /// What was used instead
    pub fallback: String,
}

/// A cell that failed during a best-effort operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellFailure {
    pub row: usize,
    pub col: usize,
    pub message: String,
}

/// Outcome of a style operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyReport {
    /// Number of cells whose properties were written
    pub cells: usize,

    /// Number of runs whose properties were written
    pub runs: usize,

    /// Values that were ignored or replaced
    pub degraded: Vec<Degradation>,

    /// Cells that failed (best-effort mode only)
    pub failures: Vec<CellFailure>,
}

impl ApplyReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a degraded value. Repeats of the same field and value are
    /// recorded once.
    pub fn degrade(&mut self, field: &str, value: &str, fallback: &str) {
        if self
            .degraded
            .iter()
            .any(|d| d.field == field && d.value == value)
        {
            return;
        }
        log::warn!("Ignoring {} '{}', using {}", field, value, fallback);
        self.degraded.push(Degradation {
            field: field.to_string(),
            value: value.to_string(),
            fallback: fallback.to_string(),
        });
    }

    /// Fold another report into this one.
    pub fn merge(&mut self, other: ApplyReport) {
        self.cells += other.cells;
        self.runs += other.runs;
        for d in other.degraded {
            self.degrade(&d.field, &d.value, &d.fallback);
        }
        self.failures.extend(other.failures);
    }

    /// True when nothing was degraded and nothing failed.
    pub fn is_clean(&self) -> bool {
        self.degraded.is_empty() && self.failures.is_empty()
    }

    /// True when the operation had nothing to act on.
    pub fn is_noop(&self) -> bool {
        self.cells == 0 && self.runs == 0
    }
}
