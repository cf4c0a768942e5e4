//! Custom style creation.

use super::{ApplyReport, RunFormat};
use crate::error::Result;
use crate::model::{Document, StyleKind};

/// Create a named style in the document's style definitions.
///
/// The styles part is created if the package has none. `base_style` may be
/// a style name or id; an unknown base is left out and recorded in the
/// report. Fails with [`Error::StyleExists`](crate::Error::StyleExists) when
/// the name is taken.
pub fn create_style(
    document: &mut Document,
    name: &str,
    kind: StyleKind,
    base_style: Option<&str>,
    font: &RunFormat,
) -> Result<ApplyReport> {
    let mut report = ApplyReport::new();
    let id = document
        .styles()
        .add_style(name, kind, base_style, font, &mut report)?;
    log::debug!("Created style '{}' with id {}", name, id);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_create_style_roundtrip() {
        let mut doc = Document::new();
        let font = RunFormat::new().italic(true).font_name("Georgia").color_name("purple");

        let report = create_style(&mut doc, "Side Note", StyleKind::Paragraph, Some("Normal"), &font)
            .unwrap();
        assert!(report.is_clean());

        let bytes = doc.to_bytes().unwrap();
        let mut reopened = Document::from_bytes(&bytes).unwrap();
        let styles = reopened.styles();
        let style = styles.find("side note").unwrap();

        assert_eq!(style.attr("w:styleId"), Some("SideNote"));
        assert_eq!(style.attr("w:customStyle"), Some("1"));
        let rpr = style.child("w:rPr").unwrap();
        assert_eq!(rpr.child("w:color").and_then(|c| c.attr("w:val")), Some("800080"));
        assert_eq!(rpr.child("w:rFonts").and_then(|f| f.attr("w:ascii")), Some("Georgia"));
    }

    #[test]
    fn test_create_style_twice() {
        let mut doc = Document::new();
        create_style(&mut doc, "Quote Block", StyleKind::Paragraph, None, &RunFormat::new()).unwrap();

        let err = create_style(&mut doc, "Quote Block", StyleKind::Paragraph, None, &RunFormat::new())
            .unwrap_err();
        assert!(matches!(err, Error::StyleExists(ref name) if name == "Quote Block"));
    }
}
