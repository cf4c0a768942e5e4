//! Character-range formatting inside a paragraph.

use super::{RunFormat, SplitMode};
use crate::error::{Error, Result};
use crate::model::{build_run, is_text_child, run_text, Paragraph};
use crate::xml::{editor, Element, Node};

/// Apply `format` to characters `start..end` of the paragraph's text and
/// return the formatted substring.
///
/// Positions count Unicode scalar values over the text of the paragraph's
/// direct runs, end exclusive. The range must satisfy
/// `0 <= start < end <= len`; otherwise [`Error::InvalidTextRange`] is
/// returned and the paragraph is left as it was.
///
/// With [`SplitMode::Preserve`] only runs crossing a range boundary are
/// split, and every piece keeps the run's own properties. With
/// [`SplitMode::Flatten`] all direct runs are replaced by at most three
/// fresh runs (plain prefix, formatted target, plain suffix).
pub fn format_text_range(
    paragraph: &mut Paragraph<'_>,
    start: i64,
    end: i64,
    format: &RunFormat,
    mode: SplitMode,
) -> Result<String> {
    let len = paragraph.char_len();
    if start < 0 || end > len as i64 || start >= end {
        return Err(Error::InvalidTextRange { start, end, len });
    }
    let (start, end) = (start as usize, end as usize);

    let text: Vec<char> = paragraph.text().chars().collect();
    let target: String = text[start..end].iter().collect();

    match mode {
        SplitMode::Preserve => {
            let runs = split_preserving(paragraph.element_mut(), start, end, format);
            log::debug!("Formatted '{}' across {} runs", target, runs);
        }
        SplitMode::Flatten => {
            let prefix: String = text[..start].iter().collect();
            let suffix: String = text[end..].iter().collect();
            flatten(paragraph, &prefix, &target, &suffix, format);
            log::debug!("Formatted '{}' (runs flattened)", target);
        }
    }

    Ok(target)
}

/// Split runs at the range boundaries and format the runs inside.
/// Returns how many runs received the format.
fn split_preserving(p: &mut Element, start: usize, end: usize, format: &RunFormat) -> usize {
    let mut formatted = 0;
    let mut offset = 0;
    let mut i = 0;

    while i < p.children.len() {
        let run = match &p.children[i] {
            Node::Element(e) if e.is("w:r") => e,
            _ => {
                i += 1;
                continue;
            }
        };

        let chars: Vec<char> = run_text(run).chars().collect();
        let (run_start, run_end) = (offset, offset + chars.len());
        offset = run_end;

        if chars.is_empty() || run_end <= start || run_start >= end {
            i += 1;
            continue;
        }

        if run_start >= start && run_end <= end {
            if let Node::Element(run) = &mut p.children[i] {
                apply(run, format);
            }
            formatted += 1;
            i += 1;
            continue;
        }

        // The run crosses a boundary: cut it into up to three pieces.
        let cut_a = start.max(run_start) - run_start;
        let cut_b = end.min(run_end) - run_start;
        let spans = [(0, cut_a, false), (cut_a, cut_b, true), (cut_b, chars.len(), false)];

        let mut pieces = Vec::with_capacity(3);
        for (from, to, inside) in spans {
            if from == to {
                continue;
            }
            let piece_text: String = chars[from..to].iter().collect();
            let mut piece = if pieces.is_empty() {
                rebuild(run, &piece_text)
            } else {
                build_run(run.child("w:rPr"), &piece_text)
            };
            if inside {
                apply(&mut piece, format);
                formatted += 1;
            }
            pieces.push(Node::Element(piece));
        }

        let count = pieces.len();
        p.children.splice(i..=i, pieces);
        i += count;
    }

    formatted
}

/// Copy of `run` with its text content replaced. Non-text children stay.
fn rebuild(run: &Element, text: &str) -> Element {
    let mut piece = run.clone();
    piece
        .children
        .retain(|n| !matches!(n, Node::Element(e) if is_text_child(e)));
    piece
        .children
        .extend(build_run(None, text).children);
    piece
}

fn apply(run: &mut Element, format: &RunFormat) {
    if !format.is_empty() {
        format.apply_to(editor::properties(run, "w:rPr"));
    }
}

fn flatten(paragraph: &mut Paragraph<'_>, prefix: &str, target: &str, suffix: &str, format: &RunFormat) {
    paragraph.clear_runs();
    if !prefix.is_empty() {
        paragraph.add_run(prefix);
    }
    paragraph.add_run(target).apply(format);
    if !suffix.is_empty() {
        paragraph.add_run(suffix);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Rgb;

    fn rpr(children: &[&str]) -> Element {
        children
            .iter()
            .fold(Element::new("w:rPr"), |e, tag| e.with_child(Element::new(*tag)))
    }

    /// "Hello " (italic) + "brave new" (plain) + " world" (underlined)
    fn paragraph_xml() -> Element {
        Element::new("w:p")
            .with_child(Element::new("w:pPr"))
            .with_child(build_run(Some(&rpr(&["w:i"])), "Hello "))
            .with_child(build_run(None, "brave new"))
            .with_child(build_run(Some(&rpr(&["w:u"])), " world"))
    }

    fn runs(el: &mut Element) -> Vec<(String, Option<bool>, Option<bool>)> {
        let mut p = Paragraph::new(el);
        p.runs().map(|r| (r.text(), r.bold(), r.italic())).collect()
    }

    #[test]
    fn test_preserve_splits_boundaries() {
        let mut el = paragraph_xml();
        let mut p = Paragraph::new(&mut el);

        let target =
            format_text_range(&mut p, 3, 12, &RunFormat::new().bold(true), SplitMode::Preserve).unwrap();
        assert_eq!(target, "lo brave ");
        assert_eq!(p.text(), "Hello brave new world");

        assert_eq!(
            runs(&mut el),
            [
                ("Hel".to_string(), None, Some(true)),
                ("lo ".to_string(), Some(true), Some(true)),
                ("brave ".to_string(), Some(true), None),
                ("new".to_string(), None, None),
                (" world".to_string(), None, None),
            ]
        );
    }

    #[test]
    fn test_preserve_keeps_untouched_runs() {
        let mut el = paragraph_xml();
        let untouched = el.children[3].clone();
        let mut p = Paragraph::new(&mut el);

        format_text_range(&mut p, 6, 15, &RunFormat::new().color(Rgb(255, 0, 0)), SplitMode::Preserve)
            .unwrap();

        assert_eq!(el.children.len(), 4);
        assert_eq!(el.children[3], untouched);
        let mut p = Paragraph::new(&mut el);
        assert_eq!(p.run(1).unwrap().color(), Some("FF0000"));
        assert_eq!(p.run(0).unwrap().color(), None);
    }

    #[test]
    fn test_flatten_three_runs() {
        let mut el = paragraph_xml();
        let mut p = Paragraph::new(&mut el);

        let target =
            format_text_range(&mut p, 6, 11, &RunFormat::new().bold(true), SplitMode::Flatten).unwrap();
        assert_eq!(target, "brave");

        assert_eq!(
            runs(&mut el),
            [
                ("Hello ".to_string(), None, None),
                ("brave".to_string(), Some(true), None),
                (" new world".to_string(), None, None),
            ]
        );
    }

    #[test]
    fn test_flatten_whole_paragraph() {
        let mut el = paragraph_xml();
        let mut p = Paragraph::new(&mut el);
        let len = p.char_len() as i64;

        format_text_range(&mut p, 0, len, &RunFormat::new().italic(true), SplitMode::Flatten).unwrap();
        assert_eq!(p.run_count(), 1);
        assert_eq!(p.run(0).unwrap().italic(), Some(true));
    }

    #[test]
    fn test_invalid_ranges_leave_paragraph() {
        let original = paragraph_xml();
        for (start, end) in [(-1, 3), (5, 5), (7, 3), (0, 22)] {
            let mut el = original.clone();
            let mut p = Paragraph::new(&mut el);
            let err = format_text_range(&mut p, start, end, &RunFormat::new().bold(true), SplitMode::Preserve)
                .unwrap_err();
            assert!(matches!(err, Error::InvalidTextRange { len: 21, .. }));
            assert_eq!(el, original);
        }
    }

    #[test]
    fn test_multibyte_positions() {
        let mut el = Element::new("w:p").with_child(build_run(None, "안녕하세요 world"));
        let mut p = Paragraph::new(&mut el);

        let target =
            format_text_range(&mut p, 0, 5, &RunFormat::new().bold(true), SplitMode::Preserve).unwrap();
        assert_eq!(target, "안녕하세요");
        assert_eq!(p.run_count(), 2);
        assert_eq!(p.run(0).unwrap().bold(), Some(true));
    }

    #[test]
    fn test_tab_counts_as_character() {
        let mut el = Element::new("w:p").with_child(build_run(None, "a\tb"));
        let mut p = Paragraph::new(&mut el);

        let target =
            format_text_range(&mut p, 2, 3, &RunFormat::new().bold(true), SplitMode::Preserve).unwrap();
        assert_eq!(target, "b");
        assert_eq!(p.text(), "a\tb");
    }
}
