//! Property-tree editing primitives.
//!
//! These are the only functions that insert or remove property fragments.
//! They are purely structural: they never look at attribute values, so
//! domain validation (colors, keywords) happens before they are called.

use super::Element;
use crate::style::{BorderEdge, BorderSpec};

/// Schema order of the children of `w:tcPr`.
pub const TC_PR_ORDER: &[&str] = &[
    "w:cnfStyle",
    "w:tcW",
    "w:gridSpan",
    "w:hMerge",
    "w:vMerge",
    "w:tcBorders",
    "w:shd",
    "w:noWrap",
    "w:tcMar",
    "w:textDirection",
    "w:tcFitText",
    "w:vAlign",
    "w:hideMark",
];

/// Schema order of the children of `w:tcBorders`.
pub const TC_BORDERS_ORDER: &[&str] = &[
    "w:top",
    "w:start",
    "w:left",
    "w:bottom",
    "w:end",
    "w:right",
    "w:insideH",
    "w:insideV",
    "w:tl2br",
    "w:tr2bl",
];

/// Schema order of the children of `w:rPr`.
pub const R_PR_ORDER: &[&str] = &[
    "w:rStyle",
    "w:rFonts",
    "w:b",
    "w:bCs",
    "w:i",
    "w:iCs",
    "w:caps",
    "w:smallCaps",
    "w:strike",
    "w:dstrike",
    "w:outline",
    "w:shadow",
    "w:emboss",
    "w:imprint",
    "w:noProof",
    "w:snapToGrid",
    "w:vanish",
    "w:webHidden",
    "w:color",
    "w:spacing",
    "w:w",
    "w:kern",
    "w:position",
    "w:sz",
    "w:szCs",
    "w:highlight",
    "w:u",
    "w:effect",
    "w:bdr",
    "w:shd",
    "w:fitText",
    "w:vertAlign",
    "w:rtl",
    "w:cs",
    "w:em",
    "w:lang",
    "w:eastAsianLayout",
    "w:specVanish",
    "w:oMath",
];

/// Schema order of the children of `w:style`.
pub const STYLE_ORDER: &[&str] = &[
    "w:name",
    "w:aliases",
    "w:basedOn",
    "w:next",
    "w:link",
    "w:autoRedefine",
    "w:hidden",
    "w:uiPriority",
    "w:semiHidden",
    "w:unhideWhenUsed",
    "w:qFormat",
    "w:locked",
    "w:personal",
    "w:personalCompose",
    "w:personalReply",
    "w:rsid",
    "w:pPr",
    "w:rPr",
    "w:tblPr",
    "w:trPr",
    "w:tcPr",
    "w:tblStylePr",
];

/// Return the first child named `tag`, appending an empty one if absent.
///
/// At most one child is created per call. Pre-existing duplicates are left
/// alone.
pub fn find_or_create_child<'a>(container: &'a mut Element, tag: &str) -> &'a mut Element {
    match container.position(tag) {
        Some(index) => element_at(container, index),
        None => container.push(Element::new(tag)),
    }
}

/// Like [`find_or_create_child`], but a new child is inserted at its
/// position in `order` instead of at the end.
pub fn find_or_create_child_ordered<'a>(
    container: &'a mut Element,
    tag: &str,
    order: &[&str],
) -> &'a mut Element {
    match container.position(tag) {
        Some(index) => element_at(container, index),
        None => {
            let index = ordered_index(container, tag, order);
            container.insert(index, Element::new(tag))
        }
    }
}

/// Remove every child with the fragment's tag, then append the fragment.
pub fn replace_fragment<'a>(container: &'a mut Element, fragment: Element) -> &'a mut Element {
    remove_children(container, &fragment.name);
    container.push(fragment)
}

/// Remove every child with the fragment's tag, then insert the fragment at
/// its schema position.
pub fn replace_fragment_ordered<'a>(
    container: &'a mut Element,
    fragment: Element,
    order: &[&str],
) -> &'a mut Element {
    remove_children(container, &fragment.name);
    let index = ordered_index(container, &fragment.name, order);
    container.insert(index, fragment)
}

/// Append an edge definition to a `w:tcBorders` container.
///
/// No check is made for an existing edge of the same name; repeated calls
/// accumulate edge elements.
pub fn append_border_edge<'a>(
    borders: &'a mut Element,
    edge: BorderEdge,
    spec: &BorderSpec,
) -> &'a mut Element {
    borders.push(spec.to_element(edge))
}

/// Remove every child element named `tag`. Returns how many were removed.
pub fn remove_children(container: &mut Element, tag: &str) -> usize {
    let before = container.children.len();
    container
        .children
        .retain(|n| !matches!(n, super::Node::Element(e) if e.name == tag));
    before - container.children.len()
}

/// Get or create a property container that must be the first child element
/// (`w:tcPr` in `w:tc`, `w:rPr` in `w:r`, `w:pPr` in `w:p`).
pub fn properties<'a>(owner: &'a mut Element, tag: &str) -> &'a mut Element {
    match owner.position(tag) {
        Some(index) => element_at(owner, index),
        None => owner.insert(0, Element::new(tag)),
    }
}

/// Node index before which `tag` should be inserted to respect `order`.
///
/// Tags missing from `order` go to the end.
fn ordered_index(container: &Element, tag: &str, order: &[&str]) -> usize {
    let Some(rank) = order.iter().position(|t| *t == tag) else {
        return container.children.len();
    };
    let later = &order[rank + 1..];
    container
        .children
        .iter()
        .position(|n| matches!(n, super::Node::Element(e) if later.contains(&e.name.as_str())))
        .unwrap_or(container.children.len())
}

fn element_at(container: &mut Element, index: usize) -> &mut Element {
    match &mut container.children[index] {
        super::Node::Element(e) => e,
        super::Node::Text(_) => unreachable!("position() only returns element indices"),
    }
}
