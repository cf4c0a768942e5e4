//! Serialization of the element tree back to XML text.

use super::{Element, Node};

const DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Serialize an element (without XML declaration).
pub fn to_string(element: &Element) -> String {
    let mut out = String::new();
    write_element(element, &mut out);
    out
}

/// Serialize a root element as a complete part, declaration first.
pub fn to_string_with_declaration(element: &Element) -> String {
    let mut out = String::with_capacity(DECLARATION.len() + 2);
    out.push_str(DECLARATION);
    out.push_str("\r\n");
    write_element(element, &mut out);
    out
}

fn write_element(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&element.name);
    for (name, value) in &element.attributes {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        escape_attr(value, out);
        out.push('"');
    }

    if element.children.is_empty() {
        out.push_str("/>");
        return;
    }

    out.push('>');
    for child in &element.children {
        match child {
            Node::Element(e) => write_element(e, out),
            Node::Text(t) => escape_text(t, out),
        }
    }
    out.push_str("</");
    out.push_str(&element.name);
    out.push('>');
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\t' => out.push_str("&#9;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse;

    #[test]
    fn test_empty_element() {
        let el = Element::new("w:shd")
            .with_attr("w:val", "clear")
            .with_attr("w:fill", "FF0000");
        assert_eq!(to_string(&el), r#"<w:shd w:val="clear" w:fill="FF0000"/>"#);
    }

    #[test]
    fn test_escaping() {
        let el = Element::new("w:t")
            .with_attr("w:note", "a \"b\" & c")
            .with_text("1 < 2 & 3");
        assert_eq!(
            to_string(&el),
            r#"<w:t w:note="a &quot;b&quot; &amp; c">1 &lt; 2 &amp; 3</w:t>"#
        );
    }

    #[test]
    fn test_reparse_preserves_tree() {
        let xml = r#"<w:p xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve"> x &amp; y </w:t></w:r></w:p>"#;
        let tree = parse(xml).unwrap();
        let written = to_string_with_declaration(&tree);

        assert!(written.starts_with("<?xml"));
        assert_eq!(parse(&written).unwrap(), tree);
    }
}
