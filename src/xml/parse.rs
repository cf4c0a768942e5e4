//! XML parsing into the owned element tree.

use super::{Element, Node, XML_NS};
use crate::error::{Error, Result};

/// Parse an XML part into its root element.
///
/// Qualified names keep the prefixes used by the source. Namespace
/// declarations are preserved as `xmlns` attributes on the element that
/// introduced them. Comments and processing instructions are dropped.
pub fn parse(xml: &str) -> Result<Element> {
    let doc = roxmltree::Document::parse(xml)?;
    let root = doc.root_element();
    convert(root, None)
}

fn convert(node: roxmltree::Node<'_, '_>, parent: Option<roxmltree::Node<'_, '_>>) -> Result<Element> {
    let mut element = Element::new(qualified_name(
        node,
        node.tag_name().namespace(),
        node.tag_name().name(),
    )?);

    for ns in node.namespaces() {
        let inherited = parent.is_some_and(|p| {
            p.namespaces()
                .any(|pns| pns.name() == ns.name() && pns.uri() == ns.uri())
        });
        if inherited || ns.uri() == XML_NS {
            continue;
        }
        let attr_name = match ns.name() {
            Some(prefix) => format!("xmlns:{}", prefix),
            None => "xmlns".to_string(),
        };
        element.attributes.push((attr_name, ns.uri().to_string()));
    }

    for attr in node.attributes() {
        let name = qualified_name(node, attr.namespace(), attr.name())?;
        element.attributes.push((name, attr.value().to_string()));
    }

    for child in node.children() {
        if child.is_element() {
            element.children.push(Node::Element(convert(child, Some(node))?));
        } else if child.is_text() {
            if let Some(text) = child.text() {
                element.children.push(Node::Text(text.to_string()));
            }
        }
    }

    Ok(element)
}

fn qualified_name(node: roxmltree::Node<'_, '_>, namespace: Option<&str>, local: &str) -> Result<String> {
    let Some(uri) = namespace else {
        return Ok(local.to_string());
    };
    if uri == XML_NS {
        return Ok(format!("xml:{}", local));
    }
    match node.lookup_prefix(uri) {
        Some("") => Ok(local.to_string()),
        Some(prefix) => Ok(format!("{}:{}", prefix, local)),
        // Default namespace: the element is unprefixed.
        None if node.default_namespace() == Some(uri) => Ok(local.to_string()),
        None => Err(Error::Xml(format!("no prefix bound for namespace {}", uri))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prefixed() {
        let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t xml:space="preserve">Hi &amp; bye</w:t></w:r></w:p></w:body></w:document>"#;
        let root = parse(xml).unwrap();

        assert_eq!(root.name, "w:document");
        assert_eq!(
            root.attr("xmlns:w"),
            Some("http://schemas.openxmlformats.org/wordprocessingml/2006/main")
        );

        let t = root
            .child("w:body")
            .and_then(|b| b.child("w:p"))
            .and_then(|p| p.child("w:r"))
            .and_then(|r| r.child("w:t"))
            .unwrap();
        assert_eq!(t.attr("xml:space"), Some("preserve"));
        assert_eq!(t.text(), "Hi & bye");
    }

    #[test]
    fn test_parse_default_namespace() {
        let xml = r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#;
        let root = parse(xml).unwrap();

        assert_eq!(root.name, "Types");
        assert!(root.attr("xmlns").is_some());
        assert_eq!(
            root.child("Default").and_then(|d| d.attr("Extension")),
            Some("xml")
        );
    }

    #[test]
    fn test_nested_declarations_not_repeated() {
        let xml = r#"<a:root xmlns:a="urn:a"><a:child><b:leaf xmlns:b="urn:b"/></a:child></a:root>"#;
        let root = parse(xml).unwrap();
        let child = root.child("a:child").unwrap();

        assert!(child.attr("xmlns:a").is_none());
        assert_eq!(child.child("b:leaf").unwrap().attr("xmlns:b"), Some("urn:b"));
    }

    #[test]
    fn test_parse_malformed() {
        let result = parse("<w:p>");
        assert!(matches!(result, Err(Error::Xml(_))));
    }
}
