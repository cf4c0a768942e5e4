//! Owned, mutable XML element tree.
//!
//! Package parts are parsed into [`Element`] trees, mutated in place by the
//! style engine, and serialized again when the package is saved. Names are
//! kept as qualified strings (`w:tc`) exactly as they appear in the source
//! part.

pub mod editor;
mod parse;
mod write;

pub use parse::parse;
pub use write::{to_string, to_string_with_declaration};

/// WordprocessingML main namespace.
pub const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// The reserved `xml:` namespace.
pub const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// A node in the element tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Child element
    Element(Element),
    /// Character data
    Text(String),
}

impl Node {
    /// Get the element if this node is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        }
    }

    /// Get the element mutably if this node is one.
    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        }
    }
}

/// An XML element with ordered attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Qualified name (e.g., `w:shd`)
    pub name: String,

    /// Attributes in document order, including namespace declarations
    pub attributes: Vec<(String, String)>,

    /// Child nodes
    pub children: Vec<Node>,
}

impl Element {
    /// Create a new empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute and return self.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Append a child element and return self.
    pub fn with_child(mut self, child: Element) -> Self {
        self.push(child);
        self
    }

    /// Append a text node and return self.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Check if this element has the given qualified name.
    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    /// Get an attribute value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing any existing value in place.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let pos = self.attributes.iter().position(|(k, _)| k == name)?;
        Some(self.attributes.remove(pos).1)
    }

    /// Iterate over child elements.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Iterate mutably over child elements.
    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(Node::as_element_mut)
    }

    /// Iterate over child elements with the given name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements().filter(move |e| e.name == name)
    }

    /// Iterate mutably over child elements with the given name.
    pub fn children_named_mut<'a>(
        &'a mut self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a mut Element> {
        self.elements_mut().filter(move |e| e.name == name)
    }

    /// First child element with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|e| e.name == name)
    }

    /// First child element with the given name, mutably.
    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.elements_mut().find(|e| e.name == name)
    }

    /// Number of child elements with the given name.
    pub fn count_children(&self, name: &str) -> usize {
        self.children_named(name).count()
    }

    /// Append a child element and return a reference to it.
    pub fn push(&mut self, child: Element) -> &mut Element {
        let index = self.children.len();
        self.insert(index, child)
    }

    /// Insert a child element at a node index and return a reference to it.
    pub fn insert(&mut self, index: usize, child: Element) -> &mut Element {
        let index = index.min(self.children.len());
        self.children.insert(index, Node::Element(child));
        match &mut self.children[index] {
            Node::Element(e) => e,
            Node::Text(_) => unreachable!("element was just inserted"),
        }
    }

    /// Node index of the first child element with the given name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|n| matches!(n, Node::Element(e) if e.name == name))
    }

    /// Concatenated character data of this element and its descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(element: &Element, out: &mut String) {
    for child in &element.children {
        match child {
            Node::Text(t) => out.push_str(t),
            Node::Element(e) => collect_text(e, out),
        }
    }
}
