//! The element tree of a form document.
//!
//! An [`Element`] is an owned, immutable node: a tag, an ordered attribute
//! map, child elements and optional text. Trees are produced by [`parse`] or
//! [`load`] from XML, or assembled directly with the builder methods.
//!
//! Only element nodes are kept. An element's text is the text that appears
//! before its first child element; comments and processing instructions are
//! dropped, and text on either side of them is joined. A DOCTYPE
//! declaration is accepted and ignored.

use std::path::Path;

use formbar_rs_core::{FormbarError, FormbarResult};
use indexmap::IndexMap;

/// A node of a parsed form document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    tag: String,
    attributes: IndexMap<String, String>,
    children: Vec<Element>,
    text: Option<String>,
}

impl Element {
    /// Creates an element with the given tag and nothing else.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Sets an attribute, replacing any previous value.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Appends a child element.
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Sets the text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Returns the value of an attribute, if present.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// All attributes in document order.
    pub const fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    pub fn children(&self) -> &[Self] {
        &self.children
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Returns the first direct child with the given tag.
    pub fn child(&self, tag: &str) -> Option<&Self> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// Returns the direct children with the given tag.
    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Self> + 'a {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    /// Iterates over all descendants in document (pre-)order, excluding
    /// `self`.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// Returns every descendant with the given tag, in document order.
    pub fn find_all(&self, tag: &str) -> Vec<&Self> {
        self.descendants().filter(|e| e.tag == tag).collect()
    }
}

/// Pre-order iterator over an element's descendants.
#[derive(Debug, Clone)]
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children.iter().rev());
        Some(next)
    }
}

/// Parses an XML string into its root [`Element`].
///
/// # Errors
///
/// Returns `DocumentParse` if the XML is not well-formed.
pub fn parse(xml: &str) -> FormbarResult<Element> {
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };
    let document = roxmltree::Document::parse_with_options(xml, options)
        .map_err(|e| FormbarError::DocumentParse(e.to_string()))?;
    Ok(convert(document.root_element()))
}

/// Reads and parses the XML file at `path`.
///
/// # Errors
///
/// Returns `IoError` if the file cannot be read and `DocumentParse` if its
/// content is not well-formed.
pub fn load(path: impl AsRef<Path>) -> FormbarResult<Element> {
    let path = path.as_ref();
    let xml = std::fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), bytes = xml.len(), "loaded form document");
    parse(&xml).map_err(|e| match e {
        FormbarError::DocumentParse(msg) => {
            FormbarError::DocumentParse(format!("{}: {msg}", path.display()))
        }
        other => other,
    })
}

fn convert(node: roxmltree::Node<'_, '_>) -> Element {
    Element {
        tag: node.tag_name().name().to_string(),
        attributes: node
            .attributes()
            .map(|attr| (attr.name().to_string(), attr.value().to_string()))
            .collect(),
        children: node
            .children()
            .filter(roxmltree::Node::is_element)
            .map(convert)
            .collect(),
        text: leading_text(node),
    }
}

fn leading_text(node: roxmltree::Node<'_, '_>) -> Option<String> {
    let parts: Vec<&str> = node
        .children()
        .take_while(|child| !child.is_element())
        .filter(roxmltree::Node::is_text)
        .filter_map(|child| child.text())
        .collect();
    (!parts.is_empty()).then(|| parts.concat())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_structure() {
        let root = parse(r#"<a x="1" y="2"><b>hello<c/>tail</b><!-- note --><d/></a>"#).unwrap();
        assert_eq!(root.tag(), "a");
        assert_eq!(root.attr("x"), Some("1"));
        let keys: Vec<&str> = root.attributes().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["x", "y"]);
        assert_eq!(root.children().len(), 2);
        let b = root.child("b").unwrap();
        assert_eq!(b.text(), Some("hello"));
        assert_eq!(b.children()[0].tag(), "c");
        assert_eq!(root.child("d").unwrap().text(), None);
    }

    #[test]
    fn test_text_only_before_first_child() {
        let root = parse("<a><b/>after</a>").unwrap();
        assert_eq!(root.text(), None);

        let root = parse("<c><help><!-- note -->Hello</help></c>").unwrap();
        assert_eq!(root.child("help").unwrap().text(), Some("Hello"));

        let root = parse("<c><help>Hel<?pi x?>lo<!-- n --> world<b/>tail</help></c>").unwrap();
        assert_eq!(root.child("help").unwrap().text(), Some("Hello world"));

        let root = parse("<c><help><!-- only a comment --></help></c>").unwrap();
        assert_eq!(root.child("help").unwrap().text(), None);
    }

    #[test]
    fn test_parse_with_doctype() {
        let root = parse(
            r#"<?xml version="1.0"?>
<!DOCTYPE configuration>
<configuration><form id="f"/></configuration>"#,
        )
        .unwrap();
        assert_eq!(root.tag(), "configuration");
        assert_eq!(root.find_all("form").len(), 1);
    }

    #[test]
    fn test_descendants_preorder_excludes_self() {
        let root = parse("<x><p id='1'><p id='2'/></p><q><p id='3'/></q></x>").unwrap();
        let ids: Vec<&str> = root
            .find_all("p")
            .into_iter()
            .filter_map(|e| e.attr("id"))
            .collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert!(root.find_all("x").is_empty());
    }

    #[test]
    fn test_children_named_is_direct_only() {
        let root = parse("<e><rule/><options><rule/></options><rule/></e>").unwrap();
        assert_eq!(root.children_named("rule").count(), 2);
        assert_eq!(root.find_all("rule").len(), 3);
    }

    #[test]
    fn test_builder_matches_parsed() {
        let built = Element::new("entity")
            .with_attr("id", "e1")
            .with_child(Element::new("help").with_text("Some help"));
        let parsed = parse(r#"<entity id="e1"><help>Some help</help></entity>"#).unwrap();
        assert_eq!(built, parsed);
    }

    #[test]
    fn test_parse_malformed() {
        let err = parse("<a><b></a>").unwrap_err();
        assert!(matches!(err, FormbarError::DocumentParse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("form.xml");
        std::fs::write(&path, "<configuration><form id='f'/></configuration>").unwrap();
        let root = load(&path).unwrap();
        assert_eq!(root.find_all("form").len(), 1);
    }

    #[test]
    fn test_load_errors() {
        assert!(matches!(
            load("/nonexistent/forms.xml"),
            Err(FormbarError::IoError(_))
        ));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.xml");
        std::fs::write(&path, "<configuration>").unwrap();
        let err = load(&path).unwrap_err();
        assert!(err.to_string().contains("broken.xml"));
    }
}
