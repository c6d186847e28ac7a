//! Renderer overrides attached to fields.

use indexmap::IndexMap;
use serde::Serialize;

use crate::element::Element;

/// Rendering configuration from a field's `renderer` child.
///
/// Only `type` is interpreted. Every other attribute is kept as written and
/// can be looked up by name with [`Renderer::get`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Renderer {
    #[serde(rename = "type")]
    render_type: Option<String>,
    attributes: IndexMap<String, String>,
}

impl Renderer {
    /// Builds a renderer from a `renderer` element.
    pub fn from_element(element: &Element) -> Self {
        Self {
            render_type: element.attr("type").map(str::to_string),
            attributes: element.attributes().clone(),
        }
    }

    /// The renderer kind, e.g. `textarea` or `radio`.
    pub fn render_type(&self) -> Option<&str> {
        self.render_type.as_deref()
    }

    /// Returns any attribute of the renderer element by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub const fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_and_open_attributes() {
        let element = Element::new("renderer")
            .with_attr("type", "textarea")
            .with_attr("rows", "5");
        let renderer = Renderer::from_element(&element);
        assert_eq!(renderer.render_type(), Some("textarea"));
        assert_eq!(renderer.get("rows"), Some("5"));
        assert_eq!(renderer.get("type"), Some("textarea"));
        assert_eq!(renderer.get("cols"), None);
    }

    #[test]
    fn test_without_type() {
        let renderer = Renderer::from_element(&Element::new("renderer"));
        assert_eq!(renderer.render_type(), None);
        assert!(renderer.attributes().is_empty());
    }

    #[test]
    fn test_serialize() {
        let element = Element::new("renderer")
            .with_attr("type", "radio")
            .with_attr("align", "vertical");
        let json = serde_json::to_value(Renderer::from_element(&element)).unwrap();
        assert_eq!(json["type"], "radio");
        assert_eq!(json["attributes"]["align"], "vertical");
    }
}
