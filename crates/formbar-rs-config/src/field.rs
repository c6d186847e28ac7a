//! Field descriptors.
//!
//! A [`Field`] is built from a resolved `entity` element. Attributes map to
//! plain struct fields with their defaults applied; the `options`, `help`,
//! `renderer` and `rule` children become typed sub-structures.

use formbar_rs_core::text::capitalize;
use formbar_rs_core::{FormbarError, FormbarResult};
use formbar_rs_rules::Rule;
use serde::Serialize;

use crate::element::Element;
use crate::renderer::Renderer;

/// One choice of a select, radio or checkbox field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    /// The text shown to the user.
    pub text: Option<String>,
    /// The submitted value.
    pub value: Option<String>,
}

/// A resolved form field.
///
/// # Examples
///
/// ```
/// use formbar_rs_config::{Element, Field};
///
/// let entity = Element::new("entity")
///     .with_attr("name", "email")
///     .with_attr("required", "true");
/// let field = Field::from_entity(&entity).unwrap();
/// assert_eq!(field.label, "Email");
/// assert!(field.required);
/// assert!(!field.readonly);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub id: Option<String>,
    /// The submission key and registry key. Never empty.
    pub name: String,
    /// Display label. Defaults to the capitalized name; an explicit empty
    /// label means no label is rendered.
    pub label: String,
    /// Ordering number shown next to the label.
    pub number: String,
    /// Datatype tag used for value conversion.
    #[serde(rename = "type")]
    pub field_type: Option<String>,
    pub css: String,
    pub required: bool,
    /// May be forced to `true` by a readonly form.
    pub readonly: bool,
    pub autocomplete: String,
    pub options: Vec<SelectOption>,
    pub help: Option<String>,
    pub renderer: Option<Renderer>,
    pub rules: Vec<Rule>,
}

impl Field {
    /// Builds a field from an `entity` element.
    ///
    /// # Errors
    ///
    /// Returns `MalformedField` if the entity has no usable `name`, and the
    /// parser's `ExpressionSyntax` error if one of its rules does not parse.
    pub fn from_entity(entity: &Element) -> FormbarResult<Self> {
        let name = match entity.attr("name") {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => {
                let id = entity.attr("id").unwrap_or("<anonymous>");
                tracing::error!(entity = id, "entity without a name");
                return Err(FormbarError::MalformedField(format!(
                    "entity '{id}' has no name"
                )));
            }
        };

        let label = entity
            .attr("label")
            .map_or_else(|| capitalize(&name), str::to_string);

        let options = entity
            .child("options")
            .map(|options| {
                options
                    .children()
                    .iter()
                    .map(|option| SelectOption {
                        text: option.text().map(str::to_string),
                        value: option.attr("value").map(str::to_string),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let rules = entity
            .children_named("rule")
            .map(|rule| {
                Rule::parse(
                    rule.attr("expr").unwrap_or_default(),
                    rule.attr("msg"),
                    rule.attr("mode"),
                )
            })
            .collect::<FormbarResult<Vec<_>>>()?;

        Ok(Self {
            id: entity.attr("id").map(str::to_string),
            label,
            number: entity.attr("number").unwrap_or_default().to_string(),
            field_type: entity.attr("type").map(str::to_string),
            css: entity.attr("css").unwrap_or_default().to_string(),
            required: flag(entity, "required"),
            readonly: flag(entity, "readonly"),
            autocomplete: entity.attr("autocomplete").unwrap_or("on").to_string(),
            options,
            help: entity
                .child("help")
                .and_then(Element::text)
                .map(str::to_string),
            renderer: entity.child("renderer").map(Renderer::from_element),
            rules,
            name,
        })
    }
}

/// Boolean attributes are set only by the literal string `true`.
pub(crate) fn flag(element: &Element, name: &str) -> bool {
    element.attr(name) == Some("true")
}
