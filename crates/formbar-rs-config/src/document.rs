//! The document store.
//!
//! A [`Document`] owns the element tree of one form document and answers
//! lookups by tag and identifier. Elements that carry a `ref` attribute are
//! indirections: looking one up yields the element it points at, following
//! chains of references until a definition is reached.
//!
//! Identifiers are expected to be unique per tag. This is not checked when
//! the document is loaded; a lookup that matches more than one element fails
//! with [`FormbarError::AmbiguousElement`].

use std::collections::HashSet;
use std::path::Path;

use formbar_rs_core::{FormbarError, FormbarResult};

use crate::element::{self, Element};
use crate::form::Form;

/// Lookup interface used while assembling forms.
///
/// [`Document`] is the production implementation. Wrappers can implement it
/// to observe or restrict the lookups a [`Form`] performs.
pub trait ElementStore {
    /// Resolves `(tag, id)` to a definition, chasing `ref` attributes.
    ///
    /// An empty `id` matches on the tag alone. Returns `Ok(None)` when
    /// nothing matches.
    fn resolve(&self, tag: &str, id: &str) -> FormbarResult<Option<&Element>>;
}

/// A parsed form document.
///
/// `Document` is immutable and `Send + Sync`; any number of [`Form`]s may
/// borrow it concurrently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Document {
    /// Wraps an already parsed element tree.
    pub const fn from_element(root: Element) -> Self {
        Self { root }
    }

    /// Parses a document from an XML string.
    ///
    /// # Errors
    ///
    /// Returns `DocumentParse` if the XML is not well-formed.
    pub fn parse(xml: &str) -> FormbarResult<Self> {
        element::parse(xml).map(Self::from_element)
    }

    /// Loads a document from an XML file.
    ///
    /// # Errors
    ///
    /// Returns `IoError` or `DocumentParse`.
    pub fn load(path: impl AsRef<Path>) -> FormbarResult<Self> {
        element::load(path).map(Self::from_element)
    }

    pub const fn root(&self) -> &Element {
        &self.root
    }

    /// Returns every element with the given tag, in document order.
    ///
    /// The root element itself is never included.
    pub fn find_all(&self, tag: &str) -> Vec<&Element> {
        self.root.find_all(tag)
    }

    /// Resolves `(tag, id)` to a definition.
    ///
    /// - more than one match fails with `AmbiguousElement`;
    /// - a single match with a non-empty `ref` is replaced by the result of
    ///   resolving `(tag, ref)`;
    /// - no match yields `Ok(None)`.
    ///
    /// A `ref` chain that revisits an identifier fails with `CycleDetected`.
    pub fn resolve(&self, tag: &str, id: &str) -> FormbarResult<Option<&Element>> {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut current = id;

        loop {
            visited.insert(current);

            let mut matches = self.root.descendants().filter(move |e| {
                e.tag() == tag && (current.is_empty() || e.attr("id") == Some(current))
            });
            let Some(found) = matches.next() else {
                tracing::trace!(tag, id = current, "no element found");
                return Ok(None);
            };
            if matches.next().is_some() {
                let count = 2 + matches.count();
                tracing::warn!(tag, id = current, count, "ambiguous element lookup");
                return Err(FormbarError::AmbiguousElement(format!(
                    "{count} '{tag}' elements match id '{current}'"
                )));
            }

            match found.attr("ref").filter(|r| !r.is_empty()) {
                Some(next_id) if visited.contains(next_id) => {
                    tracing::warn!(tag, id, next_id, "reference cycle");
                    return Err(FormbarError::CycleDetected(format!(
                        "'{tag}' reference chain starting at '{id}' returns to '{next_id}'"
                    )));
                }
                Some(next_id) => {
                    tracing::trace!(tag, from = current, to = next_id, "following reference");
                    current = next_id;
                }
                None => return Ok(Some(found)),
            }
        }
    }

    /// Builds and resolves the form with the given identifier.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such form exists, and any error raised while
    /// resolving the form's fields. A form is never returned half-resolved.
    pub fn get_form(&self, id: &str) -> FormbarResult<Form<'_>> {
        let Some(element) = self.resolve("form", id)? else {
            tracing::error!(id, "form not found");
            return Err(FormbarError::NotFound(format!(
                "Form with id '{id}' can not be found"
            )));
        };
        let form = Form::new(element, self);
        form.resolve()?;
        Ok(form)
    }

    /// Returns the identifiers of all form definitions, in document order.
    ///
    /// Forms without an `id` and forms that only reference another form are
    /// skipped.
    pub fn form_ids(&self) -> Vec<&str> {
        self.find_all("form")
            .into_iter()
            .filter(|f| f.attr("ref").map_or(true, str::is_empty))
            .filter_map(|f| f.attr("id"))
            .filter(|id| !id.is_empty())
            .collect()
    }
}

impl ElementStore for Document {
    fn resolve(&self, tag: &str, id: &str) -> FormbarResult<Option<&Element>> {
        Self::resolve(self, tag, id)
    }
}
