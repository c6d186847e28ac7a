//! Form assembly.
//!
//! A [`Form`] wraps one `form` element and expands its structure: `page`
//! elements into an ordered page list, and `field` elements into a registry
//! of [`Field`]s keyed by name. `snippet` elements that carry a `ref` are
//! included by recursively expanding the snippet they point at.
//!
//! Field resolution happens once per form. [`Form::resolve`] performs the
//! walk and caches the registry; every later call, from any thread, returns
//! the cached result.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

use formbar_rs_core::logging::form_span;
use formbar_rs_core::{FormbarError, FormbarResult};
use indexmap::IndexMap;
use once_cell::sync::OnceCell;

use crate::document::{Document, ElementStore};
use crate::element::Element;
use crate::field::{flag, Field};

/// Fields of a form keyed by name, in order of first appearance.
pub type FieldRegistry = IndexMap<String, Field>;

#[derive(Debug, Default)]
struct Resolved {
    fields: FieldRegistry,
    ref_names: HashMap<String, String>,
}

/// One form definition bound to the store it was found in.
pub struct Form<'a, S: ElementStore + ?Sized = Document> {
    store: &'a S,
    element: &'a Element,
    id: String,
    readonly: bool,
    css: String,
    autocomplete: String,
    method: String,
    action: String,
    enctype: String,
    resolved: OnceCell<Resolved>,
}

impl<'a, S: ElementStore + ?Sized> Form<'a, S> {
    /// Creates an unresolved form from a `form` element.
    ///
    /// Nothing is looked up until [`resolve`](Self::resolve), [`fields`](Self::fields)
    /// or [`pages`](Self::pages) is called. Use [`Document::get_form`] to get
    /// a form that is already resolved.
    pub fn new(element: &'a Element, store: &'a S) -> Self {
        let text = |name: &str, default: &str| element.attr(name).unwrap_or(default).to_string();
        Self {
            store,
            element,
            id: text("id", ""),
            readonly: flag(element, "readonly"),
            css: text("css", ""),
            autocomplete: text("autocomplete", "on"),
            method: text("method", "POST"),
            action: text("action", ""),
            enctype: text("enctype", ""),
            resolved: OnceCell::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether every field of the form is forced to be readonly.
    pub const fn readonly(&self) -> bool {
        self.readonly
    }

    pub fn css(&self) -> &str {
        &self.css
    }

    pub fn autocomplete(&self) -> &str {
        &self.autocomplete
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn enctype(&self) -> &str {
        &self.enctype
    }

    /// The underlying `form` element.
    pub const fn element(&self) -> &'a Element {
        self.element
    }

    /// Returns `true` once the field registry has been built.
    pub fn is_resolved(&self) -> bool {
        self.resolved.get().is_some()
    }

    /// Builds the field registry if that has not happened yet.
    ///
    /// Concurrent callers block until the first walk finishes. A failed walk
    /// caches nothing, so a later call walks again and fails the same way.
    ///
    /// # Errors
    ///
    /// Returns `MalformedField` for a `field` without `ref` or an entity
    /// without `name`, `NotFound` for an unresolvable entity or snippet,
    /// `CycleDetected` for snippets that include themselves, and any lookup
    /// or rule parse error.
    pub fn resolve(&self) -> FormbarResult<&FieldRegistry> {
        self.resolved
            .get_or_try_init(|| {
                let _span = form_span(&self.id).entered();
                tracing::debug!("resolving fields");
                let mut resolved = Resolved::default();
                self.collect_fields(self.element, &mut resolved, &mut Vec::new())?;
                tracing::debug!(count = resolved.fields.len(), "fields resolved");
                Ok(resolved)
            })
            .map(|resolved| &resolved.fields)
    }

    /// The field registry of the whole form.
    ///
    /// # Errors
    ///
    /// See [`resolve`](Self::resolve).
    pub fn fields(&self) -> FormbarResult<&FieldRegistry> {
        self.resolve()
    }

    /// Collects the fields below `root`.
    ///
    /// Once the form is resolved the cached registry is returned whatever
    /// `root` is.
    ///
    /// # Errors
    ///
    /// See [`resolve`](Self::resolve).
    pub fn fields_in(&self, root: &'a Element) -> FormbarResult<Cow<'_, FieldRegistry>> {
        if let Some(resolved) = self.resolved.get() {
            return Ok(Cow::Borrowed(&resolved.fields));
        }
        let mut resolved = Resolved::default();
        self.collect_fields(root, &mut resolved, &mut Vec::new())?;
        Ok(Cow::Owned(resolved.fields))
    }

    /// Returns the field with the given name.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the form has no such field, or any error from
    /// [`resolve`](Self::resolve).
    pub fn field(&self, name: &str) -> FormbarResult<&Field> {
        self.resolve()?.get(name).ok_or_else(|| {
            tracing::error!(form = %self.id, field = name, "field not found");
            FormbarError::NotFound(format!(
                "Field '{name}' is not part of form '{}'",
                self.id
            ))
        })
    }

    /// Maps an entity identifier to the name of the field built from it.
    ///
    /// # Errors
    ///
    /// Any error from [`resolve`](Self::resolve).
    pub fn field_name_for_ref(&self, entity_id: &str) -> FormbarResult<Option<&str>> {
        self.resolve()?;
        Ok(self
            .resolved
            .get()
            .and_then(|resolved| resolved.ref_names.get(entity_id))
            .map(String::as_str))
    }

    /// All pages of the form in depth-first order, snippets expanded.
    ///
    /// Pages are not cached and not deduplicated: a snippet included twice
    /// contributes its pages twice.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a dangling snippet reference and
    /// `CycleDetected` for snippets that include themselves.
    pub fn pages(&self) -> FormbarResult<Vec<&'a Element>> {
        self.pages_in(self.element)
    }

    /// Like [`pages`](Self::pages), starting at `root`.
    ///
    /// # Errors
    ///
    /// See [`pages`](Self::pages).
    pub fn pages_in(&self, root: &'a Element) -> FormbarResult<Vec<&'a Element>> {
        let mut pages = Vec::new();
        self.collect_pages(root, &mut pages, &mut Vec::new())?;
        Ok(pages)
    }

    fn collect_pages(
        &self,
        root: &'a Element,
        pages: &mut Vec<&'a Element>,
        path: &mut Vec<&'a Element>,
    ) -> FormbarResult<()> {
        pages.extend(root.find_all("page"));
        for snippet in self.referenced_snippets(root, path.as_slice())? {
            path.push(snippet);
            self.collect_pages(snippet, pages, path)?;
            path.pop();
        }
        Ok(())
    }

    fn collect_fields(
        &self,
        root: &'a Element,
        resolved: &mut Resolved,
        path: &mut Vec<&'a Element>,
    ) -> FormbarResult<()> {
        for reference in root.find_all("field") {
            let Some(entity_id) = reference.attr("ref").filter(|r| !r.is_empty()) else {
                tracing::error!(form = %self.id, "field without ref");
                return Err(FormbarError::MalformedField(format!(
                    "field without ref in form '{}'",
                    self.id
                )));
            };
            let Some(entity) = self.store.resolve("entity", entity_id)? else {
                tracing::error!(form = %self.id, entity = entity_id, "entity not found");
                return Err(FormbarError::NotFound(format!(
                    "Entity '{entity_id}' referenced in form '{}' can not be found",
                    self.id
                )));
            };

            let mut field = Field::from_entity(entity)?;
            if self.readonly {
                field.readonly = true;
            }
            tracing::trace!(entity = entity_id, field = %field.name, "resolved field");
            resolved
                .ref_names
                .insert(entity_id.to_string(), field.name.clone());
            resolved.fields.insert(field.name.clone(), field);
        }

        for snippet in self.referenced_snippets(root, path.as_slice())? {
            path.push(snippet);
            self.collect_fields(snippet, resolved, path)?;
            path.pop();
        }
        Ok(())
    }

    /// Resolves the referencing `snippet` elements below `root`.
    ///
    /// `path` holds the snippets currently being expanded; meeting one of
    /// them again is a cycle.
    fn referenced_snippets(
        &self,
        root: &'a Element,
        path: &[&'a Element],
    ) -> FormbarResult<Vec<&'a Element>> {
        let mut snippets = Vec::new();
        for reference in root.find_all("snippet") {
            let Some(snippet_id) = reference.attr("ref").filter(|r| !r.is_empty()) else {
                continue;
            };
            let Some(snippet) = self.store.resolve("snippet", snippet_id)? else {
                tracing::error!(form = %self.id, snippet = snippet_id, "snippet not found");
                return Err(FormbarError::NotFound(format!(
                    "Snippet '{snippet_id}' referenced in form '{}' can not be found",
                    self.id
                )));
            };
            if path.iter().any(|open| std::ptr::eq(*open, snippet)) {
                tracing::warn!(form = %self.id, snippet = snippet_id, "snippet includes itself");
                return Err(FormbarError::CycleDetected(format!(
                    "snippet '{snippet_id}' includes itself in form '{}'",
                    self.id
                )));
            }
            snippets.push(snippet);
        }
        Ok(snippets)
    }
}

impl<S: ElementStore + ?Sized> fmt::Debug for Form<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Form")
            .field("id", &self.id)
            .field("readonly", &self.readonly)
            .field("method", &self.method)
            .field("action", &self.action)
            .field("resolved", &self.is_resolved())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingStore {
        doc: Document,
        lookups: AtomicUsize,
    }

    impl ElementStore for CountingStore {
        fn resolve(&self, tag: &str, id: &str) -> FormbarResult<Option<&Element>> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.doc.resolve(tag, id)
        }
    }

    const DOC: &str = r#"
        <configuration>
          <source>
            <entity id="e1" name="a" label="First"/>
            <entity id="e2" name="b"/>
            <entity id="e3" name="a" label="Second"/>
            <snippet id="s1"><field ref="e3"/></snippet>
          </source>
          <form id="f1" method="GET" css="narrow">
            <page id="p1"><field ref="e1"/></page>
            <page id="p2"><field ref="e2"/><snippet ref="s1"/></page>
          </form>
        </configuration>
    "#;

    #[test]
    fn test_attribute_defaults() {
        let doc = Document::parse("<c><form id='f'/></c>").unwrap();
        let element = doc.resolve("form", "f").unwrap().unwrap();
        let form = Form::new(element, &doc);
        assert_eq!(form.id(), "f");
        assert!(!form.readonly());
        assert_eq!(form.css(), "");
        assert_eq!(form.autocomplete(), "on");
        assert_eq!(form.method(), "POST");
        assert_eq!(form.action(), "");
        assert_eq!(form.enctype(), "");
        assert!(!form.is_resolved());
    }

    #[test]
    fn test_attributes_from_element() {
        let doc = Document::parse(DOC).unwrap();
        let form = doc.get_form("f1").unwrap();
        assert_eq!(form.method(), "GET");
        assert_eq!(form.css(), "narrow");
        assert!(form.is_resolved());
    }

    #[test]
    fn test_last_write_wins_first_position_kept() {
        let doc = Document::parse(DOC).unwrap();
        let form = doc.get_form("f1").unwrap();
        let fields = form.fields().unwrap();
        let names: Vec<&str> = fields.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(fields["a"].label, "Second");
        assert_eq!(form.field_name_for_ref("e1").unwrap(), Some("a"));
        assert_eq!(form.field_name_for_ref("e3").unwrap(), Some("a"));
        assert_eq!(form.field_name_for_ref("nope").unwrap(), None);
    }

    #[test]
    fn test_resolution_walks_once() {
        let store = CountingStore {
            doc: Document::parse(DOC).unwrap(),
            lookups: AtomicUsize::new(0),
        };
        let element = store.doc.resolve("form", "f1").unwrap().unwrap();
        let form = Form::new(element, &store);

        let first = form.resolve().unwrap().len();
        let after_first = store.lookups.load(Ordering::SeqCst);
        assert!(after_first > 0);

        let second = form.resolve().unwrap().len();
        form.fields().unwrap();
        form.field("b").unwrap();
        assert_eq!(first, second);
        assert_eq!(store.lookups.load(Ordering::SeqCst), after_first);
    }

    #[test]
    fn test_fields_in_before_and_after_resolve() {
        let doc = Document::parse(DOC).unwrap();
        let element = doc.resolve("form", "f1").unwrap().unwrap();
        let form = Form::new(element, &doc);
        let page = doc.resolve("page", "p1").unwrap().unwrap();

        let partial = form.fields_in(page).unwrap();
        assert_eq!(partial.len(), 1);
        assert!(matches!(partial, Cow::Owned(_)));
        assert!(!form.is_resolved());

        form.resolve().unwrap();
        let cached = form.fields_in(page).unwrap();
        assert!(matches!(cached, Cow::Borrowed(_)));
        assert_eq!(cached.len(), 2);
    }

    #[test]
    fn test_failed_resolve_caches_nothing() {
        let doc = Document::parse(
            "<c><form id='f'><field ref='missing'/></form></c>",
        )
        .unwrap();
        let element = doc.resolve("form", "f").unwrap().unwrap();
        let form = Form::new(element, &doc);
        assert!(matches!(form.resolve(), Err(FormbarError::NotFound(_))));
        assert!(!form.is_resolved());
        assert!(matches!(form.resolve(), Err(FormbarError::NotFound(_))));
    }

    #[test]
    fn test_shared_across_threads() {
        let doc = Document::parse(DOC).unwrap();
        let element = doc.resolve("form", "f1").unwrap().unwrap();
        let form = Form::new(element, &doc);
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| assert_eq!(form.fields().unwrap().len(), 2));
            }
        });
        assert!(form.is_resolved());
    }

    #[test]
    fn test_debug_output() {
        let doc = Document::parse(DOC).unwrap();
        let form = doc.get_form("f1").unwrap();
        let debug = format!("{form:?}");
        assert!(debug.contains("\"f1\""));
        assert!(debug.contains("resolved: true"));
    }
}
