//! # formbar-rs-config
//!
//! Resolution of declarative form documents. A document separates reusable
//! field definitions (`entity`), layout composition (`form`, `page`,
//! `snippet`) and validation rules (`rule`). Elements may point at other
//! elements through a `ref` attribute instead of repeating them.
//!
//! - [`element`] - The immutable element tree and XML loading
//! - [`document`] - Lookup by tag and id with reference chasing
//! - [`field`] - Field descriptors built from entities
//! - [`renderer`] - Renderer overrides for fields
//! - [`form`] - Page and field assembly for one form
//!
//! ## Quick Start
//!
//! ```
//! use formbar_rs_config::Document;
//!
//! let doc = Document::parse(r#"
//!     <configuration>
//!       <source>
//!         <entity id="e1" name="email" required="true"/>
//!       </source>
//!       <form id="signup">
//!         <page label="Account"><field ref="e1"/></page>
//!       </form>
//!     </configuration>
//! "#).unwrap();
//!
//! let form = doc.get_form("signup").unwrap();
//! let field = form.field("email").unwrap();
//! assert_eq!(field.label, "Email");
//! assert!(field.required);
//! assert_eq!(form.pages().unwrap().len(), 1);
//! ```

pub mod document;
pub mod element;
pub mod field;
pub mod form;
pub mod renderer;

pub use document::{Document, ElementStore};
pub use element::Element;
pub use field::{Field, SelectOption};
pub use form::{FieldRegistry, Form};
pub use renderer::Renderer;
