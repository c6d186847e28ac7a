//! # formbar-rs
//!
//! Declarative form configuration for Rust.
//!
//! This is the meta-crate that re-exports all sub-crates for convenient access.
//! You can depend on `formbar-rs` to get everything, or depend on individual
//! crates for finer-grained control.
//!
//! ```
//! # #[cfg(feature = "config")]
//! # {
//! use formbar_rs::config::Document;
//!
//! let doc = Document::parse(
//!     r#"<configuration>
//!          <entity id="e1" name="email"/>
//!          <form id="f"><field ref="e1"/></form>
//!        </configuration>"#,
//! ).unwrap();
//! assert_eq!(doc.get_form("f").unwrap().field("email").unwrap().label, "Email");
//! # }
//! ```

/// Error types, settings, and logging setup.
pub use formbar_rs_core as core;

/// The rule expression language.
#[cfg(feature = "rules")]
pub use formbar_rs_rules as rules;

/// Document loading and form assembly.
#[cfg(feature = "config")]
pub use formbar_rs_config as config;

/// Command line tooling.
#[cfg(feature = "cli")]
pub use formbar_rs_cli as cli;

pub use formbar_rs_core::{FormbarError, FormbarResult, Settings};

#[cfg(feature = "config")]
pub use formbar_rs_config::{Document, Field, Form};
