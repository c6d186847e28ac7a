//! # formbar-rs-core
//!
//! Core types shared by every formbar-rs crate. This crate has no framework
//! dependencies and provides the foundation for the rest of the workspace.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Runtime settings with sensible defaults
//! - [`settings_loader`] - Loading settings from TOML/JSON files and the environment
//! - [`logging`] - Tracing-based logging integration
//! - [`text`] - String helpers

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;
pub mod text;

// Re-export the most commonly used types at the crate root.
pub use error::{FormbarError, FormbarResult};
pub use settings::Settings;
