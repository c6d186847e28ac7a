//! # formbar-rs-cli
//!
//! Command line tooling for formbar form documents.
//!
//! - **Command framework** - The [`ManagementCommand`] trait and the
//!   [`CommandRegistry`] that dispatches to registered commands
//! - **Built-in commands** - `forms`, `inspect` and `check`
//!
//! ## Quick Start
//!
//! ```rust
//! use formbar_rs_cli::command::CommandRegistry;
//! use formbar_rs_cli::commands::register_builtin_commands;
//!
//! let mut registry = CommandRegistry::new();
//! register_builtin_commands(&mut registry);
//!
//! let names = registry.list_commands();
//! assert_eq!(names, vec!["check", "forms", "inspect"]);
//! ```

// These clippy lints are intentionally allowed:
// - doc_markdown: backtick requirements for documentation items are too strict
// - missing_const_for_fn: some functions may gain runtime logic later
// - print_stdout: commands write their results to stdout
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::print_stdout)]

pub mod command;
pub mod commands;

pub use command::{CommandRegistry, ManagementCommand};
