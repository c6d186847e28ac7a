//! Built-in commands.
//!
//! Each command implements the
//! [`ManagementCommand`](crate::command::ManagementCommand) trait.

pub mod check;
pub mod forms;
pub mod inspect;

pub use check::CheckCommand;
pub use forms::FormsCommand;
pub use inspect::InspectCommand;

use std::path::PathBuf;

use formbar_rs_config::Document;
use formbar_rs_core::{FormbarError, FormbarResult};

use crate::command::CommandRegistry;

/// Registers all built-in commands into the given registry.
pub fn register_builtin_commands(registry: &mut CommandRegistry) {
    registry.register(Box::new(FormsCommand));
    registry.register(Box::new(InspectCommand));
    registry.register(Box::new(CheckCommand));
}

/// The positional document argument shared by the commands.
pub(crate) fn document_arg(required: bool) -> clap::Arg {
    clap::Arg::new("file")
        .value_name("FILE")
        .required(required)
        .value_parser(clap::value_parser!(PathBuf))
        .help("Form document (XML)")
}

/// Loads the document named by the `file` argument.
pub(crate) fn load_document(matches: &clap::ArgMatches) -> FormbarResult<Document> {
    let path = matches
        .get_one::<PathBuf>("file")
        .ok_or_else(|| FormbarError::ConfigurationError("No document given".to_string()))?;
    Document::load(path)
}
