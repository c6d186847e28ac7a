//! The `forms` command: lists the forms defined in a document.

use formbar_rs_core::{FormbarError, Settings};

use super::{document_arg, load_document};
use crate::command::ManagementCommand;

pub struct FormsCommand;

impl ManagementCommand for FormsCommand {
    fn name(&self) -> &'static str {
        "forms"
    }

    fn help(&self) -> &'static str {
        "List the forms defined in a document"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(document_arg(true))
    }

    fn handle(&self, matches: &clap::ArgMatches, _settings: &Settings) -> Result<(), FormbarError> {
        let doc = load_document(matches)?;
        let ids = doc.form_ids();
        tracing::debug!(count = ids.len(), "listing forms");
        for id in ids {
            println!("{id}");
        }
        Ok(())
    }
}
