//! The `inspect` command.
//!
//! Assembles one form and prints it as JSON: the form's attributes, its
//! pages, and every field with options, help, renderer and rules. Rules are
//! shown by their source expression together with the field variables they
//! reference and the parsed tree.

use formbar_rs_config::{Element, Field, Form};
use formbar_rs_core::{FormbarError, FormbarResult, Settings};
use serde::Serialize;
use serde_json::Value;

use super::{document_arg, load_document};
use crate::command::ManagementCommand;

pub struct InspectCommand;

#[derive(Serialize)]
struct FormView<'f> {
    id: &'f str,
    readonly: bool,
    css: &'f str,
    autocomplete: &'f str,
    method: &'f str,
    action: &'f str,
    enctype: &'f str,
    pages: Vec<PageView<'f>>,
    fields: Vec<&'f Field>,
}

#[derive(Serialize)]
struct PageView<'f> {
    id: Option<&'f str>,
    label: Option<&'f str>,
}

impl<'f> From<&'f Element> for PageView<'f> {
    fn from(page: &'f Element) -> Self {
        Self {
            id: page.attr("id"),
            label: page.attr("label"),
        }
    }
}

/// Converts a resolved form into its JSON description.
///
/// # Errors
///
/// Returns any error raised while resolving the form's pages or fields.
pub fn form_to_json(form: &Form<'_>) -> FormbarResult<Value> {
    let view = FormView {
        id: form.id(),
        readonly: form.readonly(),
        css: form.css(),
        autocomplete: form.autocomplete(),
        method: form.method(),
        action: form.action(),
        enctype: form.enctype(),
        pages: form.pages()?.into_iter().map(PageView::from).collect(),
        fields: form.fields()?.values().collect(),
    };
    serde_json::to_value(view)
        .map_err(|e| FormbarError::ConfigurationError(format!("Cannot serialize form: {e}")))
}

impl ManagementCommand for InspectCommand {
    fn name(&self) -> &'static str {
        "inspect"
    }

    fn help(&self) -> &'static str {
        "Assemble a form and print it as JSON"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(document_arg(true))
            .arg(
                clap::Arg::new("form")
                    .value_name("FORM_ID")
                    .required(true)
                    .help("Identifier of the form to inspect"),
            )
            .arg(
                clap::Arg::new("pretty")
                    .long("pretty")
                    .action(clap::ArgAction::SetTrue)
                    .help("Pretty-print the JSON output"),
            )
    }

    fn handle(&self, matches: &clap::ArgMatches, settings: &Settings) -> Result<(), FormbarError> {
        let doc = load_document(matches)?;
        let form_id = matches
            .get_one::<String>("form")
            .ok_or_else(|| FormbarError::ConfigurationError("No form given".to_string()))?;

        let form = doc.get_form(form_id)?;
        let value = form_to_json(&form)?;

        let pretty = matches.get_flag("pretty") || settings.pretty_json;
        let output = if pretty {
            serde_json::to_string_pretty(&value)
        } else {
            serde_json::to_string(&value)
        }
        .map_err(|e| FormbarError::ConfigurationError(format!("Cannot serialize form: {e}")))?;

        println!("{output}");
        Ok(())
    }
}
