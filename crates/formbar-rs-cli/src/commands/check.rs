//! The `check` command.
//!
//! Assembles every form of one or more documents and reports, per form,
//! whether its pages and fields resolve.

use std::fmt;
use std::path::PathBuf;

use formbar_rs_config::Document;
use formbar_rs_core::{FormbarError, Settings};

use super::document_arg;
use crate::command::ManagementCommand;

/// Checks every form of the given documents.
pub struct CheckCommand;

/// The outcome of checking a single form.
#[derive(Debug)]
pub struct FormCheck {
    pub form_id: String,
    pub outcome: Result<FormSummary, FormbarError>,
}

/// Counts for a form that assembled cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormSummary {
    pub fields: usize,
    pub pages: usize,
}

impl FormCheck {
    pub const fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

impl fmt::Display for FormCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Ok(summary) => write!(
                f,
                "{}: OK ({} fields, {} pages)",
                self.form_id, summary.fields, summary.pages
            ),
            Err(e) => write!(f, "{}: ERROR [{}] {e}", self.form_id, e.code()),
        }
    }
}

/// Assembles each form of `doc` and records the result.
pub fn check_document(doc: &Document) -> Vec<FormCheck> {
    doc.form_ids()
        .into_iter()
        .map(|id| {
            let outcome = doc.get_form(id).and_then(|form| {
                Ok(FormSummary {
                    fields: form.fields()?.len(),
                    pages: form.pages()?.len(),
                })
            });
            if let Err(e) = &outcome {
                tracing::warn!(form = id, error = %e, "form check failed");
            }
            FormCheck {
                form_id: id.to_string(),
                outcome,
            }
        })
        .collect()
}

impl ManagementCommand for CheckCommand {
    fn name(&self) -> &'static str {
        "check"
    }

    fn help(&self) -> &'static str {
        "Assemble every form and report problems"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(document_arg(false).num_args(0..))
    }

    fn handle(&self, matches: &clap::ArgMatches, settings: &Settings) -> Result<(), FormbarError> {
        let paths: Vec<PathBuf> = match matches.get_many::<PathBuf>("file") {
            Some(given) => given.cloned().collect(),
            None => settings.documents.clone(),
        };
        if paths.is_empty() {
            return Err(FormbarError::ConfigurationError(
                "No documents given and none configured in settings".to_string(),
            ));
        }

        let mut failures = 0usize;
        let mut checked = 0usize;
        for path in &paths {
            let doc = match Document::load(path) {
                Ok(doc) => doc,
                Err(e) => {
                    println!("{}: ERROR [{}] {e}", path.display(), e.code());
                    failures += 1;
                    continue;
                }
            };
            for check in check_document(&doc) {
                println!("{}: {check}", path.display());
                checked += 1;
                if !check.is_ok() {
                    failures += 1;
                }
            }
        }

        tracing::info!(documents = paths.len(), forms = checked, failures, "check finished");
        if failures > 0 {
            return Err(FormbarError::ConfigurationError(format!(
                "Check found {failures} problem(s)"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"
        <configuration>
          <entity id="e1" name="a"/>
          <form id="good"><page id="p"><field ref="e1"/></page></form>
          <form id="bad"><field ref="missing"/></form>
        </configuration>
    "#;

    #[test]
    fn test_check_document() {
        let doc = Document::parse(DOC).unwrap();
        let checks = check_document(&doc);
        assert_eq!(checks.len(), 2);

        assert_eq!(checks[0].form_id, "good");
        assert_eq!(
            checks[0].outcome.as_ref().unwrap(),
            &FormSummary {
                fields: 1,
                pages: 1
            }
        );
        assert_eq!(checks[0].to_string(), "good: OK (1 fields, 1 pages)");

        assert!(!checks[1].is_ok());
        assert!(checks[1].to_string().starts_with("bad: ERROR [not_found]"));
    }

    #[test]
    fn test_check_empty_document() {
        let doc = Document::parse("<configuration/>").unwrap();
        assert!(check_document(&doc).is_empty());
    }
}
