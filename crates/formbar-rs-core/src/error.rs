//! Core error types for formbar-rs.
//!
//! [`FormbarError`] covers every failure the workspace can report: lookups
//! in a form document (ambiguous, missing, cyclic references), malformed
//! field definitions, rule expression syntax errors, document parsing and
//! configuration problems.
//!
//! All of these describe defects in the configuration being loaded, not
//! transient conditions, so none of them are retryable.

use thiserror::Error;

/// The primary error type for formbar-rs.
#[derive(Error, Debug)]
pub enum FormbarError {
    // ── Document lookup ──────────────────────────────────────────────

    /// More than one element matched a tag + identifier lookup.
    #[error("Ambiguous element: {0}")]
    AmbiguousElement(String),

    /// A requested form, field or referenced element does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A chain of `ref` attributes or snippet inclusions loops back on itself.
    #[error("Reference cycle detected: {0}")]
    CycleDetected(String),

    // ── Definitions ──────────────────────────────────────────────────

    /// An entity or field element lacks a required attribute.
    #[error("Malformed field: {0}")]
    MalformedField(String),

    /// A rule expression could not be parsed.
    #[error("Expression syntax error: {0}")]
    ExpressionSyntax(String),

    // ── Loading ──────────────────────────────────────────────────────

    /// The form document is not well-formed.
    #[error("Document parse error: {0}")]
    DocumentParse(String),

    /// A settings value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl FormbarError {
    /// Returns a short, stable code for this error kind.
    ///
    /// Used by the CLI when reporting failures in machine-readable form.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::AmbiguousElement(_) => "ambiguous",
            Self::NotFound(_) => "not_found",
            Self::CycleDetected(_) => "cycle",
            Self::MalformedField(_) => "malformed_field",
            Self::ExpressionSyntax(_) => "expression_syntax",
            Self::DocumentParse(_) => "document_parse",
            Self::ConfigurationError(_) => "configuration",
            Self::IoError(_) => "io",
        }
    }
}

/// A convenience type alias for `Result<T, FormbarError>`.
pub type FormbarResult<T> = Result<T, FormbarError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FormbarError::NotFound("form 'f1'".into());
        assert_eq!(err.to_string(), "Not found: form 'f1'");

        let err = FormbarError::AmbiguousElement("entity 'x'".into());
        assert_eq!(err.to_string(), "Ambiguous element: entity 'x'");
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(FormbarError::AmbiguousElement("x".into()).code(), "ambiguous");
        assert_eq!(FormbarError::NotFound("x".into()).code(), "not_found");
        assert_eq!(FormbarError::CycleDetected("x".into()).code(), "cycle");
        assert_eq!(FormbarError::MalformedField("x".into()).code(), "malformed_field");
        assert_eq!(
            FormbarError::ExpressionSyntax("x".into()).code(),
            "expression_syntax"
        );
        assert_eq!(FormbarError::DocumentParse("x".into()).code(), "document_parse");
        assert_eq!(
            FormbarError::ConfigurationError("x".into()).code(),
            "configuration"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: FormbarError = io_err.into();
        assert_eq!(err.code(), "io");
        assert!(err.to_string().contains("file missing"));
    }
}
