//! Validation rule records.

use std::fmt;

use formbar_rs_core::FormbarResult;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::expr::Expr;

/// When a rule is meant to be checked relative to type conversion.
///
/// `pre` rules run on the submitted values before conversion, `post` rules
/// afterwards. Unknown tags are kept verbatim so validation layers with
/// their own modes can still see them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum RuleMode {
    /// Checked before conversion. The default when no mode is given.
    #[default]
    Pre,
    /// Checked after conversion.
    Post,
    /// Any other mode tag.
    Other(String),
}

impl RuleMode {
    /// Interprets the value of a `mode` attribute.
    pub fn from_attr(value: Option<&str>) -> Self {
        match value {
            None | Some("pre") => Self::Pre,
            Some("post") => Self::Post,
            Some(other) => Self::Other(other.to_string()),
        }
    }

    /// Returns the tag as written in a document.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pre => "pre",
            Self::Post => "post",
            Self::Other(tag) => tag,
        }
    }
}

impl fmt::Display for RuleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RuleMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A parsed validation rule: expression, message and mode.
///
/// Rules are immutable once built. The source text is kept alongside the
/// parsed expression for diagnostics and serialization.
///
/// Serializes as `{expr, msg, mode, variables, ast}`, where `expr` is the
/// source text and `ast` the parsed tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    expr: Expr,
    source: String,
    msg: Option<String>,
    mode: RuleMode,
}

impl Rule {
    /// Creates a rule from an already parsed expression.
    pub fn new(expr: Expr, source: impl Into<String>, msg: Option<String>, mode: RuleMode) -> Self {
        Self {
            expr,
            source: source.into(),
            msg,
            mode,
        }
    }

    /// Parses `source` and builds a rule from it.
    ///
    /// # Errors
    ///
    /// Returns the parser's `ExpressionSyntax` error unchanged.
    pub fn parse(source: &str, msg: Option<&str>, mode: Option<&str>) -> FormbarResult<Self> {
        let expr = crate::parser::parse(source)?;
        Ok(Self::new(
            expr,
            source,
            msg.map(str::to_string),
            RuleMode::from_attr(mode),
        ))
    }

    /// The parsed expression.
    pub const fn expr(&self) -> &Expr {
        &self.expr
    }

    /// The expression as written in the document.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The message shown when the rule fails, if any.
    pub fn msg(&self) -> Option<&str> {
        self.msg.as_deref()
    }

    pub const fn mode(&self) -> &RuleMode {
        &self.mode
    }
}

impl Serialize for Rule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Rule", 5)?;
        state.serialize_field("expr", &self.source)?;
        state.serialize_field("msg", &self.msg)?;
        state.serialize_field("mode", &self.mode)?;
        state.serialize_field("variables", &self.expr.variables())?;
        state.serialize_field("ast", &self.expr)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formbar_rs_core::FormbarError;

    #[test]
    fn test_mode_from_attr() {
        assert_eq!(RuleMode::from_attr(None), RuleMode::Pre);
        assert_eq!(RuleMode::from_attr(Some("pre")), RuleMode::Pre);
        assert_eq!(RuleMode::from_attr(Some("post")), RuleMode::Post);
        assert_eq!(
            RuleMode::from_attr(Some("async")),
            RuleMode::Other("async".into())
        );
        assert_eq!(RuleMode::Other("async".into()).to_string(), "async");
    }

    #[test]
    fn test_parse_rule() {
        let rule = Rule::parse("$age ge 18", Some("Must be adult"), Some("post")).unwrap();
        assert_eq!(rule.source(), "$age ge 18");
        assert_eq!(rule.msg(), Some("Must be adult"));
        assert_eq!(rule.mode(), &RuleMode::Post);
        assert_eq!(rule.expr().variables(), vec!["age"]);
    }

    #[test]
    fn test_parse_rule_error_is_unchanged() {
        let direct = crate::parser::parse("$age >").unwrap_err().to_string();
        let via_rule = Rule::parse("$age >", None, None).unwrap_err();
        assert!(matches!(via_rule, FormbarError::ExpressionSyntax(_)));
        assert_eq!(via_rule.to_string(), direct);
    }

    #[test]
    fn test_serialize_rule() {
        let rule = Rule::parse("bool($name) and $name != $other", None, None).unwrap();
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["expr"], "bool($name) and $name != $other");
        assert_eq!(json["mode"], "pre");
        assert!(json["msg"].is_null());
        assert_eq!(json["variables"], serde_json::json!(["name", "other"]));
        assert_eq!(json["ast"]["kind"], "binary");
    }
}
