//! # formbar-rs-rules
//!
//! Validation rules attached to form fields. A rule pairs a parsed
//! expression with a message and a mode tag. Rules are only parsed here;
//! evaluating them is left to the validation layer.
//!
//! ```
//! use formbar_rs_rules::{parse, Rule, RuleMode};
//!
//! let expr = parse("$age ge 18 and bool($email)").unwrap();
//! assert_eq!(expr.variables(), vec!["age", "email"]);
//!
//! let rule = Rule::parse("$age ge 18", Some("Too young"), None).unwrap();
//! assert_eq!(rule.mode(), &RuleMode::Pre);
//! ```

pub mod expr;
pub mod lexer;
pub mod parser;
pub mod rule;

pub use expr::{BinaryOp, Expr};
pub use parser::parse;
pub use rule::{Rule, RuleMode};
