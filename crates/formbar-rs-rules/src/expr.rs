//! Parsed rule expressions.

use std::fmt;

use serde::Serialize;

/// A binary operator in a rule expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    /// `or`
    Or,
    /// `and`
    And,
    /// `==` / `eq`
    Eq,
    /// `!=` / `ne`
    Ne,
    /// `<` / `lt`
    Lt,
    /// `>` / `gt`
    Gt,
    /// `<=` / `le`
    Le,
    /// `>=` / `ge`
    Ge,
    /// `in`
    In,
    /// `not in`
    NotIn,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
}

impl BinaryOp {
    /// Returns the canonical spelling of this operator.
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Or => "or",
            Self::And => "and",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Le => "<=",
            Self::Ge => ">=",
            Self::In => "in",
            Self::NotIn => "not in",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        }
    }

    /// Maps a comparison spelling (symbolic or word form) to its operator.
    pub fn comparison(word: &str) -> Option<Self> {
        match word {
            "==" | "eq" => Some(Self::Eq),
            "!=" | "ne" => Some(Self::Ne),
            "<" | "lt" => Some(Self::Lt),
            ">" | "gt" => Some(Self::Gt),
            "<=" | "le" => Some(Self::Le),
            ">=" | "ge" => Some(Self::Ge),
            "in" => Some(Self::In),
            _ => None,
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A parsed rule expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expr {
    /// A numeric literal.
    Number { value: f64 },
    /// A string literal.
    Str { value: String },
    /// `true` / `false`.
    Bool { value: bool },
    /// `None`: the absent value.
    Null,
    /// A field reference (`$name`).
    Variable { name: String },
    /// A list literal (`[1, 2, 3]`).
    List { items: Vec<Expr> },
    /// A function call (`bool($name)`).
    Call { name: String, args: Vec<Expr> },
    /// Logical negation.
    Not { operand: Box<Expr> },
    /// Arithmetic negation.
    Neg { operand: Box<Expr> },
    /// A binary operation.
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    /// Returns the names of all fields referenced with `$`, in order of
    /// first appearance and without duplicates.
    pub fn variables(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_variables(&mut names);
        names
    }

    fn collect_variables<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Self::Variable { name } => {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
            Self::List { items: args } | Self::Call { args, .. } => {
                for arg in args {
                    arg.collect_variables(names);
                }
            }
            Self::Not { operand } | Self::Neg { operand } => operand.collect_variables(names),
            Self::Binary { left, right, .. } => {
                left.collect_variables(names);
                right.collect_variables(names);
            }
            Self::Number { .. } | Self::Str { .. } | Self::Bool { .. } | Self::Null => {}
        }
    }
}

impl fmt::Display for Expr {
    /// Writes the expression fully parenthesized, with canonical operators.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number { value } => write!(f, "{value}"),
            Self::Str { value } => write!(f, "'{}'", value.replace('\'', "\\'")),
            Self::Bool { value } => write!(f, "{value}"),
            Self::Null => f.write_str("None"),
            Self::Variable { name } => write!(f, "${name}"),
            Self::List { items } => {
                f.write_str("[")?;
                write_joined(f, items)?;
                f.write_str("]")
            }
            Self::Call { name, args } => {
                write!(f, "{name}(")?;
                write_joined(f, args)?;
                f.write_str(")")
            }
            Self::Not { operand } => write!(f, "(not {operand})"),
            Self::Neg { operand } => write!(f, "(-{operand})"),
            Self::Binary { op, left, right } => write!(f, "({left} {op} {right})"),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[Expr]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}
