//! Rule expression lexer (tokenizer).
//!
//! Converts a rule expression such as `$age ge 18 and bool($name)` into a
//! stream of [`Token`]s, each tagged with its byte offset in the source.

use std::fmt;

use formbar_rs_core::FormbarError;

/// A token produced by the rule lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A numeric literal.
    Number(f64),
    /// A quoted string literal, without its quotes.
    Str(String),
    /// A field reference: `$name`. Holds the name without the `$`.
    Variable(String),
    /// A bare word: function names, keywords and word operators.
    Ident(String),
    /// A symbolic operator: `==`, `!=`, `<`, `>`, `<=`, `>=`, `+`, `-`, `*`, `/`.
    Op(&'static str),
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `,`
    Comma,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Str(s) => write!(f, "'{s}'"),
            Self::Variable(name) => write!(f, "${name}"),
            Self::Ident(word) => write!(f, "{word}"),
            Self::Op(op) => write!(f, "{op}"),
            Self::LParen => write!(f, "("),
            Self::RParen => write!(f, ")"),
            Self::LBracket => write!(f, "["),
            Self::RBracket => write!(f, "]"),
            Self::Comma => write!(f, ","),
        }
    }
}

/// A token together with the byte offset where it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    /// The token.
    pub token: Token,
    /// Byte offset of the token's first character.
    pub offset: usize,
}

/// Tokenizes a rule expression.
///
/// # Errors
///
/// Returns `ExpressionSyntax` for unterminated strings, malformed numbers,
/// a `$` without a field name, and characters outside the expression syntax.
pub fn tokenize(source: &str) -> Result<Vec<Spanned>, FormbarError> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some(&(offset, ch)) = chars.peek() {
        let token = match ch {
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            '0'..='9' | '.' => {
                let end = scan_while(source, offset, |c| c.is_ascii_digit() || c == '.');
                advance_to(&mut chars, end);
                let text = &source[offset..end];
                let value = text.parse::<f64>().map_err(|_| {
                    syntax_error(source, offset, &format!("invalid number '{text}'"))
                })?;
                Token::Number(value)
            }
            '\'' | '"' => {
                chars.next();
                Token::Str(scan_string(source, offset, ch, &mut chars)?)
            }
            '$' => {
                chars.next();
                let start = offset + 1;
                let end = scan_while(source, start, is_variable_char);
                if end == start {
                    return Err(syntax_error(source, offset, "expected field name after '$'"));
                }
                advance_to(&mut chars, end);
                Token::Variable(source[start..end].to_string())
            }
            c if c.is_alphabetic() || c == '_' => {
                let end = scan_while(source, offset, |c| c.is_alphanumeric() || c == '_');
                advance_to(&mut chars, end);
                Token::Ident(source[offset..end].to_string())
            }
            '(' | ')' | '[' | ']' | ',' => {
                chars.next();
                match ch {
                    '(' => Token::LParen,
                    ')' => Token::RParen,
                    '[' => Token::LBracket,
                    ']' => Token::RBracket,
                    _ => Token::Comma,
                }
            }
            '=' | '!' | '<' | '>' => {
                chars.next();
                let followed_by_eq = chars.peek().is_some_and(|&(_, c)| c == '=');
                if followed_by_eq {
                    chars.next();
                }
                match (ch, followed_by_eq) {
                    ('=', true) => Token::Op("=="),
                    ('!', true) => Token::Op("!="),
                    ('<', true) => Token::Op("<="),
                    ('>', true) => Token::Op(">="),
                    ('<', false) => Token::Op("<"),
                    ('>', false) => Token::Op(">"),
                    _ => {
                        return Err(syntax_error(
                            source,
                            offset,
                            &format!("unexpected character '{ch}'"),
                        ))
                    }
                }
            }
            '+' | '-' | '*' | '/' => {
                chars.next();
                Token::Op(match ch {
                    '+' => "+",
                    '-' => "-",
                    '*' => "*",
                    _ => "/",
                })
            }
            other => {
                return Err(syntax_error(
                    source,
                    offset,
                    &format!("unexpected character '{other}'"),
                ))
            }
        };
        tokens.push(Spanned { token, offset });
    }

    Ok(tokens)
}

/// Builds an `ExpressionSyntax` error pointing at `offset` in `source`.
pub(crate) fn syntax_error(source: &str, offset: usize, detail: &str) -> FormbarError {
    FormbarError::ExpressionSyntax(format!("{detail} at offset {offset} in '{source}'"))
}

fn is_variable_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

/// Returns the byte offset of the first char at or after `start` failing `pred`.
fn scan_while(source: &str, start: usize, pred: impl Fn(char) -> bool) -> usize {
    source[start..]
        .char_indices()
        .find(|&(_, c)| !pred(c))
        .map_or(source.len(), |(i, _)| start + i)
}

fn advance_to(chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>, end: usize) {
    while chars.peek().is_some_and(|&(i, _)| i < end) {
        chars.next();
    }
}

/// Reads a quoted string body. The opening quote has already been consumed.
fn scan_string(
    source: &str,
    open_offset: usize,
    quote: char,
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
) -> Result<String, FormbarError> {
    let mut value = String::new();
    while let Some((_, c)) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some((_, escaped)) => value.push(escaped),
                None => break,
            },
            c if c == quote => return Ok(value),
            c => value.push(c),
        }
    }
    Err(syntax_error(source, open_offset, "unterminated string literal"))
}
