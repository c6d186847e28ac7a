//! Rule expression parser.
//!
//! A recursive-descent parser over the lexer's token stream. Precedence,
//! lowest first: `or`, `and`, `not`, comparisons (`==`, `eq`, `in`, ...),
//! `+`/`-`, `*`/`/`, unary minus, then literals, `$field` references,
//! function calls, lists and parenthesized groups.

use formbar_rs_core::FormbarError;

use crate::expr::{BinaryOp, Expr};
use crate::lexer::{syntax_error, tokenize, Spanned, Token};

/// Deepest nesting of groups, lists, calls, `not` and unary minus accepted.
const MAX_DEPTH: usize = 128;

/// Parses a rule expression string into an [`Expr`].
///
/// # Errors
///
/// Returns `ExpressionSyntax` if the source is empty, cannot be tokenized,
/// or does not form exactly one complete expression.
pub fn parse(source: &str) -> Result<Expr, FormbarError> {
    if source.trim().is_empty() {
        return Err(FormbarError::ExpressionSyntax(
            "Empty expression".to_string(),
        ));
    }

    let tokens = tokenize(source)?;
    let mut state = ParserState {
        source,
        tokens: &tokens,
        pos: 0,
        depth: 0,
    };

    let expr = state.parse_or()?;
    if let Some(trailing) = state.peek() {
        return Err(syntax_error(
            source,
            trailing.offset,
            &format!("unexpected token '{}'", trailing.token),
        ));
    }
    Ok(expr)
}

struct ParserState<'a> {
    source: &'a str,
    tokens: &'a [Spanned],
    pos: usize,
    depth: usize,
}

impl<'a> ParserState<'a> {
    fn peek(&self) -> Option<&'a Spanned> {
        self.tokens.get(self.pos)
    }

    fn peek_token(&self) -> Option<&'a Token> {
        self.peek().map(|s| &s.token)
    }

    fn at_word(&self, word: &str) -> bool {
        matches!(self.peek_token(), Some(Token::Ident(w)) if w == word)
    }

    fn at_word_pair(&self, first: &str, second: &str) -> bool {
        self.at_word(first)
            && matches!(self.tokens.get(self.pos + 1), Some(Spanned { token: Token::Ident(w), .. }) if w == second)
    }

    fn error_here(&self, detail: &str) -> FormbarError {
        match self.peek() {
            Some(spanned) => syntax_error(
                self.source,
                spanned.offset,
                &format!("{detail}, found '{}'", spanned.token),
            ),
            None => syntax_error(
                self.source,
                self.source.len(),
                &format!("{detail}, found end of expression"),
            ),
        }
    }

    fn expect(&mut self, expected: &Token, detail: &str) -> Result<(), FormbarError> {
        if self.peek_token() == Some(expected) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error_here(detail))
        }
    }

    /// Runs `f` one nesting level deeper, failing once `MAX_DEPTH` is passed.
    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, FormbarError>,
    ) -> Result<T, FormbarError> {
        if self.depth >= MAX_DEPTH {
            let offset = self.peek().map_or(self.source.len(), |s| s.offset);
            return Err(syntax_error(
                self.source,
                offset,
                "expression nested too deeply",
            ));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn parse_or(&mut self) -> Result<Expr, FormbarError> {
        let mut left = self.parse_and()?;
        while self.at_word("or") {
            self.pos += 1;
            let right = self.parse_and()?;
            left = binary(BinaryOp::Or, left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, FormbarError> {
        let mut left = self.parse_not()?;
        while self.at_word("and") {
            self.pos += 1;
            let right = self.parse_not()?;
            left = binary(BinaryOp::And, left, right);
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Expr, FormbarError> {
        if self.at_word("not") {
            self.pos += 1;
            let operand = self.nested(Self::parse_not)?;
            return Ok(Expr::Not {
                operand: Box::new(operand),
            });
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expr, FormbarError> {
        let left = self.parse_additive()?;

        let op = if self.at_word_pair("not", "in") {
            self.pos += 2;
            BinaryOp::NotIn
        } else {
            let found = match self.peek_token() {
                Some(Token::Op(op)) => BinaryOp::comparison(op),
                Some(Token::Ident(word)) => BinaryOp::comparison(word),
                _ => None,
            };
            match found {
                Some(op) => {
                    self.pos += 1;
                    op
                }
                None => return Ok(left),
            }
        };

        let right = self.parse_additive()?;
        Ok(binary(op, left, right))
    }

    fn parse_additive(&mut self) -> Result<Expr, FormbarError> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.peek_token() {
                Some(Token::Op("+")) => BinaryOp::Add,
                Some(Token::Op("-")) => BinaryOp::Sub,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.parse_term()?;
            left = binary(op, left, right);
        }
    }

    fn parse_term(&mut self) -> Result<Expr, FormbarError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek_token() {
                Some(Token::Op("*")) => BinaryOp::Mul,
                Some(Token::Op("/")) => BinaryOp::Div,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.parse_unary()?;
            left = binary(op, left, right);
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, FormbarError> {
        if self.peek_token() == Some(&Token::Op("-")) {
            self.pos += 1;
            let operand = self.nested(Self::parse_unary)?;
            return Ok(Expr::Neg {
                operand: Box::new(operand),
            });
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, FormbarError> {
        let Some(spanned) = self.peek() else {
            return Err(self.error_here("expected a value"));
        };

        match &spanned.token {
            Token::Number(value) => {
                self.pos += 1;
                Ok(Expr::Number { value: *value })
            }
            Token::Str(value) => {
                self.pos += 1;
                Ok(Expr::Str {
                    value: value.clone(),
                })
            }
            Token::Variable(name) => {
                self.pos += 1;
                Ok(Expr::Variable { name: name.clone() })
            }
            Token::LParen => {
                self.pos += 1;
                self.nested(|state| {
                    let inner = state.parse_or()?;
                    state.expect(&Token::RParen, "expected ')'")?;
                    Ok(inner)
                })
            }
            Token::LBracket => {
                self.pos += 1;
                let items = self
                    .nested(|state| state.parse_list(&Token::RBracket, "expected ',' or ']'"))?;
                Ok(Expr::List { items })
            }
            Token::Ident(word) => match word.as_str() {
                "true" | "True" => {
                    self.pos += 1;
                    Ok(Expr::Bool { value: true })
                }
                "false" | "False" => {
                    self.pos += 1;
                    Ok(Expr::Bool { value: false })
                }
                "None" => {
                    self.pos += 1;
                    Ok(Expr::Null)
                }
                "and" | "or" | "not" | "in" => Err(self.error_here("expected a value")),
                _ => {
                    self.pos += 1;
                    self.expect(&Token::LParen, &format!("expected '(' after '{word}'"))?;
                    let args = self
                        .nested(|state| state.parse_list(&Token::RParen, "expected ',' or ')'"))?;
                    Ok(Expr::Call {
                        name: word.clone(),
                        args,
                    })
                }
            },
            _ => Err(self.error_here("expected a value")),
        }
    }

    /// Parses comma-separated expressions up to and including `close`.
    /// The opening delimiter has already been consumed.
    fn parse_list(&mut self, close: &Token, detail: &str) -> Result<Vec<Expr>, FormbarError> {
        let mut items = Vec::new();
        if self.peek_token() == Some(close) {
            self.pos += 1;
            return Ok(items);
        }
        loop {
            items.push(self.parse_or()?);
            match self.peek_token() {
                Some(Token::Comma) => self.pos += 1,
                Some(token) if token == close => {
                    self.pos += 1;
                    return Ok(items);
                }
                _ => return Err(self.error_here(detail)),
            }
        }
    }
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(source: &str) -> String {
        parse(source).unwrap().to_string()
    }

    #[test]
    fn test_simple_comparison() {
        assert_eq!(render("$age >= 18"), "($age >= 18)");
    }

    #[test]
    fn test_word_operators_normalized() {
        assert_eq!(render("$age ge 18"), "($age >= 18)");
        assert_eq!(render("$a eq 'x'"), "($a == 'x')");
        assert_eq!(render("$a ne $b"), "($a != $b)");
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        assert_eq!(render("$a or $b and $c"), "($a or ($b and $c))");
    }

    #[test]
    fn test_left_associative_chains() {
        assert_eq!(render("$a or $b or $c"), "(($a or $b) or $c)");
        assert_eq!(render("1 - 2 - 3"), "((1 - 2) - 3)");
    }

    #[test]
    fn test_arithmetic_precedence() {
        assert_eq!(render("$a + $b * 2 > 10"), "(($a + ($b * 2)) > 10)");
        assert_eq!(render("-$a * 2"), "((-$a) * 2)");
    }

    #[test]
    fn test_not_and_not_in() {
        assert_eq!(render("not $a == 1"), "(not ($a == 1))");
        assert_eq!(render("$a not in [1, 2]"), "($a not in [1, 2])");
        assert_eq!(render("$a in ['x']"), "($a in ['x'])");
    }

    #[test]
    fn test_calls_and_literals() {
        assert_eq!(render("bool($name)"), "bool($name)");
        assert_eq!(render("now()"), "now()");
        assert_eq!(render("$x == None or $y == true"), "(($x == None) or ($y == true))");
        assert_eq!(render("len([])"), "len([])");
    }

    #[test]
    fn test_parentheses_override_precedence() {
        assert_eq!(render("($a or $b) and $c"), "(($a or $b) and $c)");
    }

    #[test]
    fn test_empty_expression() {
        let err = parse("  ").unwrap_err();
        assert!(matches!(err, FormbarError::ExpressionSyntax(_)));
        assert!(err.to_string().contains("Empty expression"));
    }

    #[test]
    fn test_trailing_tokens() {
        let err = parse("$a == 1 2").unwrap_err();
        assert!(err.to_string().contains("unexpected token '2'"));
    }

    #[test]
    fn test_chained_comparison_rejected() {
        assert!(parse("1 < $a < 3").is_err());
    }

    #[test]
    fn test_missing_operand() {
        let err = parse("$a ==").unwrap_err();
        assert!(err.to_string().contains("found end of expression"));
        assert!(parse("and $a").is_err());
    }

    #[test]
    fn test_unclosed_group_and_call() {
        assert!(parse("($a == 1").is_err());
        let err = parse("bool($a").unwrap_err();
        assert!(err.to_string().contains("expected ',' or ')'"));
    }

    #[test]
    fn test_deep_nesting_is_rejected() {
        let depth = 10_000;
        let cases = [
            format!("{}$x{}", "(".repeat(depth), ")".repeat(depth)),
            format!("{}$x", "not ".repeat(depth)),
            format!("{}$x", "- ".repeat(depth)),
            format!("{}1{}", "[".repeat(depth), "]".repeat(depth)),
            format!("{}1{}", "f(".repeat(depth), ")".repeat(depth)),
        ];
        for source in &cases {
            let err = parse(source).unwrap_err();
            assert!(matches!(err, FormbarError::ExpressionSyntax(_)));
            assert!(err.to_string().contains("nested too deeply"));
        }
    }

    #[test]
    fn test_moderate_nesting_is_accepted() {
        let source = format!("{}$x{}", "(".repeat(100), ")".repeat(100));
        assert_eq!(render(&source), "$x");
        assert!(parse(&format!("{}$x", "not ".repeat(100))).is_ok());
    }

    #[test]
    fn test_bare_word_requires_call() {
        let err = parse("foo == 1").unwrap_err();
        assert!(err.to_string().contains("expected '(' after 'foo'"));
    }
}
