//! Formula parser
//!
//! A recursive descent parser for table formulas with the usual operator
//! precedence. Grammar, highest precedence first:
//!
//! ```text
//! primary  := NUMBER | TABLE | '(' additive ')'
//! unary    := ('+' | '-') unary | primary
//! multiply := unary (('*' | '/') unary)*
//! additive := multiply (('+' | '-') multiply)*
//! ```

use census_core::{Decimal, Value};

use crate::ast::{BinaryOperator, FormulaExpr, UnaryOperator};
use crate::error::{FormulaError, FormulaResult};

/// Parse a formula string into an AST
///
/// # Example
/// ```rust
/// use census_formula::{parse_formula, FormulaExpr};
///
/// let ast = parse_formula("P001001 / 100").unwrap();
/// assert!(matches!(ast, FormulaExpr::BinaryOp { .. }));
/// ```
pub fn parse_formula(formula: &str) -> FormulaResult<FormulaExpr> {
    let mut parser = ExprParser::new(formula)?;

    if matches!(parser.current_token(), Token::Eof) {
        return Err(FormulaError::syntax(0, "Empty formula"));
    }

    let expr = parser.parse_expression()?;

    // Make sure we consumed all input
    if !matches!(parser.current_token(), Token::Eof) {
        return Err(FormulaError::syntax(
            parser.token_start,
            format!(
                "Unexpected input after expression: '{}'",
                &parser.input[parser.token_start..]
            ),
        ));
    }

    Ok(expr)
}

/// Token types
#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(Decimal),
    Table(String),

    Plus,
    Minus,
    Star,
    Slash,

    LeftParen,
    RightParen,

    // End of input
    Eof,
}

/// Deepest formula tree, and deepest parenthesis/sign nesting, accepted
const MAX_DEPTH: usize = 256;

const TOO_DEEP: &str = "Formula nested too deeply";

struct ExprParser<'a> {
    input: &'a str,
    pos: usize,
    /// Byte offset where the current token starts
    token_start: usize,
    current_token: Option<Token>,
    /// Open parentheses and prefix signs around the current token
    nesting: usize,
}

impl<'a> ExprParser<'a> {
    fn new(input: &'a str) -> FormulaResult<Self> {
        let mut parser = Self {
            input,
            pos: 0,
            token_start: 0,
            current_token: None,
            nesting: 0,
        };
        parser.advance_token()?;
        Ok(parser)
    }

    // === Token scanning ===

    fn advance_token(&mut self) -> FormulaResult<()> {
        self.skip_whitespace();
        self.token_start = self.pos;
        self.current_token = Some(self.scan_token()?);
        Ok(())
    }

    fn scan_token(&mut self) -> FormulaResult<Token> {
        let c = match self.peek_char() {
            Some(c) => c,
            None => return Ok(Token::Eof),
        };

        let token = match c {
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            c if c.is_ascii_digit() => return self.scan_number(),
            c if c.is_ascii_alphabetic() => return self.scan_table(),
            c => {
                return Err(FormulaError::syntax(
                    self.pos,
                    format!("Unexpected character '{}'", c),
                ))
            }
        };

        self.advance();
        Ok(token)
    }

    fn scan_number(&mut self) -> FormulaResult<Token> {
        let start = self.pos;

        // Integer part
        self.skip_while(|c| c.is_ascii_digit());

        // Decimal part
        if self.peek_char() == Some('.') {
            self.advance();
            if !self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
                return Err(FormulaError::syntax(
                    start,
                    "Expected digits after decimal point",
                ));
            }
            self.skip_while(|c| c.is_ascii_digit());
        }

        let text = &self.input[start..self.pos];
        Value::parse_number(text)
            .map(Token::Number)
            .ok_or_else(|| FormulaError::syntax(start, format!("Number out of range: {}", text)))
    }

    fn scan_table(&mut self) -> FormulaResult<Token> {
        let start = self.pos;
        self.skip_while(|c| c.is_ascii_alphanumeric() || c == '_');

        let text = &self.input[start..self.pos];
        if text.len() < 2 {
            return Err(FormulaError::syntax(
                start,
                format!("Table identifier '{}' is too short", text),
            ));
        }

        Ok(Token::Table(text.to_string()))
    }

    // === Helper methods ===

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek_char().map_or(false, &pred) {
            self.advance();
        }
    }

    fn skip_whitespace(&mut self) {
        self.skip_while(char::is_whitespace);
    }

    fn current_token(&self) -> &Token {
        self.current_token.as_ref().unwrap_or(&Token::Eof)
    }

    fn consume(&mut self) -> FormulaResult<Token> {
        let token = self.current_token.take().unwrap_or(Token::Eof);
        self.advance_token()?;
        Ok(token)
    }

    fn expect(&mut self, expected: &Token) -> FormulaResult<()> {
        if self.current_token() == expected {
            self.consume()?;
            Ok(())
        } else {
            Err(self.unexpected(&format!("expected {}", describe(expected))))
        }
    }

    fn unexpected(&self, wanted: &str) -> FormulaError {
        FormulaError::syntax(
            self.token_start,
            format!("Unexpected {}, {}", describe(self.current_token()), wanted),
        )
    }

    // === Expression parsing with precedence ===
    // Precedence (lowest to highest):
    // 1. Addition/Subtraction: +, -
    // 2. Multiplication/Division: *, /
    // 3. Unary: +, -
    // 4. Primary: literals, tables, parentheses
    //
    // Each rule returns the tree it built together with that tree's depth.

    fn parse_expression(&mut self) -> FormulaResult<FormulaExpr> {
        Ok(self.parse_additive()?.0)
    }

    /// Enter a nested rule (parenthesis or prefix sign)
    fn descend(&mut self) -> FormulaResult<()> {
        self.nesting += 1;
        if self.nesting > MAX_DEPTH {
            return Err(FormulaError::syntax(self.token_start, TOO_DEEP));
        }
        Ok(())
    }

    fn ascend(&mut self) {
        self.nesting -= 1;
    }

    /// Depth of a node sitting above a subtree of `depth`
    fn above(position: usize, depth: usize) -> FormulaResult<usize> {
        if depth >= MAX_DEPTH {
            return Err(FormulaError::syntax(position, TOO_DEEP));
        }
        Ok(depth + 1)
    }

    fn parse_additive(&mut self) -> FormulaResult<(FormulaExpr, usize)> {
        let (mut left, mut depth) = self.parse_multiplicative()?;

        loop {
            let op = match self.current_token() {
                Token::Plus => BinaryOperator::Add,
                Token::Minus => BinaryOperator::Subtract,
                _ => break,
            };

            let position = self.token_start;
            self.consume()?;
            let (right, right_depth) = self.parse_multiplicative()?;
            depth = Self::above(position, depth.max(right_depth))?;
            left = FormulaExpr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok((left, depth))
    }

    fn parse_multiplicative(&mut self) -> FormulaResult<(FormulaExpr, usize)> {
        let (mut left, mut depth) = self.parse_unary()?;

        loop {
            let op = match self.current_token() {
                Token::Star => BinaryOperator::Multiply,
                Token::Slash => BinaryOperator::Divide,
                _ => break,
            };

            let position = self.token_start;
            self.consume()?;
            let (right, right_depth) = self.parse_unary()?;
            depth = Self::above(position, depth.max(right_depth))?;
            left = FormulaExpr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok((left, depth))
    }

    fn parse_unary(&mut self) -> FormulaResult<(FormulaExpr, usize)> {
        // Prefix unary minus
        if matches!(self.current_token(), Token::Minus) {
            let position = self.token_start;
            self.descend()?;
            self.consume()?;
            let (operand, depth) = self.parse_unary()?;
            self.ascend();
            return Ok((
                FormulaExpr::UnaryOp {
                    op: UnaryOperator::Negate,
                    operand: Box::new(operand),
                },
                Self::above(position, depth)?,
            ));
        }

        // Prefix plus (no-op)
        if matches!(self.current_token(), Token::Plus) {
            self.descend()?;
            self.consume()?;
            let parsed = self.parse_unary()?;
            self.ascend();
            return Ok(parsed);
        }

        self.parse_primary()
    }

    fn parse_primary(&mut self) -> FormulaResult<(FormulaExpr, usize)> {
        match self.current_token().clone() {
            Token::Number(n) => {
                self.consume()?;
                Ok((FormulaExpr::Number(n), 1))
            }

            Token::Table(name) => {
                self.consume()?;
                Ok((FormulaExpr::Table(name), 1))
            }

            Token::LeftParen => {
                self.descend()?;
                self.consume()?;
                let parsed = self.parse_additive()?;
                self.expect(&Token::RightParen)?;
                self.ascend();
                Ok(parsed)
            }

            _ => Err(self.unexpected("expected a number, table or '('")),
        }
    }
}

fn describe(token: &Token) -> String {
    match token {
        Token::Number(n) => format!("number {}", n),
        Token::Table(name) => format!("table {}", name),
        Token::Plus => "'+'".into(),
        Token::Minus => "'-'".into(),
        Token::Star => "'*'".into(),
        Token::Slash => "'/'".into(),
        Token::LeftParen => "'('".into(),
        Token::RightParen => "')'".into(),
        Token::Eof => "end of formula".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn num(n: i64) -> FormulaExpr {
        FormulaExpr::Number(Decimal::from(n))
    }

    fn table(name: &str) -> FormulaExpr {
        FormulaExpr::Table(name.into())
    }

    fn binary(op: BinaryOperator, left: FormulaExpr, right: FormulaExpr) -> FormulaExpr {
        FormulaExpr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    fn syntax_position(formula: &str) -> usize {
        match parse_formula(formula) {
            Err(FormulaError::Syntax { position, .. }) => position,
            other => panic!("Expected syntax error for {:?}, got {:?}", formula, other),
        }
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_formula("42").unwrap(), num(42));

        let ast = parse_formula("3.14").unwrap();
        assert_eq!(ast, FormulaExpr::Number("3.14".parse().unwrap()));
    }

    #[test]
    fn test_parse_table() {
        assert_eq!(parse_formula("P001001").unwrap(), table("P001001"));
        assert_eq!(parse_formula("B01001_002").unwrap(), table("B01001_002"));
        assert_eq!(parse_formula("  A_1  ").unwrap(), table("A_1"));
    }

    #[test]
    fn test_parse_precedence() {
        // 2 + (3 * 4)
        assert_eq!(
            parse_formula("2 + 3 * 4").unwrap(),
            binary(
                BinaryOperator::Add,
                num(2),
                binary(BinaryOperator::Multiply, num(3), num(4))
            )
        );
    }

    #[test]
    fn test_parse_left_associative() {
        // (10 - 4) - 3
        assert_eq!(
            parse_formula("10 - 4 - 3").unwrap(),
            binary(
                BinaryOperator::Subtract,
                binary(BinaryOperator::Subtract, num(10), num(4)),
                num(3)
            )
        );

        // (24 / 4) / 2
        assert_eq!(
            parse_formula("24/4/2").unwrap(),
            binary(
                BinaryOperator::Divide,
                binary(BinaryOperator::Divide, num(24), num(4)),
                num(2)
            )
        );
    }

    #[test]
    fn test_parse_parentheses() {
        assert_eq!(
            parse_formula("(A_001 + A_002) / 100").unwrap(),
            binary(
                BinaryOperator::Divide,
                binary(BinaryOperator::Add, table("A_001"), table("A_002")),
                num(100)
            )
        );
    }

    #[test]
    fn test_parse_unary() {
        assert_eq!(
            parse_formula("-A_001").unwrap(),
            FormulaExpr::UnaryOp {
                op: UnaryOperator::Negate,
                operand: Box::new(table("A_001")),
            }
        );

        // Unary plus is dropped
        assert_eq!(parse_formula("+5").unwrap(), num(5));

        // Unary binds tighter than multiplication
        assert_eq!(
            parse_formula("-2 * 3").unwrap(),
            binary(
                BinaryOperator::Multiply,
                FormulaExpr::UnaryOp {
                    op: UnaryOperator::Negate,
                    operand: Box::new(num(2)),
                },
                num(3)
            )
        );

        // Right associative chains
        assert!(parse_formula("--2").is_ok());
        assert!(parse_formula("2 - -2").is_ok());
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(syntax_position(""), 0);
        assert_eq!(syntax_position("   "), 0);
        assert_eq!(syntax_position("A_001 +"), 7);
        assert_eq!(syntax_position("A_001 $ 2"), 6);
        assert_eq!(syntax_position("(1 + 2"), 6);
        assert_eq!(syntax_position("1 + 2)"), 5);
        assert_eq!(syntax_position("1 2"), 2);
        assert_eq!(syntax_position("1."), 0);
        assert_eq!(syntax_position("A + 1"), 0);
        assert_eq!(syntax_position("2 ^ 3"), 2);
        assert_eq!(syntax_position("1e5"), 1);
        assert_eq!(syntax_position("()"), 1);
    }

    #[test]
    fn test_number_out_of_range() {
        let err = parse_formula("123456789012345678901234567890123").unwrap_err();
        assert!(matches!(err, FormulaError::Syntax { position: 0, .. }));
    }

    #[test]
    fn test_nesting_limit() {
        for formula in ["(".repeat(10_000), "-".repeat(10_000), "+".repeat(10_000)] {
            let err = parse_formula(&formula).unwrap_err();
            assert!(
                matches!(&err, FormulaError::Syntax { message, .. } if message == TOO_DEEP),
                "{:?}",
                err
            );
        }

        let balanced = format!("{}1{}", "(".repeat(10_000), ")".repeat(10_000));
        assert!(matches!(
            parse_formula(&balanced),
            Err(FormulaError::Syntax { position: 256, .. })
        ));
    }

    #[test]
    fn test_long_operator_chain_is_rejected() {
        let chain = format!("1{}", " + 1".repeat(10_000));
        let err = parse_formula(&chain).unwrap_err();
        assert!(matches!(&err, FormulaError::Syntax { message, .. } if message == TOO_DEEP));

        let product = format!("A_001{}", " * 2".repeat(10_000));
        assert!(parse_formula(&product).is_err());
    }

    #[test]
    fn test_moderate_nesting_parses() {
        let nested = format!("{}1{}", "(".repeat(200), ")".repeat(200));
        assert_eq!(parse_formula(&nested).unwrap(), num(1));

        let negated = format!("{}1", "-".repeat(200));
        assert!(parse_formula(&negated).is_ok());

        let chain = format!("1{}", " + 1".repeat(200));
        assert!(parse_formula(&chain).is_ok());
    }
}
