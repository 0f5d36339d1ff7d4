//! Condition text to [`Expression`] adapter.
//!
//! Accepts the WHERE-clause subset of the query language: AND/OR/NOT, parentheses,
//! comparisons, BETWEEN, IN, LIKE and IS NULL. A full `SELECT ... WHERE ...`
//! statement is accepted too; only its condition is parsed.

use crate::error::ParseError;
use crate::translator::DEFAULT_MAX_DEPTH;
use crate::types::{CompareOp, Expression, Literal};
use regex::Regex;
use std::sync::LazyLock;

static SELECT_WHERE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^\s*select\s.+?\swhere\s(.*)$").expect("static regex is valid")
});

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Str(String),
    Number(String),
    Op(CompareOp),
    LParen,
    RParen,
    Comma,
    And,
    Or,
    Not,
    Between,
    In,
    Like,
    Is,
    Null,
}

struct Tokenizer {
    input: Vec<char>,
    pos: usize,
}

impl Tokenizer {
    fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_while<F>(&mut self, predicate: F) -> String
    where
        F: Fn(char) -> bool,
    {
        let mut result = String::new();
        while let Some(ch) = self.peek() {
            if predicate(ch) {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    // Single-quoted; a doubled quote stands for one quote character
    fn read_string(&mut self, start: usize) -> Result<String, ParseError> {
        self.advance();
        let mut result = String::new();
        loop {
            match self.advance() {
                Some('\'') if self.peek() == Some('\'') => {
                    self.advance();
                    result.push('\'');
                }
                Some('\'') => return Ok(result),
                Some(ch) => result.push(ch),
                None => return Err(ParseError::new("Unterminated string literal", start)),
            }
        }
    }

    fn read_operator(&mut self, start: usize) -> Result<CompareOp, ParseError> {
        let mut op = String::new();
        while let Some(ch) = self.peek() {
            if matches!(ch, '=' | '!' | '<' | '>') {
                op.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        op.parse::<CompareOp>()
            .map_err(|_| ParseError::new(format!("Unsupported operator: {}", op), start))
    }

    fn tokenize(&mut self) -> Result<Vec<(Token, usize)>, ParseError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();
            let start = self.pos;
            let ch = match self.peek() {
                Some(c) => c,
                None => break,
            };

            let token = match ch {
                '(' => {
                    self.advance();
                    Token::LParen
                }
                ')' => {
                    self.advance();
                    Token::RParen
                }
                ',' => {
                    self.advance();
                    Token::Comma
                }
                '\'' => Token::Str(self.read_string(start)?),
                '=' | '!' | '<' | '>' => Token::Op(self.read_operator(start)?),
                '-' | '+' if self.peek_at(1).is_some_and(|c| c.is_ascii_digit() || c == '.') => {
                    self.advance();
                    let digits = self.read_while(|c| c.is_ascii_digit() || c == '.');
                    if ch == '-' {
                        Token::Number(format!("-{}", digits))
                    } else {
                        Token::Number(digits)
                    }
                }
                _ if ch.is_ascii_digit() || ch == '.' => {
                    Token::Number(self.read_while(|c| c.is_ascii_digit() || c == '.'))
                }
                _ if ch.is_alphabetic() || ch == '_' || ch == '@' => {
                    let word = self.read_while(|c| c.is_alphanumeric() || c == '_' || c == '.' || c == '@');
                    match word.to_uppercase().as_str() {
                        "AND" => Token::And,
                        "OR" => Token::Or,
                        "NOT" => Token::Not,
                        "BETWEEN" => Token::Between,
                        "IN" => Token::In,
                        "LIKE" => Token::Like,
                        "IS" => Token::Is,
                        "NULL" => Token::Null,
                        _ => Token::Ident(word.trim_start_matches('@').to_string()),
                    }
                }
                _ => {
                    return Err(ParseError::new(
                        format!("Unexpected character: {}", ch),
                        start,
                    ));
                }
            };
            tokens.push((token, start));
        }

        Ok(tokens)
    }
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    end: usize,
    depth: usize,
    max_depth: usize,
}

impl Parser {
    fn new(tokens: Vec<(Token, usize)>, end: usize, max_depth: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            end,
            depth: 0,
            max_depth,
        }
    }

    // Bounds the recursion of NOT and parenthesis nesting
    fn descend(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(self.error(format!(
                "Expression nests deeper than {} levels",
                self.max_depth
            )));
        }
        Ok(())
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(token, _)| token)
    }

    fn position(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|(_, offset)| *offset)
            .unwrap_or(self.end)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.peek().cloned();
        self.pos += 1;
        token
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(message, self.position())
    }

    fn expect(&mut self, expected: Token, what: &str) -> Result<(), ParseError> {
        if self.peek() == Some(&expected) {
            self.advance();
            Ok(())
        } else {
            Err(self.error(format!("Expected {}", what)))
        }
    }

    fn parse(&mut self) -> Result<Expression, ParseError> {
        if self.peek().is_none() {
            return Err(self.error("Empty condition"));
        }
        let expr = self.parse_or()?;
        if self.peek().is_some() {
            return Err(self.error("Unexpected trailing input"));
        }
        Ok(expr)
    }

    fn parse_or(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_and()?;
        while matches!(self.peek(), Some(Token::Or)) {
            self.advance();
            let right = self.parse_and()?;
            left = Expression::or(left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_not()?;
        while matches!(self.peek(), Some(Token::And)) {
            self.advance();
            let right = self.parse_not()?;
            left = Expression::and(left, right);
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Expression, ParseError> {
        if matches!(self.peek(), Some(Token::Not)) {
            self.descend()?;
            self.advance();
            let inner = self.parse_not()?;
            self.depth -= 1;
            return Ok(Expression::not(inner));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expression, ParseError> {
        if matches!(self.peek(), Some(Token::LParen)) {
            self.descend()?;
            self.advance();
            let inner = self.parse_or()?;
            self.expect(Token::RParen, "closing parenthesis")?;
            self.depth -= 1;
            return Ok(Expression::group(inner));
        }
        match self.advance() {
            Some(Token::Ident(field)) => self.parse_predicate(field),
            _ => {
                self.pos -= 1;
                Err(self.error("Expected field name or parenthesis"))
            }
        }
    }

    fn parse_predicate(&mut self, field: String) -> Result<Expression, ParseError> {
        match self.advance() {
            Some(Token::Op(op)) => {
                let value = self.parse_literal()?;
                Ok(Expression::compare(field, op, value))
            }
            Some(Token::Between) => self.parse_between(field),
            Some(Token::In) => self.parse_in(field, false),
            Some(Token::Like) => Ok(Expression::like(field, self.parse_literal()?)),
            Some(Token::Is) => {
                let negated = matches!(self.peek(), Some(Token::Not));
                if negated {
                    self.advance();
                }
                self.expect(Token::Null, "NULL")?;
                Ok(Expression::is_null(field, negated))
            }
            Some(Token::Not) => match self.advance() {
                Some(Token::Between) => Ok(Expression::not(self.parse_between(field)?)),
                Some(Token::In) => self.parse_in(field, true),
                Some(Token::Like) => Ok(Expression::not(Expression::like(
                    field,
                    self.parse_literal()?,
                ))),
                _ => {
                    self.pos -= 1;
                    Err(self.error("Expected BETWEEN, IN or LIKE after NOT"))
                }
            },
            _ => {
                self.pos -= 1;
                Err(self.error(format!("Expected operator after field {}", field)))
            }
        }
    }

    fn parse_between(&mut self, field: String) -> Result<Expression, ParseError> {
        let low = self.parse_literal()?;
        self.expect(Token::And, "AND in BETWEEN")?;
        let high = self.parse_literal()?;
        Ok(Expression::between(field, low, high))
    }

    fn parse_in(&mut self, field: String, negated: bool) -> Result<Expression, ParseError> {
        self.expect(Token::LParen, "opening parenthesis after IN")?;

        let mut values = Vec::new();
        if matches!(self.peek(), Some(Token::RParen)) {
            self.advance();
            return Ok(Expression::in_list(field, values, negated));
        }

        values.push(self.parse_literal()?);
        while matches!(self.peek(), Some(Token::Comma)) {
            self.advance();
            values.push(self.parse_literal()?);
        }

        self.expect(Token::RParen, "closing parenthesis")?;
        Ok(Expression::in_list(field, values, negated))
    }

    fn parse_literal(&mut self) -> Result<Literal, ParseError> {
        match self.advance() {
            Some(Token::Str(s)) => Ok(Literal::String(s)),
            Some(Token::Null) => Ok(Literal::Null),
            Some(Token::Number(n)) => {
                let is_integer = !n.contains('.');
                if let Ok(i) = n.parse::<i64>() {
                    Ok(Literal::Int(i))
                } else if is_integer {
                    self.pos -= 1;
                    Err(self.error(format!("Integer out of range: {}", n)))
                } else if let Ok(f) = n.parse::<f64>() {
                    Ok(Literal::Decimal(f))
                } else {
                    self.pos -= 1;
                    Err(self.error(format!("Invalid number: {}", n)))
                }
            }
            _ => {
                self.pos -= 1;
                Err(self.error("Expected value"))
            }
        }
    }
}

/// Parse condition text (or a `SELECT ... WHERE` statement) into an expression tree.
pub fn parse(query: &str) -> Result<Expression, ParseError> {
    parse_with_max_depth(query, DEFAULT_MAX_DEPTH)
}

/// Like [`parse`], failing once NOT or parentheses nest deeper than `max_depth`.
///
/// Error positions are character offsets into `query`, including any
/// `SELECT ... WHERE` prefix.
pub fn parse_with_max_depth(query: &str, max_depth: usize) -> Result<Expression, ParseError> {
    let (condition, offset) = match SELECT_WHERE.captures(query).and_then(|c| c.get(1)) {
        Some(m) => (m.as_str(), query[..m.start()].chars().count()),
        None => (query, 0),
    };
    let mut tokenizer = Tokenizer::new(condition);
    let tokens = tokenizer.tokenize().map_err(|e| e.offset_by(offset))?;
    let mut parser = Parser::new(tokens, tokenizer.input.len(), max_depth);
    parser.parse().map_err(|e| e.offset_by(offset))
}
