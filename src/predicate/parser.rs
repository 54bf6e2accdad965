//! Predicate recursive descent parser.
//!
//! Grammar (one comparison, no connectives):
//!
//! ```text
//! predicate := field op operand
//! degree    := (indeg | outdeg | deg) op integer
//! op        := == | != | <> | > | >= | < | <=
//! operand   := string | ['-'] number | true | false | $param
//! ```

use crate::model::AttributeValue;
use crate::{Error, Result};
use super::lexer::{Token, TokenKind};
use super::{CompareOp, DegreeKind, DegreePredicate, Operand, Predicate};

/// Parser state: a token slice plus a cursor.
struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl<'t> Parser<'t> {
    fn new(tokens: &'t [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    fn advance(&mut self) -> &Token {
        let tok = &self.tokens[self.pos.min(self.tokens.len() - 1)];
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn error(&self, msg: String) -> Error {
        Error::PredicateError {
            position: self.peek().span.start,
            message: msg,
        }
    }

    fn expect_eof(&self) -> Result<()> {
        if self.at(TokenKind::Eof) {
            Ok(())
        } else {
            let tok = self.peek();
            Err(self.error(format!(
                "Expected end of predicate, got '{}' (combine filters by chaining calls)",
                tok.text
            )))
        }
    }

    fn parse_field(&mut self) -> Result<String> {
        if self.at(TokenKind::Identifier) {
            Ok(self.advance().text.clone())
        } else {
            let tok = self.peek();
            Err(self.error(format!("Expected attribute name, got {:?} '{}'", tok.kind, tok.text)))
        }
    }

    fn parse_op(&mut self) -> Result<CompareOp> {
        let op = match self.peek_kind() {
            TokenKind::Eq => CompareOp::Eq,
            TokenKind::Neq => CompareOp::Neq,
            TokenKind::Lt => CompareOp::Lt,
            TokenKind::Lte => CompareOp::Lte,
            TokenKind::Gt => CompareOp::Gt,
            TokenKind::Gte => CompareOp::Gte,
            other => {
                let text = self.peek().text.clone();
                return Err(self.error(format!("Expected comparison operator, got {other:?} '{text}'")));
            }
        };
        self.advance();
        Ok(op)
    }

    fn parse_number(&mut self) -> Result<f64> {
        let negative = if self.at(TokenKind::Minus) {
            self.advance();
            true
        } else {
            false
        };
        if !self.at(TokenKind::Number) {
            let text = self.peek().text.clone();
            return Err(self.error(format!("Expected number, got '{text}'")));
        }
        let position = self.peek().span.start;
        let text = self.advance().text.clone();
        let value: f64 = text.parse().map_err(|_| Error::PredicateError {
            position,
            message: format!("Invalid number '{text}'"),
        })?;
        Ok(if negative { -value } else { value })
    }

    fn parse_operand(&mut self) -> Result<Operand> {
        match self.peek_kind() {
            TokenKind::StringLiteral => {
                let s = self.advance().text.clone();
                Ok(Operand::Literal(AttributeValue::String(s)))
            }
            TokenKind::Number | TokenKind::Minus => {
                Ok(Operand::Literal(AttributeValue::Number(self.parse_number()?)))
            }
            TokenKind::True => { self.advance(); Ok(Operand::Literal(AttributeValue::Bool(true))) }
            TokenKind::False => { self.advance(); Ok(Operand::Literal(AttributeValue::Bool(false))) }
            TokenKind::Parameter => Ok(Operand::Param(self.advance().text.clone())),
            TokenKind::Identifier => {
                let text = self.peek().text.clone();
                Err(self.error(format!("Expected literal, got bare word '{text}' (quote strings)")))
            }
            other => {
                let text = self.peek().text.clone();
                Err(self.error(format!("Expected literal, got {other:?} '{text}'")))
            }
        }
    }
}

/// Parse a token stream into a [`Predicate`].
pub fn parse_predicate(tokens: &[Token]) -> Result<Predicate> {
    let mut p = Parser::new(tokens);
    let field = p.parse_field()?;
    let op = p.parse_op()?;
    let operand = p.parse_operand()?;
    p.expect_eof()?;
    Ok(Predicate { field, op, operand })
}

/// Parse a token stream into a [`DegreePredicate`].
pub fn parse_degree(tokens: &[Token]) -> Result<DegreePredicate> {
    let mut p = Parser::new(tokens);
    let kind = match p.peek().text.as_str() {
        "indeg" if p.at(TokenKind::Identifier) => DegreeKind::In,
        "outdeg" if p.at(TokenKind::Identifier) => DegreeKind::Out,
        "deg" if p.at(TokenKind::Identifier) => DegreeKind::Total,
        other => {
            let other = other.to_owned();
            return Err(p.error(format!("Expected indeg, outdeg or deg, got '{other}'")));
        }
    };
    p.advance();
    let op = p.parse_op()?;
    let position = p.peek().span.start;
    let value = p.parse_number()?;
    if value.fract() != 0.0 {
        return Err(Error::PredicateError {
            position,
            message: format!("Degree must be an integer, got {value}"),
        });
    }
    p.expect_eof()?;
    Ok(DegreePredicate { kind, op, value: value as i64 })
}
