//! # Predicates
//!
//! A predicate is a single comparison `<attribute> <op> <value>` evaluated
//! against one node or edge. Source text is parsed into a small AST
//! ([`Predicate`]); nothing is interpolated or `eval`ed.
//!
//! Values computed at query time (for example the maximum of a just-cached
//! attribute) are passed as explicit parameters: write `$name` in the source
//! and bind it with [`Predicate::bind`] instead of formatting the number into
//! the string.
//!
//! Comparison rules:
//!
//! | Operator | Operand | Rule |
//! |----------|---------|------|
//! | `>` `>=` `<` `<=` | any | both sides numeric, else false |
//! | `==` `!=` | string | exact text equality |
//! | `==` `!=` | number | numeric equality; non-numeric attribute is unequal |
//! | `==` `!=` | boolean | boolean equality; non-boolean attribute is unequal |
//!
//! An absent attribute never satisfies any comparison, `!=` included.

pub mod lexer;
pub mod parser;

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use crate::model::{AttributeSource, AttributeValue};
use crate::{Error, Result};

/// Named values for `$param` operands.
pub type Params = HashMap<String, AttributeValue>;

/// Comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl CompareOp {
    pub fn is_ordering(self) -> bool {
        matches!(self, CompareOp::Lt | CompareOp::Lte | CompareOp::Gt | CompareOp::Gte)
    }

    /// Apply the operator to an already-computed ordering.
    pub fn holds(self, ord: Ordering) -> bool {
        match self {
            CompareOp::Eq => ord == Ordering::Equal,
            CompareOp::Neq => ord != Ordering::Equal,
            CompareOp::Lt => ord == Ordering::Less,
            CompareOp::Lte => ord != Ordering::Greater,
            CompareOp::Gt => ord == Ordering::Greater,
            CompareOp::Gte => ord != Ordering::Less,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CompareOp::Eq => "==",
            CompareOp::Neq => "!=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
        };
        f.write_str(s)
    }
}

/// Right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Literal(AttributeValue),
    /// `$name`, resolved by [`Predicate::bind`].
    Param(String),
}

/// A parsed `<field> <op> <operand>` comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub field: String,
    pub op: CompareOp,
    pub operand: Operand,
}

impl Predicate {
    /// Build a predicate without going through source text.
    pub fn new(field: impl Into<String>, op: CompareOp, value: impl Into<AttributeValue>) -> Self {
        Self {
            field: field.into(),
            op,
            operand: Operand::Literal(value.into()),
        }
    }

    /// Parse predicate source text.
    pub fn parse(source: &str) -> Result<Self> {
        let tokens = lexer::tokenize(source)?;
        parser::parse_predicate(&tokens)
    }

    /// True when the operand is a literal.
    pub fn is_bound(&self) -> bool {
        matches!(self.operand, Operand::Literal(_))
    }

    /// Resolve a `$param` operand against `params`.
    pub fn bind(&self, params: &Params) -> Result<Predicate> {
        match &self.operand {
            Operand::Literal(_) => Ok(self.clone()),
            Operand::Param(name) => {
                let value = params.get(name).ok_or_else(|| Error::PredicateError {
                    position: 0,
                    message: format!("Unbound parameter ${name}"),
                })?;
                if value.is_absent() {
                    return Err(Error::PredicateError {
                        position: 0,
                        message: format!("Parameter ${name} is absent"),
                    });
                }
                Ok(Predicate {
                    field: self.field.clone(),
                    op: self.op,
                    operand: Operand::Literal(value.clone()),
                })
            }
        }
    }

    /// Evaluate against one entity. Unbound predicates match nothing.
    pub fn matches<S: AttributeSource + ?Sized>(&self, entity: &S) -> bool {
        let Operand::Literal(literal) = &self.operand else {
            return false;
        };
        compare(&entity.lookup(&self.field), self.op, literal)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.operand {
            Operand::Literal(v) => write!(f, "{} {} {}", self.field, self.op, v),
            Operand::Param(name) => write!(f, "{} {} ${}", self.field, self.op, name),
        }
    }
}

/// Compare an attribute value against a literal.
pub fn compare(value: &AttributeValue, op: CompareOp, literal: &AttributeValue) -> bool {
    if value.is_absent() {
        return false;
    }
    if op.is_ordering() {
        return match (value.as_number(), literal.as_number()) {
            (Some(a), Some(b)) => a.partial_cmp(&b).is_some_and(|ord| op.holds(ord)),
            _ => false,
        };
    }

    let equal = match literal {
        AttributeValue::String(s) => value.as_text().map(|t| t == s.as_str()),
        AttributeValue::Number(n) => value.as_number().map(|a| a == *n),
        AttributeValue::Bool(b) => value.as_bool().map(|a| a == *b),
        AttributeValue::Absent => return false,
    };
    match op {
        CompareOp::Eq => equal == Some(true),
        CompareOp::Neq => equal != Some(true),
        _ => unreachable!("ordering operators handled above"),
    }
}

/// Parse and evaluate `source` against one entity.
///
/// Total: a predicate that fails to parse, or that references a parameter,
/// evaluates to false.
pub fn evaluate<S: AttributeSource + ?Sized>(entity: &S, source: &str) -> bool {
    match Predicate::parse(source) {
        Ok(p) => p.matches(entity),
        Err(err) => {
            tracing::trace!(source, %err, "predicate failed to parse");
            false
        }
    }
}

// ============================================================================
// Degree predicates
// ============================================================================

/// Which degree a [`DegreePredicate`] tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DegreeKind {
    /// `indeg`: inbound edges.
    In,
    /// `outdeg`: outbound edges.
    Out,
    /// `deg`: inbound plus outbound.
    Total,
}

/// `indeg|outdeg|deg <op> <int>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DegreePredicate {
    pub kind: DegreeKind,
    pub op: CompareOp,
    pub value: i64,
}

impl DegreePredicate {
    pub fn parse(source: &str) -> Result<Self> {
        let tokens = lexer::tokenize(source)?;
        parser::parse_degree(&tokens)
    }

    pub fn matches(&self, in_degree: usize, out_degree: usize) -> bool {
        let degree = match self.kind {
            DegreeKind::In => in_degree,
            DegreeKind::Out => out_degree,
            DegreeKind::Total => in_degree + out_degree,
        } as i64;
        self.op.holds(degree.cmp(&self.value))
    }
}
