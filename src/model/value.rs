//! Attribute values stored on nodes and edges.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A tagged scalar attribute value.
///
/// Values are deliberately loose: a `String` that parses as a number takes
/// part in numeric comparisons, and a number renders as text for string
/// equality. The coercion helpers below are total and never panic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", content = "value")]
pub enum AttributeValue {
    String(String),
    Number(f64),
    Bool(bool),
    #[default]
    Absent,
}

/// Target type for explicit coercion (used by cache calls).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Numeric,
    Text,
    Boolean,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Numeric => write!(f, "numeric"),
            ValueType::Text => write!(f, "text"),
            ValueType::Boolean => write!(f, "boolean"),
        }
    }
}

// ============================================================================
// Type checking
// ============================================================================

impl AttributeValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeValue::String(_) => "STRING",
            AttributeValue::Number(_) => "NUMBER",
            AttributeValue::Bool(_) => "BOOLEAN",
            AttributeValue::Absent => "ABSENT",
        }
    }

    pub fn is_absent(&self) -> bool { matches!(self, AttributeValue::Absent) }

    /// Numeric view: numbers as-is, strings parsed after trimming.
    /// `"inf"` and `"NaN"` strings are not numeric.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttributeValue::Number(n) => Some(*n),
            AttributeValue::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            AttributeValue::Bool(_) | AttributeValue::Absent => None,
        }
    }

    /// Text view used by string equality.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            AttributeValue::String(s) => Some(Cow::Borrowed(s)),
            AttributeValue::Number(n) => Some(Cow::Owned(format_number(*n))),
            AttributeValue::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
            AttributeValue::Absent => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(b) => Some(*b),
            AttributeValue::String(s) if s.eq_ignore_ascii_case("true") => Some(true),
            AttributeValue::String(s) if s.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        }
    }

    /// Borrow the inner string, without conversion.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Convert into `target`, or fail with [`Error::TypeCoercion`].
    pub fn coerce(&self, target: ValueType) -> Result<AttributeValue> {
        let converted = match target {
            ValueType::Numeric => self.as_number().map(AttributeValue::Number),
            ValueType::Text => self.as_text().map(|t| AttributeValue::String(t.into_owned())),
            ValueType::Boolean => self.as_bool().map(AttributeValue::Bool),
        };
        converted.ok_or_else(|| Error::TypeCoercion {
            expected: target.to_string(),
            got: self.type_name().into(),
        })
    }

    /// Infer a value from a raw text cell (tabular ingestion).
    ///
    /// Empty cells are absent; numbers and `true`/`false` are recognized.
    pub fn infer(raw: &str) -> AttributeValue {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return AttributeValue::Absent;
        }
        if let Some(n) = trimmed.parse::<f64>().ok().filter(|n| n.is_finite()) {
            return AttributeValue::Number(n);
        }
        match trimmed {
            "true" => AttributeValue::Bool(true),
            "false" => AttributeValue::Bool(false),
            _ => AttributeValue::String(raw.to_owned()),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

// ============================================================================
// Conversions (From impls)
// ============================================================================

impl From<bool> for AttributeValue { fn from(v: bool) -> Self { AttributeValue::Bool(v) } }
impl From<i32> for AttributeValue { fn from(v: i32) -> Self { AttributeValue::Number(v as f64) } }
impl From<i64> for AttributeValue { fn from(v: i64) -> Self { AttributeValue::Number(v as f64) } }
impl From<u32> for AttributeValue { fn from(v: u32) -> Self { AttributeValue::Number(v as f64) } }
impl From<f64> for AttributeValue { fn from(v: f64) -> Self { AttributeValue::Number(v) } }
impl From<String> for AttributeValue { fn from(v: String) -> Self { AttributeValue::String(v) } }
impl From<&str> for AttributeValue { fn from(v: &str) -> Self { AttributeValue::String(v.to_owned()) } }
impl<T: Into<AttributeValue>> From<Option<T>> for AttributeValue {
    fn from(v: Option<T>) -> Self { v.map(Into::into).unwrap_or(AttributeValue::Absent) }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::String(s) => write!(f, "'{}'", s.replace('\'', "\\'")),
            AttributeValue::Number(n) => write!(f, "{}", format_number(*n)),
            AttributeValue::Bool(b) => write!(f, "{b}"),
            AttributeValue::Absent => write!(f, "absent"),
        }
    }
}
