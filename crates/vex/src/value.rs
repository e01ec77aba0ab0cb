//! Value kinds, typed values, and text classification.

use crate::error::{Error, Result};
use std::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Declared shape of an option's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(rename_all = "lowercase"))]
pub enum ValueKind {
    /// Presence-only; carries no value.
    Flag,
    Integer,
    Float,
    String,
}

impl ValueKind {
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Flag => "flag",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::String => "string",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed value attached to a token.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(untagged))]
pub enum Value {
    Integer(i64),
    Float(f64),
    String(String),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Integer(_) => ValueKind::Integer,
            Value::Float(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => f.write_str(s),
        }
    }
}

/// Infer the kind of a free-standing argument from its text.
///
/// All ASCII digits that fit an `i64` → Integer. Digits plus exactly one
/// `.` with a finite `f64` value → Float. Anything else, including the empty
/// string and dot-only text such as `.` or `..`, → String.
pub fn classify(text: &str) -> ValueKind {
    let mut digits = 0usize;
    let mut dots = 0usize;
    for b in text.bytes() {
        match b {
            b'0'..=b'9' => digits += 1,
            b'.' => dots += 1,
            _ => return ValueKind::String,
        }
    }
    match (digits, dots) {
        (0, _) => ValueKind::String,
        (_, 0) if text.parse::<i64>().is_ok() => ValueKind::Integer,
        (_, 0) => ValueKind::String,
        (_, 1) if text.parse::<f64>().is_ok_and(f64::is_finite) => ValueKind::Float,
        _ => ValueKind::String,
    }
}

/// Convert text to a value of the given kind.
///
/// Floats must be finite: `inf`, `nan` and out-of-range text are rejected.
pub fn convert(kind: ValueKind, text: &str) -> Result<Value> {
    match kind {
        ValueKind::Integer => text
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| Error::invalid(format!("invalid integer value: {}", text))),
        ValueKind::Float => text
            .parse::<f64>()
            .ok()
            .filter(|x| x.is_finite())
            .map(Value::Float)
            .ok_or_else(|| Error::invalid(format!("invalid float value: {}", text))),
        ValueKind::String => Ok(Value::String(text.to_string())),
        ValueKind::Flag => Err(Error::invalid(format!("flag takes no value: {}", text))),
    }
}
