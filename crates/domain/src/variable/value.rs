//! Typed variable values and their canonical text form

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DomainError, DomainResult};

/// Largest integer magnitude an `f64` holds without rounding (2^53).
const MAX_EXACT_INTEGER: u128 = 1 << 53;

/// A dynamic variable value. Exactly three kinds are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariableValue {
    /// Text value, substituted verbatim.
    String(String),
    /// Numeric value, always finite.
    Number(f64),
    /// Boolean value, rendered as `true` / `false`.
    Boolean(bool),
}

impl VariableValue {
    /// Creates a number value, rejecting NaN and infinities.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnsupportedType`] if `value` is not finite.
    pub fn number(name: &str, value: f64) -> DomainResult<Self> {
        if value.is_finite() {
            Ok(Self::Number(value))
        } else {
            Err(DomainError::UnsupportedType {
                name: name.to_string(),
                found: "non-finite number".to_string(),
            })
        }
    }

    /// Checks that a value built directly (not through [`from_json`](Self::from_json))
    /// is acceptable for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnsupportedType`] for a non-finite number.
    pub fn validated(self, name: &str) -> DomainResult<Self> {
        match self {
            Self::Number(n) => Self::number(name, n),
            other => Ok(other),
        }
    }

    /// Converts a JSON value supplied by a caller into a variable value.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnsupportedType`] for null, arrays, objects and
    /// numbers that cannot be represented exactly as a finite `f64`. Integers
    /// above 2^53 in magnitude must be passed as strings.
    pub fn from_json(name: &str, value: &Value) -> DomainResult<Self> {
        match value {
            Value::String(s) => Ok(Self::String(s.clone())),
            Value::Bool(b) => Ok(Self::Boolean(*b)),
            Value::Number(n) => {
                let integer = n
                    .as_i64()
                    .map(i128::from)
                    .or_else(|| n.as_u64().map(i128::from));
                if integer.is_some_and(|i| i.unsigned_abs() > MAX_EXACT_INTEGER) {
                    return Err(DomainError::UnsupportedType {
                        name: name.to_string(),
                        found: "integer beyond exact number range".to_string(),
                    });
                }
                match n.as_f64() {
                    Some(f) => Self::number(name, f),
                    None => Err(DomainError::UnsupportedType {
                        name: name.to_string(),
                        found: "number out of range".to_string(),
                    }),
                }
            }
            other => Err(DomainError::UnsupportedType {
                name: name.to_string(),
                found: json_type_name(other).to_string(),
            }),
        }
    }

    /// Renders the canonical, locale-independent text form.
    ///
    /// Numbers use the shortest representation that round-trips, without
    /// grouping separators or exponents: `5000.5` renders as `5000.5` and
    /// `5000.0` as `5000`.
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Returns the string content if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for VariableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
            Self::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for VariableValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for VariableValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for VariableValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i32> for VariableValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<u32> for VariableValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
