//! # JSON Type Primitive
//!
//! The single type-checking primitive the schema engine depends on. A
//! document is an arbitrary `serde_json::Value`; schemas name one of seven
//! JSON types, and [`JsonType::matches`] decides conformance.
//!
//! `integer` is a refinement of `number`: any whole-number numeric value
//! (including `5.0`) is an integer, while every numeric value is a number.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::error::HfError;

/// The seven JSON Schema type names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    /// A key → value mapping.
    Object,
    /// An ordered sequence.
    Array,
    /// A UTF-8 string.
    String,
    /// A whole-number numeric value.
    Integer,
    /// Any numeric value.
    Number,
    /// `true` or `false`.
    Boolean,
    /// The `null` literal.
    Null,
}

impl JsonType {
    /// All seven types in declaration order.
    pub fn all() -> &'static [JsonType] {
        &[
            Self::Object,
            Self::Array,
            Self::String,
            Self::Integer,
            Self::Number,
            Self::Boolean,
            Self::Null,
        ]
    }

    /// The lowercase name used in schemas.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Array => "array",
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Null => "null",
        }
    }

    /// Whether `value` conforms to this type.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Self::Object => value.is_object(),
            Self::Array => value.is_array(),
            Self::String => value.is_string(),
            Self::Integer => matches!(value, Value::Number(n) if is_whole_number(n)),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Null => value.is_null(),
        }
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JsonType {
    type Err = HfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| HfError::UnknownJsonType(s.to_string()))
    }
}

/// Returns the most specific type of a runtime value.
///
/// Whole numbers report [`JsonType::Integer`]; other numbers report
/// [`JsonType::Number`].
pub fn json_type_of(value: &Value) -> JsonType {
    match value {
        Value::Null => JsonType::Null,
        Value::Bool(_) => JsonType::Boolean,
        Value::Number(n) if is_whole_number(n) => JsonType::Integer,
        Value::Number(_) => JsonType::Number,
        Value::String(_) => JsonType::String,
        Value::Array(_) => JsonType::Array,
        Value::Object(_) => JsonType::Object,
    }
}

/// Whether a JSON number has no fractional part.
pub fn is_whole_number(n: &Number) -> bool {
    if n.is_i64() || n.is_u64() {
        return true;
    }
    n.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0)
}
