//! The scalar value model shared by data sources, functions and rendered nodes.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// A single cell of a data row, or the result of a function.
///
/// `Null` doubles as the "no value yet" result of a function. It is never
/// coerced to zero and renders as `null`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Decimal(f64),
    Text(Arc<str>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Decimal(_))
    }

    /// Numeric view of the value. Text is not parsed; converting text columns
    /// is the data source's job.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Adds two numeric values. Integers stay integral until they overflow or
    /// meet a decimal. Returns `None` when either side is not numeric.
    pub fn checked_add(&self, other: &Value) -> Option<Value> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Some(
                a.checked_add(*b)
                    .map(Value::Integer)
                    .unwrap_or(Value::Decimal(*a as f64 + *b as f64)),
            ),
            (a, b) => Some(Value::Decimal(a.as_f64()? + b.as_f64()?)),
        }
    }

    /// Orders two numeric values; `None` for non-numeric or NaN operands.
    pub fn numeric_cmp(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (a, b) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Decimal(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.into())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v.into())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_addition_stays_integral() {
        let sum = Value::from(2).checked_add(&Value::from(3));
        assert_eq!(sum, Some(Value::Integer(5)));
    }

    #[test]
    fn test_overflow_promotes_to_decimal() {
        let sum = Value::Integer(i64::MAX).checked_add(&Value::Integer(1));
        assert!(matches!(sum, Some(Value::Decimal(_))));
    }

    #[test]
    fn test_mixed_addition_and_non_numeric() {
        assert_eq!(
            Value::from(1).checked_add(&Value::from(0.5)),
            Some(Value::Decimal(1.5))
        );
        assert_eq!(Value::from("x").checked_add(&Value::from(1)), None);
        assert_eq!(Value::Null.checked_add(&Value::from(1)), None);
    }

    #[test]
    fn test_display_distinguishes_null_from_zero() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::from(0).to_string(), "0");
        assert_eq!(Value::from(5.0).to_string(), "5");
    }

    #[test]
    fn test_untagged_deserialization() {
        let values: Vec<Value> = serde_json::from_str(r#"[null, 1, 2.5, "RA", true]"#).unwrap();
        assert_eq!(
            values,
            vec![
                Value::Null,
                Value::Integer(1),
                Value::Decimal(2.5),
                Value::from("RA"),
                Value::Bool(true)
            ]
        );
    }
}
