use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

use super::MappingError;

/// A stored item: attribute name to value.
pub type Record = BTreeMap<String, FieldValue>;

/// A single attribute value as the store understands it.
///
/// There is deliberately no binary float variant. Every number is an exact
/// decimal, matching the store's numeric type.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Str(String),
    Num(Decimal),
    List(Vec<FieldValue>),
    Map(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    /// Convert a binary float through its shortest round-trip decimal text.
    ///
    /// `29.99_f64` becomes exactly `29.99`, never `29.989999999999998...`.
    pub fn from_f64(value: f64) -> Result<Self, MappingError> {
        if !value.is_finite() {
            return Err(MappingError::NonFiniteNumber(value.to_string()));
        }
        parse_decimal(&value.to_string()).map(Self::Num)
    }

    /// Convert an arbitrary JSON value, coercing every number (at any depth)
    /// into an exact decimal. Numbers are read from their JSON text, so no
    /// digit is lost.
    pub fn from_json(value: &Value) -> Result<Self, MappingError> {
        let converted = match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::String(s) => Self::Str(s.clone()),
            Value::Number(n) => Self::Num(parse_decimal(&n.to_string())?),
            Value::Array(items) => Self::List(
                items
                    .iter()
                    .map(Self::from_json)
                    .collect::<Result<_, _>>()?,
            ),
            Value::Object(map) => Self::Map(
                map.iter()
                    .map(|(k, v)| Ok((k.clone(), Self::from_json(v)?)))
                    .collect::<Result<_, MappingError>>()?,
            ),
        };
        Ok(converted)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Num(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Parse decimal text, accepting scientific notation as a fallback.
pub(crate) fn parse_decimal(text: &str) -> Result<Decimal, MappingError> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|_| MappingError::InvalidNumber(text.to_string()))
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        Self::Num(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        Self::Num(Decimal::from(value))
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
