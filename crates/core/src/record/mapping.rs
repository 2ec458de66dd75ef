use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::{FieldValue, MappingError, Record};

/// A domain type that can be persisted as a [`Record`].
pub trait RecordMapping: Sized {
    /// Entity name used in errors and logs.
    const ENTITY_TYPE: &'static str;

    /// Primary-key attribute name.
    const KEY_ATTRIBUTE: &'static str;

    /// Attributes a partial update may touch. Never includes the key or the
    /// timestamps.
    const UPDATABLE: &'static [&'static str];

    /// Primary-key value.
    fn key(&self) -> String;

    /// Convert into a full record, including the key attribute.
    fn to_record(&self) -> Record;

    /// Convert a stored record back into the domain type.
    fn from_record(record: &Record) -> Result<Self, MappingError>;
}

// ============================================================================
// Helper functions
// ============================================================================

/// Get a required string attribute.
pub(crate) fn get_string(record: &Record, key: &str) -> Result<String, MappingError> {
    record
        .get(key)
        .and_then(FieldValue::as_str)
        .map(str::to_string)
        .ok_or_else(|| MappingError::MissingField(key.to_string()))
}

/// Get an optional string attribute. Null and absent are both `None`.
pub(crate) fn get_optional_string(record: &Record, key: &str) -> Option<String> {
    record
        .get(key)
        .and_then(FieldValue::as_str)
        .map(str::to_string)
}

/// Get a boolean attribute, falling back to `default` when absent or null.
pub(crate) fn get_bool(record: &Record, key: &str, default: bool) -> Result<bool, MappingError> {
    match record.get(key) {
        None | Some(FieldValue::Null) => Ok(default),
        Some(value) => value.as_bool().ok_or_else(|| MappingError::InvalidField {
            field: key.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}

/// Get a required UUID attribute.
pub(crate) fn get_uuid(record: &Record, key: &str) -> Result<Uuid, MappingError> {
    let s = get_string(record, key)?;
    Uuid::parse_str(&s).map_err(|e| MappingError::InvalidField {
        field: key.to_string(),
        reason: e.to_string(),
    })
}

/// Get a required decimal attribute.
pub(crate) fn get_decimal(record: &Record, key: &str) -> Result<Decimal, MappingError> {
    record
        .get(key)
        .and_then(FieldValue::as_decimal)
        .ok_or_else(|| MappingError::MissingField(key.to_string()))
}

/// Get a non-negative integer attribute, falling back to `default` when absent.
pub(crate) fn get_u32(record: &Record, key: &str, default: u32) -> Result<u32, MappingError> {
    match record.get(key) {
        None | Some(FieldValue::Null) => Ok(default),
        Some(value) => value
            .as_decimal()
            .filter(|n| n.fract().is_zero())
            .and_then(|n| n.to_u32())
            .ok_or_else(|| MappingError::InvalidField {
                field: key.to_string(),
                reason: "expected a non-negative integer".to_string(),
            }),
    }
}

/// Get a required timestamp attribute.
///
/// Accepts RFC 3339 and offset-less ISO 8601 (read as UTC), the latter being
/// what earlier deployments wrote.
pub(crate) fn get_datetime(record: &Record, key: &str) -> Result<DateTime<Utc>, MappingError> {
    let s = get_string(record, key)?;
    parse_timestamp(&s).ok_or_else(|| MappingError::InvalidField {
        field: key.to_string(),
        reason: format!("invalid timestamp {s:?}"),
    })
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}
