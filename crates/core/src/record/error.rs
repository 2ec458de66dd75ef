use thiserror::Error;

/// Errors converting between records and domain types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MappingError {
    #[error("Missing or invalid field: {0}")]
    MissingField(String),
    #[error("Invalid value for {field}: {reason}")]
    InvalidField { field: String, reason: String },
    #[error("Number cannot be represented exactly: {0}")]
    InvalidNumber(String),
    #[error("Non-finite number is not storable: {0}")]
    NonFiniteNumber(String),
}

/// Errors building a partial-update expression.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UpdateError {
    #[error("{entity_type} field cannot be updated: {field}")]
    UnknownField {
        entity_type: &'static str,
        field: String,
    },
}
