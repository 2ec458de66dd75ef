//! Record mapper: the store-agnostic item representation.
//!
//! Domain types are converted into a [`Record`] (attribute name to
//! [`FieldValue`]) before they reach a storage backend. Numbers are always
//! exact decimals. Partial updates are expressed as an [`UpdateExpression`]
//! built from an allow-list of attribute names.

mod entities;
mod error;
mod mapping;
mod update;
mod value;

pub use error::{MappingError, UpdateError};
pub use mapping::RecordMapping;
pub use update::{UpdateBuilder, UpdateExpression};
pub use value::{FieldValue, Record};

/// Attribute holding the creation timestamp.
pub const CREATED_AT: &str = "create_at";

/// Attribute holding the last-update timestamp. Set on every update.
pub const UPDATED_AT: &str = "update_at";
