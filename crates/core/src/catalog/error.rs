use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur when validating catalog entries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Product name cannot be empty")]
    EmptyProductName,
    #[error("Product name too long (max 200 characters)")]
    ProductNameTooLong,
    #[error("Price cannot be negative: {0}")]
    NegativePrice(Decimal),
}
