use rust_decimal::Decimal;

use super::error::CatalogError;
use super::requests::{CreateLicenseRequest, UpdateLicenseRequest};

const MAX_PRODUCT_NAME_CHARS: usize = 200;

/// Validates a product name.
pub fn validate_product_name(name: &str) -> Result<(), CatalogError> {
    if name.trim().is_empty() {
        return Err(CatalogError::EmptyProductName);
    }
    if name.chars().count() > MAX_PRODUCT_NAME_CHARS {
        return Err(CatalogError::ProductNameTooLong);
    }
    Ok(())
}

/// Validates a price. The exact value is kept, whatever its scale.
pub fn validate_price(price: Decimal) -> Result<(), CatalogError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(CatalogError::NegativePrice(price));
    }
    Ok(())
}

/// Validates a license before creation.
pub fn validate_new_license(request: &CreateLicenseRequest) -> Result<(), CatalogError> {
    validate_product_name(&request.product_name)?;
    validate_price(request.price)
}

/// Validates the fields present in an update request.
pub fn validate_license_update(request: &UpdateLicenseRequest) -> Result<(), CatalogError> {
    if let Some(name) = &request.product_name {
        validate_product_name(name)?;
    }
    if let Some(price) = request.price {
        validate_price(price)?;
    }
    Ok(())
}
