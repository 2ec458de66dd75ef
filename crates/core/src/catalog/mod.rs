mod error;
mod operations;
mod requests;
mod types;

pub use error::CatalogError;
pub use operations::{
    validate_license_update, validate_new_license, validate_price, validate_product_name,
};
pub use requests::{CreateLicenseRequest, UpdateLicenseRequest};
pub use types::License;
