//! API request types for catalog operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::record::{FieldValue, UpdateBuilder, UpdateError, UpdateExpression};
use crate::serde::deserialize_some;

use super::types::License;

fn default_active() -> bool {
    true
}

/// Request payload for adding a license to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateLicenseRequest {
    pub product_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_platforms: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_launchers: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_version: Option<String>,
    #[serde(default)]
    pub has_spoofer: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default)]
    pub stock_quantity: u32,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl CreateLicenseRequest {
    pub fn new(product_name: impl Into<String>, price: Decimal) -> Self {
        Self {
            product_name: product_name.into(),
            description: None,
            price,
            supported_platforms: None,
            supported_launchers: None,
            recommendations: None,
            product_version: None,
            has_spoofer: false,
            language: None,
            stock_quantity: 0,
            is_active: true,
            image_url: None,
            category: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_stock(mut self, stock_quantity: u32) -> Self {
        self.stock_quantity = stock_quantity;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Convert into a License with a fresh ID and timestamps.
    pub fn into_license(self) -> License {
        let mut license = License::new(self.product_name, self.price);
        license.description = self.description;
        license.supported_platforms = self.supported_platforms;
        license.supported_launchers = self.supported_launchers;
        license.recommendations = self.recommendations;
        license.product_version = self.product_version;
        license.has_spoofer = self.has_spoofer;
        license.language = self.language;
        license.stock_quantity = self.stock_quantity;
        license.is_active = self.is_active;
        license.image_url = self.image_url;
        license.category = self.category;
        license
    }
}

/// Request payload for updating a license.
///
/// Absent fields stay unchanged. Optional text fields also accept an
/// explicit `null`, which clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateLicenseRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    #[serde(
        default,
        with = "rust_decimal::serde::arbitrary_precision_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub supported_platforms: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub supported_launchers: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub recommendations: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub product_version: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_spoofer: Option<bool>,
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub language: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_url: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<Option<String>>,
}

impl UpdateLicenseRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_product_name(mut self, product_name: impl Into<String>) -> Self {
        self.product_name = Some(product_name.into());
        self
    }

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_stock(mut self, stock_quantity: u32) -> Self {
        self.stock_quantity = Some(stock_quantity);
        self
    }

    /// Set the description; `None` clears it.
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(Some(image_url.into()));
        self
    }

    /// Attribute changes for every field present in the request.
    pub fn changes(&self) -> Vec<(String, FieldValue)> {
        let mut changes = Vec::new();
        let mut push = |field: &str, value: FieldValue| changes.push((field.to_string(), value));

        if let Some(name) = &self.product_name {
            push("product_name", FieldValue::from(name.as_str()));
        }
        if let Some(price) = self.price {
            push("price", FieldValue::from(price));
        }
        if let Some(has_spoofer) = self.has_spoofer {
            push("has_spoofer", FieldValue::from(has_spoofer));
        }
        if let Some(stock) = self.stock_quantity {
            push("stock_quantity", FieldValue::from(stock));
        }
        if let Some(is_active) = self.is_active {
            push("is_active", FieldValue::from(is_active));
        }

        let text_fields = [
            ("description", &self.description),
            ("supported_platforms", &self.supported_platforms),
            ("supported_launchers", &self.supported_launchers),
            ("recommendations", &self.recommendations),
            ("product_version", &self.product_version),
            ("language", &self.language),
            ("image_url", &self.image_url),
            ("category", &self.category),
        ];
        for (field, value) in text_fields {
            if let Some(value) = value {
                push(field, FieldValue::from(value.clone()));
            }
        }
        changes
    }

    /// Build the partial update for this request.
    pub fn to_update(&self, now: DateTime<Utc>) -> Result<UpdateExpression, UpdateError> {
        Ok(UpdateBuilder::for_mapping::<License>()
            .set_all(self.changes())?
            .build(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::UPDATED_AT;

    #[test]
    fn test_create_request_defaults() {
        let request: CreateLicenseRequest =
            serde_json::from_str(r#"{"product_name": "Apex Legends Pro", "price": 29.99}"#)
                .unwrap();
        assert_eq!(request.price, Decimal::new(2999, 2));
        assert_eq!(request.stock_quantity, 0);
        assert!(request.is_active);
        assert!(!request.has_spoofer);
    }

    #[test]
    fn test_create_request_accepts_integer_price() {
        let request: CreateLicenseRequest =
            serde_json::from_str(r#"{"product_name": "Bundle", "price": 25}"#).unwrap();
        assert_eq!(request.price, Decimal::from(25));
    }

    #[test]
    fn test_create_request_rejects_negative_stock() {
        let result = serde_json::from_str::<CreateLicenseRequest>(
            r#"{"product_name": "x", "price": 1.0, "stock_quantity": -3}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_into_license_copies_fields() {
        let license = CreateLicenseRequest::new("Valorant Cheat Pro", Decimal::new(2499, 2))
            .with_description("Aimbot")
            .with_stock(15)
            .with_category("FPS")
            .into_license();
        assert_eq!(license.product_name, "Valorant Cheat Pro");
        assert_eq!(license.description.as_deref(), Some("Aimbot"));
        assert_eq!(license.stock_quantity, 15);
        assert_eq!(license.category.as_deref(), Some("FPS"));
    }

    #[test]
    fn test_update_distinguishes_null_from_absent() {
        let request: UpdateLicenseRequest =
            serde_json::from_str(r#"{"description": null, "price": 19.5}"#).unwrap();

        let changes = request.changes();
        let fields: Vec<&str> = changes.iter().map(|(f, _)| f.as_str()).collect();
        assert!(fields.contains(&"description"));
        assert!(fields.contains(&"price"));
        assert!(!fields.contains(&"category"));

        let (_, description) = changes
            .iter()
            .find(|(f, _)| f == "description")
            .unwrap();
        assert!(description.is_null());
    }

    #[test]
    fn test_empty_update_only_touches_timestamp() {
        let update = UpdateLicenseRequest::new().to_update(Utc::now()).unwrap();
        assert_eq!(update.assignments().len(), 1);
        assert!(update.touches(UPDATED_AT));
    }

    #[test]
    fn test_update_price_is_exact() {
        let request: UpdateLicenseRequest = serde_json::from_str(r#"{"price": 29.99}"#).unwrap();
        let update = request.to_update(Utc::now()).unwrap();
        assert_eq!(
            update.values()[":price"],
            FieldValue::Num(Decimal::new(2999, 2))
        );
    }
}
