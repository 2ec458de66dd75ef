use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A sellable catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    pub license_id: Uuid,
    pub product_name: String,
    pub description: Option<String>,
    /// Exact decimal; travels as a JSON number.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub price: Decimal,
    pub supported_platforms: Option<String>,
    pub supported_launchers: Option<String>,
    pub recommendations: Option<String>,
    pub product_version: Option<String>,
    pub has_spoofer: bool,
    pub language: Option<String>,
    pub stock_quantity: u32,
    pub is_active: bool,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub create_at: DateTime<Utc>,
    pub update_at: DateTime<Utc>,
}

impl License {
    /// Creates an active license with no stock and no optional details.
    pub fn new(product_name: impl Into<String>, price: Decimal) -> Self {
        let now = Utc::now();
        Self {
            license_id: Uuid::new_v4(),
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
            create_at: now,
            update_at: now,
        }
    }

    /// Sets a specific ID (useful for testing).
    pub fn with_id(mut self, license_id: Uuid) -> Self {
        self.license_id = license_id;
        self
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_new_license_defaults() {
        let license = License::new("Rust Cheat Basic", Decimal::new(999, 2));
        assert!(license.is_active);
        assert!(!license.has_spoofer);
        assert_eq!(license.stock_quantity, 0);
        assert_eq!(license.create_at, license.update_at);
        assert!(license.description.is_none());
    }

    #[test]
    fn test_price_serializes_as_number() {
        let license = License::new("Apex Legends Pro", Decimal::new(2999, 2));
        let json = serde_json::to_value(&license).unwrap();
        assert_eq!(json["price"], serde_json::json!(29.99));
    }

    #[test]
    fn test_price_keeps_every_digit() {
        let price = Decimal::from_str("12345678.123456789").unwrap();
        let json = serde_json::to_string(&License::new("x", price)).unwrap();
        assert!(json.contains(r#""price":12345678.123456789"#));

        let back: License = serde_json::from_str(&json).unwrap();
        assert_eq!(back.price, price);
    }

    #[test]
    fn test_price_deserializes_exactly() {
        let mut json = serde_json::to_value(License::new("x", Decimal::ONE)).unwrap();
        json["price"] = serde_json::json!(29.99);
        let license: License = serde_json::from_value(json).unwrap();
        assert_eq!(license.price, Decimal::new(2999, 2));
        assert_eq!(license.price.to_string(), "29.99");
    }
}
