//! Record mappings for the persisted entities.

use crate::catalog::License;
use crate::identity::{User, UserRole};

use super::mapping::{
    get_bool, get_datetime, get_decimal, get_optional_string, get_string, get_u32, get_uuid,
    RecordMapping,
};
use super::{FieldValue, MappingError, Record, CREATED_AT, UPDATED_AT};

fn insert(record: &mut Record, key: &str, value: impl Into<FieldValue>) {
    record.insert(key.to_string(), value.into());
}

impl RecordMapping for User {
    const ENTITY_TYPE: &'static str = "User";
    const KEY_ATTRIBUTE: &'static str = "user_id";
    const UPDATABLE: &'static [&'static str] =
        &["username", "email", "hashed_password", "role", "is_active"];

    fn key(&self) -> String {
        self.user_id.to_string()
    }

    fn to_record(&self) -> Record {
        let mut record = Record::new();
        insert(&mut record, Self::KEY_ATTRIBUTE, self.user_id.to_string());
        insert(&mut record, "username", self.username.as_str());
        insert(&mut record, "email", self.email.as_str());
        insert(&mut record, "hashed_password", self.hashed_password.as_str());
        insert(&mut record, "role", self.role.as_str());
        insert(&mut record, "is_active", self.is_active);
        insert(&mut record, CREATED_AT, self.create_at.to_rfc3339());
        insert(&mut record, UPDATED_AT, self.update_at.to_rfc3339());
        record
    }

    fn from_record(record: &Record) -> Result<Self, MappingError> {
        let role = get_string(record, "role")?;
        let role = role.parse::<UserRole>().map_err(|reason| MappingError::InvalidField {
            field: "role".to_string(),
            reason,
        })?;

        Ok(User {
            user_id: get_uuid(record, Self::KEY_ATTRIBUTE)?,
            username: get_string(record, "username")?,
            email: get_string(record, "email")?,
            hashed_password: get_string(record, "hashed_password")?,
            role,
            is_active: get_bool(record, "is_active", true)?,
            create_at: get_datetime(record, CREATED_AT)?,
            update_at: get_datetime(record, UPDATED_AT)?,
        })
    }
}

impl RecordMapping for License {
    const ENTITY_TYPE: &'static str = "License";
    const KEY_ATTRIBUTE: &'static str = "license_id";
    const UPDATABLE: &'static [&'static str] = &[
        "product_name",
        "description",
        "price",
        "supported_platforms",
        "supported_launchers",
        "recommendations",
        "product_version",
        "has_spoofer",
        "language",
        "stock_quantity",
        "is_active",
        "image_url",
        "category",
    ];

    fn key(&self) -> String {
        self.license_id.to_string()
    }

    fn to_record(&self) -> Record {
        let mut record = Record::new();
        insert(&mut record, Self::KEY_ATTRIBUTE, self.license_id.to_string());
        insert(&mut record, "product_name", self.product_name.as_str());
        insert(&mut record, "description", self.description.clone());
        insert(&mut record, "price", self.price);
        insert(&mut record, "supported_platforms", self.supported_platforms.clone());
        insert(&mut record, "supported_launchers", self.supported_launchers.clone());
        insert(&mut record, "recommendations", self.recommendations.clone());
        insert(&mut record, "product_version", self.product_version.clone());
        insert(&mut record, "has_spoofer", self.has_spoofer);
        insert(&mut record, "language", self.language.clone());
        insert(&mut record, "stock_quantity", self.stock_quantity);
        insert(&mut record, "is_active", self.is_active);
        insert(&mut record, "image_url", self.image_url.clone());
        insert(&mut record, "category", self.category.clone());
        insert(&mut record, CREATED_AT, self.create_at.to_rfc3339());
        insert(&mut record, UPDATED_AT, self.update_at.to_rfc3339());
        record
    }

    fn from_record(record: &Record) -> Result<Self, MappingError> {
        Ok(License {
            license_id: get_uuid(record, Self::KEY_ATTRIBUTE)?,
            product_name: get_string(record, "product_name")?,
            description: get_optional_string(record, "description"),
            price: get_decimal(record, "price")?,
            supported_platforms: get_optional_string(record, "supported_platforms"),
            supported_launchers: get_optional_string(record, "supported_launchers"),
            recommendations: get_optional_string(record, "recommendations"),
            product_version: get_optional_string(record, "product_version"),
            has_spoofer: get_bool(record, "has_spoofer", false)?,
            language: get_optional_string(record, "language"),
            stock_quantity: get_u32(record, "stock_quantity", 0)?,
            is_active: get_bool(record, "is_active", true)?,
            image_url: get_optional_string(record, "image_url"),
            category: get_optional_string(record, "category"),
            create_at: get_datetime(record, CREATED_AT)?,
            update_at: get_datetime(record, UPDATED_AT)?,
        })
    }
}
