//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting between DynamoDB AttributeValue maps and
//! records. These are testable in isolation without DynamoDB access.

use std::collections::{BTreeMap, HashMap};

use aws_sdk_dynamodb::types::AttributeValue;
use lapsus_core::record::{FieldValue, Record, RecordMapping, UpdateExpression};
use lapsus_core::storage::RepositoryError;
use rust_decimal::Decimal;
use std::str::FromStr;

pub type Item = HashMap<String, AttributeValue>;

/// Convert a field value to an attribute value.
///
/// Numbers travel as their exact decimal text.
pub fn to_attribute(value: &FieldValue) -> AttributeValue {
    match value {
        FieldValue::Null => AttributeValue::Null(true),
        FieldValue::Bool(b) => AttributeValue::Bool(*b),
        FieldValue::Str(s) => AttributeValue::S(s.clone()),
        FieldValue::Num(n) => AttributeValue::N(n.normalize().to_string()),
        FieldValue::List(items) => AttributeValue::L(items.iter().map(to_attribute).collect()),
        FieldValue::Map(map) => AttributeValue::M(
            map.iter()
                .map(|(k, v)| (k.clone(), to_attribute(v)))
                .collect(),
        ),
    }
}

/// Convert an attribute value to a field value.
pub fn from_attribute(value: &AttributeValue) -> Result<FieldValue, RepositoryError> {
    let converted = match value {
        AttributeValue::Null(_) => FieldValue::Null,
        AttributeValue::Bool(b) => FieldValue::Bool(*b),
        AttributeValue::S(s) => FieldValue::Str(s.clone()),
        AttributeValue::N(n) => FieldValue::Num(parse_number(n)?),
        AttributeValue::L(items) => FieldValue::List(
            items
                .iter()
                .map(from_attribute)
                .collect::<Result<_, _>>()?,
        ),
        AttributeValue::M(map) => FieldValue::Map(
            map.iter()
                .map(|(k, v)| Ok((k.clone(), from_attribute(v)?)))
                .collect::<Result<BTreeMap<_, _>, RepositoryError>>()?,
        ),
        AttributeValue::Ss(items) => {
            FieldValue::List(items.iter().cloned().map(FieldValue::Str).collect())
        }
        AttributeValue::Ns(items) => FieldValue::List(
            items
                .iter()
                .map(|n| parse_number(n).map(FieldValue::Num))
                .collect::<Result<_, _>>()?,
        ),
        other => {
            return Err(RepositoryError::Serialization(format!(
                "unsupported attribute type: {other:?}"
            )))
        }
    };
    Ok(converted)
}

fn parse_number(text: &str) -> Result<Decimal, RepositoryError> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|_| RepositoryError::Serialization(format!("invalid number: {text}")))
}

/// Convert a record to a DynamoDB item.
pub fn record_to_item(record: &Record) -> Item {
    record
        .iter()
        .map(|(k, v)| (k.clone(), to_attribute(v)))
        .collect()
}

/// Convert a DynamoDB item to a record.
pub fn item_to_record(item: &Item) -> Result<Record, RepositoryError> {
    item.iter()
        .map(|(k, v)| Ok((k.clone(), from_attribute(v)?)))
        .collect()
}

/// Convert a domain value to a DynamoDB item.
pub fn to_item<T: RecordMapping>(value: &T) -> Item {
    record_to_item(&value.to_record())
}

/// Convert a DynamoDB item to a domain value.
pub fn from_item<T: RecordMapping>(item: &Item) -> Result<T, RepositoryError> {
    Ok(T::from_record(&item_to_record(item)?)?)
}

/// Key map for a primary-key lookup.
pub fn key_of<T: RecordMapping>(id: &str) -> Item {
    HashMap::from([(T::KEY_ATTRIBUTE.to_string(), AttributeValue::S(id.to_string()))])
}

/// Decode a `LastEvaluatedKey` into the cursor key.
pub fn last_key<T: RecordMapping>(key: &Item) -> Option<String> {
    match key.get(T::KEY_ATTRIBUTE) {
        Some(AttributeValue::S(id)) => Some(id.clone()),
        _ => None,
    }
}

/// Expression attribute names and values of an update.
pub fn update_parts(update: &UpdateExpression) -> (HashMap<String, String>, Item) {
    let names = update.names().into_iter().collect();
    let values = update
        .values()
        .iter()
        .map(|(placeholder, value)| (placeholder.clone(), to_attribute(value)))
        .collect();
    (names, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use lapsus_core::catalog::{License, UpdateLicenseRequest};
    use lapsus_core::identity::{User, UserRole};

    fn decimal(text: &str) -> Decimal {
        Decimal::from_str(text).unwrap()
    }

    #[test]
    fn test_price_travels_as_exact_number_text() {
        let license = License::new("Cyberpunk 2077", decimal("29.99"));
        let item = to_item(&license);

        assert_eq!(item.get("price"), Some(&AttributeValue::N("29.99".to_string())));
        let back: License = from_item(&item).unwrap();
        assert_eq!(back.price, decimal("29.99"));
    }

    #[test]
    fn test_float_sourced_price_has_no_drift() {
        let value = FieldValue::from_f64(29.99).unwrap();
        assert_eq!(to_attribute(&value), AttributeValue::N("29.99".to_string()));
    }

    #[test]
    fn test_missing_optional_text_is_null() {
        let license = License::new("Bare", decimal("1"));
        let item = to_item(&license);
        assert_eq!(item.get("description"), Some(&AttributeValue::Null(true)));
        let back: License = from_item(&item).unwrap();
        assert_eq!(back.description, None);
    }

    #[test]
    fn test_user_round_trip() {
        let user = User::new("alice", "alice@x.com", "$2b$04$hash").with_role(UserRole::Dev);
        let item = to_item(&user);

        assert_eq!(
            item.get("user_id"),
            Some(&AttributeValue::S(user.user_id.to_string()))
        );
        assert_eq!(item.get("role"), Some(&AttributeValue::S("dev".to_string())));
        let back: User = from_item(&item).unwrap();
        assert_eq!(back, user);
    }

    #[test]
    fn test_nested_numbers_convert() {
        let attr = AttributeValue::M(HashMap::from([(
            "tiers".to_string(),
            AttributeValue::L(vec![AttributeValue::N("1.50".to_string())]),
        )]));
        let value = from_attribute(&attr).unwrap();
        let expected = FieldValue::Map(BTreeMap::from([(
            "tiers".to_string(),
            FieldValue::List(vec![FieldValue::Num(decimal("1.50"))]),
        )]));
        assert_eq!(value, expected);
    }

    #[test]
    fn test_unsupported_attribute_is_error() {
        let attr = AttributeValue::Bs(vec![]);
        assert!(matches!(
            from_attribute(&attr),
            Err(RepositoryError::Serialization(_))
        ));
    }

    #[test]
    fn test_key_and_last_key() {
        let key = key_of::<License>("abc");
        assert_eq!(key.get("license_id"), Some(&AttributeValue::S("abc".to_string())));
        assert_eq!(last_key::<License>(&key), Some("abc".to_string()));
        assert_eq!(last_key::<User>(&key), None);
    }

    #[test]
    fn test_update_parts_are_placeholders() {
        let update = UpdateLicenseRequest::new()
            .with_price(decimal("19.99"))
            .to_update(Utc::now())
            .unwrap();
        let (names, values) = update_parts(&update);

        assert_eq!(names.get("#price"), Some(&"price".to_string()));
        assert_eq!(values.get(":price"), Some(&AttributeValue::N("19.99".to_string())));
        assert!(names.contains_key("#update_at"));
        assert!(matches!(values.get(":update_at"), Some(AttributeValue::S(_))));
    }
}
