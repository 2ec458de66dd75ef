use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::{FieldValue, Record, RecordMapping, UpdateError, UPDATED_AT};

/// Collects the attributes a partial update should change.
///
/// Only attributes in the allow-list are accepted. Setting the same attribute
/// twice keeps the last value.
#[derive(Debug, Clone)]
pub struct UpdateBuilder {
    entity_type: &'static str,
    allowed: &'static [&'static str],
    changes: BTreeMap<String, FieldValue>,
}

impl UpdateBuilder {
    /// Create a builder over an explicit allow-list.
    pub fn new(entity_type: &'static str, allowed: &'static [&'static str]) -> Self {
        Self {
            entity_type,
            allowed,
            changes: BTreeMap::new(),
        }
    }

    /// Create a builder using the allow-list of a mapped entity.
    pub fn for_mapping<T: RecordMapping>() -> Self {
        Self::new(T::ENTITY_TYPE, T::UPDATABLE)
    }

    /// Set one attribute.
    pub fn set(
        mut self,
        field: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Result<Self, UpdateError> {
        let field = field.into();
        if !self.allowed.contains(&field.as_str()) {
            return Err(UpdateError::UnknownField {
                entity_type: self.entity_type,
                field,
            });
        }
        self.changes.insert(field, value.into());
        Ok(self)
    }

    /// Set every attribute yielded by `changes`.
    pub fn set_all<I>(self, changes: I) -> Result<Self, UpdateError>
    where
        I: IntoIterator<Item = (String, FieldValue)>,
    {
        changes
            .into_iter()
            .try_fold(self, |builder, (field, value)| builder.set(field, value))
    }

    /// Whether no attribute has been set yet.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Finish the update. The update timestamp is always appended.
    pub fn build(self, now: DateTime<Utc>) -> UpdateExpression {
        let mut assignments: Vec<(String, FieldValue)> = self.changes.into_iter().collect();
        assignments.push((UPDATED_AT.to_string(), FieldValue::Str(now.to_rfc3339())));
        UpdateExpression { assignments }
    }
}

/// A validated partial update.
///
/// Attribute names are only ever referenced through `#name` aliases and
/// values through `:name` placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateExpression {
    assignments: Vec<(String, FieldValue)>,
}

impl UpdateExpression {
    /// The `SET` clause, e.g. `SET #price = :price, #update_at = :update_at`.
    pub fn expression(&self) -> String {
        let clauses: Vec<String> = self
            .assignments
            .iter()
            .map(|(field, _)| format!("#{field} = :{field}"))
            .collect();
        format!("SET {}", clauses.join(", "))
    }

    /// Alias to attribute name.
    pub fn names(&self) -> BTreeMap<String, String> {
        self.assignments
            .iter()
            .map(|(field, _)| (format!("#{field}"), field.clone()))
            .collect()
    }

    /// Placeholder to value.
    pub fn values(&self) -> BTreeMap<String, FieldValue> {
        self.assignments
            .iter()
            .map(|(field, value)| (format!(":{field}"), value.clone()))
            .collect()
    }

    pub fn assignments(&self) -> &[(String, FieldValue)] {
        &self.assignments
    }

    /// Whether the update sets `field`.
    pub fn touches(&self, field: &str) -> bool {
        self.assignments.iter().any(|(name, _)| name == field)
    }

    /// Execute the update against a local record. Attributes not named in
    /// the expression are left alone.
    pub fn apply_to(&self, record: &mut Record) {
        for (field, value) in &self.assignments {
            record.insert(field.clone(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    const FIELDS: &[&str] = &["price", "description", "stock_quantity"];

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_build_appends_update_timestamp() {
        let update = UpdateBuilder::new("License", FIELDS)
            .set("price", Decimal::new(2999, 2))
            .unwrap()
            .build(now());

        assert_eq!(
            update.expression(),
            "SET #price = :price, #update_at = :update_at"
        );
        assert!(update.touches(UPDATED_AT));
        assert_eq!(
            update.values()[":update_at"],
            FieldValue::Str(now().to_rfc3339())
        );
    }

    #[test]
    fn test_build_without_changes_still_touches_timestamp() {
        let update = UpdateBuilder::new("License", FIELDS).build(now());
        assert_eq!(update.expression(), "SET #update_at = :update_at");
    }

    #[test]
    fn test_names_and_values_are_placeholders() {
        let update = UpdateBuilder::new("License", FIELDS)
            .set("description", "x, #y = :z")
            .unwrap()
            .build(now());

        let expression = update.expression();
        assert!(!expression.contains("x, #y"));
        assert_eq!(update.names()["#description"], "description");
        assert_eq!(
            update.values()[":description"],
            FieldValue::Str("x, #y = :z".to_string())
        );
    }

    #[test]
    fn test_set_rejects_fields_outside_allow_list() {
        let result = UpdateBuilder::new("License", FIELDS).set("license_id", "other");
        assert_eq!(
            result.unwrap_err(),
            UpdateError::UnknownField {
                entity_type: "License",
                field: "license_id".to_string(),
            }
        );

        let result = UpdateBuilder::new("License", FIELDS).set(UPDATED_AT, "2020-01-01");
        assert!(result.is_err());
    }

    #[test]
    fn test_set_twice_keeps_last_value() {
        let update = UpdateBuilder::new("License", FIELDS)
            .set("stock_quantity", 1u32)
            .unwrap()
            .set("stock_quantity", 5u32)
            .unwrap()
            .build(now());

        assert_eq!(update.assignments().len(), 2);
        assert_eq!(
            update.values()[":stock_quantity"],
            FieldValue::Num(Decimal::from(5))
        );
    }

    #[test]
    fn test_set_all_stops_at_first_unknown_field() {
        let result = UpdateBuilder::new("License", FIELDS).set_all(vec![
            ("price".to_string(), FieldValue::Num(Decimal::ONE)),
            ("owner".to_string(), FieldValue::from("mallory")),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_apply_to_leaves_untouched_fields_alone() {
        let mut record = Record::new();
        record.insert("license_id".to_string(), FieldValue::from("lic-1"));
        record.insert("price".to_string(), FieldValue::Num(Decimal::new(1999, 2)));
        record.insert("description".to_string(), FieldValue::from("original"));
        record.insert("stock_quantity".to_string(), FieldValue::from(10u32));

        let update = UpdateBuilder::new("License", FIELDS)
            .set("price", Decimal::new(2499, 2))
            .unwrap()
            .build(now());
        update.apply_to(&mut record);

        assert_eq!(record["price"], FieldValue::Num(Decimal::new(2499, 2)));
        assert_eq!(record["description"], FieldValue::from("original"));
        assert_eq!(record["stock_quantity"], FieldValue::from(10u32));
        assert_eq!(record["license_id"], FieldValue::from("lic-1"));
        assert_eq!(record[UPDATED_AT], FieldValue::Str(now().to_rfc3339()));
    }

    #[test]
    fn test_apply_to_writes_explicit_null() {
        let mut record = Record::new();
        record.insert("description".to_string(), FieldValue::from("old"));

        let none: Option<String> = None;
        UpdateBuilder::new("License", FIELDS)
            .set("description", none)
            .unwrap()
            .build(now())
            .apply_to(&mut record);

        assert!(record["description"].is_null());
    }
}
