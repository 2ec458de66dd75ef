//! DynamoDB repository implementation.
//!
//! Implements the repository traits from `lapsus_core::storage` over two
//! tables: users (with `username-index` and `email-index` GSIs) and
//! licenses.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_dynamodb::Client;
use uuid::Uuid;

use lapsus_core::catalog::License;
use lapsus_core::identity::User;
use lapsus_core::record::{RecordMapping, UpdateExpression};
use lapsus_core::storage::{
    Cursor, LicenseRepository, Page, PageRequest, RepositoryError, Result, UserRepository,
};

use super::conversions::{from_item, key_of, last_key, to_item, update_parts};
use super::error::{
    map_delete_item_error, map_get_item_error, map_put_item_error, map_query_error,
    map_scan_error, map_update_item_error,
};

pub const USERNAME_INDEX: &str = "username-index";
pub const EMAIL_INDEX: &str = "email-index";

/// DynamoDB-based repository implementation.
#[derive(Debug, Clone)]
pub struct DynamoDbRepository {
    client: Client,
    users_table: String,
    licenses_table: String,
}

impl DynamoDbRepository {
    /// Creates a new repository with the given client and table names.
    pub fn new(
        client: Client,
        users_table: impl Into<String>,
        licenses_table: impl Into<String>,
    ) -> Self {
        Self {
            client,
            users_table: users_table.into(),
            licenses_table: licenses_table.into(),
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn users_table(&self) -> &str {
        &self.users_table
    }

    pub fn licenses_table(&self) -> &str {
        &self.licenses_table
    }

    async fn get<T: RecordMapping>(&self, table: &str, id: Uuid) -> Result<Option<T>> {
        let result = self
            .client
            .get_item()
            .table_name(table)
            .set_key(Some(key_of::<T>(&id.to_string())))
            .send()
            .await
            .map_err(map_get_item_error)?;

        result.item.as_ref().map(from_item::<T>).transpose()
    }

    /// First item of a GSI whose hash key equals `value`.
    async fn find_by_index<T: RecordMapping>(
        &self,
        table: &str,
        index: &str,
        attribute: &str,
        value: &str,
    ) -> Result<Option<T>> {
        let result = self
            .client
            .query()
            .table_name(table)
            .index_name(index)
            .key_condition_expression("#attr = :value")
            .expression_attribute_names("#attr", attribute)
            .expression_attribute_values(":value", AttributeValue::S(value.to_string()))
            .limit(1)
            .send()
            .await
            .map_err(map_query_error)?;

        result
            .items
            .unwrap_or_default()
            .first()
            .map(from_item::<T>)
            .transpose()
    }

    /// One scan page resuming after the cursor key.
    async fn scan_page<T: RecordMapping>(&self, table: &str, request: &PageRequest) -> Result<Page<T>> {
        let start = request
            .cursor
            .as_ref()
            .map(|cursor| key_of::<T>(cursor.last_key()));

        let result = self
            .client
            .scan()
            .table_name(table)
            .limit(request.limit as i32)
            .set_exclusive_start_key(start)
            .send()
            .await
            .map_err(map_scan_error)?;

        let items = result
            .items
            .unwrap_or_default()
            .iter()
            .map(from_item::<T>)
            .collect::<Result<Vec<T>>>()?;
        let next_cursor = result
            .last_evaluated_key
            .as_ref()
            .and_then(last_key::<T>)
            .map(Cursor::after);

        Ok(Page::new(items, next_cursor))
    }

    async fn put_new<T: RecordMapping>(&self, table: &str, value: &T) -> Result<()> {
        self.client
            .put_item()
            .table_name(table)
            .set_item(Some(to_item(value)))
            .condition_expression("attribute_not_exists(#key)")
            .expression_attribute_names("#key", T::KEY_ATTRIBUTE)
            .send()
            .await
            .map_err(|e| map_put_item_error(e, T::ENTITY_TYPE, value.key()))?;
        Ok(())
    }

    /// Conditional partial update returning the stored item.
    async fn update<T: RecordMapping>(
        &self,
        table: &str,
        id: Uuid,
        update: &UpdateExpression,
    ) -> Result<T> {
        let (mut names, values) = update_parts(update);
        names.insert("#key".to_string(), T::KEY_ATTRIBUTE.to_string());

        let result = self
            .client
            .update_item()
            .table_name(table)
            .set_key(Some(key_of::<T>(&id.to_string())))
            .update_expression(update.expression())
            .condition_expression("attribute_exists(#key)")
            .set_expression_attribute_names(Some(names))
            .set_expression_attribute_values(Some(values))
            .return_values(ReturnValue::AllNew)
            .send()
            .await
            .map_err(|e| map_update_item_error(e, T::ENTITY_TYPE, id.to_string()))?;

        let item = result.attributes.ok_or_else(|| {
            RepositoryError::QueryFailed(format!("{} update returned no attributes", T::ENTITY_TYPE))
        })?;
        from_item(&item)
    }

    async fn delete<T: RecordMapping>(&self, table: &str, id: Uuid) -> Result<()> {
        self.client
            .delete_item()
            .table_name(table)
            .set_key(Some(key_of::<T>(&id.to_string())))
            .condition_expression("attribute_exists(#key)")
            .expression_attribute_names("#key", T::KEY_ATTRIBUTE)
            .send()
            .await
            .map_err(|e| map_delete_item_error(e, T::ENTITY_TYPE, id.to_string()))?;
        Ok(())
    }
}

// ============================================================================
// UserRepository implementation
// ============================================================================

#[async_trait]
impl UserRepository for DynamoDbRepository {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        self.get(&self.users_table, id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.find_by_index(&self.users_table, USERNAME_INDEX, "username", username)
            .await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.find_by_index(&self.users_table, EMAIL_INDEX, "email", email)
            .await
    }

    async fn list_users(&self, page: &PageRequest) -> Result<Page<User>> {
        self.scan_page(&self.users_table, page).await
    }

    async fn create_user(&self, user: &User) -> Result<()> {
        self.put_new(&self.users_table, user).await
    }

    async fn update_user(&self, id: Uuid, update: &UpdateExpression) -> Result<User> {
        self.update(&self.users_table, id, update).await
    }

    async fn delete_user(&self, id: Uuid) -> Result<()> {
        self.delete::<User>(&self.users_table, id).await
    }
}

// ============================================================================
// LicenseRepository implementation
// ============================================================================

#[async_trait]
impl LicenseRepository for DynamoDbRepository {
    async fn get_license(&self, id: Uuid) -> Result<Option<License>> {
        self.get(&self.licenses_table, id).await
    }

    async fn list_licenses(&self, page: &PageRequest) -> Result<Page<License>> {
        self.scan_page(&self.licenses_table, page).await
    }

    async fn create_license(&self, license: &License) -> Result<()> {
        self.put_new(&self.licenses_table, license).await
    }

    async fn update_license(&self, id: Uuid, update: &UpdateExpression) -> Result<License> {
        self.update(&self.licenses_table, id, update).await
    }

    async fn delete_license(&self, id: Uuid) -> Result<()> {
        self.delete::<License>(&self.licenses_table, id).await
    }
}
