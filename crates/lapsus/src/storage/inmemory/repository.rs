//! In-memory repository implementation.
//!
//! Rows are kept as [`Record`]s, the same representation the DynamoDB
//! backend stores, so mapping and partial updates behave identically.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use lapsus_core::catalog::License;
use lapsus_core::identity::User;
use lapsus_core::record::{Record, RecordMapping, UpdateExpression};
use lapsus_core::storage::{
    Cursor, LicenseRepository, Page, PageRequest, RepositoryError, Result, UserRepository,
};

/// One table, ordered by primary key.
#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<String, Record>,
}

impl Table {
    fn get<T: RecordMapping>(&self, key: &str) -> Result<Option<T>> {
        Ok(self.rows.get(key).map(T::from_record).transpose()?)
    }

    fn find_by<T: RecordMapping>(&self, attribute: &str, value: &str) -> Result<Option<T>> {
        self.rows
            .values()
            .find(|record| record.get(attribute).and_then(|v| v.as_str()) == Some(value))
            .map(T::from_record)
            .transpose()
            .map_err(Into::into)
    }

    /// Keyset pagination: resume strictly after the cursor key.
    fn page<T: RecordMapping>(&self, request: &PageRequest) -> Result<Page<T>> {
        let start = match &request.cursor {
            Some(cursor) => Bound::Excluded(cursor.last_key().to_string()),
            None => Bound::Unbounded,
        };

        let mut rows = self.rows.range((start, Bound::Unbounded));
        let window: Vec<(&String, &Record)> = rows.by_ref().take(request.limit_usize()).collect();
        let next_cursor = match (rows.next(), window.last()) {
            (Some(_), Some((key, _))) => Some(Cursor::after(key.as_str())),
            _ => None,
        };

        let items = window
            .into_iter()
            .map(|(_, record)| T::from_record(record))
            .collect::<std::result::Result<Vec<T>, _>>()?;
        Ok(Page::new(items, next_cursor))
    }

    fn insert_new<T: RecordMapping>(&mut self, value: &T) -> Result<()> {
        let key = value.key();
        if self.rows.contains_key(&key) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: T::ENTITY_TYPE,
                id: key,
            });
        }
        self.rows.insert(key, value.to_record());
        Ok(())
    }

    /// Apply `update` to an existing row. The row is only replaced once the
    /// result maps back cleanly.
    fn update<T: RecordMapping>(&mut self, key: &str, update: &UpdateExpression) -> Result<T> {
        let record = self
            .rows
            .get_mut(key)
            .ok_or_else(|| not_found::<T>(key))?;

        let mut next = record.clone();
        update.apply_to(&mut next);
        let value = T::from_record(&next)?;
        *record = next;
        Ok(value)
    }

    fn remove<T: RecordMapping>(&mut self, key: &str) -> Result<()> {
        self.rows
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| not_found::<T>(key))
    }

    /// Whether a row other than `except` holds `value` in `attribute`.
    fn is_taken(&self, attribute: &str, value: &str, except: Option<&str>) -> bool {
        self.rows.iter().any(|(key, record)| {
            Some(key.as_str()) != except
                && record.get(attribute).and_then(|v| v.as_str()) == Some(value)
        })
    }
}

fn not_found<T: RecordMapping>(key: &str) -> RepositoryError {
    RepositoryError::NotFound {
        entity_type: T::ENTITY_TYPE,
        id: key.to_string(),
    }
}

/// In-memory storage backend.
///
/// Uses tables wrapped in `Arc<RwLock<_>>` for thread-safe access.
/// Data is not persisted and will be lost when the repository is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    users: Arc<RwLock<Table>>,
    licenses: Arc<RwLock<Table>>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        self.users.read().await.get(&id.to_string())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.users.read().await.find_by("username", username)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.users.read().await.find_by("email", email)
    }

    async fn list_users(&self, page: &PageRequest) -> Result<Page<User>> {
        self.users.read().await.page(page)
    }

    async fn create_user(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;
        // Checked under the write lock, so concurrent inserts cannot both pass.
        if users.is_taken("username", &user.username, None) {
            return Err(RepositoryError::Conflict(
                "Username already registered".to_string(),
            ));
        }
        if users.is_taken("email", &user.email, None) {
            return Err(RepositoryError::Conflict("Email already registered".to_string()));
        }
        users.insert_new(user)
    }

    async fn update_user(&self, id: Uuid, update: &UpdateExpression) -> Result<User> {
        let key = id.to_string();
        let mut users = self.users.write().await;
        for (field, value) in update.assignments() {
            let message = match field.as_str() {
                "username" => "Username already taken",
                "email" => "Email already registered",
                _ => continue,
            };
            if let Some(value) = value.as_str() {
                if users.is_taken(field, value, Some(&key)) {
                    return Err(RepositoryError::Conflict(message.to_string()));
                }
            }
        }
        users.update(&key, update)
    }

    async fn delete_user(&self, id: Uuid) -> Result<()> {
        self.users.write().await.remove::<User>(&id.to_string())
    }
}

#[async_trait]
impl LicenseRepository for InMemoryRepository {
    async fn get_license(&self, id: Uuid) -> Result<Option<License>> {
        self.licenses.read().await.get(&id.to_string())
    }

    async fn list_licenses(&self, page: &PageRequest) -> Result<Page<License>> {
        self.licenses.read().await.page(page)
    }

    async fn create_license(&self, license: &License) -> Result<()> {
        self.licenses.write().await.insert_new(license)
    }

    async fn update_license(&self, id: Uuid, update: &UpdateExpression) -> Result<License> {
        self.licenses.write().await.update(&id.to_string(), update)
    }

    async fn delete_license(&self, id: Uuid) -> Result<()> {
        self.licenses
            .write()
            .await
            .remove::<License>(&id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use lapsus_core::catalog::UpdateLicenseRequest;
    use lapsus_core::identity::{UpdateUserRequest, UserRole};
    use rust_decimal::Decimal;
    use std::collections::HashSet;
    use std::str::FromStr;

    fn license(name: &str, price: &str) -> License {
        License::new(name, Decimal::from_str(price).unwrap())
    }

    fn id(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    // ==================== User Tests ====================

    #[tokio::test]
    async fn test_user_create_and_lookups() {
        let repo = InMemoryRepository::new();
        let user = User::new("alice", "alice@x.com", "hash").with_role(UserRole::Admin);
        repo.create_user(&user).await.unwrap();

        assert_eq!(repo.get_user(user.user_id).await.unwrap(), Some(user.clone()));
        assert_eq!(
            repo.get_user_by_username("alice").await.unwrap(),
            Some(user.clone())
        );
        assert_eq!(
            repo.get_user_by_email("alice@x.com").await.unwrap(),
            Some(user)
        );
        assert!(repo.get_user_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_user_uniqueness_backstop() {
        let repo = InMemoryRepository::new();
        repo.create_user(&User::new("alice", "alice@x.com", "hash"))
            .await
            .unwrap();

        let result = repo
            .create_user(&User::new("alice", "other@x.com", "hash"))
            .await;
        assert_eq!(
            result,
            Err(RepositoryError::Conflict(
                "Username already registered".to_string()
            ))
        );

        let result = repo
            .create_user(&User::new("bob", "alice@x.com", "hash"))
            .await;
        assert_eq!(
            result,
            Err(RepositoryError::Conflict("Email already registered".to_string()))
        );
    }

    #[tokio::test]
    async fn test_user_update_is_partial() {
        let repo = InMemoryRepository::new();
        let user = User::new("alice", "alice@x.com", "hash");
        repo.create_user(&user).await.unwrap();

        let update = UpdateUserRequest::new()
            .with_role(UserRole::Dev)
            .to_update(None, Utc::now())
            .unwrap();
        let updated = repo.update_user(user.user_id, &update).await.unwrap();

        assert_eq!(updated.role, UserRole::Dev);
        assert_eq!(updated.username, user.username);
        assert_eq!(updated.email, user.email);
        assert_eq!(updated.hashed_password, user.hashed_password);
        assert_eq!(updated.create_at, user.create_at);
    }

    #[tokio::test]
    async fn test_update_missing_user_is_not_found() {
        let repo = InMemoryRepository::new();
        let update = UpdateUserRequest::new()
            .with_active(false)
            .to_update(None, Utc::now())
            .unwrap();

        assert!(matches!(
            repo.update_user(Uuid::new_v4(), &update).await,
            Err(RepositoryError::NotFound { entity_type: "User", .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_nonexistent_is_not_found() {
        let repo = InMemoryRepository::new();
        assert!(matches!(
            repo.delete_user(Uuid::new_v4()).await,
            Err(RepositoryError::NotFound { .. })
        ));
        assert!(matches!(
            repo.delete_license(Uuid::new_v4()).await,
            Err(RepositoryError::NotFound { entity_type: "License", .. })
        ));
    }

    // ==================== License Tests ====================

    #[tokio::test]
    async fn test_license_price_is_exact() {
        let repo = InMemoryRepository::new();
        let license = license("Cyberpunk 2077", "29.99");
        repo.create_license(&license).await.unwrap();

        let stored = repo.get_license(license.license_id).await.unwrap().unwrap();
        assert_eq!(stored.price, Decimal::from_str("29.99").unwrap());
        assert_eq!(stored.price.to_string(), "29.99");
    }

    #[tokio::test]
    async fn test_license_update_leaves_other_fields() {
        let repo = InMemoryRepository::new();
        let original = license("FIFA 24", "89.99")
            .with_description("Ultimate Edition")
            .with_stock(8);
        repo.create_license(&original).await.unwrap();

        let update = UpdateLicenseRequest::new()
            .with_stock(3)
            .to_update(Utc::now())
            .unwrap();
        let updated = repo
            .update_license(original.license_id, &update)
            .await
            .unwrap();

        assert_eq!(updated.stock_quantity, 3);
        assert_eq!(updated.product_name, original.product_name);
        assert_eq!(updated.description, original.description);
        assert_eq!(updated.price, original.price);
        assert_eq!(updated.create_at, original.create_at);
        assert!(updated.update_at >= original.update_at);
    }

    #[tokio::test]
    async fn test_empty_listing() {
        let repo = InMemoryRepository::new();
        let page = repo.list_licenses(&PageRequest::default()).await.unwrap();
        assert!(page.items.is_empty());
        assert!(page.next_cursor.is_none());
    }

    // ==================== Pagination Tests ====================

    #[tokio::test]
    async fn test_cursor_walks_every_item_once() {
        let repo = InMemoryRepository::new();
        for n in 1..=7 {
            repo.create_license(&license(&format!("L{n}"), "1").with_id(id(n * 10)))
                .await
                .unwrap();
        }

        let mut seen = Vec::new();
        let mut request = PageRequest::first(3);
        loop {
            let page = repo.list_licenses(&request).await.unwrap();
            seen.extend(page.items.iter().map(|l| l.license_id));
            match page.next_cursor {
                Some(cursor) => request = PageRequest::first(3).after(cursor),
                None => break,
            }
        }

        assert_eq!(seen.len(), 7);
        assert_eq!(seen.iter().collect::<HashSet<_>>().len(), 7);
    }

    /// The listing the store used to serve: scan everything, then slice.
    async fn offset_window(repo: &InMemoryRepository, skip: usize, limit: usize) -> Vec<Uuid> {
        repo.list_licenses(&PageRequest::first(100))
            .await
            .unwrap()
            .items
            .into_iter()
            .skip(skip)
            .take(limit)
            .map(|l| l.license_id)
            .collect()
    }

    #[tokio::test]
    async fn test_offset_windows_are_unstable_under_concurrent_writes() {
        let repo = InMemoryRepository::new();
        for n in 1..=6 {
            repo.create_license(&license(&format!("L{n}"), "1").with_id(id(n * 10)))
                .await
                .unwrap();
        }

        let first = offset_window(&repo, 0, 3).await;
        // A write lands before the second page is read.
        repo.create_license(&license("early", "1").with_id(id(5)))
            .await
            .unwrap();
        let second = offset_window(&repo, 3, 3).await;

        // The last item of page one is served again on page two.
        assert!(second.iter().any(|id| first.contains(id)));
    }

    #[tokio::test]
    async fn test_cursor_pages_are_stable_under_concurrent_writes() {
        let repo = InMemoryRepository::new();
        for n in 1..=6 {
            repo.create_license(&license(&format!("L{n}"), "1").with_id(id(n * 10)))
                .await
                .unwrap();
        }

        let first = repo.list_licenses(&PageRequest::first(3)).await.unwrap();
        repo.create_license(&license("early", "1").with_id(id(5)))
            .await
            .unwrap();
        let cursor = first.next_cursor.clone().unwrap();
        let second = repo
            .list_licenses(&PageRequest::first(3).after(cursor))
            .await
            .unwrap();

        let first_ids: Vec<Uuid> = first.items.iter().map(|l| l.license_id).collect();
        let second_ids: Vec<Uuid> = second.items.iter().map(|l| l.license_id).collect();
        assert!(second_ids.iter().all(|id| !first_ids.contains(id)));
        assert_eq!(second_ids, vec![id(40), id(50), id(60)]);
    }
}
