//! In-memory account store for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use lapsus_core::identity::User;
use lapsus_core::record::{RecordMapping, UpdateExpression};
use lapsus_core::storage::{Page, PageRequest, RepositoryError, Result, UserRepository};
use uuid::Uuid;

#[derive(Default)]
pub(crate) struct MemoryUsers {
    users: Mutex<HashMap<Uuid, User>>,
}

impl MemoryUsers {
    pub(crate) fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }
}

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        // Yield so concurrent registrations interleave between check and write.
        tokio::task::yield_now().await;
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        tokio::task::yield_now().await;
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list_users(&self, page: &PageRequest) -> Result<Page<User>> {
        let mut users: Vec<User> = self.users.lock().unwrap().values().cloned().collect();
        users.sort_by_key(|u| u.user_id);
        users.truncate(page.limit_usize());
        Ok(Page::new(users, None))
    }

    async fn create_user(&self, user: &User) -> Result<()> {
        tokio::task::yield_now().await;
        let mut users = self.users.lock().unwrap();
        if users.contains_key(&user.user_id) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: User::ENTITY_TYPE,
                id: user.user_id.to_string(),
            });
        }
        users.insert(user.user_id, user.clone());
        Ok(())
    }

    async fn update_user(&self, id: Uuid, update: &UpdateExpression) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        let current = users.get(&id).ok_or_else(|| RepositoryError::NotFound {
            entity_type: User::ENTITY_TYPE,
            id: id.to_string(),
        })?;
        let mut record = current.to_record();
        update.apply_to(&mut record);
        let updated = User::from_record(&record)?;
        users.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete_user(&self, id: Uuid) -> Result<()> {
        self.users
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::NotFound {
                entity_type: User::ENTITY_TYPE,
                id: id.to_string(),
            })
    }
}
