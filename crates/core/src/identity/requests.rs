//! API request types for account operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::record::{FieldValue, UpdateBuilder, UpdateError, UpdateExpression};

use super::types::{User, UserRole};

fn default_active() -> bool {
    true
}

/// Request payload for registering or creating an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl CreateUserRequest {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            role: UserRole::User,
            is_active: true,
        }
    }

    pub fn with_role(mut self, role: UserRole) -> Self {
        self.role = role;
        self
    }

    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Convert into a User, given the already-hashed password.
    pub fn into_user(self, hashed_password: impl Into<String>) -> User {
        User::new(self.username, self.email, hashed_password)
            .with_role(self.role)
            .with_active(self.is_active)
    }
}

/// Request payload for updating an account. Absent fields stay unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl UpdateUserRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_role(mut self, role: UserRole) -> Self {
        self.role = Some(role);
        self
    }

    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// The username this request changes to, if it differs from `current`.
    pub fn username_change<'a>(&'a self, current: &User) -> Option<&'a str> {
        self.username
            .as_deref()
            .filter(|username| *username != current.username)
    }

    /// The email this request changes to, if it differs from `current`.
    pub fn email_change<'a>(&'a self, current: &User) -> Option<&'a str> {
        self.email
            .as_deref()
            .filter(|email| *email != current.email)
    }

    /// Attribute changes, excluding the password (which must be hashed first).
    pub fn changes(&self) -> Vec<(String, FieldValue)> {
        let mut changes = Vec::new();
        if let Some(username) = &self.username {
            changes.push(("username".to_string(), FieldValue::from(username.as_str())));
        }
        if let Some(email) = &self.email {
            changes.push(("email".to_string(), FieldValue::from(email.as_str())));
        }
        if let Some(role) = self.role {
            changes.push(("role".to_string(), FieldValue::from(role.as_str())));
        }
        if let Some(is_active) = self.is_active {
            changes.push(("is_active".to_string(), FieldValue::from(is_active)));
        }
        changes
    }

    /// Build the partial update. `hashed_password` must be the hash of
    /// `self.password` when a password change was requested.
    pub fn to_update(
        &self,
        hashed_password: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<UpdateExpression, UpdateError> {
        let mut builder = UpdateBuilder::for_mapping::<User>().set_all(self.changes())?;
        if let Some(hash) = hashed_password {
            builder = builder.set("hashed_password", hash)?;
        }
        Ok(builder.build(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::UPDATED_AT;

    #[test]
    fn test_create_request_defaults() {
        let request: CreateUserRequest = serde_json::from_str(
            r#"{"username": "alice", "email": "alice@x.com", "password": "secret1"}"#,
        )
        .unwrap();
        assert_eq!(request.role, UserRole::User);
        assert!(request.is_active);
    }

    #[test]
    fn test_create_request_rejects_unknown_role() {
        let result = serde_json::from_str::<CreateUserRequest>(
            r#"{"username": "a", "email": "a@x.com", "password": "p", "role": "root"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_into_user_keeps_role_and_hash() {
        let user = CreateUserRequest::new("dev", "dev@x.com", "plain")
            .with_role(UserRole::Dev)
            .with_active(false)
            .into_user("hashed");
        assert_eq!(user.username, "dev");
        assert_eq!(user.hashed_password, "hashed");
        assert_eq!(user.role, UserRole::Dev);
        assert!(!user.is_active);
    }

    #[test]
    fn test_changes_include_only_present_fields() {
        let request = UpdateUserRequest::new().with_email("new@x.com");
        let changes = request.changes();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].0, "email");
    }

    #[test]
    fn test_to_update_never_stores_plain_password() {
        let request = UpdateUserRequest::new().with_password("plain-secret");
        let update = request
            .to_update(Some("$2b$04$hash".to_string()), Utc::now())
            .unwrap();

        assert!(update.touches("hashed_password"));
        assert!(update.touches(UPDATED_AT));
        assert!(!update.touches("password"));
        assert!(update
            .values()
            .values()
            .all(|v| v.as_str() != Some("plain-secret")));
    }

    #[test]
    fn test_username_change_ignores_same_value() {
        let user = User::new("alice", "alice@x.com", "hash");
        let same = UpdateUserRequest::new().with_username("alice");
        let different = UpdateUserRequest::new().with_username("alicia");
        assert_eq!(same.username_change(&user), None);
        assert_eq!(different.username_change(&user), Some("alicia"));
    }
}
