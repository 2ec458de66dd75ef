use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account role. Unknown values are rejected when deserializing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Dev,
    #[default]
    User,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Dev => "dev",
            Self::User => "user",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "dev" => Ok(Self::Dev),
            "user" => Ok(Self::User),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    /// bcrypt hash. Never sent to clients.
    #[serde(skip_serializing, default)]
    pub hashed_password: String,
    pub role: UserRole,
    pub is_active: bool,
    pub create_at: DateTime<Utc>,
    pub update_at: DateTime<Utc>,
}

impl User {
    /// Creates an active `user`-role account.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        hashed_password: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            user_id: Uuid::new_v4(),
            username: username.into(),
            email: email.into(),
            hashed_password: hashed_password.into(),
            role: UserRole::User,
            is_active: true,
            create_at: now,
            update_at: now,
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

    /// Sets a specific ID (useful for testing).
    pub fn with_id(mut self, user_id: Uuid) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary::from(self)
    }
}

/// The public part of an account returned by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub role: UserRole,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// How a login identifier should be looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    Username,
    Email,
}

impl IdentifierKind {
    /// Identifiers containing `@` are emails. Usernames may not contain `@`,
    /// so the two never overlap.
    pub fn classify(identifier: &str) -> Self {
        if identifier.contains('@') {
            Self::Email
        } else {
            Self::Username
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"admin\"");
        let role: UserRole = serde_json::from_str("\"dev\"").unwrap();
        assert_eq!(role, UserRole::Dev);
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        assert!(serde_json::from_str::<UserRole>("\"superuser\"").is_err());
        assert!("root".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_role_defaults_to_user() {
        assert_eq!(UserRole::default(), UserRole::User);
    }

    #[test]
    fn test_user_serialization_omits_password_hash() {
        let user = User::new("alice", "alice@x.com", "$2b$12$hash");
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("hashed_password").is_none());
        assert_eq!(json["username"], "alice");
        assert_eq!(json["role"], "user");
        assert_eq!(json["is_active"], true);
    }

    #[test]
    fn test_summary_copies_public_fields() {
        let user = User::new("bob", "bob@x.com", "hash").with_role(UserRole::Dev);
        let summary = user.summary();
        assert_eq!(summary.user_id, user.user_id);
        assert_eq!(summary.username, "bob");
        assert_eq!(summary.email, "bob@x.com");
        assert_eq!(summary.role, UserRole::Dev);
    }

    #[test]
    fn test_identifier_classification() {
        assert_eq!(IdentifierKind::classify("alice"), IdentifierKind::Username);
        assert_eq!(
            IdentifierKind::classify("alice@x.com"),
            IdentifierKind::Email
        );
    }
}
