//! Account registration, profile updates and credential checks.

use std::sync::Arc;

use chrono::Utc;
use lapsus_core::auth::{AuthError as CoreError, AuthFailure};
use lapsus_core::identity::{
    validate_new_user, validate_user_update, CreateUserRequest, IdentifierKind,
    UpdateUserRequest, User,
};
use lapsus_core::record::RecordMapping;
use lapsus_core::storage::{RepositoryError, UserRepository};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::error::AuthError;
use crate::locks::{email_key, username_key, KeyedLocks};
use crate::password::PasswordHasher;

/// Verified against when the identifier matches no account, so unknown
/// and known identities cost the same bcrypt work.
const DUMMY_PASSWORD: &str = "lapsus-dummy-password";

/// Account operations shared by the auth and user-management routes.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
    locks: KeyedLocks,
    dummy_hash: Arc<OnceCell<String>>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserRepository>, hasher: PasswordHasher) -> Self {
        Self {
            users,
            hasher,
            locks: KeyedLocks::new(),
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    /// Create an account with a hashed password.
    ///
    /// # Errors
    ///
    /// `Identity` for invalid fields, `Repository(Conflict)` when the username
    /// or email is already registered.
    pub async fn register(&self, request: CreateUserRequest) -> Result<User, AuthError> {
        validate_new_user(&request)?;

        let _guard = self
            .locks
            .lock_all([username_key(&request.username), email_key(&request.email)])
            .await;

        if self
            .users
            .get_user_by_username(&request.username)
            .await?
            .is_some()
        {
            return Err(conflict("Username already registered"));
        }
        if self.users.get_user_by_email(&request.email).await?.is_some() {
            return Err(conflict("Email already registered"));
        }

        let hashed = self.hasher.hash(&request.password).await?;
        let user = request.into_user(hashed);
        self.users.create_user(&user).await?;

        tracing::info!(user_id = %user.user_id, username = %user.username, role = %user.role, "account registered");
        Ok(user)
    }

    /// Apply a partial update to an account.
    ///
    /// Only a username or email that actually changes is checked for
    /// conflicts. A new password is hashed before it is stored.
    pub async fn update(&self, id: Uuid, request: UpdateUserRequest) -> Result<User, AuthError> {
        validate_user_update(&request)?;

        let current = self
            .users
            .get_user(id)
            .await?
            .ok_or_else(|| not_found(id))?;

        let new_username = request.username_change(&current);
        let new_email = request.email_change(&current);

        let keys = new_username
            .map(username_key)
            .into_iter()
            .chain(new_email.map(email_key));
        let _guard = self.locks.lock_all(keys).await;

        if let Some(username) = new_username {
            if let Some(other) = self.users.get_user_by_username(username).await? {
                if other.user_id != id {
                    return Err(conflict("Username already taken"));
                }
            }
        }
        if let Some(email) = new_email {
            if let Some(other) = self.users.get_user_by_email(email).await? {
                if other.user_id != id {
                    return Err(conflict("Email already registered"));
                }
            }
        }

        let hashed = match &request.password {
            Some(password) => Some(self.hasher.hash(password).await?),
            None => None,
        };
        let update = request.to_update(hashed, Utc::now())?;
        let user = self.users.update_user(id, &update).await?;

        tracing::info!(user_id = %id, fields = update.assignments().len(), "account updated");
        Ok(user)
    }

    /// Check a username or email and password pair.
    ///
    /// Both failure kinds surface as `Rejected`; only the log tells them
    /// apart. Inactive accounts are not rejected here.
    pub async fn authenticate(&self, identifier: &str, password: &str) -> Result<User, AuthError> {
        let kind = IdentifierKind::classify(identifier);
        let found = match kind {
            IdentifierKind::Email => self.users.get_user_by_email(identifier).await?,
            IdentifierKind::Username => self.users.get_user_by_username(identifier).await?,
        };

        let Some(user) = found else {
            let dummy = self.dummy_hash().await?;
            self.hasher.verify(password, dummy).await;
            return Err(reject(identifier, AuthFailure::UnknownIdentity));
        };

        if !self.hasher.verify(password, &user.hashed_password).await {
            return Err(reject(identifier, AuthFailure::SecretMismatch));
        }

        Ok(user)
    }

    /// Like [`authenticate`](Self::authenticate) but also refuses inactive
    /// accounts.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<User, AuthError> {
        let user = self.authenticate(identifier, password).await?;
        if !user.is_active {
            tracing::warn!(user_id = %user.user_id, "login refused for inactive account");
            return Err(CoreError::InactiveUser.into());
        }
        tracing::info!(user_id = %user.user_id, "login succeeded");
        Ok(user)
    }

    async fn dummy_hash(&self) -> Result<&String, AuthError> {
        self.dummy_hash
            .get_or_try_init(|| self.hasher.hash(DUMMY_PASSWORD))
            .await
    }
}

fn conflict(message: &str) -> AuthError {
    RepositoryError::Conflict(message.to_string()).into()
}

fn not_found(id: Uuid) -> AuthError {
    RepositoryError::NotFound {
        entity_type: User::ENTITY_TYPE,
        id: id.to_string(),
    }
    .into()
}

fn reject(identifier: &str, failure: AuthFailure) -> AuthError {
    tracing::warn!(identifier, reason = failure.as_str(), "credential check failed");
    AuthError::Rejected(failure)
}
