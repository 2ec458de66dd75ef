//! Application state for auth.

use axum::extract::FromRef;
use lapsus_core::storage::UserRepository;
use std::sync::Arc;

use crate::accounts::AccountService;
use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password::PasswordHasher;
use crate::tokens::TokenIssuer;

/// Shared state for auth handlers.
#[derive(Clone)]
pub struct AuthState {
    pub accounts: AccountService,
    pub tokens: Arc<TokenIssuer>,
}

impl AuthState {
    /// Creates a new AuthState over the given account store.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured algorithm cannot sign tokens.
    pub fn new(users: Arc<dyn UserRepository>, config: &AuthConfig) -> Result<Self, AuthError> {
        Ok(Self {
            accounts: AccountService::new(users, PasswordHasher::new(config.bcrypt_cost)),
            tokens: Arc::new(TokenIssuer::from_config(config)?),
        })
    }
}

/// Allows AuthState to be extracted from a parent state.
impl<S> FromRef<S> for AuthState
where
    S: AsRef<AuthState>,
{
    fn from_ref(state: &S) -> Self {
        state.as_ref().clone()
    }
}
