use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::identity::UserRole;

/// The `token_type` returned alongside every access token.
pub const TOKEN_TYPE: &str = "bearer";

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Username.
    pub sub: String,
    pub user_id: Uuid,
    pub role: UserRole,
    /// Issued at (seconds since epoch).
    pub iat: i64,
    /// Expiration (seconds since epoch).
    pub exp: i64,
}

/// Why a credential check failed.
///
/// Kept for logging only. Responses collapse both into
/// [`AuthError::InvalidCredentials`](super::AuthError::InvalidCredentials).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    UnknownIdentity,
    SecretMismatch,
}

impl AuthFailure {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnknownIdentity => "unknown_identity",
            Self::SecretMismatch => "secret_mismatch",
        }
    }
}
