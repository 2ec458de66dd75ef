//! bcrypt password hashing.
//!
//! Hashing is CPU-bound, so both operations run on the blocking pool.

use crate::error::AuthError;

/// One-way password hasher.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a password with a fresh salt.
    pub async fn hash(&self, password: &str) -> Result<String, AuthError> {
        let password = password.to_string();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }

    /// Check a password against a stored hash.
    ///
    /// bcrypt compares digests in constant time. A malformed stored hash
    /// counts as a mismatch.
    pub async fn verify(&self, password: &str, hash: &str) -> bool {
        let password = password.to_string();
        let hash = hash.to_string();
        match tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await {
            Ok(Ok(matches)) => matches,
            Ok(Err(error)) => {
                tracing::warn!(%error, "stored password hash is unreadable");
                false
            }
            Err(error) => {
                tracing::error!(%error, "password verification task failed");
                false
            }
        }
    }
}
