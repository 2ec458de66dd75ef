//! Application state with repository-based storage.
//!
//! This module defines the shared application state that is passed to all
//! request handlers. It uses repository trait objects for storage abstraction
//! and supports different backend combinations via feature flags.

use std::sync::Arc;

use lapsus_auth::{AuthConfig, AuthState};
use lapsus_core::storage::{ImageStore, LicenseRepository, UserRepository};

use crate::config::Config;

/// Shared application state.
///
/// This is cloned for each request handler and contains shared resources
/// including repository trait objects for database access.
#[derive(Clone)]
pub struct AppState {
    /// Account store. Also held by `auth` for registration and login.
    pub users: Arc<dyn UserRepository>,
    /// Catalog store.
    pub licenses: Arc<dyn LicenseRepository>,
    /// Blob store for license images.
    pub images: Arc<dyn ImageStore>,
    /// Password hashing, token issuing and account rules.
    pub auth: AuthState,
    /// Largest accepted image upload in bytes.
    pub upload_max_bytes: usize,
}

impl AppState {
    fn build<R>(
        repository: Arc<R>,
        images: Arc<dyn ImageStore>,
        config: &Config,
        auth_config: &AuthConfig,
    ) -> Result<Self, anyhow::Error>
    where
        R: UserRepository + LicenseRepository + 'static,
    {
        let users: Arc<dyn UserRepository> = repository.clone();
        let auth = AuthState::new(users.clone(), auth_config)?;

        Ok(Self {
            users,
            licenses: repository,
            images,
            auth,
            upload_max_bytes: config.upload_max_bytes,
        })
    }
}

impl AsRef<AuthState> for AppState {
    fn as_ref(&self) -> &AuthState {
        &self.auth
    }
}

/// Image store selected by the `s3` feature.
#[cfg(feature = "s3")]
async fn image_store(config: &Config) -> Arc<dyn ImageStore> {
    Arc::new(crate::storage::S3ImageStore::connect(config).await)
}

#[cfg(not(feature = "s3"))]
async fn image_store(config: &Config) -> Arc<dyn ImageStore> {
    tracing::info!("Using in-memory image store");
    let bucket = config
        .s3_bucket
        .clone()
        .unwrap_or_else(|| "lapsus-images".to_string());
    Arc::new(crate::storage::InMemoryImageStore::new(
        bucket,
        config.s3_public_base_url.clone(),
    ))
}

// ============================================================================
// Factory functions for different backend combinations
// ============================================================================

#[cfg(feature = "inmemory")]
mod inmemory {
    use super::*;

    impl AppState {
        /// Creates AppState with in-memory storage.
        pub async fn new(config: &Config, auth_config: &AuthConfig) -> Result<Self, anyhow::Error> {
            tracing::warn!("Using in-memory storage, data is lost on restart");
            Self::build(
                Arc::new(crate::storage::InMemoryRepository::new()),
                image_store(config).await,
                config,
                auth_config,
            )
        }
    }
}

#[cfg(feature = "dynamodb")]
mod dynamodb {
    use super::*;
    use crate::storage::dynamodb::{connect, ensure_tables};

    impl AppState {
        /// Creates AppState with DynamoDB storage, creating missing tables.
        pub async fn new(config: &Config, auth_config: &AuthConfig) -> Result<Self, anyhow::Error> {
            let repository = connect(config).await;
            ensure_tables(&repository).await?;
            Self::build(
                Arc::new(repository),
                image_store(config).await,
                config,
                auth_config,
            )
        }
    }
}

#[cfg(test)]
impl Default for AppState {
    /// In-memory state for tests. Uses the minimum bcrypt cost.
    fn default() -> Self {
        let auth_config = AuthConfig {
            bcrypt_cost: 4,
            ..AuthConfig::default()
        };
        let config = Config {
            upload_max_bytes: 1024 * 1024,
            ..Config::default()
        };
        Self::build(
            Arc::new(crate::storage::InMemoryRepository::new()),
            Arc::new(crate::storage::InMemoryImageStore::default()),
            &config,
            &auth_config,
        )
        .expect("default auth config is valid")
    }
}
