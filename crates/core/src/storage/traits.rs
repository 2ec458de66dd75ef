use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::catalog::License;
use crate::identity::User;
use crate::record::UpdateExpression;

use super::{Page, PageRequest, Result};

/// Repository for account operations.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Gets a user by their ID.
    async fn get_user(&self, id: Uuid) -> Result<Option<User>>;

    /// Gets a user by their username.
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Gets a user by their email address.
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Lists users in primary-key order.
    async fn list_users(&self, page: &PageRequest) -> Result<Page<User>>;

    /// Creates a new user. Fails with `AlreadyExists` if the ID is taken.
    async fn create_user(&self, user: &User) -> Result<()>;

    /// Applies a partial update and returns the stored result.
    /// Fails with `NotFound` if the user does not exist.
    async fn update_user(&self, id: Uuid, update: &UpdateExpression) -> Result<User>;

    /// Deletes a user. Fails with `NotFound` if the user does not exist.
    async fn delete_user(&self, id: Uuid) -> Result<()>;
}

/// Repository for catalog operations.
#[async_trait]
pub trait LicenseRepository: Send + Sync {
    /// Gets a license by its ID.
    async fn get_license(&self, id: Uuid) -> Result<Option<License>>;

    /// Lists licenses in primary-key order.
    async fn list_licenses(&self, page: &PageRequest) -> Result<Page<License>>;

    /// Creates a new license.
    async fn create_license(&self, license: &License) -> Result<()>;

    /// Applies a partial update and returns the stored result.
    async fn update_license(&self, id: Uuid, update: &UpdateExpression) -> Result<License>;

    /// Deletes a license by its ID.
    async fn delete_license(&self, id: Uuid) -> Result<()>;
}

/// Errors that can occur when storing an image.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("Image store is not configured: {0}")]
    NotConfigured(String),
    #[error("Failed to upload image: {0}")]
    Failed(String),
}

/// Blob storage for catalog images.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Stores `bytes` under `key` with public read access and returns the
    /// public URL.
    async fn put_image(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> std::result::Result<String, UploadError>;
}

/// Whether a content type names an image (`image/<subtype>`, parameters
/// ignored).
pub fn is_image_content_type(content_type: &str) -> bool {
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    essence
        .to_ascii_lowercase()
        .strip_prefix("image/")
        .is_some_and(|subtype| !subtype.is_empty())
}

/// Object key for a new image: `images/<uuid>.<ext>`.
///
/// The extension follows the content type and falls back to `jpg`.
pub fn image_key(id: Uuid, content_type: Option<&str>) -> String {
    let extension = match content_type.map(|ct| ct.trim().to_ascii_lowercase()) {
        Some(ct) if ct == "image/png" => "png",
        Some(ct) if ct == "image/gif" => "gif",
        Some(ct) if ct == "image/webp" => "webp",
        Some(ct) if ct == "image/svg+xml" => "svg",
        _ => "jpg",
    };
    format!("images/{id}.{extension}")
}

/// Public URL of an object in a bucket.
///
/// Uses `base_url` when set (e.g. a CDN), otherwise the virtual-hosted S3
/// address.
pub fn public_object_url(bucket: &str, key: &str, base_url: Option<&str>) -> String {
    match base_url {
        Some(base) => format!("{}/{key}", base.trim_end_matches('/')),
        None => format!("https://{bucket}.s3.amazonaws.com/{key}"),
    }
}
