//! In-memory image store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use lapsus_core::storage::{public_object_url, ImageStore, UploadError};

/// A stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Keeps uploads in a map and hands out the URLs a bucket would.
#[derive(Debug, Clone)]
pub struct InMemoryImageStore {
    bucket: String,
    public_base_url: Option<String>,
    objects: Arc<RwLock<HashMap<String, StoredImage>>>,
}

impl InMemoryImageStore {
    pub fn new(bucket: impl Into<String>, public_base_url: Option<String>) -> Self {
        Self {
            bucket: bucket.into(),
            public_base_url,
            objects: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Returns the object stored under `key`.
    #[cfg(test)]
    pub async fn get(&self, key: &str) -> Option<StoredImage> {
        self.objects.read().await.get(key).cloned()
    }
}

impl Default for InMemoryImageStore {
    fn default() -> Self {
        Self::new("lapsus-images", None)
    }
}

#[async_trait]
impl ImageStore for InMemoryImageStore {
    async fn put_image(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, UploadError> {
        self.objects.write().await.insert(
            key.to_string(),
            StoredImage {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(public_object_url(
            &self.bucket,
            key,
            self.public_base_url.as_deref(),
        ))
    }
}
