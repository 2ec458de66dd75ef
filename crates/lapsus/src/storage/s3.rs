//! S3 image store.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_config::Region;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client;

use lapsus_core::storage::{public_object_url, ImageStore, UploadError};

use crate::config::Config;

use super::resilience;

/// Stores images as publicly readable S3 objects.
#[derive(Debug, Clone)]
pub struct S3ImageStore {
    client: Client,
    bucket: Option<String>,
    public_base_url: Option<String>,
}

impl S3ImageStore {
    pub async fn connect(config: &Config) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.s3_region.clone()))
            .retry_config(resilience::retry_config(config))
            .timeout_config(resilience::timeout_config(config))
            .load()
            .await;

        if config.s3_bucket.is_none() {
            tracing::warn!("AWS_S3_BUCKET is not set, image uploads will fail");
        }

        Self {
            client: Client::new(&sdk_config),
            bucket: config.s3_bucket.clone(),
            public_base_url: config.s3_public_base_url.clone(),
        }
    }
}

#[async_trait]
impl ImageStore for S3ImageStore {
    async fn put_image(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, UploadError> {
        let bucket = self
            .bucket
            .as_deref()
            .ok_or_else(|| UploadError::NotConfigured("AWS_S3_BUCKET is not set".to_string()))?;

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .acl(ObjectCannedAcl::PublicRead)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(bucket, key, error = ?e, "S3 upload failed");
                UploadError::Failed(e.to_string())
            })?;

        Ok(public_object_url(
            bucket,
            key,
            self.public_base_url.as_deref(),
        ))
    }
}
