//! DynamoDB storage backend implementation.
//!
//! This module provides a DynamoDB-based implementation of the repository traits
//! using `aws-sdk-dynamodb`.

mod conversions;
mod error;
mod repository;
mod tables;

use aws_config::BehaviorVersion;
use aws_config::Region;
use aws_sdk_dynamodb::config::Credentials;
use aws_sdk_dynamodb::Client;

use crate::config::Config;

pub use repository::DynamoDbRepository;
pub use tables::ensure_tables;

use super::resilience;

/// Build a repository from configuration.
///
/// In development with `DYNAMODB_ENDPOINT_URL` set, the client targets the
/// local endpoint with dummy credentials. Otherwise the default AWS
/// credential chain applies.
pub async fn connect(config: &Config) -> DynamoDbRepository {
    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.dynamodb_region.clone()))
        .retry_config(resilience::retry_config(config))
        .timeout_config(resilience::timeout_config(config));

    if let Some(endpoint) = config.local_dynamodb_endpoint() {
        tracing::info!(endpoint, "Using local DynamoDB");
        loader = loader
            .endpoint_url(endpoint)
            .credentials_provider(Credentials::new("dummy", "dummy", None, None, "local"));
    }

    let sdk_config = loader.load().await;
    tracing::info!(
        region = %config.dynamodb_region,
        users_table = %config.users_table,
        licenses_table = %config.licenses_table,
        "Connected to DynamoDB"
    );
    DynamoDbRepository::new(
        Client::new(&sdk_config),
        config.users_table.clone(),
        config.licenses_table.clone(),
    )
}
