//! Table provisioning.
//!
//! Creates the license and user tables on startup when they do not exist
//! and waits until both are active.

use std::time::Duration;

use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::create_table::CreateTableError;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, GlobalSecondaryIndex, KeySchemaElement, KeyType, Projection,
    ProjectionType, ProvisionedThroughput, ScalarAttributeType, TableStatus,
};
use aws_sdk_dynamodb::Client;
use lapsus_core::storage::RepositoryError;

use super::error::map_connection_error;
use super::repository::{DynamoDbRepository, EMAIL_INDEX, USERNAME_INDEX};

const READ_CAPACITY: i64 = 5;
const WRITE_CAPACITY: i64 = 5;
const ACTIVE_POLL_INTERVAL: Duration = Duration::from_millis(500);
const ACTIVE_POLL_ATTEMPTS: u32 = 60;

fn throughput() -> Result<ProvisionedThroughput, RepositoryError> {
    ProvisionedThroughput::builder()
        .read_capacity_units(READ_CAPACITY)
        .write_capacity_units(WRITE_CAPACITY)
        .build()
        .map_err(map_connection_error)
}

fn hash_key(attribute: &str) -> Result<KeySchemaElement, RepositoryError> {
    KeySchemaElement::builder()
        .attribute_name(attribute)
        .key_type(KeyType::Hash)
        .build()
        .map_err(map_connection_error)
}

fn string_attribute(attribute: &str) -> Result<AttributeDefinition, RepositoryError> {
    AttributeDefinition::builder()
        .attribute_name(attribute)
        .attribute_type(ScalarAttributeType::S)
        .build()
        .map_err(map_connection_error)
}

fn lookup_index(name: &str, attribute: &str) -> Result<GlobalSecondaryIndex, RepositoryError> {
    GlobalSecondaryIndex::builder()
        .index_name(name)
        .key_schema(hash_key(attribute)?)
        .projection(
            Projection::builder()
                .projection_type(ProjectionType::All)
                .build(),
        )
        .provisioned_throughput(throughput()?)
        .build()
        .map_err(map_connection_error)
}

/// Create both tables if missing, then wait for them to become active.
pub async fn ensure_tables(repository: &DynamoDbRepository) -> Result<(), RepositoryError> {
    let client = repository.client();

    let licenses = client
        .create_table()
        .table_name(repository.licenses_table())
        .key_schema(hash_key("license_id")?)
        .attribute_definitions(string_attribute("license_id")?)
        .provisioned_throughput(throughput()?)
        .send()
        .await;
    report_created(repository.licenses_table(), licenses)?;

    let users = client
        .create_table()
        .table_name(repository.users_table())
        .key_schema(hash_key("user_id")?)
        .attribute_definitions(string_attribute("user_id")?)
        .attribute_definitions(string_attribute("username")?)
        .attribute_definitions(string_attribute("email")?)
        .global_secondary_indexes(lookup_index(USERNAME_INDEX, "username")?)
        .global_secondary_indexes(lookup_index(EMAIL_INDEX, "email")?)
        .provisioned_throughput(throughput()?)
        .send()
        .await;
    report_created(repository.users_table(), users)?;

    wait_until_active(client, repository.licenses_table()).await?;
    wait_until_active(client, repository.users_table()).await?;
    Ok(())
}

fn report_created<T, R: std::fmt::Debug>(
    table: &str,
    result: Result<T, SdkError<CreateTableError, R>>,
) -> Result<(), RepositoryError> {
    match result {
        Ok(_) => {
            tracing::info!(table, "Created table");
            Ok(())
        }
        Err(SdkError::ServiceError(err))
            if matches!(err.err(), CreateTableError::ResourceInUseException(_)) =>
        {
            tracing::debug!(table, "Table already exists");
            Ok(())
        }
        Err(err) => Err(RepositoryError::QueryFailed(format!(
            "failed to create table {table}: {err:?}"
        ))),
    }
}

async fn wait_until_active(client: &Client, table: &str) -> Result<(), RepositoryError> {
    for _ in 0..ACTIVE_POLL_ATTEMPTS {
        let status = client
            .describe_table()
            .table_name(table)
            .send()
            .await
            .map_err(|e| map_connection_error(format!("{e:?}")))?
            .table
            .and_then(|description| description.table_status);

        if status == Some(TableStatus::Active) {
            return Ok(());
        }
        tokio::time::sleep(ACTIVE_POLL_INTERVAL).await;
    }
    Err(RepositoryError::Unavailable(format!(
        "table {table} did not become active"
    )))
}
