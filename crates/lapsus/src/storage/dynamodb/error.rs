//! DynamoDB error mapping.
//!
//! Maps AWS SDK errors to `RepositoryError` from `lapsus_core::storage`.
//! A failed condition check is the only error that means "record absent";
//! throttling and transport faults keep their own variants.

use std::fmt::Debug;

use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::query::QueryError;
use aws_sdk_dynamodb::operation::scan::ScanError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use lapsus_core::storage::RepositoryError;

/// Errors raised before the service answered.
fn transport_error<E, R>(err: &SdkError<E, R>) -> Option<RepositoryError> {
    match err {
        SdkError::TimeoutError(_) => Some(RepositoryError::Unavailable(
            "DynamoDB request timed out".to_string(),
        )),
        SdkError::DispatchFailure(failure) => {
            Some(RepositoryError::ConnectionFailed(format!("{failure:?}")))
        }
        SdkError::ConstructionFailure(failure) => Some(RepositoryError::QueryFailed(format!(
            "request construction failed: {failure:?}"
        ))),
        _ => None,
    }
}

fn throttled() -> RepositoryError {
    RepositoryError::Throttled("Throughput exceeded, please retry".to_string())
}

fn request_limit() -> RepositoryError {
    RepositoryError::Throttled("Request limit exceeded, please retry".to_string())
}

fn internal() -> RepositoryError {
    RepositoryError::Unavailable("DynamoDB internal server error".to_string())
}

fn table_missing() -> RepositoryError {
    RepositoryError::QueryFailed("Table not found".to_string())
}

/// Map a GetItem SDK error to RepositoryError.
pub fn map_get_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<GetItemError, R>,
) -> RepositoryError {
    if let Some(error) = transport_error(&err) {
        return error;
    }
    match err.into_service_error() {
        GetItemError::ResourceNotFoundException(_) => table_missing(),
        GetItemError::ProvisionedThroughputExceededException(_) => throttled(),
        GetItemError::RequestLimitExceeded(_) => request_limit(),
        GetItemError::InternalServerError(_) => internal(),
        err => RepositoryError::QueryFailed(format!("GetItem failed: {:?}", err)),
    }
}

/// Map a Query SDK error to RepositoryError.
pub fn map_query_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<QueryError, R>,
) -> RepositoryError {
    if let Some(error) = transport_error(&err) {
        return error;
    }
    match err.into_service_error() {
        QueryError::ResourceNotFoundException(_) => table_missing(),
        QueryError::ProvisionedThroughputExceededException(_) => throttled(),
        QueryError::RequestLimitExceeded(_) => request_limit(),
        QueryError::InternalServerError(_) => internal(),
        err => RepositoryError::QueryFailed(format!("Query failed: {:?}", err)),
    }
}

/// Map a Scan SDK error to RepositoryError.
pub fn map_scan_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<ScanError, R>,
) -> RepositoryError {
    if let Some(error) = transport_error(&err) {
        return error;
    }
    match err.into_service_error() {
        ScanError::ResourceNotFoundException(_) => table_missing(),
        ScanError::ProvisionedThroughputExceededException(_) => throttled(),
        ScanError::RequestLimitExceeded(_) => request_limit(),
        ScanError::InternalServerError(_) => internal(),
        err => RepositoryError::QueryFailed(format!("Scan failed: {:?}", err)),
    }
}

/// Map a PutItem SDK error to RepositoryError.
pub fn map_put_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<PutItemError, R>,
    entity_type: &'static str,
    id: impl Into<String>,
) -> RepositoryError {
    if let Some(error) = transport_error(&err) {
        return error;
    }
    match err.into_service_error() {
        PutItemError::ConditionalCheckFailedException(_) => RepositoryError::AlreadyExists {
            entity_type,
            id: id.into(),
        },
        PutItemError::ResourceNotFoundException(_) => table_missing(),
        PutItemError::ProvisionedThroughputExceededException(_) => throttled(),
        PutItemError::RequestLimitExceeded(_) => request_limit(),
        PutItemError::ItemCollectionSizeLimitExceededException(_) => {
            RepositoryError::QueryFailed("Item collection size limit exceeded".to_string())
        }
        PutItemError::TransactionConflictException(_) => {
            RepositoryError::Throttled("Transaction conflict, please retry".to_string())
        }
        PutItemError::InternalServerError(_) => internal(),
        err => RepositoryError::QueryFailed(format!("PutItem failed: {:?}", err)),
    }
}

/// Map an UpdateItem SDK error to RepositoryError.
pub fn map_update_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<UpdateItemError, R>,
    entity_type: &'static str,
    id: impl Into<String>,
) -> RepositoryError {
    if let Some(error) = transport_error(&err) {
        return error;
    }
    match err.into_service_error() {
        UpdateItemError::ConditionalCheckFailedException(_) => RepositoryError::NotFound {
            entity_type,
            id: id.into(),
        },
        UpdateItemError::ResourceNotFoundException(_) => table_missing(),
        UpdateItemError::ProvisionedThroughputExceededException(_) => throttled(),
        UpdateItemError::RequestLimitExceeded(_) => request_limit(),
        UpdateItemError::ItemCollectionSizeLimitExceededException(_) => {
            RepositoryError::QueryFailed("Item collection size limit exceeded".to_string())
        }
        UpdateItemError::TransactionConflictException(_) => {
            RepositoryError::Throttled("Transaction conflict, please retry".to_string())
        }
        UpdateItemError::InternalServerError(_) => internal(),
        err => RepositoryError::QueryFailed(format!("UpdateItem failed: {:?}", err)),
    }
}

/// Map a DeleteItem SDK error to RepositoryError.
pub fn map_delete_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DeleteItemError, R>,
    entity_type: &'static str,
    id: impl Into<String>,
) -> RepositoryError {
    if let Some(error) = transport_error(&err) {
        return error;
    }
    match err.into_service_error() {
        DeleteItemError::ConditionalCheckFailedException(_) => RepositoryError::NotFound {
            entity_type,
            id: id.into(),
        },
        DeleteItemError::ResourceNotFoundException(_) => table_missing(),
        DeleteItemError::ProvisionedThroughputExceededException(_) => throttled(),
        DeleteItemError::RequestLimitExceeded(_) => request_limit(),
        DeleteItemError::ItemCollectionSizeLimitExceededException(_) => {
            RepositoryError::QueryFailed("Item collection size limit exceeded".to_string())
        }
        DeleteItemError::TransactionConflictException(_) => {
            RepositoryError::Throttled("Transaction conflict, please retry".to_string())
        }
        DeleteItemError::InternalServerError(_) => internal(),
        err => RepositoryError::QueryFailed(format!("DeleteItem failed: {:?}", err)),
    }
}

/// Map a generic connection/config error to RepositoryError.
pub fn map_connection_error(err: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::ConnectionFailed(err.to_string())
}
