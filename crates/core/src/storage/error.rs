use thiserror::Error;

use crate::record::{MappingError, UpdateError};

/// Errors that can occur during repository operations.
///
/// A missing record and a failed operation are always distinct variants, so
/// a throttled update never reads as "not found".
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("{entity_type} already exists: {id}")]
    AlreadyExists {
        entity_type: &'static str,
        id: String,
    },
    /// A unique attribute (username, email) is already taken.
    #[error("{0}")]
    Conflict(String),
    #[error("Request throttled: {0}")]
    Throttled(String),
    #[error("Service unavailable: {0}")]
    Unavailable(String),
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl RepositoryError {
    /// Whether retrying the same operation may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Throttled(_) | Self::Unavailable(_) | Self::ConnectionFailed(_)
        )
    }
}

impl From<MappingError> for RepositoryError {
    fn from(error: MappingError) -> Self {
        Self::Serialization(error.to_string())
    }
}

impl From<UpdateError> for RepositoryError {
    fn from(error: UpdateError) -> Self {
        Self::InvalidData(error.to_string())
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;
