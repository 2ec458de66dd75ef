//! Storage backend implementations.
//!
//! This module provides concrete implementations of the repository traits
//! defined in `lapsus_core::storage`. The record store is selected at
//! compile time via feature flags.
//!
//! # Feature Flags
//!
//! - `inmemory` (default): process-local tables, lost on restart
//! - `dynamodb`: AWS DynamoDB storage backend using `aws-sdk-dynamodb`
//! - `s3`: S3 image store using `aws-sdk-s3` (in-memory otherwise)
//!
//! `inmemory` and `dynamodb` are mutually exclusive.
//!
//! # Examples
//!
//! Build with DynamoDB and S3:
//! ```bash
//! cargo build -p lapsus --no-default-features --features dynamodb,s3
//! ```

#[cfg(all(feature = "inmemory", feature = "dynamodb"))]
compile_error!(
    "Features 'inmemory' and 'dynamodb' are mutually exclusive. \
    Enable only one storage backend at a time."
);

#[cfg(not(any(feature = "inmemory", feature = "dynamodb")))]
compile_error!(
    "No storage backend selected. Enable 'inmemory' or 'dynamodb' feature. \
    Example: cargo build -p lapsus --features dynamodb"
);

// Always compiled: tests and the default build run on it.
pub mod inmemory;

#[cfg(feature = "dynamodb")]
pub mod dynamodb;

#[cfg(feature = "s3")]
pub mod s3;

#[cfg(any(feature = "dynamodb", feature = "s3"))]
mod resilience;

pub use inmemory::{InMemoryImageStore, InMemoryRepository};

#[cfg(feature = "dynamodb")]
pub use dynamodb::DynamoDbRepository;

#[cfg(feature = "s3")]
pub use s3::S3ImageStore;
