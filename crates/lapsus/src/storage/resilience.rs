//! Retry and timeout settings shared by the AWS clients.

use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;

use crate::config::Config;

/// Standard retry mode with exponential backoff on throttling and
/// transient faults.
pub fn retry_config(config: &Config) -> RetryConfig {
    RetryConfig::standard()
        .with_max_attempts(config.store_max_attempts.max(1))
        .with_initial_backoff(config.store_initial_backoff())
}

/// Bounds a whole operation, retries included.
pub fn timeout_config(config: &Config) -> TimeoutConfig {
    TimeoutConfig::builder()
        .operation_timeout(config.store_operation_timeout())
        .build()
}
