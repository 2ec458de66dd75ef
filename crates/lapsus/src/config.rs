use std::{env, time::Duration};

/// Origins allowed by CORS when `CORS_ALLOWED_ORIGINS` is unset.
const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://localhost:3001",
    "http://localhost:8080",
    "http://localhost:4200",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:3001",
    "http://127.0.0.1:8080",
    "http://127.0.0.1:4200",
];

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Deployment environment name (default: "development")
    pub env: String,
    /// DynamoDB region (default: "us-east-1")
    pub dynamodb_region: String,
    /// Local DynamoDB endpoint, only honored in development.
    pub dynamodb_endpoint_url: Option<String>,
    /// License table name (default: "Licenses")
    pub licenses_table: String,
    /// User table name (default: "Users")
    pub users_table: String,
    /// Image bucket. Uploads fail with 500 when unset.
    pub s3_bucket: Option<String>,
    /// S3 region (default: "us-east-1")
    pub s3_region: String,
    /// Public base URL for uploaded images, e.g. a CDN.
    pub s3_public_base_url: Option<String>,
    /// Per-request timeout in seconds (default: 10)
    pub request_timeout_secs: u64,
    /// Attempts per store call, including the first (default: 3)
    pub store_max_attempts: u32,
    /// Initial retry backoff in milliseconds (default: 100)
    pub store_initial_backoff_ms: u64,
    /// Timeout for a single store operation in seconds (default: 5)
    pub store_operation_timeout_secs: u64,
    /// Largest accepted image upload in bytes (default: 5 MiB)
    pub upload_max_bytes: usize,
    /// Origins allowed by CORS.
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `ENV` - Deployment environment (default: "development")
    /// - `DYNAMODB_REGION` - DynamoDB region (default: "us-east-1")
    /// - `DYNAMODB_ENDPOINT_URL` - Local DynamoDB endpoint (development only)
    /// - `DYNAMODB_TABLE` - License table (default: "Licenses")
    /// - `USERS_TABLE` - User table (default: "Users")
    /// - `AWS_S3_BUCKET` - Image bucket (no default)
    /// - `AWS_REGION` - S3 region (default: "us-east-1")
    /// - `S3_PUBLIC_BASE_URL` - Public URL prefix for images
    /// - `REQUEST_TIMEOUT_SECS` - Request timeout (default: 10)
    /// - `STORE_MAX_ATTEMPTS` - Store retry attempts (default: 3)
    /// - `STORE_INITIAL_BACKOFF_MS` - Store retry backoff (default: 100)
    /// - `STORE_OPERATION_TIMEOUT_SECS` - Store operation timeout (default: 5)
    /// - `UPLOAD_MAX_BYTES` - Upload size cap (default: 5242880)
    /// - `CORS_ALLOWED_ORIGINS` - Comma-separated origins (default: localhost dev ports)
    pub fn from_env() -> Self {
        Self {
            env: env::var("ENV").unwrap_or_else(|_| "development".to_string()),
            dynamodb_region: env::var("DYNAMODB_REGION")
                .unwrap_or_else(|_| "us-east-1".to_string()),
            dynamodb_endpoint_url: non_empty_var("DYNAMODB_ENDPOINT_URL"),
            licenses_table: env::var("DYNAMODB_TABLE").unwrap_or_else(|_| "Licenses".to_string()),
            users_table: env::var("USERS_TABLE").unwrap_or_else(|_| "Users".to_string()),
            s3_bucket: non_empty_var("AWS_S3_BUCKET"),
            s3_region: env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            s3_public_base_url: non_empty_var("S3_PUBLIC_BASE_URL"),
            request_timeout_secs: parsed_var("REQUEST_TIMEOUT_SECS", 10),
            store_max_attempts: parsed_var("STORE_MAX_ATTEMPTS", 3),
            store_initial_backoff_ms: parsed_var("STORE_INITIAL_BACKOFF_MS", 100),
            store_operation_timeout_secs: parsed_var("STORE_OPERATION_TIMEOUT_SECS", 5),
            upload_max_bytes: parsed_var("UPLOAD_MAX_BYTES", 5 * 1024 * 1024),
            cors_allowed_origins: non_empty_var("CORS_ALLOWED_ORIGINS")
                .map(|origins| parse_origins(&origins))
                .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect()),
        }
    }

    pub fn is_development(&self) -> bool {
        self.env == "development"
    }

    /// The local DynamoDB endpoint, if one applies to this environment.
    pub fn local_dynamodb_endpoint(&self) -> Option<&str> {
        self.dynamodb_endpoint_url
            .as_deref()
            .filter(|_| self.is_development())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn store_initial_backoff(&self) -> Duration {
        Duration::from_millis(self.store_initial_backoff_ms)
    }

    pub fn store_operation_timeout(&self) -> Duration {
        Duration::from_secs(self.store_operation_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parsed_var<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            env: "development".to_string(),
            dynamodb_region: "us-east-1".to_string(),
            dynamodb_endpoint_url: Some("http://localhost:8000".to_string()),
            licenses_table: "Licenses".to_string(),
            users_table: "Users".to_string(),
            s3_bucket: None,
            s3_region: "us-east-1".to_string(),
            s3_public_base_url: None,
            request_timeout_secs: 10,
            store_max_attempts: 3,
            store_initial_backoff_ms: 100,
            store_operation_timeout_secs: 5,
            upload_max_bytes: 1024,
            cors_allowed_origins: vec![],
        }
    }

    #[test]
    fn test_duration_conversions() {
        let config = config();
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.store_initial_backoff(), Duration::from_millis(100));
        assert_eq!(config.store_operation_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_local_endpoint_only_in_development() {
        let mut config = config();
        assert_eq!(config.local_dynamodb_endpoint(), Some("http://localhost:8000"));

        config.env = "production".to_string();
        assert_eq!(config.local_dynamodb_endpoint(), None);
    }

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins(" http://a.com, ,http://b.com "),
            vec!["http://a.com".to_string(), "http://b.com".to_string()]
        );
    }

    #[test]
    fn test_default_origins_cover_local_dev_ports() {
        assert_eq!(DEFAULT_CORS_ORIGINS.len(), 8);
        assert!(DEFAULT_CORS_ORIGINS.contains(&"http://localhost:3000"));
    }
}
