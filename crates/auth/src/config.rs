use std::str::FromStr;

use chrono::Duration;
use jsonwebtoken::Algorithm;

use crate::error::AuthError;

/// Secret used when `SECRET_KEY` is unset. Only acceptable in development.
pub const DEFAULT_SECRET_KEY: &str = "supersecret";

/// Complete auth configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub secret_key: String,
    pub algorithm: Algorithm,
    pub access_token_ttl: Duration,
    pub bcrypt_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            algorithm: Algorithm::HS256,
            access_token_ttl: Duration::minutes(30),
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl AuthConfig {
    /// Load from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SECRET_KEY`: HMAC signing secret (default: `supersecret`)
    /// - `ALGORITHM`: `HS256`, `HS384` or `HS512` (default: `HS256`)
    /// - `ACCESS_TOKEN_EXPIRE_MINUTES`: token lifetime (default: 30)
    /// - `BCRYPT_COST`: bcrypt work factor, 4 to 31 (default: 12)
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Config` for unparseable values or a non-HMAC algorithm.
    pub fn from_env() -> Result<Self, AuthError> {
        let defaults = Self::default();

        let secret_key =
            std::env::var("SECRET_KEY").unwrap_or_else(|_| DEFAULT_SECRET_KEY.to_string());
        if secret_key.is_empty() {
            return Err(AuthError::Config("SECRET_KEY must not be empty".to_string()));
        }

        let algorithm = match std::env::var("ALGORITHM") {
            Ok(name) => parse_algorithm(&name)?,
            Err(_) => defaults.algorithm,
        };

        let access_token_ttl = match std::env::var("ACCESS_TOKEN_EXPIRE_MINUTES") {
            Ok(minutes) => minutes
                .parse::<i64>()
                .ok()
                .filter(|m| *m > 0)
                .map(Duration::minutes)
                .ok_or_else(|| {
                    AuthError::Config(format!("invalid ACCESS_TOKEN_EXPIRE_MINUTES: {minutes}"))
                })?,
            Err(_) => defaults.access_token_ttl,
        };

        let bcrypt_cost = match std::env::var("BCRYPT_COST") {
            Ok(cost) => cost
                .parse::<u32>()
                .ok()
                .filter(|c| (4..=31).contains(c))
                .ok_or_else(|| AuthError::Config(format!("invalid BCRYPT_COST: {cost}")))?,
            Err(_) => defaults.bcrypt_cost,
        };

        Ok(Self {
            secret_key,
            algorithm,
            access_token_ttl,
            bcrypt_cost,
        })
    }

    /// Whether the built-in development secret is in use.
    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }
}

/// Parse an HMAC algorithm name.
pub fn parse_algorithm(name: &str) -> Result<Algorithm, AuthError> {
    let algorithm = Algorithm::from_str(name.trim())
        .map_err(|_| AuthError::Config(format!("unknown ALGORITHM: {name}")))?;
    ensure_hmac(algorithm)
}

/// Tokens are signed with a shared secret, so only HMAC algorithms apply.
pub fn ensure_hmac(algorithm: Algorithm) -> Result<Algorithm, AuthError> {
    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(algorithm),
        other => Err(AuthError::Core(
            lapsus_core::auth::AuthError::UnsupportedAlgorithm(format!("{other:?}")),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.algorithm, Algorithm::HS256);
        assert_eq!(config.access_token_ttl, Duration::minutes(30));
        assert_eq!(config.bcrypt_cost, 12);
        assert!(config.uses_default_secret());
    }

    #[test]
    fn test_parse_hmac_algorithms() {
        assert_eq!(parse_algorithm("HS256").unwrap(), Algorithm::HS256);
        assert_eq!(parse_algorithm("HS384").unwrap(), Algorithm::HS384);
        assert_eq!(parse_algorithm(" HS512 ").unwrap(), Algorithm::HS512);
    }

    #[test]
    fn test_parse_rejects_asymmetric_and_unknown() {
        assert!(matches!(
            parse_algorithm("RS256"),
            Err(AuthError::Core(
                lapsus_core::auth::AuthError::UnsupportedAlgorithm(_)
            ))
        ));
        assert!(matches!(parse_algorithm("none"), Err(AuthError::Config(_))));
    }
}
