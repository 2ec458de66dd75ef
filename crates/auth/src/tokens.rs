//! Signed access tokens.
//!
//! Tokens are self-contained: there is no refresh token and no revocation
//! list, so a token stays valid until `exp` even if the account changes.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use lapsus_core::auth::{claims_for_user, AuthError as CoreError, Claims};
use lapsus_core::identity::User;

use crate::config::{ensure_hmac, AuthConfig};
use crate::error::AuthError;

/// Issues and verifies HMAC-signed access tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("algorithm", &self.algorithm)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(secret: &str, algorithm: Algorithm, ttl: Duration) -> Result<Self, AuthError> {
        let algorithm = ensure_hmac(algorithm)?;
        Ok(Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        })
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        Self::new(
            &config.secret_key,
            config.algorithm,
            config.access_token_ttl,
        )
    }

    /// Issue a token for `user`, expiring `ttl` from now.
    pub fn issue(&self, user: &User) -> Result<String, AuthError> {
        self.issue_at(user, Utc::now())
    }

    /// Issue a token as if at `issued_at`.
    pub fn issue_at(&self, user: &User, issued_at: DateTime<Utc>) -> Result<String, AuthError> {
        let claims = claims_for_user(user, issued_at, self.ttl);
        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Verify signature, algorithm and expiry, returning the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(self.algorithm);
        validation.set_required_spec_claims(&["exp", "sub"]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => CoreError::ExpiredToken.into(),
                _ => CoreError::InvalidToken(e.to_string()).into(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lapsus_core::identity::UserRole;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new("test-secret", Algorithm::HS256, Duration::minutes(30)).unwrap()
    }

    #[test]
    fn test_token_creation_and_verification() {
        let user = User::new("alice", "alice@x.com", "hash").with_role(UserRole::Admin);
        let token = issuer().issue(&user).unwrap();

        let claims = issuer().verify(&token).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.user_id, user.user_id);
        assert_eq!(claims.role, UserRole::Admin);
        assert_eq!(claims.exp - claims.iat, 30 * 60);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let user = User::new("alice", "alice@x.com", "hash");
        let token = issuer()
            .issue_at(&user, Utc::now() - Duration::hours(2))
            .unwrap();

        assert!(matches!(
            issuer().verify(&token),
            Err(AuthError::Core(CoreError::ExpiredToken))
        ));
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let user = User::new("alice", "alice@x.com", "hash");
        let forged = TokenIssuer::new("other-secret", Algorithm::HS256, Duration::minutes(30))
            .unwrap()
            .issue(&user)
            .unwrap();

        assert!(matches!(
            issuer().verify(&forged),
            Err(AuthError::Core(CoreError::InvalidToken(_)))
        ));
    }

    #[test]
    fn test_algorithm_mismatch_is_rejected() {
        let user = User::new("alice", "alice@x.com", "hash");
        let token = TokenIssuer::new("test-secret", Algorithm::HS512, Duration::minutes(30))
            .unwrap()
            .issue(&user)
            .unwrap();

        assert!(issuer().verify(&token).is_err());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert!(matches!(
            issuer().verify("not.a.token"),
            Err(AuthError::Core(CoreError::InvalidToken(_)))
        ));
    }

    #[test]
    fn test_asymmetric_algorithm_is_refused() {
        assert!(TokenIssuer::new("secret", Algorithm::RS256, Duration::minutes(30)).is_err());
    }
}
