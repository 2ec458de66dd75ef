use chrono::{DateTime, Duration, Utc};

use crate::identity::User;

use super::Claims;

/// Calculate token expiry from issuance time and TTL.
pub fn calculate_expiry(issued_at: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    issued_at + ttl
}

/// Build access-token claims for `user`.
pub fn claims_for_user(user: &User, issued_at: DateTime<Utc>, ttl: Duration) -> Claims {
    Claims {
        sub: user.username.clone(),
        user_id: user.user_id,
        role: user.role,
        iat: issued_at.timestamp(),
        exp: calculate_expiry(issued_at, ttl).timestamp(),
    }
}

/// Extract the token from an `Authorization` header value.
///
/// The scheme is matched case-insensitively, as RFC 7235 requires.
pub fn parse_bearer(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }
    Some(token)
}
