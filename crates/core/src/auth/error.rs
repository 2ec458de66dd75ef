use thiserror::Error;

/// Authentication and token errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Not authenticated")]
    MissingToken,

    #[error("Invalid authorization header")]
    MalformedHeader,

    #[error("Could not validate credentials: {0}")]
    InvalidToken(String),

    #[error("Token has expired")]
    ExpiredToken,

    /// Unknown identity or wrong secret. The two are never told apart.
    #[error("Incorrect username or password")]
    InvalidCredentials,

    #[error("Inactive user")]
    InactiveUser,

    #[error("Unsupported token algorithm: {0}")]
    UnsupportedAlgorithm(String),
}
