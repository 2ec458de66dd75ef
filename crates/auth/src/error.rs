use axum::{
    http::{header::WWW_AUTHENTICATE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use lapsus_core::auth::AuthFailure;
use lapsus_core::identity::IdentityError;
use lapsus_core::record::UpdateError;
use lapsus_core::storage::{repository_error_to_status_code, RepositoryError};
use serde_json::json;
use thiserror::Error;

/// Auth errors for the lapsus_auth crate.
///
/// This wraps the core `AuthError` and adds the failures of the I/O side:
/// account storage, hashing and signing.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Error from the core auth module (token parsing, credentials, etc.)
    #[error(transparent)]
    Core(#[from] lapsus_core::auth::AuthError),

    /// Credential check failed. The reason is only logged.
    #[error("Incorrect username or password")]
    Rejected(AuthFailure),

    /// Account field validation failed.
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// Account storage failed or a unique field is taken.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("token signing failed: {0}")]
    Signing(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<UpdateError> for AuthError {
    fn from(error: UpdateError) -> Self {
        Self::Repository(error.into())
    }
}

impl AuthError {
    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        use lapsus_core::auth::AuthError as CoreError;

        match self {
            AuthError::Core(CoreError::InactiveUser) => StatusCode::BAD_REQUEST,
            AuthError::Core(CoreError::UnsupportedAlgorithm(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AuthError::Core(_) | AuthError::Rejected(_) => StatusCode::UNAUTHORIZED,
            AuthError::Identity(_) => StatusCode::BAD_REQUEST,
            AuthError::Repository(error) => {
                StatusCode::from_u16(repository_error_to_status_code(error))
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            AuthError::Hashing(_) | AuthError::Signing(_) | AuthError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let detail = if status.is_server_error() {
            tracing::error!(error = %self, "auth request failed");
            match &self {
                AuthError::Repository(error) if error.is_retryable() => {
                    "Service temporarily unavailable".to_string()
                }
                _ => "Internal server error".to_string(),
            }
        } else {
            self.to_string()
        };

        let mut response = (status, Json(json!({ "detail": detail }))).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use lapsus_core::auth::AuthError as CoreError;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_both_rejections_render_identically() {
        let unknown = AuthError::Rejected(AuthFailure::UnknownIdentity).into_response();
        let mismatch = AuthError::Rejected(AuthFailure::SecretMismatch).into_response();

        assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(mismatch.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(unknown.headers()[WWW_AUTHENTICATE], "Bearer");
        assert_eq!(mismatch.headers()[WWW_AUTHENTICATE], "Bearer");
        assert_eq!(body_json(unknown).await, body_json(mismatch).await);
    }

    #[tokio::test]
    async fn test_inactive_user_is_bad_request() {
        let response = AuthError::Core(CoreError::InactiveUser).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["detail"], "Inactive user");
    }

    #[tokio::test]
    async fn test_conflict_is_bad_request_with_message() {
        let response =
            AuthError::Repository(RepositoryError::Conflict("Username already registered".into()))
                .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["detail"],
            "Username already registered"
        );
    }

    #[tokio::test]
    async fn test_server_errors_hide_details() {
        let response = AuthError::Hashing("cost out of range".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["detail"], "Internal server error");
    }

    #[test]
    fn test_token_errors_are_unauthorized() {
        assert_eq!(
            AuthError::Core(CoreError::ExpiredToken).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::Core(CoreError::MissingToken).status_code(),
            StatusCode::UNAUTHORIZED
        );
    }
}
