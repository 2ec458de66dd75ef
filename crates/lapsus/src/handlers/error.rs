use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use lapsus_auth::{AuthError, PayloadRejection};
use lapsus_core::catalog::CatalogError;
use lapsus_core::identity::IdentityError;
use lapsus_core::record::UpdateError;
use lapsus_core::storage::{repository_error_to_status_code, RepositoryError, UploadError};

/// Handler error. Known domain errors keep their status and message;
/// anything else is a 500 with a generic body.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// A 404 carrying `"<entity> not found"`.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self(
            RepositoryError::NotFound {
                entity_type: entity,
                id: id.to_string(),
            }
            .into(),
        )
    }

    fn status_and_detail(&self) -> (StatusCode, String) {
        let error = &self.0;

        if let Some(repo_error) = error.downcast_ref::<RepositoryError>() {
            let status = StatusCode::from_u16(repository_error_to_status_code(repo_error))
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            let detail = match repo_error {
                RepositoryError::NotFound { entity_type, .. } => format!("{entity_type} not found"),
                _ if status.is_server_error() && repo_error.is_retryable() => {
                    "Service temporarily unavailable".to_string()
                }
                _ if status.is_server_error() => "Internal server error".to_string(),
                other => other.to_string(),
            };
            return (status, detail);
        }
        if let Some(error) = error.downcast_ref::<CatalogError>() {
            return (StatusCode::BAD_REQUEST, error.to_string());
        }
        if let Some(error) = error.downcast_ref::<IdentityError>() {
            return (StatusCode::BAD_REQUEST, error.to_string());
        }
        if let Some(error) = error.downcast_ref::<UpdateError>() {
            return (StatusCode::BAD_REQUEST, error.to_string());
        }
        if let Some(error) = error.downcast_ref::<UploadError>() {
            return (StatusCode::INTERNAL_SERVER_ERROR, error.to_string());
        }

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Auth and payload errors render themselves.
        let error = match self.0.downcast::<AuthError>() {
            Ok(auth_error) => return auth_error.into_response(),
            Err(error) => error,
        };
        let error = match error.downcast::<PayloadRejection>() {
            Ok(rejection) => return rejection.into_response(),
            Err(error) => AppError(error),
        };

        let (status, detail) = error.status_and_detail();
        if status.is_server_error() {
            tracing::error!(error = ?error.0, "request failed");
        }

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
