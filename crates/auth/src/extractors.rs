//! Axum extractors for authentication and request bodies.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{FormRejection, JsonRejection},
        FromRef, FromRequest, FromRequestParts, Request,
    },
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use lapsus_core::auth::{parse_bearer, AuthError as CoreError, Claims};
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;

use crate::error::AuthError;
use crate::AuthState;

/// Extractor for a verified bearer token. Rejects with 401.
///
/// Only the signature and expiry are checked; the account is not reloaded.
pub struct CurrentUser(pub Claims);

impl<S> FromRequestParts<S> for CurrentUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(CoreError::MissingToken)?;
        let header = header.to_str().map_err(|_| CoreError::MalformedHeader)?;
        let token = parse_bearer(header).ok_or(CoreError::MalformedHeader)?;

        let claims = auth_state.tokens.verify(token).inspect_err(|error| {
            tracing::debug!(%error, "bearer token refused");
        })?;

        Ok(CurrentUser(claims))
    }
}

/// A body that could not be parsed. Renders with a `detail` message,
/// as 400 unless the body was too large (413).
#[derive(Debug, Error)]
#[error("{detail}")]
pub struct PayloadRejection {
    status: StatusCode,
    detail: String,
}

impl PayloadRejection {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }

    fn keeping_too_large(status: StatusCode, detail: String) -> Self {
        let status = if status == StatusCode::PAYLOAD_TOO_LARGE {
            status
        } else {
            StatusCode::BAD_REQUEST
        };
        Self { status, detail }
    }
}

impl IntoResponse for PayloadRejection {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

impl From<JsonRejection> for PayloadRejection {
    fn from(rejection: JsonRejection) -> Self {
        Self::keeping_too_large(rejection.status(), rejection.body_text())
    }
}

impl From<FormRejection> for PayloadRejection {
    fn from(rejection: FormRejection) -> Self {
        Self::keeping_too_large(rejection.status(), rejection.body_text())
    }
}

impl From<MultipartRejection> for PayloadRejection {
    fn from(rejection: MultipartRejection) -> Self {
        Self::keeping_too_large(rejection.status(), rejection.body_text())
    }
}

impl From<MultipartError> for PayloadRejection {
    fn from(error: MultipartError) -> Self {
        Self::keeping_too_large(error.status(), error.body_text())
    }
}

/// `Json<T>` whose rejection uses the `{"detail": ...}` error body.
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = PayloadRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// `Form<T>` whose rejection uses the `{"detail": ...}` error body.
pub struct FormBody<T>(pub T);

impl<T, S> FromRequest<S> for FormBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = PayloadRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(value) = Form::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}
