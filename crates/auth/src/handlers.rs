//! HTTP handlers for auth routes.

use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Json, Router,
};
use lapsus_core::auth::{Claims, TOKEN_TYPE};
use lapsus_core::identity::{CreateUserRequest, UserSummary};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::extractors::{CurrentUser, FormBody, JsonBody};
use crate::AuthState;

/// OAuth2 password-grant form. `username` may also be an email address.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: UserSummary,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserSummary,
}

/// Creates the auth router.
///
/// Routes:
/// - `POST /auth/login` - Exchange credentials for an access token
/// - `POST /auth/register` - Create an account
/// - `GET /auth/me` - Claims of the current bearer token
pub fn auth_routes<S>() -> Router<S>
where
    AuthState: FromRef<S>,
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/me", get(me))
}

async fn login(
    State(state): State<AuthState>,
    FormBody(form): FormBody<LoginForm>,
) -> Result<Json<TokenResponse>, AuthError> {
    let user = state.accounts.login(&form.username, &form.password).await?;
    let access_token = state.tokens.issue(&user)?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: TOKEN_TYPE.to_string(),
        user: user.summary(),
    }))
}

async fn register(
    State(state): State<AuthState>,
    JsonBody(request): JsonBody<CreateUserRequest>,
) -> Result<Json<RegisterResponse>, AuthError> {
    let user = state.accounts.register(request).await?;

    Ok(Json(RegisterResponse {
        message: "User created successfully".to_string(),
        user: user.summary(),
    }))
}

async fn me(CurrentUser(claims): CurrentUser) -> Json<Claims> {
    Json(claims)
}
