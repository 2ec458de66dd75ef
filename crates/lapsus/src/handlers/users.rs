//! Account CRUD handlers (`/users`).

use axum::{
    extract::{Path, Query, State},
    response::Response,
    Json,
};

use lapsus_auth::JsonBody;
use lapsus_core::identity::{CreateUserRequest, UpdateUserRequest, User};

use super::{page_response, parse_id, AppError, ListQuery, Message};
use crate::state::AppState;

const ENTITY: &str = "User";

/// List users (GET /users).
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Response, AppError> {
    let page = state.users.list_users(&query.page_request()?).await?;
    page_response(page)
}

/// Create a user (POST /users). Same rules as registration.
pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateUserRequest>,
) -> Result<Json<User>, AppError> {
    let user = state.auth.accounts.register(request).await?;
    Ok(Json(user))
}

/// Get a user by ID (GET /users/{id}).
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, AppError> {
    let user_id = parse_id(ENTITY, &id)?;
    state
        .users
        .get_user(user_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found(ENTITY, user_id))
}

/// Partially update a user (PUT /users/{id}).
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<UpdateUserRequest>,
) -> Result<Json<User>, AppError> {
    let user_id = parse_id(ENTITY, &id)?;
    let user = state.auth.accounts.update(user_id, request).await?;
    Ok(Json(user))
}

/// Delete a user (DELETE /users/{id}).
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Message>, AppError> {
    let user_id = parse_id(ENTITY, &id)?;
    state.users.delete_user(user_id).await?;

    tracing::info!(%user_id, "Deleted user");

    Ok(Message::new("User deleted successfully"))
}
