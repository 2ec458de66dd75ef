//! Catalog CRUD handlers (`/licenses`).

use axum::{
    extract::{Path, Query, State},
    response::Response,
    Json,
};
use chrono::Utc;

use lapsus_auth::JsonBody;
use lapsus_core::catalog::{
    validate_license_update, validate_new_license, CreateLicenseRequest, License,
    UpdateLicenseRequest,
};

use super::{page_response, parse_id, AppError, ListQuery, Message};
use crate::state::AppState;

const ENTITY: &str = "License";

/// List licenses (GET /licenses).
pub async fn list_licenses(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Response, AppError> {
    let page = state.licenses.list_licenses(&query.page_request()?).await?;
    page_response(page)
}

/// Add a license to the catalog (POST /licenses).
pub async fn create_license(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateLicenseRequest>,
) -> Result<Json<License>, AppError> {
    validate_new_license(&request)?;
    let license = request.into_license();
    state.licenses.create_license(&license).await?;

    tracing::info!(license_id = %license.license_id, product_name = %license.product_name, "Created license");

    Ok(Json(license))
}

/// Get a license by ID (GET /licenses/{id}).
pub async fn get_license(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<License>, AppError> {
    let license_id = parse_id(ENTITY, &id)?;
    state
        .licenses
        .get_license(license_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found(ENTITY, license_id))
}

/// Partially update a license (PUT /licenses/{id}).
///
/// Only fields present in the body change.
pub async fn update_license(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<UpdateLicenseRequest>,
) -> Result<Json<License>, AppError> {
    let license_id = parse_id(ENTITY, &id)?;
    validate_license_update(&request)?;
    let update = request.to_update(Utc::now())?;
    let license = state.licenses.update_license(license_id, &update).await?;

    tracing::info!(%license_id, "Updated license");

    Ok(Json(license))
}

/// Delete a license (DELETE /licenses/{id}).
pub async fn delete_license(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Message>, AppError> {
    let license_id = parse_id(ENTITY, &id)?;
    state.licenses.delete_license(license_id).await?;

    tracing::info!(%license_id, "Deleted license");

    Ok(Message::new("License deleted successfully"))
}
