//! License image upload (`POST /licenses/upload-image`).

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lapsus_auth::{CurrentUser, PayloadRejection};
use lapsus_core::storage::{image_key, is_image_content_type};

use super::AppError;
use crate::state::AppState;

/// Multipart field holding the image.
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
}

/// Store the `file` field and return its public URL. Requires a bearer
/// token. Bodies over the configured cap are refused with 413, non-image
/// content types with 400.
pub async fn upload_image(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let mut multipart = multipart.map_err(PayloadRejection::from)?;
    while let Some(field) = multipart.next_field().await.map_err(PayloadRejection::from)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let content_type = field
            .content_type()
            .unwrap_or("image/jpeg")
            .to_string();
        if !is_image_content_type(&content_type) {
            return Err(
                PayloadRejection::new(format!("Unsupported content type: {content_type}")).into(),
            );
        }

        let bytes = field.bytes().await.map_err(PayloadRejection::from)?;
        if bytes.is_empty() {
            return Err(PayloadRejection::new("Uploaded file is empty").into());
        }

        let key = image_key(Uuid::new_v4(), Some(&content_type));
        let size = bytes.len();
        let url = state
            .images
            .put_image(&key, bytes.to_vec(), &content_type)
            .await?;

        tracing::info!(%key, size, username = %claims.sub, "Uploaded image");

        return Ok(Json(UploadResponse { url }));
    }

    Err(PayloadRejection::new(format!("Missing multipart field: {FILE_FIELD}")).into())
}
