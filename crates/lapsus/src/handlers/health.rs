//! Health check endpoint.

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub service: &'static str,
}

/// GET /health - Liveness probe. Does not touch the stores.
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "healthy",
        service: "LapsusINt Store Backend",
    })
}
