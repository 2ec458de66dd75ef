use axum::Json;

use super::Message;

/// GET /
pub async fn root() -> Json<Message> {
    Message::new("Welcome to LapsusINt Store Backend API")
}
