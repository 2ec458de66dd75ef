pub mod error;
pub mod health;
pub mod images;
pub mod licenses;
pub mod root;
pub mod users;

use axum::{
    http::{HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lapsus_core::storage::{Page, PageRequest};

pub use error::AppError;

/// Header carrying the cursor of the next page.
pub const NEXT_CURSOR: HeaderName = HeaderName::from_static("x-next-cursor");

/// Query parameters of the list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

impl ListQuery {
    pub fn page_request(&self) -> Result<PageRequest, AppError> {
        Ok(PageRequest::from_query(self.limit, self.cursor.as_deref())?)
    }
}

/// JSON array of the page items, with `x-next-cursor` when more may follow.
pub fn page_response<T: Serialize>(page: Page<T>) -> Result<Response, AppError> {
    let mut response = Json(page.items).into_response();
    if let Some(cursor) = page.next_cursor {
        response
            .headers_mut()
            .insert(NEXT_CURSOR, HeaderValue::from_str(&cursor.encode())?);
    }
    Ok(response)
}

/// `{"message": ...}` body of the delete endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

/// Parse a path ID. Anything that is not a UUID cannot name a record.
pub fn parse_id(entity: &'static str, raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::not_found(entity, raw))
}
