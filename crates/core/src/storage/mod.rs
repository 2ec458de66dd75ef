mod error;
mod http_mapping;
mod traits;
mod types;

pub use error::{RepositoryError, Result};
pub use http_mapping::repository_error_to_status_code;
pub use traits::{
    image_key, is_image_content_type, public_object_url, ImageStore, LicenseRepository, UploadError, UserRepository,
};
pub use types::{Cursor, Page, PageRequest, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
