mod error;
mod operations;
mod requests;
mod types;

pub use error::IdentityError;
pub use operations::{
    validate_email, validate_new_user, validate_password, validate_user_update, validate_username,
};
pub use requests::{CreateUserRequest, UpdateUserRequest};
pub use types::{IdentifierKind, User, UserRole, UserSummary};
