mod error;
mod functions;
mod types;

pub use error::AuthError;
pub use functions::{calculate_expiry, claims_for_user, parse_bearer};
pub use types::{AuthFailure, Claims, TOKEN_TYPE};
