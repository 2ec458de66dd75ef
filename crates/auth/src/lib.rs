//! Password and bearer-token authentication for lapsus.
//!
//! This crate provides:
//! - Account registration and credential checks with bcrypt
//! - HMAC-signed access tokens
//! - Axum extractors and the `/auth` routes

mod accounts;
mod config;
mod error;
mod extractors;
mod handlers;
mod locks;
mod password;
mod state;
#[cfg(test)]
mod testing;
mod tokens;

pub use accounts::AccountService;
pub use config::{parse_algorithm, AuthConfig, DEFAULT_SECRET_KEY};
pub use error::AuthError;
pub use extractors::{CurrentUser, FormBody, JsonBody, PayloadRejection};
pub use handlers::{auth_routes, LoginForm, RegisterResponse, TokenResponse};
pub use locks::KeyedLocks;
pub use password::PasswordHasher;
pub use state::AuthState;
pub use tokens::TokenIssuer;
