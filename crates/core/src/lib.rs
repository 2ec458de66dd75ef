//! Functional core for the lapsus store backend.
//!
//! Pure domain types, validation, the record mapper and the
//! update-expression builder. Everything that talks to the network lives in
//! the `lapsus` and `lapsus_auth` crates.

pub mod auth;
pub mod catalog;
pub mod identity;
pub mod record;
pub mod serde;
pub mod storage;
