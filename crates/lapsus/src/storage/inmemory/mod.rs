//! In-memory storage backend.
//!
//! Stores records in ordered maps wrapped in `Arc<RwLock<_>>`. Used by the
//! default build, by tests, and for local development without AWS.

mod images;
mod repository;

pub use images::InMemoryImageStore;
pub use repository::InMemoryRepository;
