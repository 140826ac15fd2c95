//! Repository layer for the media catalog.
//!
//! All database access uses Diesel ORM. SQLite is always available;
//! PostgreSQL needs the `postgres` feature.

pub mod context;
pub mod media;
pub mod models;
pub mod pool;

pub use context::DbContext;
pub use media::MediaRepository;
pub use pool::{DbError, DbPool};
