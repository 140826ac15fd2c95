//! Object storage listing.
//!
//! The scanner only ever needs one thing from storage: the keys under a
//! prefix, in listing order. Listings are streams so a caller can stop early.

mod local;
#[cfg(feature = "s3")]
mod s3;

use futures::stream::BoxStream;
use thiserror::Error;

pub use local::LocalObjectStore;
#[cfg(feature = "s3")]
pub use s3::S3ObjectStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(String),
    #[error("listing failed: {0}")]
    Listing(String),
    #[error("invalid storage configuration: {0}")]
    Config(String),
}

/// A hierarchical key listing service.
pub trait ObjectStore: Send + Sync {
    /// Stream every key at or below `prefix`, recursively.
    fn list<'a>(&'a self, prefix: &'a str) -> BoxStream<'a, Result<String, StorageError>>;
}
