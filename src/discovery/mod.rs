//! File discovery: finds stored media files for a catalog entry.

mod episode;
mod scanner;

use chrono::{DateTime, Utc};

use crate::models::MediaKind;

pub use episode::{is_media_file, library_prefix, parse_episode, MEDIA_FILE_EXTENSION};
pub use scanner::{DiscoveryError, Scanner};

/// A stored file found for a catalog entry. Published, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryEvent {
    pub media_id: String,
    pub media_kind: MediaKind,
    pub object_key: String,
    /// 0 for movies.
    pub season: i64,
    /// 0 for movies.
    pub episode: i64,
    pub created_at: DateTime<Utc>,
}
