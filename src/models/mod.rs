//! Data models for boardsync.

mod card;
mod media;

pub use card::{Attachment, Card, CardList, Label};
pub use media::{
    CatalogRecord, CreatorKind, MediaDescriptor, MediaKind, MetadataProvider, SourceType,
    STATUS_PENDING_IDENTIFICATION,
};
