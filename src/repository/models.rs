//! Diesel models for the `media` table.

use diesel::prelude::*;

use super::pool::DbError;
use crate::models::{CatalogRecord, MediaKind, MetadataProvider, SourceType};
use crate::schema::media;

/// Media row from the database. Field order follows the table definition.
#[derive(Queryable, Debug, Clone)]
pub struct MediaRow {
    pub id: String,
    pub media_name: String,
    pub creator: i32,
    pub creator_id: String,
    pub media_type: i32,
    pub source: i32,
    pub source_uri: String,
    pub metadata_id: String,
    pub metadata: i32,
    pub status: i32,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = media)]
pub struct NewMediaRow<'a> {
    pub id: &'a str,
    pub media_name: &'a str,
    pub creator: i32,
    pub creator_id: &'a str,
    pub media_type: i32,
    pub source: i32,
    pub source_uri: &'a str,
    pub metadata_id: &'a str,
    pub metadata: i32,
    pub status: i32,
}

impl<'a> From<&'a CatalogRecord> for NewMediaRow<'a> {
    fn from(record: &'a CatalogRecord) -> Self {
        Self {
            id: &record.id,
            media_name: &record.name,
            creator: record.creator_kind,
            creator_id: &record.creator_id,
            media_type: record.media_kind.ordinal(),
            source: record.source_type.ordinal(),
            source_uri: &record.source_uri,
            metadata_id: &record.metadata_id,
            metadata: record.metadata_provider.ordinal(),
            status: record.status,
        }
    }
}

impl TryFrom<MediaRow> for CatalogRecord {
    type Error = DbError;

    fn try_from(row: MediaRow) -> Result<Self, DbError> {
        let invalid = |column: &'static str, value: i32| DbError::InvalidOrdinal {
            id: row.id.clone(),
            column,
            value,
        };

        let media_kind =
            MediaKind::from_ordinal(row.media_type).ok_or_else(|| invalid("type", row.media_type))?;
        let source_type =
            SourceType::from_ordinal(row.source).ok_or_else(|| invalid("source", row.source))?;
        let metadata_provider = MetadataProvider::from_ordinal(row.metadata)
            .ok_or_else(|| invalid("metadata", row.metadata))?;

        Ok(CatalogRecord {
            id: row.id,
            name: row.media_name,
            creator_kind: row.creator,
            creator_id: row.creator_id,
            media_kind,
            source_type,
            source_uri: row.source_uri,
            metadata_provider,
            metadata_id: row.metadata_id,
            status: row.status,
        })
    }
}
