//! Protobuf messages shared with the identification service.
//!
//! Tag numbers are part of the contract; never renumber.

use crate::discovery::DiscoveryEvent;
use crate::models;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum MediaType {
    Tv = 0,
    Movie = 1,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum SourceType {
    Torrent = 0,
    Http = 1,
    File = 2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum MetadataType {
    None = 0,
    Tvdb = 1,
    Tmdb = 2,
    Imdb = 3,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Media {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(int32, tag = "3")]
    pub creator: i32,
    #[prost(string, tag = "4")]
    pub creator_id: String,
    #[prost(enumeration = "MediaType", tag = "5")]
    pub r#type: i32,
    #[prost(enumeration = "SourceType", tag = "6")]
    pub source: i32,
    #[prost(string, tag = "7")]
    pub source_uri: String,
    #[prost(enumeration = "MetadataType", tag = "8")]
    pub metadata: i32,
    #[prost(string, tag = "9")]
    pub metadata_id: String,
    #[prost(int32, tag = "10")]
    pub status: i32,
}

/// `v1.identify.newfile` payload.
#[derive(Clone, PartialEq, prost::Message)]
pub struct IdentifyNewFile {
    /// RFC 3339 timestamp.
    #[prost(string, tag = "1")]
    pub created_at: String,
    #[prost(message, optional, tag = "2")]
    pub media: Option<Media>,
    #[prost(string, tag = "3")]
    pub key: String,
    #[prost(int64, tag = "4")]
    pub episode: i64,
    #[prost(int64, tag = "5")]
    pub season: i64,
}

impl From<models::MediaKind> for MediaType {
    fn from(kind: models::MediaKind) -> Self {
        match kind {
            models::MediaKind::Tv => MediaType::Tv,
            models::MediaKind::Movie => MediaType::Movie,
        }
    }
}

impl From<&DiscoveryEvent> for IdentifyNewFile {
    fn from(event: &DiscoveryEvent) -> Self {
        IdentifyNewFile {
            created_at: event.created_at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            media: Some(Media {
                id: event.media_id.clone(),
                r#type: MediaType::from(event.media_kind) as i32,
                ..Default::default()
            }),
            key: event.object_key.clone(),
            episode: event.episode,
            season: event.season,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use prost::Message;

    #[test]
    fn test_wire_ordinals_match_catalog_ordinals() {
        assert_eq!(MediaType::Movie as i32, models::MediaKind::Movie.ordinal());
        assert_eq!(MediaType::Tv as i32, models::MediaKind::Tv.ordinal());
        assert_eq!(SourceType::Http as i32, models::SourceType::Http.ordinal());
        assert_eq!(MetadataType::Imdb as i32, models::MetadataProvider::Imdb.ordinal());
    }

    #[test]
    fn test_event_to_message() {
        let event = DiscoveryEvent {
            media_id: "media-1".to_string(),
            media_kind: models::MediaKind::Movie,
            object_key: "movies/Some Film/Some Film.mkv".to_string(),
            season: 0,
            episode: 0,
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap(),
        };

        let message = IdentifyNewFile::from(&event);
        assert_eq!(message.created_at, "2024-03-01T12:30:00Z");
        assert_eq!(message.media.as_ref().unwrap().id, "media-1");
        assert_eq!(message.media.as_ref().unwrap().r#type, MediaType::Movie as i32);
        assert_eq!(message.key, "movies/Some Film/Some Film.mkv");
    }

    #[test]
    fn test_field_numbers_on_the_wire() {
        let message = IdentifyNewFile {
            created_at: "t".to_string(),
            media: None,
            key: "k".to_string(),
            episode: 5,
            season: 2,
        };
        // field 1 "t", field 3 "k", field 4 varint 5, field 5 varint 2
        assert_eq!(
            message.encode_to_vec(),
            vec![0x0a, 0x01, b't', 0x1a, 0x01, b'k', 0x20, 0x05, 0x28, 0x02]
        );
    }
}
