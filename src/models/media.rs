//! Media models shared by the catalog, the scanner and the wire format.

use serde::{Deserialize, Serialize};

/// Catalog status for media that still has to go through identification.
pub const STATUS_PENDING_IDENTIFICATION: i32 = 5;

/// Kind of media a card asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    #[default]
    Tv,
    Movie,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tv => "tv",
            Self::Movie => "movie",
        }
    }

    /// Ordinal used in the catalog and on the wire.
    pub fn ordinal(&self) -> i32 {
        match self {
            Self::Tv => 0,
            Self::Movie => 1,
        }
    }

    pub fn from_ordinal(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Tv),
            1 => Some(Self::Movie),
            _ => None,
        }
    }

    /// Top-level directory this kind lives under in the media bucket.
    ///
    /// Movies live under `movies/`, not `movie/`, to match the existing library layout.
    pub fn library_segment(&self) -> &'static str {
        match self {
            Self::Tv => "tv",
            Self::Movie => "movies",
        }
    }
}

/// External metadata provider a card links to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataProvider {
    #[default]
    None,
    Tvdb,
    Tmdb,
    Imdb,
}

impl MetadataProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Tvdb => "TVDB",
            Self::Tmdb => "TMDB",
            Self::Imdb => "IMDB",
        }
    }

    /// Match an attachment name against the provider tokens. Exact, case-sensitive.
    pub fn from_attachment_name(name: &str) -> Option<Self> {
        match name {
            "TVDB" => Some(Self::Tvdb),
            "TMDB" => Some(Self::Tmdb),
            "IMDB" => Some(Self::Imdb),
            _ => None,
        }
    }

    pub fn ordinal(&self) -> i32 {
        match self {
            Self::None => 0,
            Self::Tvdb => 1,
            Self::Tmdb => 2,
            Self::Imdb => 3,
        }
    }

    pub fn from_ordinal(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::Tvdb),
            2 => Some(Self::Tmdb),
            3 => Some(Self::Imdb),
            _ => None,
        }
    }
}

/// How the media is acquired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Torrent,
    Http,
    File,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Torrent => "TORRENT",
            Self::Http => "HTTP",
            Self::File => "FILE",
        }
    }

    /// Resolve an upper-case source name (`TORRENT`, `HTTP`, `FILE`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "TORRENT" => Some(Self::Torrent),
            "HTTP" => Some(Self::Http),
            "FILE" => Some(Self::File),
            _ => None,
        }
    }

    pub fn ordinal(&self) -> i32 {
        match self {
            Self::Torrent => 0,
            Self::Http => 1,
            Self::File => 2,
        }
    }

    pub fn from_ordinal(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Torrent),
            1 => Some(Self::Http),
            2 => Some(Self::File),
            _ => None,
        }
    }
}

/// Who created a catalog record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreatorKind {
    /// Created from a card on the request board.
    ExternalBoard,
}

impl CreatorKind {
    pub fn ordinal(&self) -> i32 {
        match self {
            Self::ExternalBoard => 1,
        }
    }
}

/// Canonical acquisition request parsed from one card.
///
/// Only the parser builds these, and it never hands out one without a
/// provider, a provider id and a known source type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaDescriptor {
    /// Display title, taken from the card name.
    pub name: String,
    pub media_kind: MediaKind,
    pub metadata_provider: MetadataProvider,
    pub metadata_id: String,
    pub source_type: SourceType,
    pub source_uri: String,
}

/// A row of the `media` catalog table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRecord {
    pub id: String,
    pub name: String,
    pub creator_kind: i32,
    pub creator_id: String,
    pub media_kind: MediaKind,
    pub source_type: SourceType,
    pub source_uri: String,
    pub metadata_provider: MetadataProvider,
    pub metadata_id: String,
    pub status: i32,
}

impl CatalogRecord {
    /// Build a fresh record for a card seen for the first time.
    pub fn from_descriptor(id: String, creator_id: &str, descriptor: &MediaDescriptor) -> Self {
        Self {
            id,
            name: descriptor.name.clone(),
            creator_kind: CreatorKind::ExternalBoard.ordinal(),
            creator_id: creator_id.to_string(),
            media_kind: descriptor.media_kind,
            source_type: descriptor.source_type,
            source_uri: descriptor.source_uri.clone(),
            metadata_provider: descriptor.metadata_provider,
            metadata_id: descriptor.metadata_id.clone(),
            status: STATUS_PENDING_IDENTIFICATION,
        }
    }
}
