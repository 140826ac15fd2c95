//! Card parsing: turns a board card into a [`MediaDescriptor`].
//!
//! Everything here is pure. The pattern contracts are:
//!
//! - Source link: `\[([0-9A-Za-z_]+)\]\((.+)\)` over the description. Group 1
//!   (the link label, ASCII word characters only) is ignored, group 2 is the
//!   raw source URI. The match is greedy.
//! - Provider id: the attachment URL split on `/`, segment index 4
//!   (`https://thetvdb.com/series/12345/...` yields `12345`).

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use url::Url;

use crate::models::{Attachment, Card, Label, MediaDescriptor, MediaKind, MetadataProvider, SourceType};

/// Cards whose name contains this token are season sub-cards of a show card.
pub const SEASON_TOKEN: &str = "Season";

/// Label that switches a card to a movie.
pub const MOVIE_LABEL: &str = "Movie";

static SOURCE_LINK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([0-9A-Za-z_]+)\]\((.+)\)").unwrap());

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// Season sub-card, intentionally ignored.
    #[error("redundant season card")]
    SkippedRedundant,
    #[error("malformed card: {0}")]
    MalformedDescription(String),
    #[error("unknown source scheme '{0}'")]
    UnknownSourceScheme(String),
}

impl ParseError {
    /// Whether this is an intentional skip rather than a bad card.
    pub fn is_redundant(&self) -> bool {
        matches!(self, Self::SkippedRedundant)
    }
}

/// Parse a whole card.
pub fn parse_card(card: &Card) -> Result<MediaDescriptor, ParseError> {
    parse(&card.name, &card.desc, &card.attachments, &card.labels)
}

/// Parse card fields into a descriptor.
///
/// Attachments must be given in board order: when several attachments name a
/// provider, the last one scanned decides the provider and id.
pub fn parse(
    name: &str,
    description: &str,
    attachments: &[Attachment],
    labels: &[Label],
) -> Result<MediaDescriptor, ParseError> {
    if name.contains(SEASON_TOKEN) {
        return Err(ParseError::SkippedRedundant);
    }

    let (metadata_provider, metadata_id) = scan_attachments(attachments);
    let media_kind = media_kind_from_labels(labels);

    let source_uri = extract_source_uri(description).ok_or_else(|| {
        ParseError::MalformedDescription("description has no [label](uri) source link".to_string())
    })?;
    let source_type = resolve_source_type(source_uri)?;

    if metadata_provider == MetadataProvider::None || metadata_id.is_empty() {
        return Err(ParseError::MalformedDescription(
            "no TVDB/TMDB/IMDB attachment with a usable id".to_string(),
        ));
    }

    Ok(MediaDescriptor {
        name: name.to_string(),
        media_kind,
        metadata_provider,
        metadata_id,
        source_type,
        source_uri: source_uri.to_string(),
    })
}

/// Find the metadata provider and id among the attachments.
fn scan_attachments(attachments: &[Attachment]) -> (MetadataProvider, String) {
    let mut provider = MetadataProvider::None;
    let mut id = String::new();

    for attachment in attachments {
        tracing::debug!("scanning attachment '{}'", attachment.name);
        if let Some(matched) = MetadataProvider::from_attachment_name(&attachment.name) {
            provider = matched;
            id = extract_metadata_id(&attachment.url).unwrap_or_default().to_string();
        }
    }

    (provider, id)
}

/// Pull the provider id out of an attachment URL (segment index 4 when split on `/`).
pub fn extract_metadata_id(url: &str) -> Option<&str> {
    url.split('/').nth(4)
}

/// `Movie` label wins, anything else is TV.
pub fn media_kind_from_labels(labels: &[Label]) -> MediaKind {
    if labels.iter().any(|l| l.name == MOVIE_LABEL) {
        MediaKind::Movie
    } else {
        MediaKind::Tv
    }
}

/// Extract the raw source URI from a `[label](uri)` link in the description.
pub fn extract_source_uri(description: &str) -> Option<&str> {
    SOURCE_LINK_PATTERN
        .captures(description)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str())
}

/// Map a source URI's scheme onto a [`SourceType`].
///
/// `magnet` is read as `torrent` and `https` as `http` before the
/// upper-cased scheme is looked up.
pub fn resolve_source_type(source_uri: &str) -> Result<SourceType, ParseError> {
    let url = Url::parse(source_uri).map_err(|e| {
        ParseError::MalformedDescription(format!("invalid source uri '{}': {}", source_uri, e))
    })?;

    let scheme = normalize_scheme(url.scheme());
    SourceType::from_name(&scheme.to_ascii_uppercase())
        .ok_or_else(|| ParseError::UnknownSourceScheme(scheme.to_string()))
}

fn normalize_scheme(scheme: &str) -> &str {
    match scheme {
        "magnet" => "torrent",
        "https" => "http",
        other => other,
    }
}
