//! Key conventions of the media bucket.
//!
//! Episode addressing follows `S([0-9]+)E([0-9]+)`, first match anywhere in the
//! key. Only ASCII digits count.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::MediaKind;

/// Container extension of files the identification service accepts.
pub const MEDIA_FILE_EXTENSION: &str = ".mkv";

static EPISODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"S([0-9]+)E([0-9]+)").unwrap());

/// Prefix a title's files live under: `{kind segment}/{display name}`.
pub fn library_prefix(kind: MediaKind, display_name: &str) -> String {
    format!("{}/{}", kind.library_segment().to_lowercase(), display_name)
}

pub fn is_media_file(key: &str) -> bool {
    key.ends_with(MEDIA_FILE_EXTENSION)
}

/// Extract `(season, episode)` from a key.
///
/// Returns `None` when there is no `S<digits>E<digits>` token or either
/// number does not fit an `i64`.
pub fn parse_episode(key: &str) -> Option<(i64, i64)> {
    let caps = EPISODE_PATTERN.captures(key)?;
    let season = caps.get(1)?.as_str().parse().ok()?;
    let episode = caps.get(2)?.as_str().parse().ok()?;
    Some((season, episode))
}
