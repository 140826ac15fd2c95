//! Scans the media bucket for a title's files.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use futures::StreamExt;
use thiserror::Error;
use tracing::{debug, error, info};

use super::episode::{is_media_file, library_prefix, parse_episode};
use super::DiscoveryEvent;
use crate::models::MediaKind;
use crate::storage::ObjectStore;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscoveryError {
    #[error("failed to find any media files under '{0}'")]
    NoFilesFound(String),
}

pub struct Scanner {
    store: Arc<dyn ObjectStore>,
}

impl Scanner {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Build one event per qualifying file of a title.
    ///
    /// TV keys need an `SxxEyy` token; keys without one (extras) are skipped.
    /// Movies take the first `.mkv` in listing order as season 0, episode 0.
    /// A listing error ends the scan, keeping whatever was found before it.
    pub async fn discover(
        &self,
        kind: MediaKind,
        media_id: &str,
        display_name: &str,
    ) -> Result<Vec<DiscoveryEvent>, DiscoveryError> {
        let prefix = library_prefix(kind, display_name);
        info!(
            "searching for media files for '{}' in '{}'",
            display_name, prefix
        );

        let mut events = Vec::new();
        let mut keys = self.store.list(&prefix);

        while let Some(item) = keys.next().await {
            let key = match item {
                Ok(key) => key,
                Err(e) => {
                    error!("failed to read objects: {}", e);
                    break;
                }
            };

            if !is_media_file(&key) {
                continue;
            }

            let (season, episode) = match kind {
                MediaKind::Movie => (0, 0),
                MediaKind::Tv => match parse_episode(&key) {
                    Some(numbers) => numbers,
                    None => {
                        debug!("skipping '{}': no season/episode marker", key);
                        continue;
                    }
                },
            };

            info!(
                "found season {} episode {} in '{}'",
                season,
                episode,
                base_name(&key)
            );
            events.push(DiscoveryEvent {
                media_id: media_id.to_string(),
                media_kind: kind,
                object_key: key,
                season,
                episode,
                created_at: Utc::now(),
            });

            if kind == MediaKind::Movie {
                break;
            }
        }
        drop(keys);

        if events.is_empty() {
            return Err(DiscoveryError::NoFilesFound(prefix));
        }

        Ok(events)
    }
}

fn base_name(key: &str) -> &str {
    Path::new(key)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{LocalObjectStore, StorageError};
    use futures::stream::{self, BoxStream};
    use tempfile::tempdir;

    fn touch(root: &Path, key: &str) {
        let path = root.join(key);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"").unwrap();
    }

    /// Store that serves a fixed listing, in order.
    struct FixedStore(Vec<Result<String, String>>);

    impl ObjectStore for FixedStore {
        fn list<'a>(&'a self, _prefix: &'a str) -> BoxStream<'a, Result<String, StorageError>> {
            stream::iter(
                self.0
                    .iter()
                    .cloned()
                    .map(|r| r.map_err(StorageError::Listing)),
            )
            .boxed()
        }
    }

    #[tokio::test]
    async fn test_tv_episodes_are_addressed() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "tv/ShowName/Season 2/ShowName - S02E05.mkv");
        touch(dir.path(), "tv/ShowName/Season 2/ShowName - S02E06.mkv");
        touch(dir.path(), "tv/ShowName/Season 2/ShowName - S02E06.srt");
        touch(dir.path(), "tv/ShowName/extras/behind-the-scenes.mkv");

        let scanner = Scanner::new(Arc::new(LocalObjectStore::new(dir.path())));
        let events = scanner
            .discover(MediaKind::Tv, "media-1", "ShowName")
            .await
            .unwrap();

        let addressed: Vec<_> = events
            .iter()
            .map(|e| (e.object_key.as_str(), e.season, e.episode))
            .collect();
        assert_eq!(
            addressed,
            vec![
                ("tv/ShowName/Season 2/ShowName - S02E05.mkv", 2, 5),
                ("tv/ShowName/Season 2/ShowName - S02E06.mkv", 2, 6),
            ]
        );
        assert!(events.iter().all(|e| e.media_id == "media-1"));
        assert!(events.iter().all(|e| e.media_kind == MediaKind::Tv));
    }

    #[tokio::test]
    async fn test_movie_stops_at_first_file() {
        let store = FixedStore(vec![
            Ok("movies/Some Film/poster.jpg".to_string()),
            Ok("movies/Some Film/Some Film (1999).mkv".to_string()),
            Ok("movies/Some Film/Some Film (1999) - Director's Cut.mkv".to_string()),
        ]);
        let scanner = Scanner::new(Arc::new(store));

        let events = scanner
            .discover(MediaKind::Movie, "media-2", "Some Film")
            .await
            .unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].object_key, "movies/Some Film/Some Film (1999).mkv");
        assert_eq!((events[0].season, events[0].episode), (0, 0));
    }

    #[tokio::test]
    async fn test_no_files_found() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "tv/ShowName/extras/behind-the-scenes.mkv");

        let scanner = Scanner::new(Arc::new(LocalObjectStore::new(dir.path())));
        let err = scanner
            .discover(MediaKind::Tv, "media-1", "ShowName")
            .await
            .unwrap_err();
        assert_eq!(err, DiscoveryError::NoFilesFound("tv/ShowName".to_string()));
    }

    #[tokio::test]
    async fn test_listing_error_keeps_earlier_files() {
        let store = FixedStore(vec![
            Ok("tv/ShowName/ShowName - S01E01.mkv".to_string()),
            Err("connection reset".to_string()),
            Ok("tv/ShowName/ShowName - S01E02.mkv".to_string()),
        ]);
        let scanner = Scanner::new(Arc::new(store));

        let events = scanner
            .discover(MediaKind::Tv, "media-1", "ShowName")
            .await
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].episode, 1);
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("tv/Show/Season 1/Show - S01E01.mkv"), "Show - S01E01.mkv");
    }
}
