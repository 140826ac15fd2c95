//! Filesystem-backed object store.
//!
//! Keys are paths relative to the root directory, `/`-separated, so a media
//! library mounted or synced locally lists the same way the bucket does.

use std::path::{Path, PathBuf};

use futures::stream::{self, BoxStream, StreamExt};
use tokio::sync::mpsc;
use tracing::debug;
use walkdir::WalkDir;

use super::{ObjectStore, StorageError};

/// Keys buffered ahead of the consumer.
const LISTING_BUFFER: usize = 64;

#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ObjectStore for LocalObjectStore {
    /// The directory walk runs on the blocking pool. Dropping the stream
    /// closes the channel, which ends the walk at the next file.
    fn list<'a>(&'a self, prefix: &'a str) -> BoxStream<'a, Result<String, StorageError>> {
        let (tx, rx) = mpsc::channel(LISTING_BUFFER);
        let root = self.root.clone();
        let start = root.join(prefix.trim_start_matches('/'));

        tokio::task::spawn_blocking(move || walk(&root, &start, &tx));

        stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|item| (item, rx))
        })
        .boxed()
    }
}

/// Send every file below `start`, sorted by file name at each level.
fn walk(root: &Path, start: &Path, tx: &mpsc::Sender<Result<String, StorageError>>) {
    if !start.exists() {
        return;
    }

    for entry in WalkDir::new(start).follow_links(true).sort_by_file_name() {
        let item = match entry {
            Ok(entry) if entry.file_type().is_file() => key_for(root, entry.path()),
            Ok(_) => continue,
            Err(e) => Err(StorageError::Io(e.to_string())),
        };

        if tx.blocking_send(item).is_err() {
            debug!("listing of '{}' abandoned by reader", start.display());
            return;
        }
    }
}

fn key_for(root: &Path, path: &Path) -> Result<String, StorageError> {
    let relative = path
        .strip_prefix(root)
        .map_err(|e| StorageError::Io(format!("{}: {}", path.display(), e)))?;

    Ok(relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/"))
}
