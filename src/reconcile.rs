//! Catalog reconciliation: maps a board card onto a stable catalog id.
//!
//! Find-or-create keyed by the card id. A failed lookup, or a matched row
//! that is gone by the time it is updated, falls through to an insert; write
//! failures are reported as [`ReconcileError::PersistenceFailure`].
//! Reads and writes are not wrapped in a transaction, so two concurrent runs
//! can still both insert for one card unless the store enforces uniqueness.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::{CatalogRecord, MediaDescriptor, MetadataProvider};
use crate::repository::{DbError, MediaRepository};

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("catalog write failed: {0}")]
    PersistenceFailure(String),
}

/// Catalog operations the reconciler needs.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Records created from the given card, lowest internal id first.
    async fn find_by_creator_id(&self, creator_id: &str) -> Result<Vec<CatalogRecord>, DbError>;

    async fn insert(&self, record: &CatalogRecord) -> Result<(), DbError>;

    async fn update_metadata(
        &self,
        id: &str,
        provider: MetadataProvider,
        metadata_id: &str,
    ) -> Result<bool, DbError>;
}

#[async_trait]
impl CatalogStore for MediaRepository {
    async fn find_by_creator_id(&self, creator_id: &str) -> Result<Vec<CatalogRecord>, DbError> {
        MediaRepository::find_by_creator_id(self, creator_id).await
    }

    async fn insert(&self, record: &CatalogRecord) -> Result<(), DbError> {
        MediaRepository::insert(self, record).await
    }

    async fn update_metadata(
        &self,
        id: &str,
        provider: MetadataProvider,
        metadata_id: &str,
    ) -> Result<bool, DbError> {
        MediaRepository::update_metadata(self, id, provider, metadata_id).await
    }
}

/// Whether reconciliation created a record or refreshed an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled {
    Created,
    Updated,
}

pub struct Reconciler {
    store: Arc<dyn CatalogStore>,
}

impl Reconciler {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Find or create the catalog record for a card and return its internal id.
    pub async fn reconcile(
        &self,
        creator_id: &str,
        descriptor: &MediaDescriptor,
    ) -> Result<String, ReconcileError> {
        self.reconcile_detailed(creator_id, descriptor)
            .await
            .map(|(id, _)| id)
    }

    /// Like [`Reconciler::reconcile`], also reporting which path was taken.
    pub async fn reconcile_detailed(
        &self,
        creator_id: &str,
        descriptor: &MediaDescriptor,
    ) -> Result<(String, Reconciled), ReconcileError> {
        let existing = match self.store.find_by_creator_id(creator_id).await {
            Ok(records) => records.into_iter().next(),
            Err(e) => {
                warn!("failed to search for existing row: {}", e);
                None
            }
        };

        if let Some(record) = existing {
            info!(
                "updating existing database entry for media '{}' (id: {})",
                descriptor.name, record.id
            );
            let updated = self
                .store
                .update_metadata(
                    &record.id,
                    descriptor.metadata_provider,
                    &descriptor.metadata_id,
                )
                .await
                .map_err(|e| ReconcileError::PersistenceFailure(e.to_string()))?;
            if updated {
                return Ok((record.id, Reconciled::Updated));
            }
            warn!("entry {} disappeared before it could be updated", record.id);
        }

        let id = uuid::Uuid::new_v4().to_string();
        info!("creating database entry for media '{}'", descriptor.name);
        let record = CatalogRecord::from_descriptor(id, creator_id, descriptor);
        self.store
            .insert(&record)
            .await
            .map_err(|e| ReconcileError::PersistenceFailure(e.to_string()))?;

        Ok((record.id, Reconciled::Created))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MediaKind, SourceType, STATUS_PENDING_IDENTIFICATION};
    use crate::repository::DbContext;
    use std::sync::Mutex;
    use tempfile::tempdir;

    fn descriptor() -> MediaDescriptor {
        MediaDescriptor {
            name: "Example Show".to_string(),
            media_kind: MediaKind::Tv,
            metadata_provider: MetadataProvider::Tvdb,
            metadata_id: "12345".to_string(),
            source_type: SourceType::Torrent,
            source_uri: "magnet:?xt=urn:btih:deadbeef".to_string(),
        }
    }

    async fn setup() -> (Reconciler, MediaRepository, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let ctx = DbContext::new(&dir.path().join("test.db"));
        ctx.init_schema().await.unwrap();
        let repo = ctx.media();
        (Reconciler::new(Arc::new(repo.clone())), repo, dir)
    }

    #[tokio::test]
    async fn test_reconcile_is_idempotent() {
        let (reconciler, repo, _dir) = setup().await;

        let (first, how) = reconciler
            .reconcile_detailed("card-1", &descriptor())
            .await
            .unwrap();
        assert_eq!(how, Reconciled::Created);

        let (second, how) = reconciler
            .reconcile_detailed("card-1", &descriptor())
            .await
            .unwrap();
        assert_eq!(how, Reconciled::Updated);

        assert_eq!(first, second);
        assert_eq!(repo.count_by_creator_id("card-1").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_distinct_cards_get_distinct_ids() {
        let (reconciler, _repo, _dir) = setup().await;

        let a = reconciler.reconcile("card-1", &descriptor()).await.unwrap();
        let b = reconciler.reconcile("card-2", &descriptor()).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_new_record_fields() {
        let (reconciler, repo, _dir) = setup().await;

        let id = reconciler.reconcile("card-1", &descriptor()).await.unwrap();
        let record = repo.get(&id).await.unwrap().unwrap();

        assert_eq!(record.creator_id, "card-1");
        assert_eq!(record.creator_kind, 1);
        assert_eq!(record.status, STATUS_PENDING_IDENTIFICATION);
        assert_eq!(record.source_uri, "magnet:?xt=urn:btih:deadbeef");
        assert!(uuid::Uuid::parse_str(&record.id).is_ok());
    }

    #[tokio::test]
    async fn test_rerun_only_refreshes_metadata() {
        let (reconciler, repo, _dir) = setup().await;
        let id = reconciler.reconcile("card-1", &descriptor()).await.unwrap();

        let mut changed = descriptor();
        changed.metadata_provider = MetadataProvider::Imdb;
        changed.metadata_id = "tt0903747".to_string();
        changed.source_uri = "https://example.com/other".to_string();
        changed.source_type = SourceType::Http;

        let again = reconciler.reconcile("card-1", &changed).await.unwrap();
        assert_eq!(again, id);

        let record = repo.get(&id).await.unwrap().unwrap();
        assert_eq!(record.metadata_provider, MetadataProvider::Imdb);
        assert_eq!(record.metadata_id, "tt0903747");
        assert_eq!(record.source_uri, "magnet:?xt=urn:btih:deadbeef");
        assert_eq!(record.source_type, SourceType::Torrent);
        assert_eq!(record.status, STATUS_PENDING_IDENTIFICATION);
    }

    #[tokio::test]
    async fn test_duplicate_rows_pick_lowest_id() {
        let (reconciler, repo, _dir) = setup().await;
        for id in ["b-id", "a-id"] {
            repo.insert(&CatalogRecord::from_descriptor(
                id.to_string(),
                "card-1",
                &descriptor(),
            ))
            .await
            .unwrap();
        }

        let id = reconciler.reconcile("card-1", &descriptor()).await.unwrap();
        assert_eq!(id, "a-id");
    }

    /// Store whose reads always fail and whose writes are recorded.
    #[derive(Default)]
    struct FlakyReadStore {
        inserted: Mutex<Vec<CatalogRecord>>,
        fail_writes: bool,
    }

    #[async_trait]
    impl CatalogStore for FlakyReadStore {
        async fn find_by_creator_id(&self, _: &str) -> Result<Vec<CatalogRecord>, DbError> {
            Err(DbError::Connect("connection reset".to_string()))
        }

        async fn insert(&self, record: &CatalogRecord) -> Result<(), DbError> {
            if self.fail_writes {
                return Err(DbError::Connect("disk full".to_string()));
            }
            self.inserted.lock().unwrap().push(record.clone());
            Ok(())
        }

        async fn update_metadata(
            &self,
            _: &str,
            _: MetadataProvider,
            _: &str,
        ) -> Result<bool, DbError> {
            Ok(true)
        }
    }

    #[tokio::test]
    async fn test_read_failure_falls_through_to_insert() {
        let store = Arc::new(FlakyReadStore::default());
        let reconciler = Reconciler::new(store.clone());

        let id = reconciler.reconcile("card-1", &descriptor()).await.unwrap();

        let inserted = store.inserted.lock().unwrap();
        assert_eq!(inserted.len(), 1);
        assert_eq!(inserted[0].id, id);
    }

    #[tokio::test]
    async fn test_write_failure_is_persistence_failure() {
        let store = Arc::new(FlakyReadStore {
            fail_writes: true,
            ..Default::default()
        });
        let reconciler = Reconciler::new(store);

        let err = reconciler
            .reconcile("card-1", &descriptor())
            .await
            .unwrap_err();
        assert!(matches!(err, ReconcileError::PersistenceFailure(_)));
    }

    /// Store that finds a stale row whose update then matches nothing.
    #[derive(Default)]
    struct VanishingRowStore {
        inserted: Mutex<Vec<CatalogRecord>>,
    }

    #[async_trait]
    impl CatalogStore for VanishingRowStore {
        async fn find_by_creator_id(&self, creator_id: &str) -> Result<Vec<CatalogRecord>, DbError> {
            Ok(vec![CatalogRecord::from_descriptor(
                "stale-id".to_string(),
                creator_id,
                &descriptor(),
            )])
        }

        async fn insert(&self, record: &CatalogRecord) -> Result<(), DbError> {
            self.inserted.lock().unwrap().push(record.clone());
            Ok(())
        }

        async fn update_metadata(
            &self,
            _: &str,
            _: MetadataProvider,
            _: &str,
        ) -> Result<bool, DbError> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn test_vanished_row_is_recreated() {
        let store = Arc::new(VanishingRowStore::default());
        let reconciler = Reconciler::new(store.clone());

        let (id, how) = reconciler
            .reconcile_detailed("card-1", &descriptor())
            .await
            .unwrap();

        assert_eq!(how, Reconciled::Created);
        assert_ne!(id, "stale-id");
        let inserted = store.inserted.lock().unwrap();
        assert_eq!(inserted.len(), 1);
        assert_eq!(inserted[0].id, id);
        assert_eq!(inserted[0].creator_id, "card-1");
    }
}
