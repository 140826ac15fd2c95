//! Media catalog repository.
//!
//! The table is keyed by `id`; `creator_id` (the board card id) is the
//! natural key used for dedup, backed by a plain index.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::models::{MediaRow, NewMediaRow};
use super::pool::{with_conn, DbError, DbPool};
use crate::models::{CatalogRecord, MetadataProvider};
use crate::schema::media;

#[derive(Clone)]
pub struct MediaRepository {
    pool: DbPool,
}

impl MediaRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a record by its internal id.
    pub async fn get(&self, id: &str) -> Result<Option<CatalogRecord>, DbError> {
        let row = with_conn!(self.pool, conn => {
            Ok::<_, DbError>(
                media::table
                    .find(id)
                    .first::<MediaRow>(&mut conn)
                    .await
                    .optional()?,
            )
        })?;
        row.map(CatalogRecord::try_from).transpose()
    }

    /// All records created from the given card, lowest internal id first.
    pub async fn find_by_creator_id(&self, creator_id: &str) -> Result<Vec<CatalogRecord>, DbError> {
        let rows = with_conn!(self.pool, conn => {
            Ok::<_, DbError>(
                media::table
                    .filter(media::creator_id.eq(creator_id))
                    .order(media::id.asc())
                    .load::<MediaRow>(&mut conn)
                    .await?,
            )
        })?;
        rows.into_iter().map(CatalogRecord::try_from).collect()
    }

    pub async fn count_by_creator_id(&self, creator_id: &str) -> Result<i64, DbError> {
        use diesel::dsl::count_star;

        with_conn!(self.pool, conn => {
            Ok(media::table
                .filter(media::creator_id.eq(creator_id))
                .select(count_star())
                .first::<i64>(&mut conn)
                .await?)
        })
    }

    pub async fn insert(&self, record: &CatalogRecord) -> Result<(), DbError> {
        let row = NewMediaRow::from(record);

        with_conn!(self.pool, conn => {
            diesel::insert_into(media::table)
                .values(&row)
                .execute(&mut conn)
                .await?;
            Ok(())
        })
    }

    /// Refresh the metadata provider and id, leaving every other column alone.
    ///
    /// Returns whether a row was updated.
    pub async fn update_metadata(
        &self,
        id: &str,
        provider: MetadataProvider,
        metadata_id: &str,
    ) -> Result<bool, DbError> {
        with_conn!(self.pool, conn => {
            let rows = diesel::update(media::table.find(id))
                .set((
                    media::metadata_id.eq(metadata_id),
                    media::metadata.eq(provider.ordinal()),
                ))
                .execute(&mut conn)
                .await?;
            Ok(rows > 0)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MediaDescriptor, MediaKind, SourceType, STATUS_PENDING_IDENTIFICATION};
    use crate::repository::DbContext;
    use tempfile::tempdir;

    async fn setup_test_db() -> (MediaRepository, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let ctx = DbContext::new(&dir.path().join("test.db"));
        ctx.init_schema().await.unwrap();
        (ctx.media(), dir)
    }

    fn record(id: &str, creator_id: &str) -> CatalogRecord {
        let descriptor = MediaDescriptor {
            name: "Example Show".to_string(),
            media_kind: MediaKind::Tv,
            metadata_provider: MetadataProvider::Tvdb,
            metadata_id: "12345".to_string(),
            source_type: SourceType::Torrent,
            source_uri: "magnet:?xt=urn:btih:deadbeef".to_string(),
        };
        CatalogRecord::from_descriptor(id.to_string(), creator_id, &descriptor)
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let (repo, _dir) = setup_test_db().await;
        let rec = record("m-1", "card-1");

        repo.insert(&rec).await.unwrap();

        let fetched = repo.get("m-1").await.unwrap().unwrap();
        assert_eq!(fetched, rec);
        assert_eq!(fetched.status, STATUS_PENDING_IDENTIFICATION);
        assert!(repo.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_creator_id_orders_by_id() {
        let (repo, _dir) = setup_test_db().await;
        repo.insert(&record("m-b", "card-1")).await.unwrap();
        repo.insert(&record("m-a", "card-1")).await.unwrap();
        repo.insert(&record("m-c", "card-2")).await.unwrap();

        let found = repo.find_by_creator_id("card-1").await.unwrap();
        let ids: Vec<_> = found.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["m-a", "m-b"]);
        assert_eq!(repo.count_by_creator_id("card-2").await.unwrap(), 1);
        assert_eq!(repo.count_by_creator_id("card-3").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_metadata_leaves_other_columns() {
        let (repo, _dir) = setup_test_db().await;
        let rec = record("m-1", "card-1");
        repo.insert(&rec).await.unwrap();

        let updated = repo
            .update_metadata("m-1", MetadataProvider::Imdb, "tt0903747")
            .await
            .unwrap();
        assert!(updated);

        let fetched = repo.get("m-1").await.unwrap().unwrap();
        assert_eq!(fetched.metadata_provider, MetadataProvider::Imdb);
        assert_eq!(fetched.metadata_id, "tt0903747");
        assert_eq!(fetched.source_uri, rec.source_uri);
        assert_eq!(fetched.status, rec.status);
        assert_eq!(fetched.name, rec.name);

        assert!(!repo
            .update_metadata("missing", MetadataProvider::Imdb, "x")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_unknown_ordinal_is_an_error() {
        let (repo, dir) = setup_test_db().await;
        repo.insert(&record("m-1", "card-1")).await.unwrap();

        let path = dir.path().join("test.db").display().to_string();
        let mut conn = crate::repository::pool::connect_sqlite(&path).await.unwrap();
        diesel::update(media::table.find("m-1"))
            .set(media::media_type.eq(9))
            .execute(&mut conn)
            .await
            .unwrap();

        match repo.get("m-1").await {
            Err(DbError::InvalidOrdinal { id, column, value }) => {
                assert_eq!((id.as_str(), column, value), ("m-1", "type", 9));
            }
            other => panic!("expected invalid ordinal, got {:?}", other),
        }
        assert!(repo.find_by_creator_id("card-1").await.is_err());
    }
}
