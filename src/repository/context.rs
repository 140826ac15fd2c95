//! Catalog bootstrap and repository access.

use std::path::Path;

use diesel_async::RunQueryDsl;

use super::media::MediaRepository;
use super::pool::{with_conn, DbError, DbPool};

/// Catalog DDL. Valid on both backends, one statement per entry.
const SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS media (
        id TEXT PRIMARY KEY,
        media_name TEXT NOT NULL,
        creator INTEGER NOT NULL,
        creator_id TEXT NOT NULL,
        type INTEGER NOT NULL,
        source INTEGER NOT NULL,
        source_uri TEXT NOT NULL,
        metadata_id TEXT NOT NULL,
        metadata INTEGER NOT NULL,
        status INTEGER NOT NULL
    )"#,
    "CREATE INDEX IF NOT EXISTS idx_media_creator_id ON media(creator_id)",
];

/// Owns the catalog connection settings and hands out repositories.
///
/// # Example
/// ```ignore
/// let ctx = DbContext::from_url("postgres://postgres@127.0.0.1/media")?;
/// let existing = ctx.media().find_by_creator_id(&card.id).await?;
/// ```
#[derive(Clone)]
pub struct DbContext {
    pool: DbPool,
}

impl DbContext {
    /// SQLite catalog at `db_path`.
    pub fn new(db_path: &Path) -> Self {
        Self {
            pool: DbPool::sqlite(db_path),
        }
    }

    /// `sqlite:path`, a bare path, or `postgres://...` (needs the `postgres` feature).
    pub fn from_url(database_url: &str) -> Result<Self, DbError> {
        Ok(Self {
            pool: DbPool::from_url(database_url)?,
        })
    }

    pub fn media(&self) -> MediaRepository {
        MediaRepository::new(self.pool.clone())
    }

    /// Create the `media` table and its index if they don't exist.
    pub async fn init_schema(&self) -> Result<(), DbError> {
        with_conn!(self.pool, conn => {
            for statement in SCHEMA {
                diesel::sql_query(*statement).execute(&mut conn).await?;
            }
            Ok(())
        })
    }

    /// Names of the user tables in the catalog database.
    pub async fn list_tables(&self) -> Result<Vec<String>, DbError> {
        let query = match &self.pool {
            DbPool::Sqlite(_) => {
                "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name"
            }
            #[cfg(feature = "postgres")]
            DbPool::Postgres(_) => {
                "SELECT tablename AS name FROM pg_tables WHERE schemaname = 'public' ORDER BY tablename"
            }
        };

        with_conn!(self.pool, conn => {
            let rows: Vec<TableName> = diesel::sql_query(query).load(&mut conn).await?;
            Ok(rows.into_iter().map(|r| r.name).collect())
        })
    }
}

#[derive(diesel::QueryableByName)]
struct TableName {
    #[diesel(sql_type = diesel::sql_types::Text)]
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_init_schema_is_repeatable() {
        let dir = tempdir().unwrap();
        let ctx = DbContext::new(&dir.path().join("test.db"));

        ctx.init_schema().await.unwrap();
        ctx.init_schema().await.unwrap();

        let tables = ctx.list_tables().await.unwrap();
        assert_eq!(tables, vec!["media".to_string()]);

        let found = ctx.media().find_by_creator_id("card-1").await.unwrap();
        assert!(found.is_empty());
    }
}
