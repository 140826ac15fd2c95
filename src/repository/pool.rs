//! Catalog connections.
//!
//! SQLite opens a connection per operation, which is all a one-table
//! catalog touched a few times per card needs. PostgreSQL goes through a
//! small deadpool and needs the `postgres` feature.

use std::path::Path;

use diesel::sqlite::SqliteConnection;
use diesel_async::sync_connection_wrapper::SyncConnectionWrapper;
use diesel_async::AsyncConnection;
use thiserror::Error;

#[cfg(feature = "postgres")]
use diesel_async::pooled_connection::deadpool::Pool as DeadPool;
#[cfg(feature = "postgres")]
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
#[cfg(feature = "postgres")]
use diesel_async::AsyncPgConnection;

#[cfg(feature = "postgres")]
const PG_POOL_SIZE: usize = 4;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("catalog query failed: {0}")]
    Query(#[from] diesel::result::Error),
    #[error("failed to connect to catalog: {0}")]
    Connect(String),
    /// A stored enum column holds a value this build does not know.
    #[error("media row '{id}' has unknown {column} value {value}")]
    InvalidOrdinal {
        id: String,
        column: &'static str,
        value: i32,
    },
}

pub type SqliteConn = SyncConnectionWrapper<SqliteConnection>;

#[cfg(feature = "postgres")]
pub type PgConn = deadpool::managed::Object<AsyncDieselConnectionManager<AsyncPgConnection>>;

/// Where the catalog lives.
#[derive(Clone)]
pub enum DbPool {
    /// Path of the SQLite database file.
    Sqlite(String),
    #[cfg(feature = "postgres")]
    Postgres(DeadPool<AsyncPgConnection>),
}

impl DbPool {
    /// `postgres://` and `postgresql://` URLs select PostgreSQL. Anything else
    /// is a SQLite path, with or without a `sqlite:` prefix.
    pub fn from_url(url: &str) -> Result<Self, DbError> {
        if !(url.starts_with("postgres://") || url.starts_with("postgresql://")) {
            let path = url.strip_prefix("sqlite:").unwrap_or(url);
            return Ok(DbPool::Sqlite(path.to_string()));
        }

        #[cfg(feature = "postgres")]
        {
            let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(url);
            let pool = DeadPool::builder(manager)
                .max_size(PG_POOL_SIZE)
                .build()
                .map_err(|e| DbError::Connect(e.to_string()))?;
            Ok(DbPool::Postgres(pool))
        }

        #[cfg(not(feature = "postgres"))]
        {
            Err(DbError::Connect(
                "PostgreSQL URL given but boardsync was built without the `postgres` feature"
                    .to_string(),
            ))
        }
    }

    pub fn sqlite(path: &Path) -> Self {
        DbPool::Sqlite(path.display().to_string())
    }
}

pub(crate) async fn connect_sqlite(path: &str) -> Result<SqliteConn, DbError> {
    SqliteConn::establish(path)
        .await
        .map_err(|e| DbError::Connect(format!("{}: {}", path, e)))
}

#[cfg(feature = "postgres")]
pub(crate) async fn connect_postgres(pool: &DeadPool<AsyncPgConnection>) -> Result<PgConn, DbError> {
    pool.get().await.map_err(|e| DbError::Connect(e.to_string()))
}

/// Run `$body` with `$conn` bound to a connection for whichever backend the
/// pool points at. The body evaluates to `Result<_, DbError>`.
macro_rules! with_conn {
    ($pool:expr, $conn:ident => $body:expr) => {{
        match &$pool {
            $crate::repository::pool::DbPool::Sqlite(path) => {
                let mut $conn = $crate::repository::pool::connect_sqlite(path).await?;
                $body
            }
            #[cfg(feature = "postgres")]
            $crate::repository::pool::DbPool::Postgres(pool) => {
                let mut $conn = $crate::repository::pool::connect_postgres(pool).await?;
                $body
            }
        }
    }};
}

pub(crate) use with_conn;
