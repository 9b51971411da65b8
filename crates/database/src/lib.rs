use std::{
    error::Error,
    fmt,
    path::{Path, PathBuf},
    time::Duration,
};

use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions,
};

pub mod data_model;
pub mod import;
pub mod queries;

/// Connection pool policy for file-backed stores.
const FILE_MAX_CONNECTIONS: u32 = 25;
const FILE_IDLE_CONNECTIONS: u32 = 5;
const FILE_CONNECTION_MAX_AGE: Duration = Duration::from_secs(5 * 60);

#[derive(Debug)]
pub enum StoreError {
    NotFound,
    Cancelled,
    Other(Box<dyn Error + Send + Sync>),
}

impl StoreError {
    pub fn other<E: Error + Send + Sync + 'static>(why: E) -> Self {
        Self::Other(Box::new(why))
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "entity not found"),
            Self::Cancelled => write!(f, "store operation cancelled"),
            Self::Other(why) => write!(f, "store error: {}", why),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Other(why) => Some(why.as_ref()),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(why: sqlx::Error) -> Self {
        match why {
            sqlx::Error::RowNotFound => Self::NotFound,
            _ => Self::Other(Box::new(why)),
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Where a store keeps its data. `:memory:` stores are ephemeral and private
/// to their single connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    File(PathBuf),
    Memory,
}

impl StoreLocation {
    pub fn from_path<P: AsRef<str>>(path: P) -> Self {
        match path.as_ref() {
            ":memory:" => Self::Memory,
            other => Self::File(PathBuf::from(other)),
        }
    }

    pub fn is_ephemeral(&self) -> bool {
        matches!(self, Self::Memory)
    }

    pub fn as_file_path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            Self::Memory => None,
        }
    }
}

/// The static schedule store: a single SQLite file (or an ephemeral
/// in-memory database for tests) behind a connection pool.
///
/// Read queries live in [`queries`]; the write side is private to the
/// importer ([`import`]). Entities are only ever mutated by a full
/// clear-and-reimport cycle.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
    location: StoreLocation,
}

impl SqliteStore {
    /// Opens (creating if missing) the store at `location`, applies session
    /// tuning pragmas, and runs schema migrations idempotently.
    pub async fn open(location: StoreLocation) -> Result<Self> {
        let pool = match &location {
            StoreLocation::File(path) => {
                let options = SqliteConnectOptions::new()
                    .filename(path)
                    .create_if_missing(true)
                    .journal_mode(SqliteJournalMode::Wal)
                    .foreign_keys(true)
                    // 64MB page cache, temp structures in memory.
                    .pragma("cache_size", "-65536")
                    .pragma("temp_store", "MEMORY");
                SqlitePoolOptions::new()
                    .max_connections(FILE_MAX_CONNECTIONS)
                    .min_connections(FILE_IDLE_CONNECTIONS)
                    .max_lifetime(FILE_CONNECTION_MAX_AGE)
                    .connect_with(options)
                    .await?
            }
            StoreLocation::Memory => {
                let options = SqliteConnectOptions::new()
                    .filename(":memory:")
                    .foreign_keys(true)
                    .pragma("cache_size", "-65536")
                    .pragma("temp_store", "MEMORY");
                // Each connection to an ephemeral store sees its own data,
                // so the pool must never grow beyond a single connection.
                SqlitePoolOptions::new()
                    .max_connections(1)
                    .min_connections(1)
                    .idle_timeout(None)
                    .max_lifetime(None)
                    .connect_with(options)
                    .await?
            }
        };

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(StoreError::other)?;

        Ok(Self { pool, location })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    /// Closes every pooled connection and releases file handles. Required
    /// before the store file may be renamed or deleted.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn open_memory_store_runs_migrations() {
        let store = SqliteStore::open(StoreLocation::Memory).await.unwrap();
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM agencies")
                .fetch_one(store.pool())
                .await
                .unwrap();
        assert_eq!(count.0, 0);
        store.close().await;
    }

    #[tokio::test]
    async fn migrations_are_idempotent_per_store_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transit.db");
        let location = StoreLocation::from_path(path.to_str().unwrap());

        let store = SqliteStore::open(location.clone()).await.unwrap();
        store.close().await;
        // A second open re-runs the migrator against the recorded history.
        let store = SqliteStore::open(location).await.unwrap();
        store.close().await;
    }

    #[test]
    fn location_from_path_recognizes_memory() {
        assert!(StoreLocation::from_path(":memory:").is_ephemeral());
        assert!(!StoreLocation::from_path("/tmp/x.db").is_ephemeral());
    }
}
