use sqlx::{Pool, Postgres, Sqlite};
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::SqlitePoolOptions;

use super::errors::StorageError;

const MAX_CONNECTIONS: u32 = 10;

/// Owned handle to the relational store backing user records.
///
/// Opened once at process start and passed into [`UserDb::new`]; closed by
/// dropping (the pool drains on shutdown). There is no process-global pool.
///
/// [`UserDb::new`]: crate::UserDb::new
#[derive(Clone, Debug)]
pub enum DataStore {
    Sqlite(Pool<Sqlite>),
    Postgres(Pool<Postgres>),
}

impl DataStore {
    /// Connect to the database named by `url`, dispatching on the URL scheme
    /// (`sqlite:` or `postgres:`).
    pub async fn connect(url: &str) -> Result<Self, StorageError> {
        if url.starts_with("sqlite") {
            tracing::info!("Connecting to SQLite database");
            // An in-memory SQLite database exists per connection; cap the
            // pool at one so every query sees the same database.
            let is_memory = url.contains(":memory:") || url.contains("mode=memory");
            let pool = SqlitePoolOptions::new()
                .max_connections(if is_memory { 1 } else { MAX_CONNECTIONS })
                .connect(url)
                .await?;
            Ok(Self::Sqlite(pool))
        } else if url.starts_with("postgres") {
            tracing::info!("Connecting to PostgreSQL database");
            let pool = PgPoolOptions::new()
                .max_connections(MAX_CONNECTIONS)
                .connect(url)
                .await?;
            Ok(Self::Postgres(pool))
        } else {
            Err(StorageError::Storage(format!(
                "Unsupported database URL scheme: {url}. Supported schemes are 'sqlite' and 'postgres'"
            )))
        }
    }

    pub fn as_sqlite(&self) -> Option<&Pool<Sqlite>> {
        match self {
            Self::Sqlite(pool) => Some(pool),
            Self::Postgres(_) => None,
        }
    }

    pub fn as_postgres(&self) -> Option<&Pool<Postgres>> {
        match self {
            Self::Sqlite(_) => None,
            Self::Postgres(pool) => Some(pool),
        }
    }

    /// Liveness probe: run a trivial query against the backend.
    pub async fn ping(&self) -> Result<(), StorageError> {
        match self {
            Self::Sqlite(pool) => {
                sqlx::query("SELECT 1").execute(pool).await?;
            }
            Self::Postgres(pool) => {
                sqlx::query("SELECT 1").execute(pool).await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_sqlite_in_memory() {
        let store = DataStore::connect("sqlite::memory:").await.unwrap();
        assert!(store.as_sqlite().is_some());
        assert!(store.as_postgres().is_none());
        assert!(store.ping().await.is_ok());
    }

    #[tokio::test]
    async fn test_connect_unsupported_scheme() {
        let result = DataStore::connect("mysql://localhost/db").await;
        match result {
            Err(StorageError::Storage(msg)) => {
                assert!(msg.contains("Unsupported database URL scheme"))
            }
            _ => panic!("Expected Storage error for unsupported scheme"),
        }
    }
}
