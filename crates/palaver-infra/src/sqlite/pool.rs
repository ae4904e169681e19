//! Connection pools for the message store.
//!
//! SQLite serializes writers, so `DatabasePool` keeps two pools over the
//! same file: one writer connection that all mutations funnel through, and
//! a small read-only pool so session queries and search never queue behind
//! an insert. WAL journal mode lets the readers proceed while a write is
//! in flight.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// Paired pools over one SQLite file.
///
/// `writer` holds exactly one connection; `reader` holds up to 8 read-only
/// connections. Repositories route statements to the matching side.
#[derive(Clone)]
pub struct DatabasePool {
    pub reader: SqlitePool,
    pub writer: SqlitePool,
}

impl DatabasePool {
    /// Open both pools, creating the database file when absent.
    ///
    /// Applies pending migrations on the writer before the reader opens,
    /// so a fresh file is fully schema'd by the time anything can query it.
    /// Every connection gets WAL mode, foreign keys, and a 5s busy timeout.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let base_opts = SqliteConnectOptions::from_str(database_url)?
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(std::time::Duration::from_secs(5))
            .create_if_missing(true);

        let read_opts = base_opts.clone().read_only(true);
        let write_opts = base_opts;

        let writer = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(write_opts)
            .await?;

        sqlx::migrate!("../../migrations")
            .run(&writer)
            .await?;

        let reader = SqlitePoolOptions::new()
            .max_connections(8)
            .connect_with(read_opts)
            .await?;

        Ok(Self { reader, writer })
    }
}

/// Database URL for the `palaver.db` file inside the given data directory.
pub fn database_url(data_dir: &Path) -> String {
    format!("sqlite://{}?mode=rwc", data_dir.join("palaver.db").display())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn open_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    #[tokio::test]
    async fn test_migrations_create_messages_table() {
        let pool = open_pool().await;

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name != '_sqlx_migrations' ORDER BY name",
        )
        .fetch_all(&pool.reader)
        .await
        .unwrap();

        let table_names: Vec<&str> = tables.iter().map(|t| t.0.as_str()).collect();
        assert!(table_names.contains(&"messages"), "messages table missing");
    }

    #[tokio::test]
    async fn test_wal_journal_mode() {
        let pool = open_pool().await;

        let mode: (String,) = sqlx::query_as("PRAGMA journal_mode")
            .fetch_one(&pool.writer)
            .await
            .unwrap();

        assert_eq!(mode.0.to_lowercase(), "wal");
    }

    #[tokio::test]
    async fn test_foreign_keys_on() {
        let pool = open_pool().await;

        let fk: (i32,) = sqlx::query_as("PRAGMA foreign_keys")
            .fetch_one(&pool.writer)
            .await
            .unwrap();

        assert_eq!(fk.0, 1);
    }

    #[tokio::test]
    async fn test_reader_pool_is_read_only() {
        let pool = open_pool().await;

        // Valid statement, so the only reason to fail is the read_only flag.
        let result = sqlx::query("DELETE FROM messages")
            .execute(&pool.reader)
            .await;
        assert!(result.is_err(), "reader accepted a write");

        sqlx::query("DELETE FROM messages")
            .execute(&pool.writer)
            .await
            .unwrap();
    }

    #[test]
    fn test_database_url() {
        let url = database_url(Path::new("/home/user/.palaver"));
        assert_eq!(url, "sqlite:///home/user/.palaver/palaver.db?mode=rwc");
    }
}
