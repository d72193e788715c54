//! SQLite store for onboarding submissions.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

/// Connection pool tuning, read from the `[database]` config section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolSettings {
    pub max_connections: u32,
    /// How long a writer waits on a locked database.
    pub busy_timeout_secs: u64,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 5,
            busy_timeout_secs: 30,
        }
    }
}

/// Handle to the submissions database. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open the database file at `path`, creating it and its directory if
    /// needed, and apply pending migrations.
    pub async fn open(path: &Path, settings: &PoolSettings) -> Result<Self> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating database directory: {}", dir.display()))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(settings.busy_timeout_secs));

        Self::connect(options, settings.max_connections)
            .await
            .with_context(|| format!("opening database {}", path.display()))
    }

    /// Private in-memory database for tests.
    pub async fn in_memory() -> Result<Self> {
        // Every connection to `:memory:` is a separate database.
        let options = SqliteConnectOptions::new().in_memory(true);
        Self::connect(options, 1)
            .await
            .context("opening in-memory database")
    }

    async fn connect(options: SqliteConnectOptions, max_connections: u32) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("running database migrations")?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_creates_file_and_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("lma.db");

        let db = Database::open(&path, &PoolSettings::default()).await.unwrap();

        assert!(path.exists());
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM onboarding_submissions")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_reopen_keeps_migrations_applied() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lma.db");

        Database::open(&path, &PoolSettings::default()).await.unwrap();
        let db = Database::open(&path, &PoolSettings::default()).await.unwrap();

        let (applied,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM _sqlx_migrations")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(applied, 1);
    }
}
