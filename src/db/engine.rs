//! Database engine and connection management

use once_cell::sync::OnceCell;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{Error, Result};

static DB_ENGINE: OnceCell<Arc<DbEngine>> = OnceCell::new();

/// Database engine wrapper
pub struct DbEngine {
    pool: SqlitePool,
}

impl DbEngine {
    /// Get the global database engine instance
    pub fn get() -> Result<Arc<DbEngine>> {
        DB_ENGINE
            .get()
            .map(Arc::clone)
            .ok_or_else(|| Error::Config("database not initialized".to_string()))
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Setup the SQLite database
///
/// Idempotent: a second call is a no-op against the already-initialized
/// engine (the first caller's path wins).
pub async fn setup(db_path: &Path) -> Result<()> {
    if DB_ENGINE.get().is_none() {
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))
            .map_err(|e| Error::Config(e.to_string()))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .busy_timeout(std::time::Duration::from_secs(30))
            .pragma("foreign_keys", "ON");

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .min_connections(1)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await
            .map_err(|e| Error::Config(format!("failed to connect to database: {}", e)))?;

        // a racing initializer may have won; its pool is the one kept
        let _ = DB_ENGINE.set(Arc::new(DbEngine { pool }));
    }

    create_tables().await
}

/// Create all database tables
async fn create_tables() -> Result<()> {
    let engine = DbEngine::get()?;
    let pool = engine.pool();

    // User table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            platform_id TEXT NOT NULL UNIQUE,
            username TEXT NOT NULL,
            avatar_url TEXT,
            liked_artists TEXT NOT NULL DEFAULT '[]',
            disliked_artists TEXT NOT NULL DEFAULT '[]',
            liked_songs TEXT NOT NULL DEFAULT '[]',
            disliked_songs TEXT NOT NULL DEFAULT '[]',
            extra TEXT DEFAULT '{}'
        );
        CREATE INDEX IF NOT EXISTS idx_user_platform_id ON user(platform_id);
        "#,
    )
    .execute(pool)
    .await
    .map_err(Error::store_write)?;

    // Activity log table. One row per swipe session; revision backs the
    // compare-and-swap on completion and linkage writes.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS activity_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            userid INTEGER NOT NULL,
            mode TEXT NOT NULL,
            swipe_results TEXT NOT NULL DEFAULT '[]',
            playlist_id INTEGER,
            completed_at INTEGER,
            created_at INTEGER NOT NULL,
            revision INTEGER NOT NULL DEFAULT 0
        );
        CREATE INDEX IF NOT EXISTS idx_activity_log_userid ON activity_log(userid);
        "#,
    )
    .execute(pool)
    .await
    .map_err(Error::store_write)?;

    // Playlist table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS playlist (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            created_by INTEGER NOT NULL,
            songs TEXT,
            image TEXT NOT NULL,
            external_playlist_id TEXT NOT NULL,
            time_created INTEGER NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            privacy TEXT NOT NULL DEFAULT 'public'
        );
        CREATE INDEX IF NOT EXISTS idx_playlist_created_by ON playlist(created_by);
        "#,
    )
    .execute(pool)
    .await
    .map_err(Error::store_write)?;

    // Genre table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS genre (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            image TEXT
        );
        "#,
    )
    .execute(pool)
    .await
    .map_err(Error::store_write)?;

    Ok(())
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::path::PathBuf;

    static TEST_DB: OnceCell<(tempfile::TempDir, PathBuf)> = OnceCell::new();

    /// Point the global engine at a throwaway database shared by all tests
    /// in the process.
    pub async fn init() {
        let path = {
            let (_, path) = TEST_DB.get_or_init(|| {
                let dir = tempfile::tempdir().expect("create temp dir");
                let path = dir.path().join("vibeswipe-test.db");
                (dir, path)
            });
            path.clone()
        };
        setup(&path).await.expect("setup test db");
    }
}
