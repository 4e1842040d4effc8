//! Activity log table operations
//!
//! Per-entry keyed rows. Completion writes go through a revision
//! compare-and-swap so a concurrent writer loses cleanly instead of
//! clobbering the entry.

use sqlx::FromRow;

use crate::db::DbEngine;
use crate::error::{Error, Result};
use crate::models::{ActivityLogEntry, Mode, SwipeDecision};

/// Database row for activity_log table
#[derive(Debug, FromRow)]
struct ActivityLogRow {
    id: i64,
    userid: i64,
    mode: String,
    swipe_results: String,
    playlist_id: Option<i64>,
    completed_at: Option<i64>,
    created_at: i64,
    revision: i64,
}

impl ActivityLogRow {
    fn into_entry(self) -> Result<ActivityLogEntry> {
        let mode = Mode::from_str(&self.mode).ok_or_else(|| {
            Error::StoreRead(format!(
                "unknown mode '{}' in activity_log row {}",
                self.mode, self.id
            ))
        })?;
        let swipe_results: Vec<SwipeDecision> = serde_json::from_str(&self.swipe_results)
            .map_err(|e| {
                Error::StoreRead(format!(
                    "malformed swipe_results in activity_log row {}: {}",
                    self.id, e
                ))
            })?;

        Ok(ActivityLogEntry {
            id: self.id,
            user_id: self.userid,
            mode,
            swipe_results,
            playlist_id: self.playlist_id,
            completed_at: self.completed_at,
            created_at: self.created_at,
            revision: self.revision,
        })
    }
}

/// Activity log table operations
pub struct ActivityLogTable;

impl ActivityLogTable {
    /// Insert a new entry, returning its store-assigned id
    pub async fn insert(entry: &ActivityLogEntry) -> Result<i64> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let swipe_results =
            serde_json::to_string(&entry.swipe_results).map_err(Error::store_write)?;

        let result = sqlx::query(
            "INSERT INTO activity_log (userid, mode, swipe_results, playlist_id, completed_at, created_at, revision) VALUES (?, ?, ?, ?, ?, ?, 0)"
        )
        .bind(entry.user_id)
        .bind(entry.mode.as_str())
        .bind(&swipe_results)
        .bind(entry.playlist_id)
        .bind(entry.completed_at)
        .bind(entry.created_at)
        .execute(pool)
        .await
        .map_err(Error::store_write)?;

        Ok(result.last_insert_rowid())
    }

    /// Get entry by ID
    pub async fn get_by_id(id: i64) -> Result<Option<ActivityLogEntry>> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let row: Option<ActivityLogRow> = sqlx::query_as("SELECT * FROM activity_log WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Error::store_read)?;

        row.map(|r| r.into_entry()).transpose()
    }

    /// All entries for a user, oldest first
    pub async fn all_for_user(userid: i64) -> Result<Vec<ActivityLogEntry>> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let rows: Vec<ActivityLogRow> =
            sqlx::query_as("SELECT * FROM activity_log WHERE userid = ? ORDER BY id")
                .bind(userid)
                .fetch_all(pool)
                .await
                .map_err(Error::store_read)?;

        rows.into_iter().map(|r| r.into_entry()).collect()
    }

    /// Flush the finalized swipe results and completion timestamp
    ///
    /// Compare-and-swap on `(id, revision, completed_at IS NULL)`. Returns
    /// false when the entry moved under us or was already completed; the
    /// caller retries the whole completion.
    pub async fn complete(
        id: i64,
        results: &[SwipeDecision],
        completed_at: i64,
        expected_revision: i64,
    ) -> Result<bool> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let swipe_results = serde_json::to_string(results).map_err(Error::store_write)?;

        let result = sqlx::query(
            "UPDATE activity_log SET swipe_results = ?, completed_at = ?, revision = revision + 1 \
             WHERE id = ? AND revision = ? AND completed_at IS NULL",
        )
        .bind(&swipe_results)
        .bind(completed_at)
        .bind(id)
        .bind(expected_revision)
        .execute(pool)
        .await
        .map_err(Error::store_write)?;

        Ok(result.rows_affected() > 0)
    }

    /// Link an entry to its materialized playlist
    ///
    /// Idempotent for the same `(id, playlist_id)` pair; linking a different
    /// playlist to an already-linked entry is a write error.
    pub async fn link_playlist(id: i64, playlist_id: i64) -> Result<()> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let current: Option<(Option<i64>,)> =
            sqlx::query_as("SELECT playlist_id FROM activity_log WHERE id = ?")
                .bind(id)
                .fetch_optional(pool)
                .await
                .map_err(Error::store_read)?;

        let Some((existing,)) = current else {
            return Err(Error::NotFound(format!("activity log entry {}", id)));
        };

        match existing {
            Some(linked) if linked == playlist_id => return Ok(()),
            Some(linked) => {
                return Err(Error::StoreWrite(format!(
                    "entry {} already linked to playlist {}",
                    id, linked
                )));
            }
            None => {}
        }

        let result = sqlx::query(
            "UPDATE activity_log SET playlist_id = ?, revision = revision + 1 \
             WHERE id = ? AND playlist_id IS NULL",
        )
        .bind(playlist_id)
        .bind(id)
        .execute(pool)
        .await
        .map_err(Error::store_write)?;

        if result.rows_affected() == 0 {
            return Err(Error::StoreWrite(format!(
                "entry {} was linked concurrently",
                id
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::User;

    async fn seeded_entry(mode: Mode) -> ActivityLogEntry {
        db::testing::init().await;
        let user_id = crate::db::tables::UserTable::insert(&User::new(
            format!("user-{}", chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()),
            "tester".to_string(),
        ))
        .await
        .unwrap();

        let mut entry = ActivityLogEntry::new(user_id, mode);
        entry.id = ActivityLogTable::insert(&entry).await.unwrap();
        entry
    }

    #[tokio::test]
    async fn test_insert_and_get_round_trip() {
        let entry = seeded_entry(Mode::Songs).await;

        let stored = ActivityLogTable::get_by_id(entry.id).await.unwrap().unwrap();
        assert_eq!(stored.user_id, entry.user_id);
        assert_eq!(stored.mode, Mode::Songs);
        assert!(stored.swipe_results.is_empty());
        assert_eq!(stored.revision, 0);
        assert!(stored.completed_at.is_none());
    }

    #[tokio::test]
    async fn test_complete_cas_rejects_stale_revision() {
        let entry = seeded_entry(Mode::Songs).await;
        let results = vec![SwipeDecision::new("trackA", true)];

        let stale = ActivityLogTable::complete(entry.id, &results, 1000, entry.revision + 5)
            .await
            .unwrap();
        assert!(!stale);

        let ok = ActivityLogTable::complete(entry.id, &results, 1000, entry.revision)
            .await
            .unwrap();
        assert!(ok);

        // a second completion finds completed_at set and affects no rows
        let again = ActivityLogTable::complete(entry.id, &results, 2000, entry.revision + 1)
            .await
            .unwrap();
        assert!(!again);

        let stored = ActivityLogTable::get_by_id(entry.id).await.unwrap().unwrap();
        assert_eq!(stored.completed_at, Some(1000));
        assert_eq!(stored.revision, entry.revision + 1);
    }

    #[tokio::test]
    async fn test_link_playlist_is_idempotent() {
        let entry = seeded_entry(Mode::Songs).await;

        ActivityLogTable::link_playlist(entry.id, 42).await.unwrap();
        let first = ActivityLogTable::get_by_id(entry.id).await.unwrap().unwrap();

        // same pair again: no error, row unchanged
        ActivityLogTable::link_playlist(entry.id, 42).await.unwrap();
        let second = ActivityLogTable::get_by_id(entry.id).await.unwrap().unwrap();
        assert_eq!(first.playlist_id, second.playlist_id);
        assert_eq!(first.revision, second.revision);

        // a different playlist is a conflict
        let err = ActivityLogTable::link_playlist(entry.id, 43).await;
        assert!(matches!(err, Err(Error::StoreWrite(_))));
    }

    #[tokio::test]
    async fn test_all_for_user_is_ordered() {
        let first = seeded_entry(Mode::Songs).await;
        let mut second = ActivityLogEntry::new(first.user_id, Mode::Artists);
        second.id = ActivityLogTable::insert(&second).await.unwrap();

        let all = ActivityLogTable::all_for_user(first.user_id).await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].id < all[1].id);
    }
}
