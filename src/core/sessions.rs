//! Swipe session manager
//!
//! Owns the activity-log lifecycle: creation, in-memory decision recording,
//! completion, and resumption. Decisions are buffered locally until
//! completion flushes them in one write; an app crash mid-session loses the
//! unflushed buffer by design.

use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{info, warn};

use crate::db::tables::{ActivityLogTable, PreferenceList, UserTable};
use crate::error::{Error, Result};
use crate::models::{ActivityLogEntry, Mode};

/// Manages active swipe sessions for this process
pub struct SessionManager {
    /// Sessions currently being swiped, keyed by entry id
    active: RwLock<HashMap<i64, ActivityLogEntry>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self {
            active: RwLock::new(HashMap::new()),
        }
    }

    /// Start a new session for a user
    ///
    /// Persists an empty entry and registers it as active. The caller must
    /// not start swiping if this fails.
    pub async fn create_session(&self, user_id: i64, mode: Mode) -> Result<ActivityLogEntry> {
        if UserTable::get_by_id(user_id).await?.is_none() {
            return Err(Error::NotFound(format!("user {}", user_id)));
        }

        let mut entry = ActivityLogEntry::new(user_id, mode);
        entry.id = ActivityLogTable::insert(&entry).await?;

        info!("created {} session {} for user {}", mode, entry.id, user_id);
        self.active.write().insert(entry.id, entry.clone());
        Ok(entry)
    }

    /// Record one swipe decision for an active session
    ///
    /// In-memory only; nothing is persisted until completion.
    pub fn record_decision(&self, session_id: i64, item_id: &str, liked: bool) -> Result<()> {
        let mut active = self.active.write();
        let entry = active
            .get_mut(&session_id)
            .ok_or_else(|| Error::NotFound(format!("active session {}", session_id)))?;

        entry.record(item_id, liked);
        Ok(())
    }

    /// Finalize a session once every candidate has been swiped
    ///
    /// Flushes the buffered decisions and the completion timestamp in one
    /// targeted write. On a store failure the buffer is kept so the caller
    /// can retry the whole completion.
    pub async fn complete_session(
        &self,
        session_id: i64,
        full_deck_size: usize,
    ) -> Result<ActivityLogEntry> {
        let entry = self
            .active
            .read()
            .get(&session_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("active session {}", session_id)))?;

        if entry.swipe_results.len() != full_deck_size {
            return Err(Error::IncompleteDeck {
                recorded: entry.swipe_results.len(),
                expected: full_deck_size,
            });
        }

        let completed_at = chrono::Utc::now().timestamp();
        let written = ActivityLogTable::complete(
            entry.id,
            &entry.swipe_results,
            completed_at,
            entry.revision,
        )
        .await?;

        if !written {
            return Err(Error::StoreWrite(format!(
                "completion of session {} lost to a concurrent update",
                session_id
            )));
        }

        // ledger updates are best-effort; the completed entry is already
        // durable and a retry would find it completed
        if let Err(e) = fold_preferences(&entry).await {
            warn!("preference ledger update failed for session {}: {}", session_id, e);
        }

        self.active.write().remove(&session_id);

        let mut completed = entry;
        completed.completed_at = Some(completed_at);
        completed.revision += 1;

        info!(
            "completed session {} with {} decisions",
            session_id,
            completed.swipe_results.len()
        );
        Ok(completed)
    }

    /// Reload a stored session so swiping can continue after a restart
    ///
    /// Only incomplete sessions owned by `user_id` can be resumed. Already
    /// active sessions are returned as-is.
    pub async fn resume_session(&self, user_id: i64, session_id: i64) -> Result<ActivityLogEntry> {
        if let Some(entry) = self.active.read().get(&session_id) {
            if entry.user_id != user_id {
                return Err(Error::NotFound(format!(
                    "session {} for user {}",
                    session_id, user_id
                )));
            }
            return Ok(entry.clone());
        }

        let entry = ActivityLogTable::get_by_id(session_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("session {}", session_id)))?;

        if entry.user_id != user_id {
            return Err(Error::NotFound(format!(
                "session {} for user {}",
                session_id, user_id
            )));
        }
        if entry.is_completed() {
            return Err(Error::NotFound(format!(
                "resumable session {} (already completed)",
                session_id
            )));
        }

        self.active.write().insert(entry.id, entry.clone());
        info!("resumed session {} for user {}", session_id, user_id);
        Ok(entry)
    }

    /// The user's full activity log, oldest first
    pub async fn activity_log(&self, user_id: i64) -> Result<Vec<ActivityLogEntry>> {
        ActivityLogTable::all_for_user(user_id).await
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Fold a completed session's decisions into the user's preference lists
///
/// Songs feed the song ledgers, artists feed the artist ledgers; genre
/// swipes have no ledger.
async fn fold_preferences(entry: &ActivityLogEntry) -> Result<()> {
    let (liked_list, disliked_list) = match entry.mode {
        Mode::Songs => (PreferenceList::LikedSongs, PreferenceList::DislikedSongs),
        Mode::Artists => (PreferenceList::LikedArtists, PreferenceList::DislikedArtists),
        Mode::Genres => return Ok(()),
    };

    UserTable::merge_preferences(entry.user_id, liked_list, &entry.liked_ids()).await?;
    UserTable::merge_preferences(entry.user_id, disliked_list, &entry.disliked_ids()).await?;
    Ok(())
}
