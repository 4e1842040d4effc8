//! Activity log model
//!
//! One [`ActivityLogEntry`] is one swipe session: an append-only, ordered
//! record of like/dislike decisions plus the lifecycle markers that take it
//! from created to materialized. Entries are audit records and are never
//! deleted.

use serde::{Deserialize, Serialize};

use super::Mode;

/// A single swipe decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwipeDecision {
    /// Platform id of the candidate that was on the card
    pub item_id: String,
    /// Swiped right
    pub liked: bool,
}

impl SwipeDecision {
    pub fn new(item_id: impl Into<String>, liked: bool) -> Self {
        Self {
            item_id: item_id.into(),
            liked,
        }
    }
}

/// One swipe session
///
/// Lifecycle: created -> swiping -> completed (`completed_at` set) ->
/// materialized (`playlist_id` set). No transition skips a state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityLogEntry {
    /// Store-assigned row id
    pub id: i64,
    /// Owning user row id
    pub user_id: i64,
    /// Candidate kind for this session
    pub mode: Mode,
    /// Decisions in swipe order, append-only
    #[serde(default)]
    pub swipe_results: Vec<SwipeDecision>,
    /// Materialized playlist row id; set exactly once
    #[serde(default)]
    pub playlist_id: Option<i64>,
    /// Epoch seconds when the deck was exhausted
    #[serde(default)]
    pub completed_at: Option<i64>,
    /// Epoch seconds when the session was created
    pub created_at: i64,
    /// Optimistic-concurrency counter, bumped on every store write
    #[serde(default)]
    pub revision: i64,
}

impl ActivityLogEntry {
    /// Create a fresh entry (not yet persisted, id assigned on insert)
    pub fn new(user_id: i64, mode: Mode) -> Self {
        Self {
            id: 0,
            user_id,
            mode,
            swipe_results: Vec::new(),
            playlist_id: None,
            completed_at: None,
            created_at: chrono::Utc::now().timestamp(),
            revision: 0,
        }
    }

    /// Append a decision; insertion order is swipe order
    pub fn record(&mut self, item_id: impl Into<String>, liked: bool) {
        self.swipe_results.push(SwipeDecision::new(item_id, liked));
    }

    /// Item ids swiped right, in swipe order
    pub fn liked_ids(&self) -> Vec<String> {
        self.swipe_results
            .iter()
            .filter(|d| d.liked)
            .map(|d| d.item_id.clone())
            .collect()
    }

    /// Item ids swiped left, in swipe order
    pub fn disliked_ids(&self) -> Vec<String> {
        self.swipe_results
            .iter()
            .filter(|d| !d.liked)
            .map(|d| d.item_id.clone())
            .collect()
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    pub fn is_materialized(&self) -> bool {
        self.playlist_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_preserves_swipe_order() {
        let mut entry = ActivityLogEntry::new(1, Mode::Songs);
        entry.record("trackA", true);
        entry.record("trackB", false);
        entry.record("trackC", true);

        let ids: Vec<&str> = entry
            .swipe_results
            .iter()
            .map(|d| d.item_id.as_str())
            .collect();
        assert_eq!(ids, vec!["trackA", "trackB", "trackC"]);
    }

    #[test]
    fn test_liked_ids_filters_and_keeps_order() {
        let mut entry = ActivityLogEntry::new(1, Mode::Songs);
        entry.record("trackA", true);
        entry.record("trackB", false);
        entry.record("trackC", true);

        assert_eq!(entry.liked_ids(), vec!["trackA", "trackC"]);
        assert_eq!(entry.disliked_ids(), vec!["trackB"]);
    }

    #[test]
    fn test_fresh_entry_lifecycle_flags() {
        let entry = ActivityLogEntry::new(7, Mode::Artists);
        assert!(!entry.is_completed());
        assert!(!entry.is_materialized());
        assert!(entry.swipe_results.is_empty());
    }
}
