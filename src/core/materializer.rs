//! Playlist materializer
//!
//! Turns a completed session's liked set into a playlist on the external
//! platform plus a local record linked back into the session entry. No step
//! retries; a failure before the external playlist exists aborts with no
//! partial state.

use tracing::{info, warn};

use crate::config::AppConfig;
use crate::db::tables::{ActivityLogTable, PlaylistTable};
use crate::error::{Error, Result};
use crate::models::{ActivityLogEntry, Playlist, Privacy, User};
use crate::platform::PlatformApi;
use crate::recommend::{CandidateProvider, CandidateSeed};

/// Materializes completed sessions into playlists
pub struct PlaylistMaterializer<P, R> {
    platform: P,
    recommender: R,
}

impl<P, R> PlaylistMaterializer<P, R>
where
    P: PlatformApi,
    R: CandidateProvider,
{
    pub fn new(platform: P, recommender: R) -> Self {
        Self {
            platform,
            recommender,
        }
    }

    /// Track ids the playlist should be populated with, in order
    pub async fn fetch_recommended_track_ids(&self, seed: &CandidateSeed) -> Result<Vec<String>> {
        self.recommender.playlist_tracks(seed).await
    }

    /// Run the full materialization workflow for a completed session
    ///
    /// A populate failure after the external playlist exists leaves that
    /// playlist orphaned (no local row, no linkage); there is no
    /// compensating delete.
    pub async fn materialize(
        &self,
        user: &User,
        entry: &ActivityLogEntry,
        name: &str,
        description: &str,
        cover_url: Option<&str>,
    ) -> Result<Playlist> {
        Playlist::validate_name(name)?;
        if !entry.is_completed() {
            return Err(Error::InvalidInput(format!(
                "session {} is not completed",
                entry.id
            )));
        }
        if entry.is_materialized() {
            return Err(Error::InvalidInput(format!(
                "session {} already has a playlist",
                entry.id
            )));
        }

        let seed = CandidateSeed::for_session(entry, user);
        let track_ids = self.fetch_recommended_track_ids(&seed).await?;

        let config = AppConfig::get();
        let public = config.default_privacy == Privacy::Public;
        let external_id = self.platform.create_playlist(name, description, public).await?;

        // duplicates from the recommender are added as-is
        if let Err(e) = self.platform.add_tracks(&external_id, &track_ids).await {
            warn!(
                "external playlist {} orphaned after populate failure: {}",
                external_id, e
            );
            return Err(e);
        }

        let mut playlist = Playlist::new(name.to_string(), user.id, external_id);
        playlist.description = description.to_string();
        playlist.image = cover_url
            .map(str::to_string)
            .unwrap_or(config.default_cover_url);
        playlist.privacy = config.default_privacy;
        playlist.id = PlaylistTable::insert(&playlist).await?;

        ActivityLogTable::link_playlist(entry.id, playlist.id).await?;

        info!(
            "materialized session {} into playlist {} (external {})",
            entry.id, playlist.id, playlist.external_playlist_id
        );
        Ok(playlist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::db::tables::UserTable;
    use crate::models::Mode;
    use crate::platform::fakes::FakePlatform;
    use crate::recommend::fakes::FakeProvider;

    /// A user plus a completed session with one liked and one disliked item
    async fn completed_session(mode: Mode) -> (User, ActivityLogEntry) {
        db::testing::init().await;
        let mut user = User::new(
            format!(
                "user-{}",
                chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
            ),
            "tester".to_string(),
        );
        user.id = UserTable::insert(&user).await.unwrap();

        let mut entry = ActivityLogEntry::new(user.id, mode);
        entry.record("trackA", true);
        entry.record("trackB", false);
        entry.id = ActivityLogTable::insert(&entry).await.unwrap();

        let written = ActivityLogTable::complete(entry.id, &entry.swipe_results, 1000, 0)
            .await
            .unwrap();
        assert!(written);
        entry.completed_at = Some(1000);
        entry.revision += 1;

        (user, entry)
    }

    #[tokio::test]
    async fn test_scenario_b_full_materialization() {
        let (user, entry) = completed_session(Mode::Songs).await;
        let platform = FakePlatform::new();
        let provider = FakeProvider::with_playlist(&["t1", "t2", "t3"]);
        let materializer = PlaylistMaterializer::new(platform, provider);

        let playlist = materializer
            .materialize(&user, &entry, "My Mix", "", None)
            .await
            .unwrap();

        assert_eq!(playlist.external_playlist_id, "pl_123");
        assert!(playlist.songs.is_none());
        assert_eq!(playlist.created_by, user.id);

        // the seed fed to the recommender is the session's liked set
        assert_eq!(
            *materializer.recommender.last_seed.lock(),
            Some(CandidateSeed::Songs {
                liked_tracks: vec!["trackA".to_string()]
            })
        );

        // tracks were added to the external playlist in recommendation order
        let added = materializer.platform.added.lock();
        assert_eq!(added.len(), 1);
        assert_eq!(added[0].0, "pl_123");
        assert_eq!(added[0].1, vec!["t1", "t2", "t3"]);
        drop(added);

        // local row exists and the session entry is linked to it
        let stored = PlaylistTable::get_by_id(playlist.id).await.unwrap().unwrap();
        assert_eq!(stored.external_playlist_id, "pl_123");
        let linked = ActivityLogTable::get_by_id(entry.id).await.unwrap().unwrap();
        assert_eq!(linked.playlist_id, Some(playlist.id));
    }

    #[tokio::test]
    async fn test_scenario_c_recommendation_failure_aborts_cleanly() {
        let (user, entry) = completed_session(Mode::Songs).await;
        let platform = FakePlatform::new();
        let provider = FakeProvider::failing();
        let materializer = PlaylistMaterializer::new(platform, provider);

        let err = materializer
            .materialize(&user, &entry, "My Mix", "", None)
            .await;
        assert!(matches!(err, Err(Error::Recommendation(_))));

        // playlist creation was never attempted and the session stays unlinked
        assert!(materializer.platform.created.lock().is_empty());
        let stored = ActivityLogTable::get_by_id(entry.id).await.unwrap().unwrap();
        assert!(stored.playlist_id.is_none());
    }

    #[tokio::test]
    async fn test_platform_create_failure_leaves_no_local_state() {
        let (user, entry) = completed_session(Mode::Songs).await;
        let mut platform = FakePlatform::new();
        platform.fail_create = true;
        let provider = FakeProvider::with_playlist(&["t1"]);
        let materializer = PlaylistMaterializer::new(platform, provider);

        let err = materializer
            .materialize(&user, &entry, "My Mix", "", None)
            .await;
        assert!(matches!(err, Err(Error::PlatformApi(_))));

        assert!(materializer.platform.added.lock().is_empty());
        let stored = ActivityLogTable::get_by_id(entry.id).await.unwrap().unwrap();
        assert!(stored.playlist_id.is_none());
    }

    #[tokio::test]
    async fn test_populate_failure_leaves_orphan_and_no_row() {
        let (user, entry) = completed_session(Mode::Songs).await;
        let mut platform = FakePlatform::new();
        platform.fail_add = true;
        let provider = FakeProvider::with_playlist(&["t1"]);
        let materializer = PlaylistMaterializer::new(platform, provider);

        let err = materializer
            .materialize(&user, &entry, "My Mix", "", None)
            .await;
        assert!(matches!(err, Err(Error::PlatformApi(_))));

        // the external playlist was created but nothing local exists
        assert_eq!(materializer.platform.created.lock().len(), 1);
        let stored = ActivityLogTable::get_by_id(entry.id).await.unwrap().unwrap();
        assert!(stored.playlist_id.is_none());
    }

    #[tokio::test]
    async fn test_artist_session_seeds_from_user_ledgers() {
        let (mut user, entry) = completed_session(Mode::Artists).await;
        user.liked_artists = vec!["artX".to_string()];
        user.disliked_artists = vec!["artZ".to_string()];

        let platform = FakePlatform::new();
        let provider = FakeProvider::with_playlist(&["t9"]);
        let materializer = PlaylistMaterializer::new(platform, provider);

        materializer
            .materialize(&user, &entry, "Artist Mix", "", None)
            .await
            .unwrap();

        assert_eq!(
            *materializer.recommender.last_seed.lock(),
            Some(CandidateSeed::Artists {
                liked_artists: vec!["artX".to_string()],
                disliked_artists: vec!["artZ".to_string()],
            })
        );
    }

    #[tokio::test]
    async fn test_materialize_rejects_bad_lifecycle_and_names() {
        let (user, mut entry) = completed_session(Mode::Songs).await;
        let materializer = PlaylistMaterializer::new(
            FakePlatform::new(),
            FakeProvider::with_playlist(&["t1"]),
        );

        let err = materializer.materialize(&user, &entry, "", "", None).await;
        assert!(matches!(err, Err(Error::InvalidInput(_))));

        entry.completed_at = None;
        let err = materializer
            .materialize(&user, &entry, "My Mix", "", None)
            .await;
        assert!(matches!(err, Err(Error::InvalidInput(_))));

        entry.completed_at = Some(1000);
        entry.playlist_id = Some(7);
        let err = materializer
            .materialize(&user, &entry, "My Mix", "", None)
            .await;
        assert!(matches!(err, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_default_cover_applies_when_none_generated() {
        let (user, entry) = completed_session(Mode::Songs).await;
        let materializer = PlaylistMaterializer::new(
            FakePlatform::new(),
            FakeProvider::with_playlist(&["t1"]),
        );

        let playlist = materializer
            .materialize(&user, &entry, "Cover Test", "", None)
            .await
            .unwrap();
        assert_eq!(playlist.image, AppConfig::get().default_cover_url);
    }
}
