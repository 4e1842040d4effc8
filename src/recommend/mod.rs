//! Candidate provider
//!
//! Abstraction over the external recommendation service. The
//! [`CandidateProvider`] trait is the seam the core consumes;
//! [`RecommendClient`] talks to the real backend.

mod client;

pub use client::RecommendClient;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ActivityLogEntry, Mode, User};

/// Per-mode seed for playlist-track recommendations
///
/// Songs sessions seed from the triggering session's likes only. Artist and
/// genre sessions seed from the user's full accumulated artist ledgers, with
/// dislikes as an explicit negative signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateSeed {
    Songs {
        liked_tracks: Vec<String>,
    },
    Artists {
        liked_artists: Vec<String>,
        disliked_artists: Vec<String>,
    },
    Genres {
        liked_artists: Vec<String>,
        disliked_artists: Vec<String>,
    },
}

impl CandidateSeed {
    /// Build the seed for a session, dispatching on its mode
    pub fn for_session(entry: &ActivityLogEntry, user: &User) -> Self {
        match entry.mode {
            Mode::Songs => CandidateSeed::Songs {
                liked_tracks: entry.liked_ids(),
            },
            Mode::Artists => CandidateSeed::Artists {
                liked_artists: user.liked_artists.clone(),
                disliked_artists: user.disliked_artists.clone(),
            },
            Mode::Genres => CandidateSeed::Genres {
                liked_artists: user.liked_artists.clone(),
                disliked_artists: user.disliked_artists.clone(),
            },
        }
    }
}

/// Operations against the recommendation service
#[async_trait]
pub trait CandidateProvider: Send + Sync {
    /// Ordered track ids for a songs-mode swipe deck
    async fn recommended_tracks(&self, user: &User) -> Result<Vec<String>>;

    /// Artist ids for an artists-mode swipe deck
    async fn random_artists(&self, platform_user_id: &str) -> Result<Vec<String>>;

    /// Ordered track ids to populate a materialized playlist
    async fn playlist_tracks(&self, seed: &CandidateSeed) -> Result<Vec<String>>;
}


#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_artists() -> User {
        let mut user = User::new("spotify-user".to_string(), "tester".to_string());
        user.liked_artists = vec!["artX".to_string(), "artY".to_string()];
        user.disliked_artists = vec!["artZ".to_string()];
        user
    }

    #[test]
    fn test_songs_seed_uses_triggering_session_only() {
        let user = user_with_artists();
        let mut entry = ActivityLogEntry::new(1, Mode::Songs);
        entry.record("trackA", true);
        entry.record("trackB", false);

        let seed = CandidateSeed::for_session(&entry, &user);
        assert_eq!(
            seed,
            CandidateSeed::Songs {
                liked_tracks: vec!["trackA".to_string()]
            }
        );
    }

    #[test]
    fn test_artists_seed_uses_accumulated_ledgers() {
        let user = user_with_artists();
        // session decisions are not the seed in artists mode
        let mut entry = ActivityLogEntry::new(1, Mode::Artists);
        entry.record("artQ", true);

        let seed = CandidateSeed::for_session(&entry, &user);
        assert_eq!(
            seed,
            CandidateSeed::Artists {
                liked_artists: vec!["artX".to_string(), "artY".to_string()],
                disliked_artists: vec!["artZ".to_string()],
            }
        );
    }

    #[test]
    fn test_genres_seed_matches_artists_shape() {
        let user = user_with_artists();
        let entry = ActivityLogEntry::new(1, Mode::Genres);

        match CandidateSeed::for_session(&entry, &user) {
            CandidateSeed::Genres {
                liked_artists,
                disliked_artists,
            } => {
                assert_eq!(liked_artists, user.liked_artists);
                assert_eq!(disliked_artists, user.disliked_artists);
            }
            other => panic!("unexpected seed: {:?}", other),
        }
    }
}
