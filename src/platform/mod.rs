//! External platform client
//!
//! Thin authenticated wrapper over the streaming platform's REST API. The
//! [`PlatformApi`] trait is the seam the core consumes; [`SpotifyClient`] is
//! the production implementation.

mod spotify;

pub use spotify::SpotifyClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// The platform's documented ceiling for id-batch lookups
pub const LOOKUP_BATCH_LIMIT: usize = 50;

/// The platform's ceiling for tracks added per call
pub const ADD_BATCH_LIMIT: usize = 100;

/// Track details the core needs from the platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformTrack {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub artist_ids: Vec<String>,
    #[serde(default)]
    pub artist_names: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Artist details the core needs from the platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformArtist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub popularity: i32,
}

/// Authenticated operations against the external music platform
#[async_trait]
pub trait PlatformApi: Send + Sync {
    /// Track lookup by id, chunked at [`LOOKUP_BATCH_LIMIT`] per call;
    /// results are flattened in request order
    async fn get_tracks(&self, ids: &[String]) -> Result<Vec<PlatformTrack>>;

    /// Artist lookup by id, chunked like [`Self::get_tracks`]
    async fn get_artists(&self, ids: &[String]) -> Result<Vec<PlatformArtist>>;

    /// Create an empty playlist owned by the authenticated user, returning
    /// the platform's playlist id
    async fn create_playlist(&self, name: &str, description: &str, public: bool)
        -> Result<String>;

    /// Append tracks in the given order, chunked at [`ADD_BATCH_LIMIT`]
    async fn add_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<()>;

    /// Remove one track using the snapshot read-then-write pattern so
    /// concurrent playlist edits are not clobbered
    async fn remove_track(&self, playlist_id: &str, track_id: &str) -> Result<()>;

    /// Track ids currently on a playlist
    async fn playlist_track_ids(&self, playlist_id: &str) -> Result<Vec<String>>;

    /// Start playback of a playlist; fire-and-forget, 204 on success
    async fn start_playback(&self, playlist_id: &str, device_id: Option<&str>) -> Result<()>;

    /// Toggle shuffle; fire-and-forget, 204 on success
    async fn set_shuffle(&self, on: bool) -> Result<()>;
}
