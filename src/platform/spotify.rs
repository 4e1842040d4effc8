//! Spotify Web API client

use async_trait::async_trait;
use futures::future::try_join_all;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use super::{PlatformApi, PlatformArtist, PlatformTrack, ADD_BATCH_LIMIT, LOOKUP_BATCH_LIMIT};
use crate::config::AppConfig;
use crate::error::{Error, Result};

/// Tracks lookup response
#[derive(Debug, Deserialize)]
struct TracksResponse {
    tracks: Vec<TrackObject>,
}

#[derive(Debug, Deserialize)]
struct TrackObject {
    id: String,
    name: String,
    #[serde(default)]
    artists: Vec<ArtistRef>,
    #[serde(default)]
    album: Option<AlbumObject>,
}

#[derive(Debug, Deserialize)]
struct ArtistRef {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct AlbumObject {
    #[serde(default)]
    images: Vec<ImageObject>,
}

#[derive(Debug, Deserialize)]
struct ImageObject {
    url: String,
}

/// Artists lookup response
#[derive(Debug, Deserialize)]
struct ArtistsResponse {
    artists: Vec<ArtistObject>,
}

#[derive(Debug, Deserialize)]
struct ArtistObject {
    id: String,
    name: String,
    #[serde(default)]
    images: Vec<ImageObject>,
    #[serde(default)]
    genres: Vec<String>,
    #[serde(default)]
    popularity: i32,
}

#[derive(Debug, Deserialize)]
struct CreatePlaylistResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct PlaylistSnapshot {
    snapshot_id: String,
}

#[derive(Debug, Deserialize)]
struct PlaylistTracksResponse {
    items: Vec<PlaylistTrackItem>,
}

#[derive(Debug, Deserialize)]
struct PlaylistTrackItem {
    track: Option<TrackObject>,
}

impl TrackObject {
    fn into_track(self) -> PlatformTrack {
        let image_url = self
            .album
            .and_then(|a| a.images.into_iter().next().map(|i| i.url));

        PlatformTrack {
            id: self.id,
            title: self.name,
            artist_ids: self.artists.iter().map(|a| a.id.clone()).collect(),
            artist_names: self.artists.into_iter().map(|a| a.name).collect(),
            image_url,
        }
    }
}

impl ArtistObject {
    fn into_artist(self) -> PlatformArtist {
        PlatformArtist {
            id: self.id,
            name: self.name,
            image_url: self.images.into_iter().next().map(|i| i.url),
            genres: self.genres,
            popularity: self.popularity,
        }
    }
}

/// Spotify track URI for a track id
fn track_uri(id: &str) -> String {
    format!("spotify:track:{}", id)
}

/// Spotify Web API client
///
/// The bearer token is produced by the auth collaborator and treated as
/// opaque here.
pub struct SpotifyClient {
    client: Client,
    base_url: String,
    access_token: String,
}

impl SpotifyClient {
    /// Client against the configured platform base URL
    pub fn new(access_token: impl Into<String>) -> Self {
        Self::with_base_url(access_token, AppConfig::get().platform_base_url)
    }

    /// Client against an explicit base URL
    pub fn with_base_url(access_token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            access_token: access_token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map a non-success response to a platform error carrying status + body
    async fn check(resp: reqwest::Response) -> Result<reqwest::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        Err(Error::PlatformApi(format!("{}: {}", status, body)))
    }

    async fn fetch_track_chunk(&self, ids: &[String]) -> Result<Vec<PlatformTrack>> {
        let resp = self
            .client
            .get(self.url("/tracks"))
            .bearer_auth(&self.access_token)
            .query(&[("ids", ids.join(","))])
            .send()
            .await
            .map_err(Error::platform)?;

        let parsed: TracksResponse = Self::check(resp)
            .await?
            .json()
            .await
            .map_err(Error::platform)?;

        Ok(parsed.tracks.into_iter().map(|t| t.into_track()).collect())
    }

    async fn fetch_artist_chunk(&self, ids: &[String]) -> Result<Vec<PlatformArtist>> {
        let resp = self
            .client
            .get(self.url("/artists"))
            .bearer_auth(&self.access_token)
            .query(&[("ids", ids.join(","))])
            .send()
            .await
            .map_err(Error::platform)?;

        let parsed: ArtistsResponse = Self::check(resp)
            .await?
            .json()
            .await
            .map_err(Error::platform)?;

        Ok(parsed.artists.into_iter().map(|a| a.into_artist()).collect())
    }
}

#[async_trait]
impl PlatformApi for SpotifyClient {
    async fn get_tracks(&self, ids: &[String]) -> Result<Vec<PlatformTrack>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        // chunk futures are gathered together; try_join_all keeps request
        // order, so the flattened result matches the input order
        let chunks = ids
            .chunks(LOOKUP_BATCH_LIMIT)
            .map(|chunk| self.fetch_track_chunk(chunk));
        let gathered = try_join_all(chunks).await?;

        Ok(gathered.into_iter().flatten().collect())
    }

    async fn get_artists(&self, ids: &[String]) -> Result<Vec<PlatformArtist>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let chunks = ids
            .chunks(LOOKUP_BATCH_LIMIT)
            .map(|chunk| self.fetch_artist_chunk(chunk));
        let gathered = try_join_all(chunks).await?;

        Ok(gathered.into_iter().flatten().collect())
    }

    async fn create_playlist(
        &self,
        name: &str,
        description: &str,
        public: bool,
    ) -> Result<String> {
        let body = serde_json::json!({
            "name": name,
            "description": description,
            "public": public,
        });

        let resp = self
            .client
            .post(self.url("/me/playlists"))
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(Error::platform)?;

        let parsed: CreatePlaylistResponse = Self::check(resp)
            .await?
            .json()
            .await
            .map_err(Error::platform)?;

        debug!("created external playlist {}", parsed.id);
        Ok(parsed.id)
    }

    async fn add_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<()> {
        // sequential chunks: playlist order must match recommendation order
        for chunk in track_ids.chunks(ADD_BATCH_LIMIT) {
            let uris: Vec<String> = chunk.iter().map(|id| track_uri(id)).collect();
            let body = serde_json::json!({ "uris": uris });

            let resp = self
                .client
                .post(self.url(&format!("/playlists/{}/tracks", playlist_id)))
                .bearer_auth(&self.access_token)
                .json(&body)
                .send()
                .await
                .map_err(Error::platform)?;

            Self::check(resp).await?;
        }

        Ok(())
    }

    async fn remove_track(&self, playlist_id: &str, track_id: &str) -> Result<()> {
        // read the current snapshot first so a concurrent edit is not
        // clobbered by this removal
        let resp = self
            .client
            .get(self.url(&format!("/playlists/{}", playlist_id)))
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(Error::platform)?;

        let snapshot: PlaylistSnapshot = Self::check(resp)
            .await?
            .json()
            .await
            .map_err(Error::platform)?;

        let body = serde_json::json!({
            "tracks": [{ "uri": track_uri(track_id) }],
            "snapshot_id": snapshot.snapshot_id,
        });

        let resp = self
            .client
            .delete(self.url(&format!("/playlists/{}/tracks", playlist_id)))
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(Error::platform)?;

        Self::check(resp).await?;
        Ok(())
    }

    async fn playlist_track_ids(&self, playlist_id: &str) -> Result<Vec<String>> {
        let resp = self
            .client
            .get(self.url(&format!("/playlists/{}/tracks", playlist_id)))
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(Error::platform)?;

        let parsed: PlaylistTracksResponse = Self::check(resp)
            .await?
            .json()
            .await
            .map_err(Error::platform)?;

        Ok(parsed
            .items
            .into_iter()
            .filter_map(|item| item.track.map(|t| t.id))
            .collect())
    }

    async fn start_playback(&self, playlist_id: &str, device_id: Option<&str>) -> Result<()> {
        let mut url = self.url("/me/player/play");
        if let Some(device) = device_id {
            url = format!("{}?device_id={}", url, device);
        }

        let body = serde_json::json!({
            "context_uri": format!("spotify:playlist:{}", playlist_id),
        });

        let resp = self
            .client
            .put(url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(Error::platform)?;

        if resp.status() == StatusCode::NO_CONTENT || resp.status().is_success() {
            return Ok(());
        }

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        Err(Error::PlatformApi(format!("{}: {}", status, text)))
    }

    async fn set_shuffle(&self, on: bool) -> Result<()> {
        let resp = self
            .client
            .put(self.url("/me/player/shuffle"))
            .bearer_auth(&self.access_token)
            .query(&[("state", on)])
            .send()
            .await
            .map_err(Error::platform)?;

        if resp.status() == StatusCode::NO_CONTENT || resp.status().is_success() {
            return Ok(());
        }

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        Err(Error::PlatformApi(format!("{}: {}", status, text)))
    }
}
