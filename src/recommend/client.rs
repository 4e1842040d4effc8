//! Recommendation backend client

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{CandidateProvider, CandidateSeed};
use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::models::User;

/// HTTP client for the recommendation backend
pub struct RecommendClient {
    client: Client,
    base_url: String,
}

impl RecommendClient {
    /// Client against the configured recommendation base URL
    pub fn new() -> Self {
        Self::with_base_url(AppConfig::get().recommend_base_url)
    }

    /// Client against an explicit base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        Err(Error::Recommendation(format!("{}: {}", status, body)))
    }
}

impl Default for RecommendClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CandidateProvider for RecommendClient {
    async fn recommended_tracks(&self, user: &User) -> Result<Vec<String>> {
        let body = serde_json::json!({ "user_id": user.platform_id });

        let resp = self
            .client
            .post(self.url("/swipe-recommendations"))
            .json(&body)
            .send()
            .await
            .map_err(Error::recommendation)?;

        let ids: Vec<String> = Self::check(resp)
            .await?
            .json()
            .await
            .map_err(Error::recommendation)?;

        debug!("recommendation backend dealt {} tracks", ids.len());
        Ok(ids)
    }

    async fn random_artists(&self, platform_user_id: &str) -> Result<Vec<String>> {
        let resp = self
            .client
            .get(self.url("/random-artists"))
            .query(&[("user_id", platform_user_id)])
            .send()
            .await
            .map_err(Error::recommendation)?;

        let ids: Vec<String> = Self::check(resp)
            .await?
            .json()
            .await
            .map_err(Error::recommendation)?;

        debug!("recommendation backend dealt {} artists", ids.len());
        Ok(ids)
    }

    async fn playlist_tracks(&self, seed: &CandidateSeed) -> Result<Vec<String>> {
        // the songs endpoint takes the session's liked results in activity-log
        // shape; the artists endpoint takes the two ledgers directly
        let (path, body) = match seed {
            CandidateSeed::Songs { liked_tracks } => {
                let results: Vec<serde_json::Value> = liked_tracks
                    .iter()
                    .map(|id| serde_json::json!({ "itemId": id, "liked": true }))
                    .collect();
                (
                    "/create-playlist",
                    serde_json::json!({ "activityLog": { "swipeResults": results } }),
                )
            }
            CandidateSeed::Artists {
                liked_artists,
                disliked_artists,
            }
            | CandidateSeed::Genres {
                liked_artists,
                disliked_artists,
            } => (
                "/generate-playlist",
                serde_json::json!({
                    "liked_artists": liked_artists,
                    "disliked_artists": disliked_artists,
                }),
            ),
        };

        let resp = self
            .client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .map_err(Error::recommendation)?;

        let ids: Vec<String> = Self::check(resp)
            .await?
            .json()
            .await
            .map_err(Error::recommendation)?;

        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_base_and_path() {
        let client = RecommendClient::with_base_url("http://localhost:5000");
        assert_eq!(
            client.url("/swipe-recommendations"),
            "http://localhost:5000/swipe-recommendations"
        );
    }
}
