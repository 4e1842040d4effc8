//! Runtime configuration
//!
//! Settings the core reads at runtime: collaborator base URLs, the deck
//! size, and playlist defaults. Loaded from an optional JSON file with
//! environment-variable overrides, then held in a process-wide handle.

use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::models::Privacy;

static APP_CONFIG: OnceCell<Arc<RwLock<AppConfig>>> = OnceCell::new();

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Base URL of the recommendation backend
    #[serde(default = "default_recommend_base_url")]
    pub recommend_base_url: String,

    /// Base URL of the external platform's REST API
    #[serde(default = "default_platform_base_url")]
    pub platform_base_url: String,

    /// Cover URL used when no cover was generated for a playlist
    #[serde(default = "default_cover_url")]
    pub default_cover_url: String,

    /// Number of candidates dealt into a swipe deck
    #[serde(default = "default_deck_size")]
    pub deck_size: usize,

    /// Visibility applied to materialized playlists
    #[serde(default)]
    pub default_privacy: Privacy,

    /// SQLite database path
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

fn default_recommend_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_platform_base_url() -> String {
    "https://api.spotify.com/v1".to_string()
}

fn default_cover_url() -> String {
    "https://cdn.vibeswipe.app/covers/default.png".to_string()
}

fn default_deck_size() -> usize {
    10
}

fn default_db_path() -> String {
    "vibeswipe.db".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            recommend_base_url: default_recommend_base_url(),
            platform_base_url: default_platform_base_url(),
            default_cover_url: default_cover_url(),
            deck_size: default_deck_size(),
            default_privacy: Privacy::default(),
            db_path: default_db_path(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file, then apply env overrides
    ///
    /// A missing file is not an error; defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) if p.exists() => {
                let contents = std::fs::read_to_string(p)
                    .map_err(|e| Error::Config(format!("reading {}: {}", p.display(), e)))?;
                serde_json::from_str(&contents)
                    .map_err(|e| Error::Config(format!("parsing {}: {}", p.display(), e)))?
            }
            _ => AppConfig::default(),
        };

        config.apply_env();
        Ok(config)
    }

    /// Override settings from environment variables
    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("VIBESWIPE_RECOMMEND_URL") {
            self.recommend_base_url = url;
        }
        if let Ok(url) = std::env::var("VIBESWIPE_PLATFORM_URL") {
            self.platform_base_url = url;
        }
        if let Ok(url) = std::env::var("VIBESWIPE_DEFAULT_COVER_URL") {
            self.default_cover_url = url;
        }
        if let Ok(path) = std::env::var("VIBESWIPE_DB_PATH") {
            self.db_path = path;
        }
        if let Ok(size) = std::env::var("VIBESWIPE_DECK_SIZE") {
            if let Ok(n) = size.parse() {
                self.deck_size = n;
            }
        }
    }

    /// Install a configuration as the process-wide one
    ///
    /// Later calls replace the stored settings.
    pub fn init(config: AppConfig) {
        let handle = APP_CONFIG.get_or_init(|| Arc::new(RwLock::new(AppConfig::default())));
        *handle.write() = config;
    }

    /// Snapshot of the process-wide configuration (defaults if never
    /// initialized)
    pub fn get() -> AppConfig {
        APP_CONFIG
            .get_or_init(|| Arc::new(RwLock::new(AppConfig::default())))
            .read()
            .clone()
    }
}
