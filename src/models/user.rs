//! User model

use serde::{Deserialize, Serialize};

/// A user account
///
/// The four preference lists are the accumulated materialization seeds for
/// artist/genre sessions; they only ever grow (additive merge on session
/// completion).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Database ID
    pub id: i64,
    /// External platform identity (unique)
    pub platform_id: String,
    /// Display name
    pub username: String,
    /// Profile picture URL
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Artist ids the user has liked across sessions
    #[serde(default)]
    pub liked_artists: Vec<String>,
    /// Artist ids the user has disliked across sessions
    #[serde(default)]
    pub disliked_artists: Vec<String>,
    /// Track ids the user has liked across sessions
    #[serde(default)]
    pub liked_songs: Vec<String>,
    /// Track ids the user has disliked across sessions
    #[serde(default)]
    pub disliked_songs: Vec<String>,
    /// Extra metadata
    #[serde(default)]
    pub extra: serde_json::Value,
}

impl User {
    /// Create a new user
    pub fn new(platform_id: String, username: String) -> Self {
        Self {
            id: 0,
            platform_id,
            username,
            avatar_url: None,
            liked_artists: Vec::new(),
            disliked_artists: Vec::new(),
            liked_songs: Vec::new(),
            disliked_songs: Vec::new(),
            extra: serde_json::Value::Null,
        }
    }
}

impl Default for User {
    fn default() -> Self {
        Self::new(String::new(), String::new())
    }
}
