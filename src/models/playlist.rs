//! Playlist model

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Maximum user-supplied playlist name length
pub const MAX_NAME_LEN: usize = 100;

/// Playlist visibility on the external platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    Public,
    Private,
}

impl Privacy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Privacy::Public => "public",
            Privacy::Private => "private",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "public" => Some(Privacy::Public),
            "private" => Some(Privacy::Private),
            _ => None,
        }
    }
}

impl Default for Privacy {
    fn default() -> Self {
        Privacy::Public
    }
}

/// A materialized playlist
///
/// `songs` is deliberately `None` at creation: track membership lives on the
/// external platform, and the local row only records the linkage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    /// Store-assigned row id
    pub id: i64,
    /// User-supplied name, non-empty, at most [`MAX_NAME_LEN`] chars
    pub name: String,
    /// Owning user row id
    pub created_by: i64,
    /// Local track list; not duplicated from the platform
    #[serde(default)]
    pub songs: Option<Vec<String>>,
    /// Cover URL (generated cover or the configured default)
    pub image: String,
    /// The platform's playlist identifier
    pub external_playlist_id: String,
    /// Epoch seconds when materialized
    pub time_created: i64,
    /// Description forwarded to the platform
    #[serde(default)]
    pub description: String,
    /// Visibility
    #[serde(default)]
    pub privacy: Privacy,
}

impl Playlist {
    /// Create a new playlist record (not yet persisted)
    pub fn new(name: String, created_by: i64, external_playlist_id: String) -> Self {
        Self {
            id: 0,
            name,
            created_by,
            songs: None,
            image: String::new(),
            external_playlist_id,
            time_created: chrono::Utc::now().timestamp(),
            description: String::new(),
            privacy: Privacy::default(),
        }
    }

    /// Validate a user-supplied playlist name
    pub fn validate_name(name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(Error::InvalidInput("playlist name is empty".to_string()));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(Error::InvalidInput(format!(
                "playlist name exceeds {} characters",
                MAX_NAME_LEN
            )));
        }
        Ok(())
    }

    /// Create from database row
    #[allow(clippy::too_many_arguments)]
    pub fn from_db_row(
        id: i64,
        name: String,
        created_by: i64,
        songs: Option<Vec<String>>,
        image: String,
        external_playlist_id: String,
        time_created: i64,
        description: String,
        privacy: Privacy,
    ) -> Self {
        Self {
            id,
            name,
            created_by,
            songs,
            image,
            external_playlist_id,
            time_created,
            description,
            privacy,
        }
    }
}

impl PartialEq for Playlist {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Playlist {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name_rejects_empty() {
        assert!(Playlist::validate_name("").is_err());
        assert!(Playlist::validate_name("   ").is_err());
    }

    #[test]
    fn test_validate_name_rejects_over_limit() {
        let long = "x".repeat(MAX_NAME_LEN + 1);
        assert!(Playlist::validate_name(&long).is_err());
    }

    #[test]
    fn test_validate_name_accepts_limit() {
        let exact = "x".repeat(MAX_NAME_LEN);
        assert!(Playlist::validate_name(&exact).is_ok());
        assert!(Playlist::validate_name("My Mix").is_ok());
    }

    #[test]
    fn test_new_playlist_has_no_local_songs() {
        let playlist = Playlist::new("My Mix".to_string(), 1, "pl_123".to_string());
        assert!(playlist.songs.is_none());
        assert_eq!(playlist.privacy, Privacy::Public);
    }
}
