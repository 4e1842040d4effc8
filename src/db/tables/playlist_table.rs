//! Playlist table operations

use sqlx::FromRow;

use crate::db::DbEngine;
use crate::error::{Error, Result};
use crate::models::{Playlist, Privacy};

/// Database row for playlist table
#[derive(Debug, FromRow)]
struct PlaylistRow {
    id: i64,
    name: String,
    created_by: i64,
    songs: Option<String>,
    image: String,
    external_playlist_id: String,
    time_created: i64,
    description: String,
    privacy: String,
}

impl PlaylistRow {
    fn into_playlist(self) -> Result<Playlist> {
        let songs = match self.songs {
            Some(raw) => Some(serde_json::from_str(&raw).map_err(|e| {
                Error::StoreRead(format!("malformed songs in playlist row {}: {}", self.id, e))
            })?),
            None => None,
        };
        let privacy = Privacy::from_str(&self.privacy).ok_or_else(|| {
            Error::StoreRead(format!(
                "unknown privacy '{}' in playlist row {}",
                self.privacy, self.id
            ))
        })?;

        Ok(Playlist::from_db_row(
            self.id,
            self.name,
            self.created_by,
            songs,
            self.image,
            self.external_playlist_id,
            self.time_created,
            self.description,
            privacy,
        ))
    }
}

/// Playlist table operations
pub struct PlaylistTable;

impl PlaylistTable {
    /// Insert playlist, returning its store-assigned id
    pub async fn insert(playlist: &Playlist) -> Result<i64> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let songs = match &playlist.songs {
            Some(list) => Some(serde_json::to_string(list).map_err(Error::store_write)?),
            None => None,
        };

        let result = sqlx::query(
            "INSERT INTO playlist (name, created_by, songs, image, external_playlist_id, time_created, description, privacy) VALUES (?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&playlist.name)
        .bind(playlist.created_by)
        .bind(&songs)
        .bind(&playlist.image)
        .bind(&playlist.external_playlist_id)
        .bind(playlist.time_created)
        .bind(&playlist.description)
        .bind(playlist.privacy.as_str())
        .execute(pool)
        .await
        .map_err(Error::store_write)?;

        Ok(result.last_insert_rowid())
    }

    /// Get playlist by ID
    pub async fn get_by_id(id: i64) -> Result<Option<Playlist>> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let row: Option<PlaylistRow> = sqlx::query_as("SELECT * FROM playlist WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Error::store_read)?;

        row.map(|r| r.into_playlist()).transpose()
    }
}
