//! User table operations

use sqlx::FromRow;

use crate::db::DbEngine;
use crate::error::{Error, Result};
use crate::models::User;

/// Database row for user table
#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    platform_id: String,
    username: String,
    avatar_url: Option<String>,
    liked_artists: String,
    disliked_artists: String,
    liked_songs: String,
    disliked_songs: String,
    extra: String,
}

impl UserRow {
    fn into_user(self) -> User {
        let liked_artists = parse_list(&self.liked_artists);
        let disliked_artists = parse_list(&self.disliked_artists);
        let liked_songs = parse_list(&self.liked_songs);
        let disliked_songs = parse_list(&self.disliked_songs);
        let extra: serde_json::Value =
            serde_json::from_str(&self.extra).unwrap_or(serde_json::Value::Null);

        User {
            id: self.id,
            platform_id: self.platform_id,
            username: self.username,
            avatar_url: self.avatar_url,
            liked_artists,
            disliked_artists,
            liked_songs,
            disliked_songs,
            extra,
        }
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}

/// Preference list columns on the user row
#[derive(Debug, Clone, Copy)]
pub enum PreferenceList {
    LikedArtists,
    DislikedArtists,
    LikedSongs,
    DislikedSongs,
}

impl PreferenceList {
    fn column(&self) -> &'static str {
        match self {
            PreferenceList::LikedArtists => "liked_artists",
            PreferenceList::DislikedArtists => "disliked_artists",
            PreferenceList::LikedSongs => "liked_songs",
            PreferenceList::DislikedSongs => "disliked_songs",
        }
    }
}

/// User table operations
pub struct UserTable;

impl UserTable {
    /// Insert a user
    pub async fn insert(user: &User) -> Result<i64> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let liked_artists = serde_json::to_string(&user.liked_artists).map_err(Error::store_write)?;
        let disliked_artists =
            serde_json::to_string(&user.disliked_artists).map_err(Error::store_write)?;
        let liked_songs = serde_json::to_string(&user.liked_songs).map_err(Error::store_write)?;
        let disliked_songs =
            serde_json::to_string(&user.disliked_songs).map_err(Error::store_write)?;
        let extra = serde_json::to_string(&user.extra).map_err(Error::store_write)?;

        let result = sqlx::query(
            "INSERT INTO user (platform_id, username, avatar_url, liked_artists, disliked_artists, liked_songs, disliked_songs, extra) VALUES (?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&user.platform_id)
        .bind(&user.username)
        .bind(&user.avatar_url)
        .bind(&liked_artists)
        .bind(&disliked_artists)
        .bind(&liked_songs)
        .bind(&disliked_songs)
        .bind(&extra)
        .execute(pool)
        .await
        .map_err(Error::store_write)?;

        Ok(result.last_insert_rowid())
    }

    /// Get user by ID
    pub async fn get_by_id(id: i64) -> Result<Option<User>> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let row: Option<UserRow> = sqlx::query_as("SELECT * FROM user WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Error::store_read)?;

        Ok(row.map(|r| r.into_user()))
    }

    /// Get user by external platform identity
    pub async fn get_by_platform_id(platform_id: &str) -> Result<Option<User>> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let row: Option<UserRow> = sqlx::query_as("SELECT * FROM user WHERE platform_id = ?")
            .bind(platform_id)
            .fetch_optional(pool)
            .await
            .map_err(Error::store_read)?;

        Ok(row.map(|r| r.into_user()))
    }

    /// Additively merge ids into one of the preference lists
    ///
    /// Whole-array replace (read, merge unique preserving order, write
    /// back); already-present ids are skipped.
    pub async fn merge_preferences(id: i64, list: PreferenceList, ids: &[String]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }

        let engine = DbEngine::get()?;
        let pool = engine.pool();
        let column = list.column();

        let row: Option<(String,)> =
            sqlx::query_as(&format!("SELECT {} FROM user WHERE id = ?", column))
                .bind(id)
                .fetch_optional(pool)
                .await
                .map_err(Error::store_read)?;

        let Some((raw,)) = row else {
            return Err(Error::NotFound(format!("user {}", id)));
        };

        let mut current = parse_list(&raw);
        for item in ids {
            if !current.contains(item) {
                current.push(item.clone());
            }
        }

        let merged = serde_json::to_string(&current).map_err(Error::store_write)?;
        sqlx::query(&format!("UPDATE user SET {} = ? WHERE id = ?", column))
            .bind(&merged)
            .bind(id)
            .execute(pool)
            .await
            .map_err(Error::store_write)?;

        Ok(())
    }
}
