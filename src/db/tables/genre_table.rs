//! Genre table operations

use sqlx::FromRow;

use crate::db::DbEngine;
use crate::error::{Error, Result};
use crate::models::Genre;

/// Database row for genre table
#[derive(Debug, FromRow)]
struct GenreRow {
    id: String,
    name: String,
    image: Option<String>,
}

impl GenreRow {
    fn into_genre(self) -> Genre {
        Genre {
            id: self.id,
            name: self.name,
            image: self.image,
        }
    }
}

/// Genre table operations
pub struct GenreTable;

impl GenreTable {
    /// Up to `limit` genres, stable order
    pub async fn all(limit: usize) -> Result<Vec<Genre>> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let rows: Vec<GenreRow> = sqlx::query_as("SELECT * FROM genre ORDER BY name LIMIT ?")
            .bind(limit as i64)
            .fetch_all(pool)
            .await
            .map_err(Error::store_read)?;

        Ok(rows.into_iter().map(|r| r.into_genre()).collect())
    }

    /// Insert or replace a genre (used for seeding the catalog)
    pub async fn upsert(genre: &Genre) -> Result<()> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        sqlx::query("INSERT OR REPLACE INTO genre (id, name, image) VALUES (?, ?, ?)")
            .bind(&genre.id)
            .bind(&genre.name)
            .bind(&genre.image)
            .execute(pool)
            .await
            .map_err(Error::store_write)?;

        Ok(())
    }
}
