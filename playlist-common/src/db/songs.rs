//! Song queries and commands

use super::models::{Playlist, Song};
use super::store::Store;
use crate::{Error, Result};
use tracing::info;

impl Store {
    /// Get all songs
    pub async fn list_songs(&self) -> Result<Vec<Song>> {
        let songs = sqlx::query_as::<_, Song>("SELECT id, title, artist FROM songs ORDER BY id")
            .fetch_all(self.pool())
            .await?;
        Ok(songs)
    }

    /// Get song by id, or `Error::NotFound`
    pub async fn get_song(&self, id: i64) -> Result<Song> {
        sqlx::query_as::<_, Song>("SELECT id, title, artist FROM songs WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| Error::not_found("song", id))
    }

    /// Playlists the song has been added to (each listed once)
    pub async fn list_song_playlists(&self, song_id: i64) -> Result<Vec<Playlist>> {
        let playlists = sqlx::query_as::<_, Playlist>(
            r#"
            SELECT DISTINCT p.id, p.name
            FROM playlists p
            JOIN playlists_songs ps ON ps.playlist_id = p.id
            WHERE ps.song_id = ?
            ORDER BY p.id
            "#,
        )
        .bind(song_id)
        .fetch_all(self.pool())
        .await?;
        Ok(playlists)
    }

    /// Create a song (no duplicate check)
    pub async fn create_song(&self, title: &str, artist: &str) -> Result<Song> {
        let mut tx = self.begin_write().await?;

        let result = sqlx::query("INSERT INTO songs (title, artist) VALUES (?, ?)")
            .bind(title)
            .bind(artist)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let song = Song {
            id: result.last_insert_rowid(),
            title: title.to_string(),
            artist: artist.to_string(),
        };
        info!("Created song {} '{}' by '{}'", song.id, song.title, song.artist);
        Ok(song)
    }
}
