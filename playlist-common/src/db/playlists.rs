//! Playlist queries and commands

use super::models::{Playlist, PlaylistSong, PlaylistSongDetail, Song};
use super::store::Store;
use crate::{Error, Result};
use std::collections::HashSet;
use tracing::{info, warn};

impl Store {
    /// Get all playlists
    pub async fn list_playlists(&self) -> Result<Vec<Playlist>> {
        let playlists = sqlx::query_as::<_, Playlist>("SELECT id, name FROM playlists ORDER BY id")
            .fetch_all(self.pool())
            .await?;
        Ok(playlists)
    }

    /// Get playlist by id, or `Error::NotFound`
    pub async fn get_playlist(&self, id: i64) -> Result<Playlist> {
        sqlx::query_as::<_, Playlist>("SELECT id, name FROM playlists WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| Error::not_found("playlist", id))
    }

    /// Songs on a playlist: the join rows with each song's title and artist
    pub async fn list_playlist_songs(&self, playlist_id: i64) -> Result<Vec<PlaylistSongDetail>> {
        let songs = sqlx::query_as::<_, PlaylistSongDetail>(
            r#"
            SELECT ps.id, ps.playlist_id, ps.song_id, s.title, s.artist
            FROM playlists_songs ps
            JOIN songs s ON s.id = ps.song_id
            WHERE ps.playlist_id = ?
            ORDER BY ps.id
            "#,
        )
        .bind(playlist_id)
        .fetch_all(self.pool())
        .await?;
        Ok(songs)
    }

    /// Songs that are not yet linked to the playlist
    ///
    /// Collects the linked song ids first, then keeps every song outside
    /// that set.
    pub async fn list_songs_not_in_playlist(&self, playlist_id: i64) -> Result<Vec<Song>> {
        let linked: HashSet<i64> =
            sqlx::query_scalar::<_, i64>("SELECT song_id FROM playlists_songs WHERE playlist_id = ?")
                .bind(playlist_id)
                .fetch_all(self.pool())
                .await?
                .into_iter()
                .collect();

        let songs = self
            .list_songs()
            .await?
            .into_iter()
            .filter(|song| !linked.contains(&song.id))
            .collect();
        Ok(songs)
    }

    /// Create a playlist unless one with exactly this name already exists
    ///
    /// The lookup and the insert run in one immediate transaction, so
    /// concurrent creates are serialized by the write lock and a second
    /// create of the same name sees the first one's row.
    pub async fn create_playlist(&self, name: &str) -> Result<Playlist> {
        let mut tx = self.begin_write().await?;

        let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM playlists WHERE name = ? LIMIT 1")
            .bind(name)
            .fetch_optional(&mut *tx)
            .await?;

        if let Some(existing_id) = existing {
            warn!("Rejected playlist '{}': name already used by playlist {}", name, existing_id);
            return Err(Error::DuplicateName(name.to_string()));
        }

        let result = sqlx::query("INSERT INTO playlists (name) VALUES (?)")
            .bind(name)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let playlist = Playlist {
            id: result.last_insert_rowid(),
            name: name.to_string(),
        };
        info!("Created playlist {} '{}'", playlist.id, playlist.name);
        Ok(playlist)
    }

    /// Link a song to a playlist
    ///
    /// Does not check whether the pair is already linked.
    pub async fn add_song_to_playlist(&self, playlist_id: i64, song_id: i64) -> Result<PlaylistSong> {
        let mut tx = self.begin_write().await?;

        let result = sqlx::query("INSERT INTO playlists_songs (playlist_id, song_id) VALUES (?, ?)")
            .bind(playlist_id)
            .bind(song_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let link = PlaylistSong {
            id: result.last_insert_rowid(),
            playlist_id,
            song_id,
        };
        info!("Added song {} to playlist {}", song_id, playlist_id);
        Ok(link)
    }
}
