//! Database models
//!
//! These map directly to rows of the three playlist tables.

use sqlx::FromRow;

/// A title/artist pair, independent of any playlist
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Song {
    pub id: i64,
    pub title: String,
    pub artist: String,
}

/// A named collection of songs
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Playlist {
    pub id: i64,
    pub name: String,
}

/// Join row linking one playlist to one song
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct PlaylistSong {
    pub id: i64,
    pub playlist_id: i64,
    pub song_id: i64,
}

/// Join row plus the linked song's title and artist
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct PlaylistSongDetail {
    pub id: i64,
    pub playlist_id: i64,
    pub song_id: i64,
    pub title: String,
    pub artist: String,
}
