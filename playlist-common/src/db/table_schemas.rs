//! Table Schema Definitions
//!
//! Single source of truth for the three playlist tables.
//! `playlists_songs` has no UNIQUE constraint on (playlist_id, song_id) and
//! `playlists.name` has no UNIQUE constraint; both are checked (or not) by
//! the command layer.

use crate::db::schema::{ColumnDefinition, SchemaBuilder, TableSchema};
use crate::Result;
use sqlx::SqlitePool;
use tracing::info;

/// Songs table schema
pub struct SongsTableSchema;

impl TableSchema for SongsTableSchema {
    fn table_name() -> &'static str {
        "songs"
    }

    fn expected_columns() -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition::new("id", "INTEGER")
                .primary_key()
                .autoincrement(),

            ColumnDefinition::new("title", "TEXT")
                .not_null(),

            ColumnDefinition::new("artist", "TEXT")
                .not_null(),
        ]
    }
}

/// Playlists table schema
pub struct PlaylistsTableSchema;

impl TableSchema for PlaylistsTableSchema {
    fn table_name() -> &'static str {
        "playlists"
    }

    fn expected_columns() -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition::new("id", "INTEGER")
                .primary_key()
                .autoincrement(),

            ColumnDefinition::new("name", "TEXT")
                .not_null(),
        ]
    }
}

/// Playlist/song join table schema
pub struct PlaylistsSongsTableSchema;

impl TableSchema for PlaylistsSongsTableSchema {
    fn table_name() -> &'static str {
        "playlists_songs"
    }

    fn expected_columns() -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition::new("id", "INTEGER")
                .primary_key()
                .autoincrement(),

            ColumnDefinition::new("playlist_id", "INTEGER")
                .not_null()
                .references("playlists", "id"),

            ColumnDefinition::new("song_id", "INTEGER")
                .not_null()
                .references("songs", "id"),
        ]
    }
}

/// Create every missing table
///
/// Referenced tables are created before the join table.
pub async fn create_all_tables(pool: &SqlitePool) -> Result<()> {
    SchemaBuilder::create_table::<SongsTableSchema>(pool).await?;
    SchemaBuilder::create_table::<PlaylistsTableSchema>(pool).await?;
    SchemaBuilder::create_table::<PlaylistsSongsTableSchema>(pool).await?;

    info!("Schema ready (songs, playlists, playlists_songs)");
    Ok(())
}
