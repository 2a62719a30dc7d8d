//! Storage-access object
//!
//! `Store` owns the connection pool for the life of the process and is the
//! only writer to the playlist tables. Query and command methods live next
//! to their entity in `playlists.rs` and `songs.rs`.

use super::init::{init_database, DatabaseOptions};
use crate::Result;
use sqlx::{Sqlite, SqlitePool, Transaction};

/// Query/command layer over the playlist database
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Wrap an already initialized pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open the database described by `options`, creating missing tables
    pub async fn connect(options: &DatabaseOptions) -> Result<Self> {
        let pool = init_database(options).await?;
        Ok(Self::new(pool))
    }

    /// Underlying connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Start a write transaction that takes the RESERVED lock up front
    ///
    /// A deferred transaction that reads before it writes has to upgrade its
    /// lock mid-flight, and SQLite fails that upgrade with SQLITE_BUSY
    /// without consulting the busy timeout. `BEGIN IMMEDIATE` waits for the
    /// lock instead.
    pub(crate) async fn begin_write(&self) -> Result<Transaction<'static, Sqlite>> {
        Ok(self.pool.begin_with("BEGIN IMMEDIATE").await?)
    }
}
