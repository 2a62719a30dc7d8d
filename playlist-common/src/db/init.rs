//! Database initialization
//!
//! Opens the connection pool from a connection string and creates any
//! missing tables. There are no migrations beyond table creation.

use crate::db::table_schemas::create_all_tables;
use crate::{Error, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Default pool size
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Connection settings for the relational store
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseOptions {
    /// sqlx connection string, e.g. `sqlite:///var/lib/playlist-app/playlist-app.db?mode=rwc`
    pub url: String,
    /// Upper bound on pooled connections
    pub max_connections: u32,
}

impl DatabaseOptions {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    /// Single-connection in-memory database (every pooled connection to
    /// `sqlite::memory:` would otherwise see its own empty database)
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        }
    }
}

/// Initialize database connection and create tables if needed
pub async fn init_database(options: &DatabaseOptions) -> Result<SqlitePool> {
    if !options.url.starts_with("sqlite:") {
        return Err(Error::Config(format!(
            "Unsupported database URL '{}': expected a sqlite: connection string",
            options.url
        )));
    }

    let connect_options = SqliteConnectOptions::from_str(&options.url)
        .map_err(|e| Error::Config(format!("Invalid database URL '{}': {}", options.url, e)))?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_millis(5000));

    let db_path = connect_options.get_filename().to_path_buf();
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(options.max_connections.max(1))
        .connect_with(connect_options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_all_tables(&pool).await?;

    Ok(pool)
}
