//! Configuration loading and resolution
//!
//! Each setting is resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Tiers 1 and 2 are merged by the binary's argument parser and handed in as
//! [`ConfigOverrides`]; this module supplies tiers 3 and 4.

use crate::db::init::{DatabaseOptions, DEFAULT_MAX_CONNECTIONS};
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Directory name used under the platform config/data folders
pub const APP_DIR_NAME: &str = "playlist-app";

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "PLAYLIST_CONFIG";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5001;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// `[database]` section of the TOML file
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: Option<String>,
    pub max_connections: Option<u32>,
}

/// `[server]` section of the TOML file
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Key material for signing session and flash cookies
    pub secret_key: Option<String>,
}

/// `[logging]` section of the TOML file
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing filter level ("info", "debug", ...)
    pub level: Option<String>,
    /// Echo every SQL statement
    pub log_statements: Option<bool>,
}

/// Contents of `config.toml`; every key is optional
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct TomlConfig {
    pub database: DatabaseSection,
    pub server: ServerSection,
    pub logging: LoggingConfig,
}

impl TomlConfig {
    /// Parse TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config file: {}", e)))
    }

    /// Load the config file at `path`
    ///
    /// A missing file is not an error: a warning is logged and defaults are
    /// used. A file that exists but cannot be parsed is a `Config` error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::parse(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        info!("Loaded config file {}", path.display());
        Ok(config)
    }
}

/// Values from the command line or environment (tiers 1 and 2)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub database_url: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub log_statements: Option<bool>,
    pub secret_key: Option<String>,
}

/// Fully resolved application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database: DatabaseOptions,
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_statements: bool,
    /// `None` means a random key is generated at startup
    pub secret_key: Option<String>,
}

impl AppConfig {
    /// Merge overrides over the TOML file over compiled defaults
    pub fn resolve(overrides: ConfigOverrides, file: TomlConfig) -> Self {
        let url = overrides
            .database_url
            .or(file.database.url)
            .unwrap_or_else(default_database_url);

        Self {
            database: DatabaseOptions {
                url,
                max_connections: file
                    .database
                    .max_connections
                    .unwrap_or(DEFAULT_MAX_CONNECTIONS),
            },
            host: overrides
                .host
                .or(file.server.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: overrides.port.or(file.server.port).unwrap_or(DEFAULT_PORT),
            log_level: file
                .logging
                .level
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            log_statements: overrides
                .log_statements
                .or(file.logging.log_statements)
                .unwrap_or(false),
            secret_key: overrides
                .secret_key
                .or(file.server.secret_key)
                .filter(|key| !key.is_empty()),
        }
    }

    /// `host:port` to bind the HTTP listener to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Locate the config file
///
/// An explicit path wins, then `PLAYLIST_CONFIG`, then
/// `<config_dir>/playlist-app/config.toml`.
pub fn config_file_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join("config.toml"))
}

/// OS-dependent default database location
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("./playlist_data"))
        .join("playlist-app.db")
}

/// Default connection string (read-write, create if missing)
pub fn default_database_url() -> String {
    format!("sqlite://{}?mode=rwc", default_database_path().display())
}
