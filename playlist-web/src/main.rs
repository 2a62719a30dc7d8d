//! playlist-web - playlist manager web application
//!
//! Serves server-rendered pages for listing and creating playlists and
//! songs and for adding songs to playlists.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use playlist_common::config::{config_file_path, AppConfig, ConfigOverrides, TomlConfig};
use playlist_common::Store;
use playlist_web::{build_router, AppState, SessionKey};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for playlist-web
#[derive(Parser, Debug)]
#[command(name = "playlist-web")]
#[command(about = "Playlist manager web application")]
#[command(version)]
struct Args {
    /// TOML config file (default: <config dir>/playlist-app/config.toml)
    #[arg(short, long, env = "PLAYLIST_CONFIG")]
    config: Option<PathBuf>,

    /// Database connection string, e.g. sqlite:///path/to/playlist-app.db?mode=rwc
    #[arg(long, env = "PLAYLIST_DATABASE_URL")]
    database_url: Option<String>,

    /// Address to listen on
    #[arg(long, env = "PLAYLIST_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "PLAYLIST_PORT")]
    port: Option<u16>,

    /// Echo every SQL statement to the log
    #[arg(long, env = "PLAYLIST_LOG_STATEMENTS")]
    log_statements: bool,

    /// Secret for signing session cookies (default: random per process)
    #[arg(long, env = "PLAYLIST_SECRET_KEY", hide_env_values = true)]
    secret_key: Option<String>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            database_url: self.database_url.clone(),
            host: self.host.clone(),
            port: self.port,
            log_statements: self.log_statements.then_some(true),
            secret_key: self.secret_key.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // The config file supplies the log level, so it is read before tracing starts
    let config_path = config_file_path(args.config.as_deref());
    let file_config = match &config_path {
        Some(path) => TomlConfig::load(path).context("Failed to load config file")?,
        None => TomlConfig::default(),
    };
    let config = AppConfig::resolve(args.overrides(), file_config);

    init_tracing(&config)?;

    info!(
        "Starting playlist-web v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    match &config_path {
        Some(path) if path.exists() => info!("Config file: {}", path.display()),
        Some(path) => warn!("Config file {} not found, using defaults", path.display()),
        None => warn!("No config directory on this platform, using defaults"),
    }

    info!("Database: {}", config.database.url);
    let store = match Store::connect(&config.database).await {
        Ok(store) => {
            info!("✓ Connected to database");
            store
        }
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    let key = match &config.secret_key {
        Some(secret) => SessionKey::from_secret(secret),
        None => {
            warn!("No secret key configured; sessions will not survive a restart");
            SessionKey::generate()
        }
    };

    let app = build_router(AppState::new(store, key));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("playlist-web listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Tracing subscriber: RUST_LOG wins, else the configured level
///
/// sqlx logs each statement at DEBUG under `sqlx::query`; `log_statements`
/// lets those through regardless of the base level.
fn init_tracing(config: &AppConfig) -> Result<()> {
    let statements = if config.log_statements {
        "sqlx::query=debug"
    } else {
        "sqlx::query=warn"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},tower_http=info", config.log_level)))
        .add_directive(statements.parse()?);

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
