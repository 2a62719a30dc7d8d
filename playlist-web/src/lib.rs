//! playlist-web library - playlist and song pages
//!
//! Router and shared state, exposed for integration testing.

use axum::{extract::FromRef, Router};
use playlist_common::Store;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod flash;
pub mod forms;
pub mod pages;
pub mod session;

pub use crate::error::{AppError, AppResult};
pub use crate::session::SessionKey;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Query/command layer; the only path to the database
    pub store: Store,
    /// Signs session and flash cookies
    pub key: SessionKey,
}

impl AppState {
    /// Create new application state
    pub fn new(store: Store, key: SessionKey) -> Self {
        Self { store, key }
    }
}

impl FromRef<AppState> for SessionKey {
    fn from_ref(state: &AppState) -> Self {
        state.key.clone()
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::get;

    Router::new()
        .route("/", get(api::root))
        .merge(api::playlist_routes())
        .merge(api::song_routes())
        .merge(api::health_routes())
        .layer(middleware::from_fn(api::clear_flash_on_error))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
