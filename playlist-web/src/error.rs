//! Error types for playlist-web
//!
//! Not-found conditions become a 404 page. Every other failure is logged
//! and answered with a generic 500 page; nothing is retried.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::pages;

/// Request handler error
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Storage layer error
    #[error(transparent)]
    Common(#[from] playlist_common::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(msg) | AppError::Common(playlist_common::Error::NotFound(msg)) => {
                (StatusCode::NOT_FOUND, Html(pages::not_found_page(&msg))).into_response()
            }
            AppError::Common(err) => {
                error!("Request failed: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, Html(pages::server_error_page())).into_response()
            }
        }
    }
}

/// Result type for request handlers
pub type AppResult<T> = Result<T, AppError>;

/// Parse a path identifier; anything that is not an integer is not found
pub fn parse_id(entity: &str, raw: &str) -> AppResult<i64> {
    raw.parse::<i64>()
        .map_err(|_| AppError::NotFound(format!("{} {}", entity, raw)))
}
