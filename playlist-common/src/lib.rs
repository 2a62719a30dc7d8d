//! # Playlist Common Library
//!
//! Shared code for the playlist app:
//! - Database schema, connection setup and the `Store` query/command layer
//! - Configuration loading
//! - Common error types

pub mod config;
pub mod db;
pub mod error;

pub use db::Store;
pub use error::{Error, Result};
