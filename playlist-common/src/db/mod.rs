//! Database schema, connection setup and the query/command layer

pub mod init;
pub mod models;
pub mod playlists;
pub mod schema;
pub mod songs;
pub mod store;
pub mod table_schemas;

pub use init::*;
pub use models::*;
pub use schema::*;
pub use store::Store;
pub use table_schemas::*;
