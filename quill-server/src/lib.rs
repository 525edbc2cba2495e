//! quill-server: content API over Postgres
//!
//! Serves the public viewer and the admin entry form with three
//! operations: a health check, content creation and content listing.

pub mod clock;
pub mod config;
pub mod db;
pub mod http;
pub mod models;
pub mod store;

pub use config::{ConfigError, DatabaseConfig, ServerConfig};
pub use http::{build_router, run_server, ApiError, AppState};
pub use store::{ContentStore, MemoryContentStore, PgContentStore};
