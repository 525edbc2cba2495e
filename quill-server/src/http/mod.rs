//! HTTP server layer
//!
//! Axum server with:
//! - CORS (local front-end dev servers by default)
//! - Request tracing and an outer request timeout
//! - Graceful shutdown
//! - JSON error responses, including for unknown routes

pub mod error;
pub mod extractors;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, run_server, AppState, ServerError};
