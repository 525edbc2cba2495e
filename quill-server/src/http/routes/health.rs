//! Health check endpoint
//!
//! GET /api - server status, current time and a database round trip.
//! A failed round trip is a 500 that echoes the database error.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use super::fallback::not_found;
use crate::clock;
use crate::http::server::AppState;

pub const SERVER_RUNNING: &str = "✅ Server is running";
pub const SERVER_DEGRADED: &str = "⚠️ Server is running, but database connection failed";
pub const DB_CONNECTED: &str = "✅ Connected";
pub const DB_NOT_CONNECTED: &str = "❌ Not connected";

/// Health check response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub current_time: String,
    pub database: DatabaseHealth,
}

/// Database part of the health check
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseHealth {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GET /api
async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let current_time = clock::display_time(Utc::now(), state.timezone);

    match state.store.db_time().await {
        Ok(db_time) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: SERVER_RUNNING,
                current_time,
                database: DatabaseHealth {
                    status: DB_CONNECTED,
                    db_time: Some(clock::json_timestamp(&db_time)),
                    error: None,
                },
            }),
        ),
        Err(e) => {
            tracing::error!(error = ?e, "Database connection issue");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthResponse {
                    status: SERVER_DEGRADED,
                    current_time,
                    database: DatabaseHealth {
                        status: DB_NOT_CONNECTED,
                        db_time: None,
                        error: Some(e.detail()),
                    },
                }),
            )
        }
    }
}

/// Health routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api", get(health).fallback(not_found))
}
