//! API error types with IntoResponse
//!
//! Errors are converted to JSON responses with appropriate status codes.
//! Database details are logged, never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::DbError;
use crate::models::ValidationError;

/// Generic message for every dependency failure on the content routes
pub const INTERNAL_ERROR_MESSAGE: &str = "❌ Internal Server Error";

/// Returned when the content table is empty
pub const NO_CONTENT_MESSAGE: &str = "🔄 No content available";

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Listing found no records (404)
    NoContent,

    /// No route for this path and method (404)
    RouteNotFound { uri: String },

    /// Request exceeded the server-wide timeout (500, logged)
    RequestTimeout,

    /// Database error (500, logged)
    Database {
        operation: &'static str,
        source: DbError,
    },
}

impl ApiError {
    /// Wrap a database failure with the operation it interrupted.
    pub fn database(operation: &'static str, source: DbError) -> Self {
        Self::Database { operation, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Validation(e) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": format!("⚠️ {}", e) }),
            ),
            Self::NoContent => (StatusCode::NOT_FOUND, json!({ "error": NO_CONTENT_MESSAGE })),
            Self::RouteNotFound { uri } => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": "❌ Not Found",
                    "message": format!("⚠️ The route '{}' does not exist.", uri)
                }),
            ),
            Self::RequestTimeout => {
                tracing::error!("Request timed out");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": INTERNAL_ERROR_MESSAGE }),
                )
            }
            Self::Database { operation, source } => {
                // Log the actual error, return generic message
                tracing::error!(error = ?source, "Error {}: {}", operation, source);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": INTERNAL_ERROR_MESSAGE }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}
