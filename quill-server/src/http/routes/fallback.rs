//! Catch-all for unknown routes and unsupported methods

use axum::extract::OriginalUri;

use crate::http::error::ApiError;

/// Any unmatched path or method: 404 naming the requested URI.
pub async fn not_found(OriginalUri(uri): OriginalUri) -> ApiError {
    tracing::debug!(%uri, "No route");
    ApiError::RouteNotFound {
        uri: uri.to_string(),
    }
}
