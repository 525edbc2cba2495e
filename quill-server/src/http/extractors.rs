//! Custom Axum extractors

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{FromRequest, Request};
use serde_json::Value;

/// The raw `content` member of a create-content body.
///
/// The body is read regardless of its content type. A missing, empty or
/// unparseable body counts as an empty object, so validation later reports
/// the field as missing instead of failing on the JSON syntax.
pub struct ContentPayload(pub Option<Value>);

impl<S> FromRequest<S> for ContentPayload
where
    S: Send + Sync,
{
    type Rejection = BytesRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await?;
        Ok(Self(content_member(&bytes)))
    }
}

fn content_member(bytes: &[u8]) -> Option<Value> {
    if bytes.is_empty() {
        return None;
    }

    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(mut body)) => body.remove("content"),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring unparseable request body");
            None
        }
    }
}
