//! Content store capability
//!
//! Handlers only see [`ContentStore`]; the Postgres implementation owns the
//! connection lifecycle and the in-memory one stands in for it in tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::db::DbError;
use crate::models::{ContentBody, ContentRecord};

pub mod memory;
pub mod postgres;

pub use memory::MemoryContentStore;
pub use postgres::PgContentStore;

/// Persistence operations available to the API layer
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Liveness query: the backend's current time.
    async fn db_time(&self) -> Result<DateTime<Utc>, DbError>;

    /// Insert a record; the store assigns `id` and `created_at`.
    async fn insert(&self, content: ContentBody) -> Result<ContentRecord, DbError>;

    /// Every record, ordered by `created_at` descending.
    async fn list_newest_first(&self) -> Result<Vec<ContentRecord>, DbError>;

    /// Whether the backend currently answers the liveness query.
    async fn is_healthy(&self) -> bool {
        self.db_time().await.is_ok()
    }
}
