//! Content repository
//!
//! - insert: single INSERT ... RETURNING (atomic, database-assigned id/timestamp)
//! - list: newest first, `id` breaks ties between equal timestamps

use sqlx::PgPool;

use super::DbError;
use crate::models::{ContentBody, ContentRecord};

/// Content repository
pub struct ContentRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ContentRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a record and return it with its generated fields.
    pub async fn insert(&self, content: &ContentBody) -> Result<ContentRecord, DbError> {
        let record = sqlx::query_as::<_, ContentRecord>(
            r#"
            INSERT INTO contents (content) VALUES ($1)
            RETURNING id, content, created_at
            "#,
        )
        .bind(content.as_str())
        .fetch_one(self.pool)
        .await?;

        Ok(record)
    }

    /// All records, most recent first.
    pub async fn list_newest_first(&self) -> Result<Vec<ContentRecord>, DbError> {
        let records = sqlx::query_as::<_, ContentRecord>(
            r#"
            SELECT id, content, created_at
            FROM contents
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{connect_lazy, schema};
    use std::time::Duration;

    // Integration tests - run with DATABASE_URL set
    // cargo test -p quill-server -- --ignored

    async fn pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = connect_lazy(url.parse().expect("invalid DATABASE_URL"), 5, Duration::from_secs(5));
        schema::ensure(&pool).await.expect("schema creation failed");
        pool
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn insert_assigns_increasing_ids() {
        let pool = pool().await;
        let repo = ContentRepo::new(&pool);

        let first = repo.insert(&ContentBody::new("first").unwrap()).await.unwrap();
        let second = repo.insert(&ContentBody::new("second").unwrap()).await.unwrap();

        assert!(first.id > 0);
        assert!(second.id > first.id);
        assert!(second.created_at >= first.created_at);
        assert_eq!(second.content, "second");
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn list_is_newest_first() {
        let pool = pool().await;
        let repo = ContentRepo::new(&pool);
        let inserted = repo.insert(&ContentBody::new("latest").unwrap()).await.unwrap();

        let records = repo.list_newest_first().await.unwrap();
        assert_eq!(records.first().map(|r| r.id), Some(inserted.id));
        assert!(records
            .windows(2)
            .all(|pair| pair[0].created_at >= pair[1].created_at));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn schema_creation_is_idempotent() {
        let pool = pool().await;
        schema::ensure(&pool).await.expect("second run failed");
    }
}
