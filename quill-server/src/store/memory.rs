//! In-memory content store for testing
//!
//! Mirrors the Postgres store's guarantees: ids start at 1 and increase,
//! timestamps never go backwards, listing is newest first. An outage can be
//! simulated with [`MemoryContentStore::set_available`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::ContentStore;
use crate::db::DbError;
use crate::models::{ContentBody, ContentRecord};

#[derive(Default)]
struct Records {
    rows: Vec<ContentRecord>,
    last_id: i32,
}

/// In-memory content store
pub struct MemoryContentStore {
    records: Mutex<Records>,
    available: AtomicBool,
}

impl Default for MemoryContentStore {
    fn default() -> Self {
        Self {
            records: Mutex::new(Records::default()),
            available: AtomicBool::new(true),
        }
    }
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle a simulated outage; while unavailable every call fails.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.lock().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Records> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_available(&self) -> Result<(), DbError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(DbError::Unavailable("connection refused".to_string()))
        }
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn db_time(&self) -> Result<DateTime<Utc>, DbError> {
        self.check_available()?;
        Ok(Utc::now())
    }

    async fn insert(&self, content: ContentBody) -> Result<ContentRecord, DbError> {
        self.check_available()?;
        let mut records = self.lock();

        let now = Utc::now();
        let created_at = match records.rows.last() {
            Some(last) if last.created_at > now => last.created_at,
            _ => now,
        };
        records.last_id += 1;

        let record = ContentRecord {
            id: records.last_id,
            content: content.into_string(),
            created_at,
        };
        records.rows.push(record.clone());
        Ok(record)
    }

    async fn list_newest_first(&self) -> Result<Vec<ContentRecord>, DbError> {
        self.check_available()?;
        let mut rows = self.lock().rows.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(s: &str) -> ContentBody {
        ContentBody::new(s).unwrap()
    }

    #[tokio::test]
    async fn ids_are_increasing() {
        let store = MemoryContentStore::new();
        let a = store.insert(body("a")).await.unwrap();
        let b = store.insert(body("b")).await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert!(b.created_at >= a.created_at);
    }

    #[tokio::test]
    async fn lists_newest_first() {
        let store = MemoryContentStore::new();
        for text in ["one", "two", "three"] {
            store.insert(body(text)).await.unwrap();
        }
        let listed: Vec<_> = store
            .list_newest_first()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.content)
            .collect();
        assert_eq!(listed, ["three", "two", "one"]);
    }

    #[tokio::test]
    async fn outage_fails_every_call() {
        let store = MemoryContentStore::new();
        store.set_available(false);
        assert!(store.db_time().await.is_err());
        assert!(store.insert(body("x")).await.is_err());
        assert!(store.list_newest_first().await.is_err());
        assert!(!store.is_healthy().await);
        assert!(store.is_empty());

        store.set_available(true);
        assert!(store.is_healthy().await);
    }
}
