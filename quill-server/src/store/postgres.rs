//! Postgres-backed content store and connection lifecycle
//!
//! [`PgContentStore::initialize`] builds a lazily connecting pool and returns
//! at once; schema creation runs in a background task with exponential
//! backoff. The server therefore listens (and answers health checks) while
//! the database is still unreachable, and the schema is retried before the
//! next content query if the background task has not succeeded yet.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgConnectOptions;
use sqlx::{Connection, PgConnection, PgPool};
use tokio::sync::Mutex;

use super::ContentStore;
use crate::config::{ConfigError, DatabaseConfig};
use crate::db::{self, schema, ContentRepo, DbError};
use crate::models::{ContentBody, ContentRecord};

/// Longest pause between schema initialization attempts
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Content store over a lazily connecting Postgres pool
pub struct PgContentStore {
    pool: PgPool,
    options: PgConnectOptions,
    query_timeout: Duration,
    schema_ready: AtomicBool,
    // Serializes CREATE TABLE between the background task and request paths
    schema_lock: Mutex<()>,
}

impl PgContentStore {
    pub fn new(pool: PgPool, options: PgConnectOptions, query_timeout: Duration) -> Self {
        Self {
            pool,
            options,
            query_timeout,
            schema_ready: AtomicBool::new(false),
            schema_lock: Mutex::new(()),
        }
    }

    /// Build the store without touching the network.
    pub fn connect(config: &DatabaseConfig) -> Result<Self, ConfigError> {
        let options = config.connect_options()?;
        let acquire_timeout = config.acquire_timeout.min(config.query_timeout);
        let pool = db::connect_lazy(options.clone(), config.max_connections, acquire_timeout);
        Ok(Self::new(pool, options, config.query_timeout))
    }

    /// Build the store and start schema creation in the background.
    ///
    /// Only a malformed configuration is an error. Connection and schema
    /// failures are logged by the background task and leave the store
    /// degraded. Must be called from within a Tokio runtime.
    pub fn initialize(config: &DatabaseConfig) -> Result<Arc<Self>, ConfigError> {
        let store = Arc::new(Self::connect(config)?);

        let background = Arc::clone(&store);
        let attempts = config.connect_retries.max(1);
        let backoff = config.connect_backoff;
        tokio::spawn(async move {
            background.init_schema_with_retry(attempts, backoff).await;
        });

        Ok(store)
    }

    /// Try to create the schema up to `attempts` times, doubling the delay
    /// between attempts. Returns whether the schema is ready.
    pub async fn init_schema_with_retry(&self, attempts: u32, first_delay: Duration) -> bool {
        let attempts = attempts.max(1);
        let mut delay = first_delay;

        for attempt in 1..=attempts {
            match self.ensure_schema().await {
                Ok(()) => {
                    tracing::info!(attempt, "Connected to the database, table \"contents\" is ready");
                    return true;
                }
                Err(e) if attempt < attempts => {
                    tracing::warn!(
                        attempt,
                        error = %e,
                        retry_in_ms = delay.as_millis() as u64,
                        "Database initialization failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    delay = (delay * 2).min(MAX_BACKOFF);
                }
                Err(e) => {
                    tracing::error!(
                        attempts,
                        error = ?e,
                        "Database initialization failed, serving in degraded mode"
                    );
                }
            }
        }

        false
    }

    /// Create the `contents` table if needed and remember that it exists.
    pub async fn ensure_schema(&self) -> Result<(), DbError> {
        let _guard = self.schema_lock.lock().await;
        if self.schema_ready() {
            return Ok(());
        }

        let result = self
            .bounded(async { schema::ensure(&self.pool).await.map_err(DbError::from) })
            .await;
        self.diagnosed(result).await?;

        self.schema_ready.store(true, Ordering::Release);
        Ok(())
    }

    /// Whether schema creation has succeeded at least once.
    pub fn schema_ready(&self) -> bool {
        self.schema_ready.load(Ordering::Acquire)
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn ensure_schema_if_needed(&self) -> Result<(), DbError> {
        if self.schema_ready() {
            return Ok(());
        }
        tracing::info!("Schema not confirmed yet, retrying table creation");
        self.ensure_schema().await
    }

    /// Run a query under the configured timeout.
    async fn bounded<T, F>(&self, query: F) -> Result<T, DbError>
    where
        F: Future<Output = Result<T, DbError>>,
    {
        match tokio::time::timeout(self.query_timeout, query).await {
            Ok(result) => result,
            Err(_) => Err(DbError::Timeout {
                seconds: self.query_timeout.as_secs(),
            }),
        }
    }

    /// Replace a pool timeout with the reason connections cannot be opened.
    ///
    /// The pool retries refused connections until its acquire timeout and
    /// then reports only the timeout; one direct connection attempt
    /// recovers the driver's own error.
    async fn diagnosed<T>(&self, result: Result<T, DbError>) -> Result<T, DbError> {
        match result {
            Err(DbError::Sqlx(sqlx::Error::PoolTimedOut)) => {
                let attempt = self
                    .bounded(async {
                        PgConnection::connect_with(&self.options)
                            .await
                            .map_err(DbError::from)
                    })
                    .await;

                match attempt {
                    Err(cause @ DbError::Sqlx(_)) => Err(cause),
                    Ok(conn) => {
                        // Reachable after all: the pool itself is exhausted
                        let _ = conn.close().await;
                        Err(DbError::Sqlx(sqlx::Error::PoolTimedOut))
                    }
                    Err(_) => Err(DbError::Sqlx(sqlx::Error::PoolTimedOut)),
                }
            }
            other => other,
        }
    }
}

#[async_trait]
impl ContentStore for PgContentStore {
    async fn db_time(&self) -> Result<DateTime<Utc>, DbError> {
        let result = self
            .bounded(async { db::db_now(&self.pool).await.map_err(DbError::from) })
            .await;
        self.diagnosed(result).await
    }

    async fn insert(&self, content: ContentBody) -> Result<ContentRecord, DbError> {
        self.ensure_schema_if_needed().await?;
        let result = self
            .bounded(ContentRepo::new(&self.pool).insert(&content))
            .await;
        self.diagnosed(result).await
    }

    async fn list_newest_first(&self) -> Result<Vec<ContentRecord>, DbError> {
        self.ensure_schema_if_needed().await?;
        let result = self
            .bounded(ContentRepo::new(&self.pool).list_newest_first())
            .await;
        self.diagnosed(result).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn unreachable_config() -> DatabaseConfig {
        DatabaseConfig {
            host: "127.0.0.1".to_string(),
            // Nothing listens on port 1
            port: 1,
            query_timeout: Duration::from_secs(2),
            acquire_timeout: Duration::from_millis(200),
            connect_retries: 2,
            connect_backoff: Duration::from_millis(10),
            ..DatabaseConfig::default()
        }
    }

    #[tokio::test]
    async fn initialize_returns_before_the_database_answers() {
        // Defaults: several attempts with multi-second backoff
        let config = DatabaseConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            ..DatabaseConfig::default()
        };

        let started = Instant::now();
        let store = PgContentStore::initialize(&config)
            .expect("unreachable database must not be a startup error");

        assert!(started.elapsed() < Duration::from_millis(250));
        assert!(!store.schema_ready());
    }

    #[tokio::test]
    async fn schema_retry_gives_up_and_degrades() {
        let store = PgContentStore::connect(&unreachable_config()).unwrap();

        assert!(!store.init_schema_with_retry(2, Duration::from_millis(10)).await);
        assert!(!store.schema_ready());
        assert!(!store.is_healthy().await);
    }

    #[tokio::test]
    async fn unreachable_database_reports_the_connection_error() {
        let config = unreachable_config();
        let store = PgContentStore::connect(&config).unwrap();

        let started = Instant::now();
        let err = store.db_time().await.unwrap_err();

        assert!(started.elapsed() < config.query_timeout);
        let detail = err.detail();
        assert!(!detail.contains("pool timed out"), "{detail}");
        assert!(detail.contains("error communicating with database"), "{detail}");
    }

    #[tokio::test]
    async fn content_queries_fail_while_unreachable() {
        let store = PgContentStore::connect(&unreachable_config()).unwrap();

        assert!(store.list_newest_first().await.is_err());
        assert!(store
            .insert(ContentBody::new("Hello").unwrap())
            .await
            .is_err());
    }

    #[tokio::test]
    async fn malformed_url_is_a_startup_error() {
        let config = DatabaseConfig {
            url: Some("::not-a-url::".to_string()),
            ..DatabaseConfig::default()
        };
        assert!(PgContentStore::initialize(&config).is_err());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn initialize_creates_schema() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let config = DatabaseConfig {
            url: Some(url),
            ..DatabaseConfig::default()
        };

        let store = PgContentStore::initialize(&config).unwrap();
        assert!(store.init_schema_with_retry(3, Duration::from_millis(100)).await);
        assert!(store.schema_ready());
        assert!(store.is_healthy().await);

        let created = store.insert(ContentBody::new("Hello").unwrap()).await.unwrap();
        let listed = store.list_newest_first().await.unwrap();
        assert!(listed.iter().any(|r| r.id == created.id && r.content == "Hello"));
    }
}
