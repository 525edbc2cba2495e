//! Database connection pool management
//!
//! Uses a lazily connecting sqlx PgPool: building it never touches the
//! network, so the server can start while Postgres is down and recover
//! once it comes back.

use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

/// Create a PostgreSQL connection pool without connecting.
///
/// # Arguments
///
/// * `options` - connection options (host, port, credentials, database)
/// * `max_connections` - Maximum number of connections in the pool
/// * `acquire_timeout` - How long a query waits for a connection
pub fn connect_lazy(
    options: PgConnectOptions,
    max_connections: u32,
    acquire_timeout: Duration,
) -> PgPool {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(acquire_timeout)
        .connect_lazy_with(options)
}

/// Liveness query: the database's current time.
pub async fn db_now(pool: &PgPool) -> Result<DateTime<Utc>, sqlx::Error> {
    sqlx::query_scalar("SELECT NOW()").fetch_one(pool).await
}

#[cfg(test)]
mod tests {
    use super::*;

    // Integration tests require a real database
    // Run with: DATABASE_URL=postgres://... cargo test -p quill-server -- --ignored

    fn lazy_pool_from_env() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let options: PgConnectOptions = url.parse().expect("invalid DATABASE_URL");
        connect_lazy(options, 5, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn lazy_pool_does_not_connect() {
        // Nothing listens on port 1; construction must still succeed
        let options = PgConnectOptions::new().host("127.0.0.1").port(1);
        let pool = connect_lazy(options, 1, Duration::from_millis(200));
        assert_eq!(pool.size(), 0);
        assert!(db_now(&pool).await.is_err());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn db_now_returns_server_time() {
        let pool = lazy_pool_from_env();
        let before = Utc::now() - chrono::Duration::minutes(5);
        let now = db_now(&pool).await.expect("query failed");
        assert!(now > before);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn concurrent_pool_access() {
        let pool = lazy_pool_from_env();

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let pool = pool.clone();
                tokio::spawn(async move {
                    let result: (i32,) = sqlx::query_as("SELECT $1::int")
                        .bind(i)
                        .fetch_one(&pool)
                        .await
                        .expect("concurrent query failed");
                    result.0
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let result = handle.await.expect("task panicked");
            assert_eq!(result, i as i32);
        }
    }
}
