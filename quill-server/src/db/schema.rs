//! Schema for the `contents` table

use sqlx::PgPool;

/// Idempotent table definition. `id` and `created_at` are database-assigned.
pub const CREATE_CONTENTS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS contents (
        id SERIAL PRIMARY KEY,
        content TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
"#;

/// Create the `contents` table if it does not exist.
pub async fn ensure(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::debug!("Ensuring contents table exists");
    sqlx::query(CREATE_CONTENTS_TABLE).execute(pool).await?;
    Ok(())
}
