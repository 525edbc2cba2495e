//! Repository implementations for database access

pub mod contents;

pub use contents::ContentRepo;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("query timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("database unavailable: {0}")]
    Unavailable(String),
}

impl DbError {
    /// The underlying driver message, without this crate's prefix.
    pub fn detail(&self) -> String {
        match self {
            Self::Sqlx(e) => e.to_string(),
            Self::Unavailable(message) => message.clone(),
            Self::Timeout { .. } => self.to_string(),
        }
    }
}
