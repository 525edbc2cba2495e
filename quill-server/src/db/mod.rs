//! Database layer - connection pool, schema and repositories
//!
//! # Design Principles
//!
//! - Lazily connecting pool - a dropped connection is re-established on demand
//! - Idempotent schema creation - safe to run at every start
//! - Single-statement writes - no multi-step transactions

pub mod pool;
pub mod repos;
pub mod schema;

pub use pool::{connect_lazy, db_now};
pub use repos::{ContentRepo, DbError};
