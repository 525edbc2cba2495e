//! Route handlers organized by resource

pub mod content;
pub mod fallback;
pub mod health;
