//! Domain models with validation at construction
//!
//! Request input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod content;
pub mod validation;

pub use content::{ContentBody, ContentRecord};
pub use validation::ValidationError;
