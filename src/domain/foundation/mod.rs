//! Foundation module - Shared domain primitives.
//!
//! Contains the value objects and error types that form the vocabulary
//! of the SIDEO decision domain.

mod criterion_type;
mod errors;
mod rating;

pub use criterion_type::CriterionType;
pub use errors::ValidationError;
pub use rating::Rating;
