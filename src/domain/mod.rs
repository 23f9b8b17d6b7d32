//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (ratings, criterion types, errors)
//! - `cba` - Core CBA records and the immutable snapshot analyzers read
//! - `analysis` - Pure domain services (scale, resolver, audits, cost engine)
//! - `report` - Deterministic Spanish renderers for digests and reports

pub mod analysis;
pub mod cba;
pub mod foundation;
pub mod report;
