//! CBA module - Data model for the Choosing By Advantages workflow.
//!
//! The entry workflow produces four kinds of records (factors, alternatives,
//! qualitative attributes, derived advantages) plus the free-text setup
//! captured at the start of a session. `CbaSnapshot` bundles a full read of
//! those records; every analyzer takes a snapshot and returns derived views
//! without mutating it.

mod model;
mod snapshot;

pub use model::{Advantage, Alternative, Attribute, Criterion, DecisionSetup};
pub use snapshot::{CbaSnapshot, CbaSnapshotBuilder};
