//! Report Module - Deterministic Spanish renderers.
//!
//! Every LLM-backed message in the workflow has a deterministic equivalent
//! here; the LLM only rewrites what these renderers already computed.
//!
//! # Components
//!
//! - `DigestRenderer` - ≤9-line score/cost digests with fixed prefixes
//! - `InconsistencyReport` - multi-section report from the flag payload
//! - `DecisionSummary` - one-paragraph recommendation for the dashboard

mod decision_summary;
mod digest;
mod inconsistency_report;

pub use decision_summary::DecisionSummary;
pub use digest::{DigestRenderer, MAX_DIGEST_LINES};
pub use inconsistency_report::InconsistencyReport;
