//! Analysis Module - Pure domain services for the CBA workflow.
//!
//! This module contains stateless services that operate on a [`CbaSnapshot`]
//! to perform the deterministic calculations behind each step of the method.
//!
//! # Components
//!
//! - `ImportanceScale` - Per-factor caps and suggested score ranges
//! - `AttributeResolver` - Best/least-preferred attributes, derived advantages
//! - `ScoreAuditor` - Validation of submitted importance scores
//! - `ScoreSuggester` - Proposed importance values per best-rated cell
//! - `CostRatioEngine` - Cost-per-advantage ranking and cost audit
//! - `InconsistencyDetector` - Combined duplicate/score/cost flag payload
//!
//! # Design Philosophy
//!
//! All services are pure and stateless. They read a snapshot of the domain
//! data and return computed results; persistence and rendering live at the
//! edges. No ports or adapters are needed here since there's no I/O.
//!
//! [`CbaSnapshot`]: crate::domain::cba::CbaSnapshot

mod attribute_resolver;
mod cost_ratio;
mod inconsistency;
mod scale;
mod score_auditor;
mod suggestions;

pub use attribute_resolver::{AttributeResolver, FactorExtremes};
pub use cost_ratio::{
    infer_cost_context, CostAudit, CostContext, CostPolicy, CostRanking, CostRatioEngine, CostRow,
    HIGH_COST_FACTOR, LOW_RATIO_FACTOR,
};
pub use inconsistency::{
    CostFlag, CostFlagKind, InconsistencyDetector, InconsistencyMeta, InconsistencyPayload,
    ScoreFlag, ScoreFlagKind,
};
pub use scale::{ImportanceScale, SuggestedRange};
pub use score_auditor::{
    AuditSummary, EnabledCell, ScoreAuditReport, ScoreAuditor, RANGE_TOLERANCE,
};
pub use suggestions::{ScoreSuggester, ScoreSuggestion};
