//! Importance Scale - per-factor caps and suggested score ranges.

use serde::{Deserialize, Serialize};

/// Suggested importance range for one factor, always within [0, cap].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedRange {
    pub low: u32,
    pub high: u32,
}

/// Cap and range calculations for importance scores.
///
/// The most important factor anchors the scale at 100; each following rank
/// drops the ceiling by 10 down to a floor of 40. That keeps suggestions
/// gradual instead of jumping 100 → 40 when only a few factors exist.
pub struct ImportanceScale;

impl ImportanceScale {
    /// Ceiling for the rank-1 factor.
    pub const MAX_CAP: u32 = 100;
    /// Floor below which no cap descends.
    pub const MIN_CAP: u32 = 40;

    /// Maximum importance allowed for a factor at the given 1-based rank.
    pub fn cap_for_rank(rank: usize) -> u32 {
        if rank <= 1 {
            return Self::MAX_CAP;
        }
        let cap = 100i64 - (rank as i64 - 1) * 10;
        cap.clamp(Self::MIN_CAP as i64, Self::MAX_CAP as i64) as u32
    }

    /// Range multipliers keyed by the ordinal gap between the best and
    /// second-best rated alternative for the factor.
    pub fn range_multipliers(diff: u8) -> (f64, f64) {
        match diff {
            0 => (0.75, 0.85),
            1 => (0.80, 0.90),
            2 => (0.85, 0.95),
            _ => (0.90, 1.00),
        }
    }

    /// Suggested range for a factor at `rank` with ordinal gap `diff`,
    /// clamped to [0, cap] and swap-corrected if inverted.
    pub fn suggested_range(rank: usize, diff: u8) -> SuggestedRange {
        let cap = Self::cap_for_rank(rank);
        let (low_m, high_m) = Self::range_multipliers(diff);
        let mut low = Self::clamp_round(cap as f64 * low_m, 0, cap);
        let mut high = Self::clamp_round(cap as f64 * high_m, 0, cap);
        if low > high {
            std::mem::swap(&mut low, &mut high);
        }
        SuggestedRange { low, high }
    }

    /// Rounds to the nearest integer and clamps into [min, max].
    pub(crate) fn clamp_round(value: f64, min: u32, max: u32) -> u32 {
        if !value.is_finite() {
            return min;
        }
        (value.round() as i64).clamp(min as i64, max as i64) as u32
    }
}
