//! Score Suggester - proposed importance values per best-rated cell.

use serde::{Deserialize, Serialize};

use crate::domain::cba::CbaSnapshot;

use super::{AttributeResolver, ImportanceScale, ScoreAuditor};

/// Floor multiplier so suggestions never drop too far below the cap.
const SUGGESTION_FLOOR: f64 = 0.80;

/// One proposed score for a (criterion, alternative) best cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSuggestion {
    pub criterion_id: String,
    pub criterion_name: String,
    pub alternative_id: String,
    pub alternative_name: String,
    pub field: String,
    pub cap: u32,
    pub diff: u8,
    pub suggested_low: u32,
    pub suggested_high: u32,
    pub suggested_value: u32,
    pub reason: String,
}

/// Suggests importance scores without imposing them.
///
/// Reads the factor hierarchy (first criterion anchors at 100) and the
/// ordinal gaps between rated alternatives, and proposes one value per
/// best-rated cell for the UI to prefill.
pub struct ScoreSuggester;

impl ScoreSuggester {
    /// Returns one suggestion per best-rated cell, in factor rank order.
    /// Factors without recognized ratings are skipped.
    pub fn suggest(snapshot: &CbaSnapshot) -> Vec<ScoreSuggestion> {
        let total = snapshot.criteria_count();
        let mut suggestions = Vec::new();

        for (idx, criterion) in snapshot.criteria.iter().enumerate() {
            let rank = idx + 1;
            let extremes = match AttributeResolver::resolve_factor(snapshot, &criterion.id) {
                Some(e) => e,
                None => continue,
            };

            let cap = ImportanceScale::cap_for_rank(rank);
            let (low, high, value) = if rank == 1 {
                // The most important factor starts at its cap.
                (cap, cap, cap)
            } else {
                let range = ImportanceScale::suggested_range(rank, extremes.diff);
                let floor = ImportanceScale::clamp_round(cap as f64 * SUGGESTION_FLOOR, 0, cap);
                let mut low = range.low.max(floor);
                let mut high = range.high.max(floor);
                if low > high {
                    std::mem::swap(&mut low, &mut high);
                }
                let value = ImportanceScale::clamp_round((low + high) as f64 / 2.0, 0, cap);
                (low, high, value)
            };

            for alt_id in &extremes.best_alternatives {
                suggestions.push(ScoreSuggestion {
                    criterion_id: criterion.id.clone(),
                    criterion_name: criterion.name.clone(),
                    alternative_id: alt_id.clone(),
                    alternative_name: snapshot.alternative_name(alt_id).to_string(),
                    field: ScoreAuditor::field_name(&criterion.id, alt_id),
                    cap,
                    diff: extremes.diff,
                    suggested_low: low,
                    suggested_high: high,
                    suggested_value: value,
                    reason: format!(
                        "Factor #{}/{} (cap {}). Diferencia ordinal vs 2° mejor: {}.",
                        rank, total, cap, extremes.diff
                    ),
                });
            }
        }

        suggestions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::CriterionType;

    fn snapshot() -> CbaSnapshot {
        CbaSnapshot::builder()
            .criterion("c1", "Experiencia", CriterionType::Must)
            .criterion("c2", "Plazo", CriterionType::Want)
            .alternative("a1", "Postor A")
            .alternative("a2", "Postor B")
            .attribute("c1", "a1", "Excelente")
            .attribute("c1", "a2", "Bueno")
            .attribute("c2", "a1", "Regular")
            .attribute("c2", "a2", "Bueno")
            .build()
    }

    #[test]
    fn anchor_factor_suggests_its_cap() {
        let suggestions = ScoreSuggester::suggest(&snapshot());
        let first = suggestions.iter().find(|s| s.criterion_id == "c1").unwrap();

        assert_eq!(first.cap, 100);
        assert_eq!(first.suggested_low, 100);
        assert_eq!(first.suggested_high, 100);
        assert_eq!(first.suggested_value, 100);
        assert_eq!(first.field, "imp_c1_a1");
    }

    #[test]
    fn lower_ranks_suggest_the_range_midpoint() {
        let suggestions = ScoreSuggester::suggest(&snapshot());
        let second = suggestions.iter().find(|s| s.criterion_id == "c2").unwrap();

        // cap 90, diff 1 → 72–81; midpoint rounds to 77 (76.5 → 77).
        assert_eq!(second.cap, 90);
        assert_eq!(second.suggested_low, 72);
        assert_eq!(second.suggested_high, 81);
        assert_eq!(second.suggested_value, 77);
        assert_eq!(second.alternative_name, "Postor B");
        assert!(second.reason.contains("Factor #2/2"));
    }

    #[test]
    fn floor_keeps_tied_factors_from_sinking() {
        // Rank 2, tie (diff 0) → raw range 68–77 on cap 90, floor 72.
        let snap = CbaSnapshot::builder()
            .criterion("c1", "Experiencia", CriterionType::Must)
            .criterion("c2", "Plazo", CriterionType::Want)
            .alternative("a1", "Postor A")
            .alternative("a2", "Postor B")
            .attribute("c1", "a1", "Excelente")
            .attribute("c1", "a2", "Bueno")
            .attribute("c2", "a1", "Bueno")
            .attribute("c2", "a2", "Bueno")
            .build();

        let suggestions = ScoreSuggester::suggest(&snap);
        let second = suggestions.iter().find(|s| s.criterion_id == "c2").unwrap();
        assert_eq!(second.suggested_low, 72);
        assert_eq!(second.suggested_high, 77);
    }

    #[test]
    fn ties_produce_one_suggestion_per_best_alternative() {
        let snap = CbaSnapshot::builder()
            .criterion("c1", "Experiencia", CriterionType::Must)
            .alternative("a1", "Postor A")
            .alternative("a2", "Postor B")
            .attribute("c1", "a1", "Excelente")
            .attribute("c1", "a2", "Excelente")
            .build();

        let suggestions = ScoreSuggester::suggest(&snap);
        assert_eq!(suggestions.len(), 2);
        assert!(suggestions.iter().all(|s| s.suggested_value == 100));
    }

    #[test]
    fn unrated_factors_are_skipped() {
        let snap = CbaSnapshot::builder()
            .criterion("c1", "Experiencia", CriterionType::Must)
            .criterion("c2", "Sin atributos", CriterionType::Want)
            .alternative("a1", "Postor A")
            .attribute("c1", "a1", "Bueno")
            .build();

        let suggestions = ScoreSuggester::suggest(&snap);
        assert!(suggestions.iter().all(|s| s.criterion_id == "c1"));
    }
}
