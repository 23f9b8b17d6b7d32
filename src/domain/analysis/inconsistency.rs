//! Inconsistency Detector - combined duplicate/score/cost flag payload.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::cba::CbaSnapshot;
use crate::domain::foundation::ValidationError;

use super::cost_ratio::{self, CostRow, HIGH_COST_FACTOR, LOW_RATIO_FACTOR};
use super::{AttributeResolver, ImportanceScale};

/// Near-max fraction of the cap for the low-diff check.
const DIFF_LOW_NEAR_MAX: f64 = 0.90;
/// Near-max fraction of the cap for the weak-label check.
const WEAK_LABEL_NEAR_MAX: f64 = 0.85;
/// Tolerance, in points, around the suggested range.
const RANGE_TOLERANCE: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFlagKind {
    OverCap,
    DiffLowButHigh,
    WeakLabelHigh,
    OutsideSuggestedRange,
}

/// One incoherence between a persisted importance score and its context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreFlag {
    #[serde(rename = "type")]
    pub kind: ScoreFlagKind,
    pub criterion: String,
    pub alternative: String,
    pub importance: u32,
    pub cap: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_low: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_high: Option<u32>,
    pub detail: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostFlagKind {
    MissingCost,
    HighCostOutlier,
    ZeroTotal,
    LowRatioOutlier,
}

/// One cost-side flag from the dashboard rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostFlag {
    #[serde(rename = "type")]
    pub kind: CostFlagKind,
    /// Single alternative, for per-row flags.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternative: Option<String>,
    /// Aggregated names, for the missing-cost flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternatives: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub median_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub median_ratio: Option<f64>,
    pub detail: String,
}

/// Counts and medians accompanying the flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InconsistencyMeta {
    pub criteria_count: usize,
    pub alternatives_count: usize,
    pub median_cost: Option<f64>,
    pub median_total: Option<f64>,
    pub median_ratio: Option<f64>,
}

/// Combined inconsistency payload, consumed by the LLM summarizer or the
/// deterministic multi-section report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InconsistencyPayload {
    /// Groups of criterion names that collapse to the same normalized key.
    pub duplicates: Vec<Vec<String>>,
    pub score_flags: Vec<ScoreFlag>,
    pub cost_flags: Vec<CostFlag>,
    pub meta: InconsistencyMeta,
}

impl InconsistencyPayload {
    /// Returns true when no flag of any kind was raised.
    pub fn is_clean(&self) -> bool {
        self.duplicates.is_empty() && self.score_flags.is_empty() && self.cost_flags.is_empty()
    }
}

/// Recomputes all flags over persisted data plus the dashboard rows.
pub struct InconsistencyDetector;

impl InconsistencyDetector {
    /// Runs the full detection pass. An empty dashboard is a hard error:
    /// there is nothing meaningful to audit before costs exist.
    pub fn detect(
        snapshot: &CbaSnapshot,
        dashboard: &[CostRow],
    ) -> Result<InconsistencyPayload, ValidationError> {
        if dashboard.is_empty() {
            return Err(ValidationError::empty_field("dashboard"));
        }

        let mut payload = InconsistencyPayload {
            duplicates: Self::duplicate_criteria(snapshot),
            ..Default::default()
        };

        Self::collect_score_flags(snapshot, &mut payload.score_flags);
        Self::collect_cost_flags(dashboard, &mut payload);

        payload.meta.criteria_count = snapshot.criteria.len();
        payload.meta.alternatives_count = snapshot.alternatives.len();
        Ok(payload)
    }

    /// Criterion names grouped by case/whitespace-normalized key.
    fn duplicate_criteria(snapshot: &CbaSnapshot) -> Vec<Vec<String>> {
        let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for criterion in &snapshot.criteria {
            let key = normalize_name_key(&criterion.name);
            if key.is_empty() {
                continue;
            }
            groups.entry(key).or_default().push(criterion.name.clone());
        }
        groups.into_values().filter(|g| g.len() > 1).collect()
    }

    fn collect_score_flags(snapshot: &CbaSnapshot, flags: &mut Vec<ScoreFlag>) {
        for (idx, criterion) in snapshot.criteria.iter().enumerate() {
            let rank = idx + 1;
            let extremes = match AttributeResolver::resolve_factor(snapshot, &criterion.id) {
                Some(e) => e,
                None => continue,
            };

            let cap = ImportanceScale::cap_for_rank(rank);
            let range = ImportanceScale::suggested_range(rank, extremes.diff);

            for alt_id in &extremes.best_alternatives {
                let advantage = match snapshot.advantage_for(&criterion.id, alt_id) {
                    Some(a) => a,
                    None => continue,
                };
                let imp = advantage.importance;
                let label = advantage.description.trim();
                let alt_name = snapshot.alternative_name(alt_id).to_string();

                if imp > cap {
                    flags.push(ScoreFlag {
                        kind: ScoreFlagKind::OverCap,
                        criterion: criterion.name.clone(),
                        alternative: alt_name.clone(),
                        importance: imp,
                        cap,
                        diff: None,
                        label: None,
                        suggested_low: None,
                        suggested_high: None,
                        detail: "El puntaje supera el máximo sugerido por orden del factor."
                            .to_string(),
                    });
                }

                if extremes.diff <= 1 && imp >= (DIFF_LOW_NEAR_MAX * cap as f64) as u32 {
                    flags.push(ScoreFlag {
                        kind: ScoreFlagKind::DiffLowButHigh,
                        criterion: criterion.name.clone(),
                        alternative: alt_name.clone(),
                        importance: imp,
                        cap,
                        diff: Some(extremes.diff),
                        label: None,
                        suggested_low: None,
                        suggested_high: None,
                        detail:
                            "La diferencia frente al 2° mejor es baja, pero el puntaje está cerca del máximo."
                                .to_string(),
                    });
                }

                if matches!(label, "Cumple" | "Regular")
                    && imp >= (WEAK_LABEL_NEAR_MAX * cap as f64) as u32
                {
                    flags.push(ScoreFlag {
                        kind: ScoreFlagKind::WeakLabelHigh,
                        criterion: criterion.name.clone(),
                        alternative: alt_name.clone(),
                        importance: imp,
                        cap,
                        diff: None,
                        label: Some(label.to_string()),
                        suggested_low: None,
                        suggested_high: None,
                        detail:
                            "La calificación cualitativa es baja, pero el puntaje asignado es muy alto."
                                .to_string(),
                    });
                }

                let low_floor = range.low.saturating_sub(RANGE_TOLERANCE);
                let high_ceiling = (range.high + RANGE_TOLERANCE).min(cap);
                if imp < low_floor || imp > high_ceiling {
                    flags.push(ScoreFlag {
                        kind: ScoreFlagKind::OutsideSuggestedRange,
                        criterion: criterion.name.clone(),
                        alternative: alt_name,
                        importance: imp,
                        cap,
                        diff: Some(extremes.diff),
                        label: None,
                        suggested_low: Some(range.low),
                        suggested_high: Some(range.high),
                        detail: "El puntaje está fuera del rango sugerido por diferencia de atributos."
                            .to_string(),
                    });
                }
            }
        }
    }

    fn collect_cost_flags(dashboard: &[CostRow], payload: &mut InconsistencyPayload) {
        let costs: Vec<f64> = dashboard
            .iter()
            .filter_map(|r| r.cost.filter(|c| c.is_finite()))
            .collect();
        let totals: Vec<f64> = dashboard.iter().map(|r| r.total as f64).collect();
        let ratios: Vec<f64> = dashboard
            .iter()
            .filter_map(|r| r.ratio.filter(|v| v.is_finite()))
            .collect();

        let median_cost = cost_ratio::median(&costs);
        let median_total = cost_ratio::median(&totals);
        let median_ratio = cost_ratio::median(&ratios);
        payload.meta.median_cost = median_cost;
        payload.meta.median_total = median_total;
        payload.meta.median_ratio = median_ratio;

        let missing: Vec<String> = dashboard
            .iter()
            .filter(|r| r.cost.filter(|c| c.is_finite()).is_none())
            .map(|r| r.name.clone())
            .collect();
        if !missing.is_empty() {
            payload.cost_flags.push(CostFlag {
                kind: CostFlagKind::MissingCost,
                alternative: None,
                alternatives: Some(missing),
                cost: None,
                median_cost: None,
                ratio: None,
                median_ratio: None,
                detail: "Faltan costos: impide evaluar costo/ventaja con confianza.".to_string(),
            });
        }

        if let Some(med) = median_cost.filter(|m| *m > 0.0) {
            for row in dashboard {
                if let Some(c) = row.cost.filter(|c| c.is_finite()) {
                    if c >= HIGH_COST_FACTOR * med {
                        payload.cost_flags.push(CostFlag {
                            kind: CostFlagKind::HighCostOutlier,
                            alternative: Some(row.name.clone()),
                            alternatives: None,
                            cost: Some(c),
                            median_cost: Some(med),
                            ratio: row.ratio,
                            median_ratio: None,
                            detail:
                                "Costo muy por encima de la mediana (posible desproporción o unidad incorrecta)."
                                    .to_string(),
                        });
                    }
                }
            }
        }

        for row in dashboard {
            if row.total == 0 {
                payload.cost_flags.push(CostFlag {
                    kind: CostFlagKind::ZeroTotal,
                    alternative: Some(row.name.clone()),
                    alternatives: None,
                    cost: None,
                    median_cost: None,
                    ratio: None,
                    median_ratio: None,
                    detail: "Ventaja total = 0 (revisa si faltan puntajes en Paso 8)."
                        .to_string(),
                });
            }
        }

        if let Some(med) = median_ratio.filter(|m| *m > 0.0) {
            for row in dashboard {
                if let Some(r) = row.ratio.filter(|v| v.is_finite()) {
                    if r <= LOW_RATIO_FACTOR * med {
                        payload.cost_flags.push(CostFlag {
                            kind: CostFlagKind::LowRatioOutlier,
                            alternative: Some(row.name.clone()),
                            alternatives: None,
                            cost: None,
                            median_cost: None,
                            ratio: Some(r),
                            median_ratio: Some(med),
                            detail: "Relación ventajas/costo muy por debajo de la mediana."
                                .to_string(),
                        });
                    }
                }
            }
        }
    }
}

fn normalize_name_key(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::CostRatioEngine;
    use crate::domain::foundation::CriterionType;

    #[test]
    fn empty_dashboard_is_a_validation_error() {
        let snap = CbaSnapshot::empty();
        let err = InconsistencyDetector::detect(&snap, &[]).unwrap_err();
        assert!(err.to_string().contains("dashboard"));
    }

    fn row(name: &str, cost: Option<f64>, total: u32) -> CostRow {
        CostRow {
            alternative_id: name.to_lowercase(),
            name: name.to_string(),
            cost,
            total,
            ratio: match (cost, total) {
                (Some(c), t) if t > 0 => Some(c / t as f64),
                _ => None,
            },
        }
    }

    #[test]
    fn duplicate_criterion_names_group_by_normalized_key() {
        let snap = CbaSnapshot::builder()
            .criterion("c1", "Experiencia", CriterionType::Must)
            .criterion("c2", "  experiencia ", CriterionType::Want)
            .criterion("c3", "Plazo", CriterionType::Want)
            .build();

        let payload = InconsistencyDetector::detect(&snap, &[row("A", Some(100.0), 10)]).unwrap();
        assert_eq!(payload.duplicates.len(), 1);
        assert_eq!(
            payload.duplicates[0],
            vec!["Experiencia".to_string(), "  experiencia ".to_string()]
        );
    }

    #[test]
    fn over_cap_advantage_is_flagged() {
        // Rank 2 → cap 90; importance 95.
        let snap = CbaSnapshot::builder()
            .criterion("c1", "Experiencia", CriterionType::Must)
            .criterion("c2", "Plazo", CriterionType::Want)
            .alternative("a1", "Postor A")
            .alternative("a2", "Postor B")
            .attribute("c2", "a1", "Excelente")
            .attribute("c2", "a2", "Bueno")
            .advantage_with_description("c2", "a1", 95, "Excelente")
            .build();

        let payload = InconsistencyDetector::detect(&snap, &[row("Postor A", Some(100.0), 95)]).unwrap();
        assert!(payload
            .score_flags
            .iter()
            .any(|f| f.kind == ScoreFlagKind::OverCap && f.cap == 90 && f.importance == 95));
    }

    #[test]
    fn low_diff_near_max_score_is_flagged() {
        // diff 1, cap 100, importance 90 ≥ trunc(0.90·100).
        let snap = CbaSnapshot::builder()
            .criterion("c1", "Experiencia", CriterionType::Must)
            .alternative("a1", "Postor A")
            .alternative("a2", "Postor B")
            .attribute("c1", "a1", "Excelente")
            .attribute("c1", "a2", "Bueno")
            .advantage_with_description("c1", "a1", 90, "Excelente")
            .build();

        let payload = InconsistencyDetector::detect(&snap, &[row("Postor A", Some(100.0), 90)]).unwrap();
        assert!(payload
            .score_flags
            .iter()
            .any(|f| f.kind == ScoreFlagKind::DiffLowButHigh && f.diff == Some(1)));
    }

    #[test]
    fn weak_label_with_high_score_is_flagged() {
        // Single rated cell: Cumple, diff 0 by the single-rating rule is
        // max(1, 1-3) → best 1, second 1, diff 0; cap 100; importance 85.
        let snap = CbaSnapshot::builder()
            .criterion("c1", "Experiencia", CriterionType::Must)
            .alternative("a1", "Postor A")
            .attribute("c1", "a1", "Cumple")
            .advantage_with_description("c1", "a1", 85, "Cumple")
            .build();

        let payload = InconsistencyDetector::detect(&snap, &[row("Postor A", Some(100.0), 85)]).unwrap();
        assert!(payload
            .score_flags
            .iter()
            .any(|f| f.kind == ScoreFlagKind::WeakLabelHigh && f.label.as_deref() == Some("Cumple")));
    }

    #[test]
    fn score_inside_tolerated_range_raises_no_range_flag() {
        // cap 100, diff 1 → suggested 80–90, tolerance 5 → 75..95 passes.
        let snap = CbaSnapshot::builder()
            .criterion("c1", "Experiencia", CriterionType::Must)
            .alternative("a1", "Postor A")
            .alternative("a2", "Postor B")
            .attribute("c1", "a1", "Excelente")
            .attribute("c1", "a2", "Bueno")
            .advantage_with_description("c1", "a1", 82, "Excelente")
            .build();

        let payload = InconsistencyDetector::detect(&snap, &[row("Postor A", Some(100.0), 82)]).unwrap();
        assert!(!payload
            .score_flags
            .iter()
            .any(|f| f.kind == ScoreFlagKind::OutsideSuggestedRange));
    }

    #[test]
    fn cost_flags_cover_missing_outlier_zero_total_and_low_ratio() {
        let snap = CbaSnapshot::empty();
        let dashboard = vec![
            row("A", Some(100.0), 10),
            row("B", Some(100.0), 10),
            row("Caro", Some(260.0), 10),
            row("Sin costo", None, 10),
            row("Sin ventajas", Some(100.0), 0),
        ];

        let payload = InconsistencyDetector::detect(&snap, &dashboard).unwrap();

        let kinds: Vec<CostFlagKind> = payload.cost_flags.iter().map(|f| f.kind).collect();
        assert!(kinds.contains(&CostFlagKind::MissingCost));
        assert!(kinds.contains(&CostFlagKind::HighCostOutlier));
        assert!(kinds.contains(&CostFlagKind::ZeroTotal));

        let missing = payload
            .cost_flags
            .iter()
            .find(|f| f.kind == CostFlagKind::MissingCost)
            .unwrap();
        assert_eq!(missing.alternatives.as_deref(), Some(&["Sin costo".to_string()][..]));

        assert_eq!(payload.meta.alternatives_count, 0);
        assert_eq!(payload.meta.median_cost, Some(100.0));
    }

    #[test]
    fn payload_round_trips_through_the_engine() {
        let snap = CbaSnapshot::builder()
            .criterion("c1", "Experiencia", CriterionType::Must)
            .costed_alternative("a1", "Postor A", 100.0)
            .costed_alternative("a2", "Postor B", 150.0)
            .attribute("c1", "a1", "Excelente")
            .attribute("c1", "a2", "Bueno")
            .advantage_with_description("c1", "a1", 95, "Excelente")
            .build();

        let ranking = CostRatioEngine::rank(&snap);
        let payload = InconsistencyDetector::detect(&snap, &ranking.rows).unwrap();

        assert_eq!(payload.meta.criteria_count, 1);
        assert_eq!(payload.meta.alternatives_count, 2);

        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains("\"type\":\"diff_low_but_high\""));
        let back: InconsistencyPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(back, payload);
    }
}
