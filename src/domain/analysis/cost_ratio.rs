//! Cost/Ratio Engine - cost-per-advantage ranking and cost plausibility audit.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::cba::{CbaSnapshot, DecisionSetup};

/// Cost multiple of the median at or above which a cost is an outlier.
pub const HIGH_COST_FACTOR: f64 = 2.5;
/// Ratio fraction of the median at or below which efficiency looks implausible.
pub const LOW_RATIO_FACTOR: f64 = 0.25;

/// Thresholds for the context heuristic; soft rules, not hard validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostPolicy {
    /// Ceiling (S/) above which a cost looks high for a person-level contract.
    pub person_cost_ceiling: f64,
}

impl Default for CostPolicy {
    fn default() -> Self {
        Self {
            person_cost_ceiling: 25_000.0,
        }
    }
}

/// One alternative's row in the cost-versus-advantage view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostRow {
    pub alternative_id: String,
    pub name: String,
    pub cost: Option<f64>,
    /// Sum of the importance scores of the alternative's advantages.
    pub total: u32,
    /// Cost per advantage point; `None` when cost is absent or total is 0.
    pub ratio: Option<f64>,
}

/// Ranked cost view: rows plus winner/runner-up delta stats.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostRanking {
    /// Rows sorted by total importance, descending (presentation order).
    pub rows: Vec<CostRow>,
    /// Alternative with the minimum defined ratio, if any.
    pub winner: Option<CostRow>,
    /// Next-lowest defined ratio after the winner.
    pub second: Option<CostRow>,
    pub delta_ratio: Option<f64>,
    pub delta_pct: Option<f64>,
}

/// Inferred scale of the amounts under evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostContext {
    Person,
    Company,
    #[default]
    Unknown,
}

impl CostContext {
    /// Spanish label used in notes and payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            CostContext::Person => "persona",
            CostContext::Company => "empresa",
            CostContext::Unknown => "desconocido",
        }
    }
}

/// Findings of the cost plausibility audit. Advisory only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostAudit {
    /// Alternatives without a usable cost.
    pub missing: Vec<String>,
    /// Alternatives whose cost is present but not a finite number.
    pub non_numeric: Vec<String>,
    pub min_cost: Option<f64>,
    pub max_cost: Option<f64>,
    pub median_cost: Option<f64>,
    pub median_ratio: Option<f64>,
    /// Names with cost ≥ 2.5× the median cost.
    pub outlier_high: Vec<String>,
    /// Names with ratio ≤ 0.25× the median ratio.
    pub ratio_low: Vec<String>,
    pub context: CostContext,
    pub context_reason: String,
    pub context_note: Option<String>,
    pub context_warnings: Vec<String>,
}

impl CostAudit {
    /// Returns true when no finding requires user attention.
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty()
            && self.non_numeric.is_empty()
            && self.outlier_high.is_empty()
            && self.ratio_low.is_empty()
            && self.context_warnings.is_empty()
    }
}

static PERSON_ROLE_TOKENS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "residente",
        "gerente",
        "jefe",
        "director",
        "coordinador",
        "supervisor",
        "ingeniero",
        "arquitecto",
        "analista",
        "especialista",
        "asistente",
        "consultor",
    ]
    .into_iter()
    .collect()
});

static COMPANY_TOKENS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "sac",
        "s.a.c",
        "sa",
        "s.a.",
        "srl",
        "s.r.l",
        "eirl",
        "e.i.r.l",
        "cia",
        "compañia",
        "compania",
        "empresa",
        "consorcio",
        "corporacion",
        "corporación",
        "ltda",
    ]
    .into_iter()
    .collect()
});

static PUBLIC_ENTITY_TOKENS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "gobierno",
        "municipal",
        "municipalidad",
        "ministerio",
        "regional",
    ]
    .into_iter()
    .collect()
});

/// Cost-per-advantage computations over a snapshot.
pub struct CostRatioEngine;

impl CostRatioEngine {
    /// Sum of advantage importances for one alternative.
    pub fn total_importance(snapshot: &CbaSnapshot, alternative_id: &str) -> u32 {
        snapshot
            .advantages_for(alternative_id)
            .iter()
            .map(|a| a.importance)
            .sum()
    }

    /// Builds the ranked cost view.
    ///
    /// Rows come out sorted by total importance, descending; the winner is
    /// the minimum defined ratio with ties broken by input order.
    pub fn rank(snapshot: &CbaSnapshot) -> CostRanking {
        let ordered: Vec<CostRow> = snapshot
            .alternatives
            .iter()
            .map(|alt| {
                let total = Self::total_importance(snapshot, &alt.id);
                let cost = alt.cost.filter(|c| c.is_finite());
                let ratio = match (cost, total) {
                    (Some(c), t) if t > 0 => Some(c / t as f64),
                    _ => None,
                };
                CostRow {
                    alternative_id: alt.id.clone(),
                    name: alt.name.clone(),
                    cost: alt.cost,
                    total,
                    ratio,
                }
            })
            .collect();

        // Strict less-than keeps the first-encountered row on ties.
        let winner = ordered
            .iter()
            .filter(|r| r.ratio.is_some())
            .fold(None::<&CostRow>, |best, row| match best {
                Some(b) if row.ratio < b.ratio => Some(row),
                Some(b) => Some(b),
                None => Some(row),
            })
            .cloned();

        let second = winner.as_ref().and_then(|w| {
            ordered
                .iter()
                .filter(|r| r.alternative_id != w.alternative_id && r.ratio.is_some())
                .fold(None::<&CostRow>, |best, row| match best {
                    Some(b) if row.ratio < b.ratio => Some(row),
                    Some(b) => Some(b),
                    None => Some(row),
                })
                .cloned()
        });

        let delta_ratio = match (&winner, &second) {
            (Some(w), Some(s)) => match (w.ratio, s.ratio) {
                (Some(wr), Some(sr)) => Some(sr - wr),
                _ => None,
            },
            _ => None,
        };
        let delta_pct = match (&second, delta_ratio) {
            (Some(s), Some(delta)) => s.ratio.filter(|r| *r > 0.0).map(|r| delta / r * 100.0),
            _ => None,
        };

        let mut rows = ordered;
        rows.sort_by(|a, b| b.total.cmp(&a.total));

        CostRanking {
            rows,
            winner,
            second,
            delta_ratio,
            delta_pct,
        }
    }

    /// Audits costs for plausibility: missing/non-numeric values, outliers
    /// against the medians, and the person-versus-company context heuristic.
    pub fn audit(rows: &[CostRow], setup: &DecisionSetup, policy: &CostPolicy) -> CostAudit {
        let mut audit = CostAudit::default();

        let mut costs: Vec<f64> = Vec::new();
        let mut ratios: Vec<f64> = Vec::new();

        for row in rows {
            match row.cost {
                Some(c) if c.is_finite() => costs.push(c),
                Some(_) => {
                    push_unique(&mut audit.non_numeric, &row.name);
                    push_unique(&mut audit.missing, &row.name);
                }
                None => push_unique(&mut audit.missing, &row.name),
            }
            if let Some(r) = row.ratio.filter(|r| r.is_finite()) {
                ratios.push(r);
            }
        }

        audit.min_cost = costs.iter().cloned().reduce(f64::min);
        audit.max_cost = costs.iter().cloned().reduce(f64::max);
        audit.median_cost = median(&costs);
        audit.median_ratio = median(&ratios);

        if let Some(med) = audit.median_cost.filter(|m| *m > 0.0) {
            for row in rows {
                if let Some(c) = row.cost.filter(|c| c.is_finite()) {
                    if c >= HIGH_COST_FACTOR * med {
                        audit.outlier_high.push(row.name.clone());
                    }
                }
            }
        }

        if let Some(med) = audit.median_ratio.filter(|m| *m > 0.0) {
            for row in rows {
                if let Some(r) = row.ratio.filter(|r| r.is_finite()) {
                    if r <= LOW_RATIO_FACTOR * med {
                        audit.ratio_low.push(row.name.clone());
                    }
                }
            }
        }

        let (context, reason) = infer_cost_context(setup);
        audit.context = context;
        audit.context_reason = reason;
        if audit.context != CostContext::Unknown {
            audit.context_note = Some(format!(
                "Contexto detectado: {} ({}).",
                audit.context.as_str(),
                audit.context_reason
            ));
        }

        if let Some(max_cost) = audit.max_cost {
            if audit.context == CostContext::Person && max_cost > policy.person_cost_ceiling {
                audit.context_warnings.push(format!(
                    "Monto alto para rol de persona: S/ {} (esperable ≤ S/ {}).",
                    max_cost.round() as i64,
                    policy.person_cost_ceiling as i64
                ));
            }
            if audit.context == CostContext::Company && max_cost <= policy.person_cost_ceiling {
                audit.context_warnings.push(format!(
                    "Monto bajo para empresa/entidad: máximo S/ {} (revisa si falta un cero o si es mensual).",
                    max_cost.round() as i64
                ));
            }
        }

        audit
    }
}

/// Guesses whether the amounts belong to a person-level contract or a
/// company/entity, from the free-text setup fields.
pub fn infer_cost_context(setup: &DecisionSetup) -> (CostContext, String) {
    let requesting_area = normalize(setup.requesting_area.as_deref().unwrap_or(""));
    if !requesting_area.is_empty()
        && requesting_area
            .split_whitespace()
            .any(|tok| PERSON_ROLE_TOKENS.contains(tok))
    {
        let shown = setup.requesting_area.as_deref().unwrap_or("");
        return (
            CostContext::Person,
            format!("área solicitante contiene rol ({})", shown),
        );
    }

    let entity = format!(
        "{} {}",
        normalize(setup.public_entity.as_deref().unwrap_or("")),
        normalize(setup.private_company.as_deref().unwrap_or(""))
    );
    let entity = entity.trim();
    if !entity.is_empty() {
        if entity
            .split_whitespace()
            .any(|tok| COMPANY_TOKENS.contains(tok))
        {
            return (
                CostContext::Company,
                "solicitante parece empresa (siglas/razón social)".to_string(),
            );
        }
        if entity
            .split_whitespace()
            .any(|tok| PUBLIC_ENTITY_TOKENS.contains(tok))
        {
            return (
                CostContext::Company,
                "solicitante parece entidad pública".to_string(),
            );
        }
    }

    (CostContext::Unknown, "sin señales claras".to_string())
}

/// Median of the values; `None` when empty.
pub(crate) fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|e| e == value) {
        list.push(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::CriterionType;

    fn snapshot_with_costs(costs: &[(&str, &str, Option<f64>, u32)]) -> CbaSnapshot {
        let mut builder = CbaSnapshot::builder().criterion("c1", "Experiencia", CriterionType::Must);
        for (id, name, cost, importance) in costs {
            builder = match cost {
                Some(c) => builder.costed_alternative(*id, *name, *c),
                None => builder.alternative(*id, *name),
            };
            if *importance > 0 {
                builder = builder.advantage("c1", *id, *importance);
            }
        }
        builder.build()
    }

    #[test]
    fn ratio_winner_and_delta_match_the_reference_case() {
        let snap = snapshot_with_costs(&[
            ("a1", "A", Some(100.0), 10),
            ("a2", "B", Some(150.0), 10),
        ]);
        let ranking = CostRatioEngine::rank(&snap);

        let winner = ranking.winner.as_ref().unwrap();
        assert_eq!(winner.name, "A");
        assert_eq!(winner.ratio, Some(10.0));
        assert_eq!(ranking.second.as_ref().unwrap().ratio, Some(15.0));
        assert_eq!(ranking.delta_ratio, Some(5.0));
        let pct = ranking.delta_pct.unwrap();
        assert!((pct - 33.333333).abs() < 1e-4);
    }

    #[test]
    fn rows_sort_by_total_descending() {
        let snap = snapshot_with_costs(&[
            ("a1", "A", Some(100.0), 10),
            ("a2", "B", Some(100.0), 30),
            ("a3", "C", Some(100.0), 20),
        ]);
        let ranking = CostRatioEngine::rank(&snap);
        let names: Vec<&str> = ranking.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["B", "C", "A"]);
    }

    #[test]
    fn ratio_is_undefined_without_cost_or_with_zero_total() {
        let snap = snapshot_with_costs(&[
            ("a1", "Sin costo", None, 10),
            ("a2", "Sin ventajas", Some(500.0), 0),
        ]);
        let ranking = CostRatioEngine::rank(&snap);

        assert!(ranking.rows.iter().all(|r| r.ratio.is_none()));
        assert!(ranking.winner.is_none());
        assert!(ranking.delta_ratio.is_none());
    }

    #[test]
    fn ratio_tie_keeps_first_encountered_winner() {
        let snap = snapshot_with_costs(&[
            ("a1", "A", Some(100.0), 10),
            ("a2", "B", Some(200.0), 20),
        ]);
        let ranking = CostRatioEngine::rank(&snap);
        assert_eq!(ranking.winner.as_ref().unwrap().name, "A");
        assert_eq!(ranking.second.as_ref().unwrap().name, "B");
        assert_eq!(ranking.delta_ratio, Some(0.0));
    }

    #[test]
    fn rank_is_idempotent() {
        let snap = snapshot_with_costs(&[
            ("a1", "A", Some(100.0), 10),
            ("a2", "B", Some(150.0), 10),
        ]);
        assert_eq!(CostRatioEngine::rank(&snap), CostRatioEngine::rank(&snap));
    }

    #[test]
    fn high_cost_outlier_boundary_at_two_point_five_median() {
        // Median cost 100: 260 ≥ 2.5·100, 240 is not.
        let snap = snapshot_with_costs(&[
            ("a1", "A", Some(100.0), 10),
            ("a2", "B", Some(100.0), 10),
            ("a3", "Caro", Some(260.0), 10),
        ]);
        let ranking = CostRatioEngine::rank(&snap);
        let audit = CostRatioEngine::audit(&ranking.rows, &DecisionSetup::new(), &CostPolicy::default());
        assert_eq!(audit.outlier_high, vec!["Caro".to_string()]);

        let snap = snapshot_with_costs(&[
            ("a1", "A", Some(100.0), 10),
            ("a2", "B", Some(100.0), 10),
            ("a3", "Casi", Some(240.0), 10),
        ]);
        let ranking = CostRatioEngine::rank(&snap);
        let audit = CostRatioEngine::audit(&ranking.rows, &DecisionSetup::new(), &CostPolicy::default());
        assert!(audit.outlier_high.is_empty());
    }

    #[test]
    fn low_ratio_outlier_flags_implausible_efficiency() {
        // Ratios: 10, 10, 2 → median 10; 2 ≤ 0.25·10.
        let snap = snapshot_with_costs(&[
            ("a1", "A", Some(100.0), 10),
            ("a2", "B", Some(100.0), 10),
            ("a3", "Barato", Some(20.0), 10),
        ]);
        let ranking = CostRatioEngine::rank(&snap);
        let audit = CostRatioEngine::audit(&ranking.rows, &DecisionSetup::new(), &CostPolicy::default());
        assert_eq!(audit.ratio_low, vec!["Barato".to_string()]);
    }

    #[test]
    fn missing_cost_is_reported_by_name() {
        let snap = snapshot_with_costs(&[
            ("a1", "A", Some(100.0), 10),
            ("a2", "Sin costo", None, 10),
        ]);
        let ranking = CostRatioEngine::rank(&snap);
        let audit = CostRatioEngine::audit(&ranking.rows, &DecisionSetup::new(), &CostPolicy::default());
        assert_eq!(audit.missing, vec!["Sin costo".to_string()]);
        assert!(audit.non_numeric.is_empty());
    }

    #[test]
    fn context_inference_recognizes_roles_and_companies() {
        let setup = DecisionSetup::new().with_requesting_area("Supervisor de obra");
        assert_eq!(infer_cost_context(&setup).0, CostContext::Person);

        let setup = DecisionSetup::new().with_private_company("Constructora Andina SAC");
        assert_eq!(infer_cost_context(&setup).0, CostContext::Company);

        let setup = DecisionSetup::new().with_public_entity("Gobierno Regional de Cusco");
        let (ctx, reason) = infer_cost_context(&setup);
        assert_eq!(ctx, CostContext::Company);
        assert!(reason.contains("entidad pública"));

        assert_eq!(infer_cost_context(&DecisionSetup::new()).0, CostContext::Unknown);
    }

    #[test]
    fn person_context_warns_above_the_ceiling() {
        let snap = snapshot_with_costs(&[("a1", "A", Some(30_000.0), 10)]);
        let ranking = CostRatioEngine::rank(&snap);
        let setup = DecisionSetup::new().with_requesting_area("Residente de obra");
        let audit = CostRatioEngine::audit(&ranking.rows, &setup, &CostPolicy::default());

        assert!(audit
            .context_warnings
            .iter()
            .any(|w| w.contains("Monto alto para rol de persona")));
        assert!(audit.context_note.as_deref().unwrap().contains("persona"));
    }

    #[test]
    fn company_context_warns_when_amounts_look_too_small() {
        let snap = snapshot_with_costs(&[("a1", "A", Some(8_000.0), 10)]);
        let ranking = CostRatioEngine::rank(&snap);
        let setup = DecisionSetup::new().with_private_company("Consorcio Vial SAC");
        let audit = CostRatioEngine::audit(&ranking.rows, &setup, &CostPolicy::default());

        assert!(audit
            .context_warnings
            .iter()
            .any(|w| w.contains("Monto bajo para empresa/entidad")));
    }

    #[test]
    fn median_handles_odd_even_and_empty() {
        assert_eq!(median(&[]), None);
        assert_eq!(median(&[5.0]), Some(5.0));
        assert_eq!(median(&[1.0, 3.0]), Some(2.0));
        assert_eq!(median(&[9.0, 1.0, 5.0]), Some(5.0));
    }
}
