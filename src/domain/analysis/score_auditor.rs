//! Score Auditor - pure validation of submitted importance scores.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::cba::CbaSnapshot;
use crate::domain::foundation::CriterionType;

use super::{AttributeResolver, ImportanceScale};

/// Tolerance band, in points, around the suggested range.
pub const RANGE_TOLERANCE: u32 = 5;
/// Below this fraction of the cap, a strong advantage looks under-scored.
pub const STRONG_DIFF_LOW_SCORE: f64 = 0.35;
/// At or above this fraction of the cap, a weak advantage looks over-scored.
pub const WEAK_DIFF_NEAR_MAX: f64 = 0.85;
/// MUST factors below this normalized score are an error.
pub const MUST_FLOOR_ERROR: f64 = 0.20;
/// MUST factors below this normalized score are a warning.
pub const MUST_FLOOR_WARN: f64 = 0.35;
/// Adjacent normalized scores further apart than this look disproportionate.
pub const SCALE_JUMP_THRESHOLD: f64 = 0.45;
/// A WANT exceeding a MUST by this normalized margin looks inverted.
pub const WANT_OVER_MUST_MARGIN: f64 = 0.30;

/// Metadata of one enabled score field (a best-rated cell).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnabledCell {
    pub criterion_id: String,
    pub criterion: String,
    pub criterion_type: CriterionType,
    pub alternative_id: String,
    pub alternative: String,
    pub cap: u32,
    pub diff: u8,
    pub suggested_low: u32,
    pub suggested_high: u32,
    pub label: String,
}

/// Compact per-category factor lists for digest rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditSummary {
    /// Factors carrying more than one numeric score.
    pub multiple_factors: Vec<String>,
    /// Factors whose best rating is tied across alternatives.
    pub tie_factors: Vec<String>,
    /// Factors with an advantage but no score at all.
    pub missing_factors: Vec<String>,
    /// Factor names with non-numeric/negative/over-cap values (bounded).
    pub invalid_examples: Vec<String>,
    /// Field names scored outside the enabled cells (bounded).
    pub disabled_examples: Vec<String>,
}

/// Result of one audit pass: accumulated findings, never a failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreAuditReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub enabled_fields: BTreeMap<String, EnabledCell>,
    pub summary: AuditSummary,
}

impl ScoreAuditReport {
    /// Returns true when the audit produced no findings at all.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// Validates a submitted `field → raw value` map against the CBA rules.
///
/// The auditor never mutates advantage records and never fails on malformed
/// input: every problem becomes an accumulated error or warning string.
pub struct ScoreAuditor;

impl ScoreAuditor {
    /// Canonical form field name for a (criterion, alternative) cell.
    pub fn field_name(criterion_id: &str, alternative_id: &str) -> String {
        format!("imp_{}_{}", criterion_id, alternative_id)
    }

    /// Runs the full audit over a snapshot and a submitted score map.
    pub fn audit(snapshot: &CbaSnapshot, scores: &BTreeMap<String, String>) -> ScoreAuditReport {
        let mut report = ScoreAuditReport::default();
        let mut fields_by_criterion: BTreeMap<String, Vec<String>> = BTreeMap::new();

        // Enabled cells: one per best-rated (factor, alternative) pair.
        for (idx, criterion) in snapshot.criteria.iter().enumerate() {
            let rank = idx + 1;
            let extremes = match AttributeResolver::resolve_factor(snapshot, &criterion.id) {
                Some(e) => e,
                None => continue,
            };
            let cap = ImportanceScale::cap_for_rank(rank);
            let range = ImportanceScale::suggested_range(rank, extremes.diff);

            for alt_id in &extremes.best_alternatives {
                let field = Self::field_name(&criterion.id, alt_id);
                report.enabled_fields.insert(
                    field.clone(),
                    EnabledCell {
                        criterion_id: criterion.id.clone(),
                        criterion: criterion.name.clone(),
                        criterion_type: criterion.criterion_type,
                        alternative_id: alt_id.clone(),
                        alternative: snapshot.alternative_name(alt_id).to_string(),
                        cap,
                        diff: extremes.diff,
                        suggested_low: range.low,
                        suggested_high: range.high,
                        label: extremes.best.label().to_string(),
                    },
                );
                fields_by_criterion
                    .entry(criterion.id.clone())
                    .or_default()
                    .push(field);
            }
        }

        // Scores landing on cells that hold no advantage.
        for (field, value) in scores {
            if !field.starts_with("imp_") || report.enabled_fields.contains_key(field) {
                continue;
            }
            let raw = value.trim();
            if !raw.is_empty() {
                report
                    .errors
                    .push(format!("Puntaje en celda no habilitada: {} = '{}'.", field, raw));
                if report.summary.disabled_examples.len() < 4 {
                    report.summary.disabled_examples.push(field.clone());
                }
            }
        }

        let mut must_norms: Vec<f64> = Vec::new();
        let mut want_norms: Vec<f64> = Vec::new();
        let mut per_rank_norms: Vec<(usize, f64, String)> = Vec::new();

        for (idx, criterion) in snapshot.criteria.iter().enumerate() {
            let rank = idx + 1;
            let fields = match fields_by_criterion.get(&criterion.id) {
                Some(f) => f,
                None => continue,
            };

            let cap = ImportanceScale::cap_for_rank(rank);
            let mut numeric_values: Vec<(String, i64)> = Vec::new();

            for field in fields {
                let cell = &report.enabled_fields[field];
                let raw = scores.get(field).map(String::as_str).unwrap_or("");

                let parsed = match parse_score(raw) {
                    Ok(None) => continue,
                    Ok(Some(v)) => v,
                    Err(bad) => {
                        report.errors.push(format!(
                            "Puntaje no numérico en {} → {}: '{}'.",
                            cell.criterion, cell.alternative, bad
                        ));
                        note_invalid(&mut report.summary.invalid_examples, &cell.criterion);
                        continue;
                    }
                };
                numeric_values.push((field.clone(), parsed));

                if parsed < 0 {
                    report.errors.push(format!(
                        "Puntaje negativo en {} → {}: {}.",
                        cell.criterion, cell.alternative, parsed
                    ));
                    note_invalid(&mut report.summary.invalid_examples, &cell.criterion);
                }
                if parsed > cap as i64 {
                    report.errors.push(format!(
                        "Puntaje fuera de rango (cap) en {} → {}: {} > {}.",
                        cell.criterion, cell.alternative, parsed, cap
                    ));
                    note_invalid(&mut report.summary.invalid_examples, &cell.criterion);
                }

                let low_floor = cell.suggested_low.saturating_sub(RANGE_TOLERANCE) as i64;
                let high_ceiling = (cell.suggested_high + RANGE_TOLERANCE).min(cap) as i64;
                if parsed < low_floor || parsed > high_ceiling {
                    report.warnings.push(format!(
                        "{} → {}: puntaje {} fuera del rango sugerido {}–{} (cap {}).",
                        cell.criterion,
                        cell.alternative,
                        parsed,
                        cell.suggested_low,
                        cell.suggested_high,
                        cap
                    ));
                }

                if cell.diff >= 2 && parsed <= (STRONG_DIFF_LOW_SCORE * cap as f64) as i64 {
                    report.warnings.push(format!(
                        "{}: ventaja marcada como fuerte (diff {}) pero puntaje bajo ({}/{}).",
                        cell.criterion, cell.diff, parsed, cap
                    ));
                }
                if cell.diff <= 1 && parsed >= (WEAK_DIFF_NEAR_MAX * cap as f64) as i64 {
                    report.warnings.push(format!(
                        "{}: ventaja muy similar (diff {}) pero puntaje casi máximo ({}/{}).",
                        cell.criterion, cell.diff, parsed, cap
                    ));
                }

                let norm = if cap > 0 {
                    parsed as f64 / cap as f64
                } else {
                    0.0
                };
                match criterion.criterion_type {
                    CriterionType::Must => {
                        must_norms.push(norm);
                        if norm < MUST_FLOOR_ERROR {
                            report.errors.push(format!(
                                "{}: criterio MUST con puntaje muy bajo ({}/{}).",
                                cell.criterion, parsed, cap
                            ));
                        } else if norm < MUST_FLOOR_WARN {
                            report.warnings.push(format!(
                                "{}: criterio MUST con puntaje bajo ({}/{}).",
                                cell.criterion, parsed, cap
                            ));
                        }
                    }
                    CriterionType::Want => want_norms.push(norm),
                }

                per_rank_norms.push((rank, norm, criterion.name.clone()));
            }

            if numeric_values.is_empty() {
                report.errors.push(format!(
                    "{}: hay ventaja identificada pero no se asignó ningún puntaje.",
                    criterion.name
                ));
                push_unique(&mut report.summary.missing_factors, &criterion.name);
            } else if numeric_values.len() > 1 {
                // The CBA rule: exactly one score per factor.
                let listed = numeric_values
                    .iter()
                    .map(|(field, value)| {
                        let alt = &report.enabled_fields[field].alternative;
                        format!("{} → {}", alt, value)
                    })
                    .collect::<Vec<_>>()
                    .join("; ");
                report.errors.push(format!(
                    "{}: múltiples puntajes asignados ({}).",
                    criterion.name, listed
                ));
                push_unique(&mut report.summary.multiple_factors, &criterion.name);
            }

            if fields.len() > 1 {
                report.warnings.push(format!(
                    "Existe empate en el factor {}. Verificar si realmente tienen la misma ventaja.",
                    criterion.name
                ));
                push_unique(&mut report.summary.tie_factors, &criterion.name);
            }
        }

        per_rank_norms.sort_by_key(|(rank, _, _)| *rank);
        for pair in per_rank_norms.windows(2) {
            let (_, n1, name1) = &pair[0];
            let (_, n2, name2) = &pair[1];
            if (n2 - n1).abs() >= SCALE_JUMP_THRESHOLD {
                report.warnings.push(format!(
                    "Saltos fuertes en la escala: {} → {}. Revisa jerarquía/proporcionalidad.",
                    name1, name2
                ));
            }
        }

        if !must_norms.is_empty() && !want_norms.is_empty() {
            let min_must = must_norms.iter().cloned().fold(f64::INFINITY, f64::min);
            let max_want = want_norms.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            if max_want - min_must >= WANT_OVER_MUST_MARGIN {
                report.warnings.push(
                    "Hay factores WANT con mayor importancia relativa que al menos un MUST. \
                     Verifica si eso está justificado."
                        .to_string(),
                );
            }
        }

        report
    }
}

/// Parses a raw score: blank → `Ok(None)`, decimals truncate toward zero,
/// anything unparseable comes back as `Err(raw)`.
fn parse_score(raw: &str) -> Result<Option<i64>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v.trunc() as i64)),
        _ => Err(trimmed.to_string()),
    }
}

fn note_invalid(examples: &mut Vec<String>, criterion_name: &str) {
    if examples.len() < 6 && !examples.iter().any(|e| e == criterion_name) {
        examples.push(criterion_name.to_string());
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|e| e == value) {
        list.push(value.to_string());
    }
}
