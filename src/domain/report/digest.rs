//! Digest renderers - compressed assistant messages for the score and cost
//! audits. At most 9 lines, one idea per line, fixed prefixes ✔ 🕒 ⚠ 💡 ℹ.

use chrono::Local;

use crate::domain::analysis::{AuditSummary, CostAudit};

/// Hard line limit for every digest.
pub const MAX_DIGEST_LINES: usize = 9;

/// Deterministic short renderings of audit results.
pub struct DigestRenderer;

impl DigestRenderer {
    /// Clock stamp shown on the review line, e.g. `14:07`.
    pub fn review_stamp() -> String {
        Local::now().format("%H:%M").to_string()
    }

    /// Digest of a score audit summary.
    pub fn scores_digest(reviewed_at: &str, summary: &AuditSummary) -> String {
        let mut lines: Vec<String> = Vec::new();
        lines.push("✔ Puntajes revisados".to_string());
        lines.push(format!("🕒 Revisión: {}", reviewed_at));

        if !summary.multiple_factors.is_empty() {
            lines.push(format!(
                "⚠ {} factores con múltiples puntajes: {}",
                summary.multiple_factors.len(),
                join_some(&summary.multiple_factors, 3)
            ));
        }
        if !summary.missing_factors.is_empty() {
            lines.push(format!(
                "⚠ {} factores con ventaja sin puntaje: {}",
                summary.missing_factors.len(),
                join_some(&summary.missing_factors, 3)
            ));
        }
        if !summary.tie_factors.is_empty() {
            lines.push(format!("⚠ Empates en: {}", join_some(&summary.tie_factors, 4)));
        }
        if !summary.invalid_examples.is_empty() {
            lines.push(format!(
                "⚠ Valores inválidos: {}",
                join_some(&summary.invalid_examples, 3)
            ));
        }
        if !summary.disabled_examples.is_empty() {
            lines.push(format!(
                "⚠ Puntajes en celdas no habilitadas: {}",
                join_some(&summary.disabled_examples, 2)
            ));
        }

        if lines.len() == 2 {
            lines.push("✔ No se detectaron inconsistencias críticas".to_string());
        } else {
            lines.push("💡 Deja un único puntaje por factor".to_string());
            lines.push("💡 Si hay empate real, valida la ventaja y documenta".to_string());
        }

        finish(lines)
    }

    /// Digest of a cost audit.
    pub fn costs_digest(reviewed_at: &str, audit: &CostAudit) -> String {
        let mut lines: Vec<String> = Vec::new();
        lines.push("✔ Costos revisados".to_string());
        lines.push(format!("🕒 Revisión: {}", reviewed_at));

        if !audit.missing.is_empty() {
            lines.push(format!(
                "⚠ {} alternativas sin costo: {}",
                audit.missing.len(),
                join_some(&audit.missing, 4)
            ));
        }
        if !audit.non_numeric.is_empty() {
            lines.push(format!(
                "⚠ Costos no numéricos en: {}",
                join_some(&audit.non_numeric, 3)
            ));
        }

        if let (Some(min_cost), Some(max_cost)) = (audit.min_cost, audit.max_cost) {
            if (max_cost - min_cost).abs() < 0.00001 {
                lines.push(format!(
                    "ℹ Costos iguales en las alternativas con costo (S/ {})",
                    fmt_cost(min_cost)
                ));
            } else {
                lines.push(format!(
                    "ℹ Rango de costos: S/ {} – S/ {}",
                    fmt_cost(min_cost),
                    fmt_cost(max_cost)
                ));
            }
        }

        if !audit.outlier_high.is_empty() {
            lines.push(format!(
                "⚠ Posibles costos outlier altos: {}",
                join_some(&audit.outlier_high, 3)
            ));
        }
        if !audit.ratio_low.is_empty() {
            lines.push(format!(
                "⚠ Ventajas/costo muy bajo en: {}",
                join_some(&audit.ratio_low, 3)
            ));
        }
        if let Some(note) = &audit.context_note {
            lines.push(format!("ℹ {}", note));
        }
        for warning in audit.context_warnings.iter().take(2) {
            lines.push(format!("⚠ {}", warning));
        }

        if lines.len() == 2 {
            lines.push("✔ No se detectaron alertas de costo".to_string());
        }

        if !audit.missing.is_empty()
            || !audit.non_numeric.is_empty()
            || !audit.outlier_high.is_empty()
            || !audit.ratio_low.is_empty()
        {
            lines.push("💡 Completa costos faltantes y recalcula".to_string());
            lines.push("💡 Revisa unidades (mensual/anual, miles) si hay outliers".to_string());
        }
        if !audit.context_warnings.is_empty() {
            lines.push("💡 Verifica si el monto es mensual o total".to_string());
        }

        finish(lines)
    }
}

/// Joins up to `max_items`, marking the overflow with an ellipsis.
pub(crate) fn join_some(items: &[String], max_items: usize) -> String {
    let shown: Vec<&str> = items
        .iter()
        .filter(|s| !s.is_empty())
        .take(max_items)
        .map(String::as_str)
        .collect();
    let mut joined = shown.join(", ");
    if items.len() > max_items {
        joined.push('…');
    }
    joined
}

/// Compact cost display: integers without decimals, otherwise trimmed.
fn fmt_cost(value: f64) -> String {
    if (value - value.round()).abs() < 0.00001 {
        format!("{}", value.round() as i64)
    } else {
        let raw = format!("{:.2}", value);
        raw.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

fn finish(lines: Vec<String>) -> String {
    lines
        .into_iter()
        .take(MAX_DIGEST_LINES)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
