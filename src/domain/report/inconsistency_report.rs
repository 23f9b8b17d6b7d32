//! Deterministic multi-section inconsistency report (fallback for the LLM).

use crate::domain::analysis::{CostFlagKind, InconsistencyPayload, ScoreFlagKind};

/// At most this many findings are listed per section.
const MAX_FINDINGS: usize = 30;

/// Renders an [`InconsistencyPayload`] as the full Spanish report.
pub struct InconsistencyReport;

impl InconsistencyReport {
    pub fn render(payload: &InconsistencyPayload) -> String {
        let mut lines: Vec<String> = Vec::new();

        lines.push("**Hallazgos críticos**".to_string());
        let mut critical: Vec<String> = Vec::new();
        if !payload.duplicates.is_empty() {
            critical.push("- Hay factores duplicados o repetidos por nombre.".to_string());
        }
        if payload
            .score_flags
            .iter()
            .any(|f| f.kind == ScoreFlagKind::OverCap)
        {
            critical.push(
                "- Hay puntajes que superan el máximo sugerido por orden del factor.".to_string(),
            );
        }
        if payload
            .cost_flags
            .iter()
            .any(|f| f.kind == CostFlagKind::MissingCost)
        {
            critical.push("- Faltan costos en una o más alternativas.".to_string());
        }
        if critical.is_empty() {
            critical.push("- No se detectan críticos evidentes con las reglas actuales.".to_string());
        }
        lines.extend(critical);

        lines.push("\n**Inconsistencias de factores**".to_string());
        if payload.duplicates.is_empty() {
            lines.push("- No se detectaron duplicados exactos por nombre normalizado.".to_string());
        } else {
            for group in &payload.duplicates {
                lines.push(format!("- Duplicado: {}", group.join("; ")));
            }
        }

        lines.push("\n**Inconsistencias de puntajes**".to_string());
        if payload.score_flags.is_empty() {
            lines.push("- No se detectaron banderas de puntaje con las reglas actuales.".to_string());
        } else {
            for flag in payload.score_flags.iter().take(MAX_FINDINGS) {
                let mut extra = format!(" cap={}", flag.cap);
                if let Some(diff) = flag.diff {
                    extra.push_str(&format!(" diff={}", diff));
                }
                if let (Some(low), Some(high)) = (flag.suggested_low, flag.suggested_high) {
                    extra.push_str(&format!(" sugerido={}-{}", low, high));
                }
                lines.push(format!(
                    "- {} → {}: {}. {}{}",
                    flag.criterion, flag.alternative, flag.importance, flag.detail, extra
                ));
            }
            if payload.score_flags.len() > MAX_FINDINGS {
                lines.push(format!(
                    "- (Mostrando {} de {} hallazgos de puntajes)",
                    MAX_FINDINGS,
                    payload.score_flags.len()
                ));
            }
        }

        lines.push("\n**Inconsistencias de costos**".to_string());
        if payload.cost_flags.is_empty() {
            lines.push("- No se detectaron banderas de costo con las reglas actuales.".to_string());
        } else {
            for flag in payload.cost_flags.iter().take(MAX_FINDINGS) {
                if flag.kind == CostFlagKind::MissingCost {
                    let names = flag
                        .alternatives
                        .as_deref()
                        .unwrap_or_default()
                        .join(", ");
                    lines.push(format!("- Costos faltantes: {}. {}", names, flag.detail));
                } else {
                    let alt = flag.alternative.as_deref().unwrap_or("-");
                    let mut tail = String::new();
                    if let Some(cost) = flag.cost {
                        tail.push_str(&format!(" cost={}", cost));
                    }
                    if let Some(ratio) = flag.ratio {
                        tail.push_str(&format!(" ratio={}", ratio));
                    }
                    lines.push(format!("- {}: {}{}", alt, flag.detail, tail));
                }
            }
            if payload.cost_flags.len() > MAX_FINDINGS {
                lines.push(format!(
                    "- (Mostrando {} de {} hallazgos de costos)",
                    MAX_FINDINGS,
                    payload.cost_flags.len()
                ));
            }
        }

        lines.push("\n**Acciones sugeridas**".to_string());
        lines.push("- Paso 2/3: renombra o elimina factores duplicados.".to_string());
        lines.push(
            "- Paso 8: ajusta puntajes fuera de cap o fuera de rango sugerido; revisa criterios con diff bajo y puntaje alto."
                .to_string(),
        );
        lines.push(
            "- Paso 10: revisa unidades de costo si hay outliers; completa costos faltantes."
                .to_string(),
        );

        lines.push(format!(
            "\n**Meta**\n- Factores: {} | Alternativas: {}",
            payload.meta.criteria_count, payload.meta.alternatives_count
        ));

        lines.join("\n").trim().to_string()
    }
}
