//! Decision summary - one-paragraph recommendation from the dashboard.

use crate::domain::cba::{CbaSnapshot, DecisionSetup};
use crate::domain::analysis::CostRanking;

/// Renders the deterministic recommendation paragraph.
///
/// Recommends the alternative with the lowest cost per advantage unit,
/// quoting its totals, the savings against the runner-up, its main advantage
/// and its largest per-factor deficit. When no ratio is defined it asks the
/// user to complete costs and advantages instead of guessing.
pub struct DecisionSummary;

impl DecisionSummary {
    pub fn render(setup: &DecisionSetup, ranking: &CostRanking, snapshot: &CbaSnapshot) -> String {
        let mut parts: Vec<String> = Vec::new();

        match &setup.project_name {
            Some(name) => parts.push(format!("Para el proyecto \"{}\"", name)),
            None => parts.push("Para este proyecto".to_string()),
        }
        if let Some(objective) = &setup.objective {
            parts.push(format!("cuyo objetivo es \"{}\" ", objective));
        }

        let winner = match &ranking.winner {
            Some(w) => w,
            None => {
                parts.push(
                    "se requiere completar costos y/o ventajas para emitir una recomendación basada en costo por unidad de ventaja."
                        .to_string(),
                );
                return collapse(&parts.join(" "));
            }
        };

        let rec_tail = if setup.objective.is_some() {
            " para cumplirlo"
        } else {
            ""
        };
        parts.push(format!(
            "se recomienda {}{} porque presenta el menor costo por unidad de ventaja ({} por unidad), alcanzando {} de ventaja total con un costo total de {}",
            winner.name,
            rec_tail,
            format_soles(winner.ratio, 2),
            winner.total,
            format_soles(winner.cost, 2)
        ));

        if let (Some(second), Some(delta)) = (&ranking.second, ranking.delta_ratio) {
            let pct_part = match ranking.delta_pct {
                Some(pct) => format!(" ({:.2}% menos)", pct),
                None => String::new(),
            };
            let ratio_clause = match second.ratio {
                Some(r) => format!(
                    " (frente a {}, {} por unidad)",
                    second.name,
                    format_soles(Some(r), 2)
                ),
                None => String::new(),
            };
            parts.push(format!(
                ", lo que implica un ahorro de {}{} por unidad{}",
                format_soles(Some(delta), 2),
                pct_part,
                ratio_clause
            ));
        }

        if let Some(clause) = main_advantage_clause(snapshot, &winner.alternative_id) {
            parts.push(clause);
        }
        if let Some(clause) = deficit_clause(snapshot, &winner.alternative_id) {
            parts.push(clause);
        }

        let paragraph = parts.join(" ");
        let trimmed = paragraph.trim().trim_end_matches(['.', ';', ',']);
        collapse(&format!("{}.", trimmed))
    }
}

/// `"; su ventaja principal es …"` for the winner, if it has advantages.
fn main_advantage_clause(snapshot: &CbaSnapshot, alternative_id: &str) -> Option<String> {
    let advantages = snapshot.advantages_for(alternative_id);
    let main = advantages
        .iter()
        .find(|a| a.is_main)
        .or_else(|| advantages.iter().max_by_key(|a| a.importance))?;

    let description = main.description.trim();
    if description.is_empty() {
        return None;
    }

    let mut extra: Vec<String> = Vec::new();
    if let Some(criterion) = snapshot.criterion(&main.criterion_id) {
        extra.push(format!("Criterio: {}", criterion.name));
    }
    extra.push(format!("{} pts", main.importance));

    Some(format!(
        "; su ventaja principal es \"{}\" ({})",
        description,
        extra.join(" · ")
    ))
}

/// Largest per-factor deficit of the winner against any other alternative,
/// over the factors where the winner holds an advantage record.
fn deficit_clause(snapshot: &CbaSnapshot, winner_id: &str) -> Option<String> {
    let mut worst: Option<(String, u32, String)> = None;

    for advantage in snapshot.advantages_for(winner_id) {
        let win_pts = advantage.importance;

        let mut best_other: Option<(u32, &str)> = None;
        for alt in &snapshot.alternatives {
            if alt.id == winner_id {
                continue;
            }
            let pts = snapshot
                .advantage_for(&advantage.criterion_id, &alt.id)
                .map(|a| a.importance)
                .unwrap_or(0);
            if best_other.map(|(p, _)| pts > p).unwrap_or(true) {
                best_other = Some((pts, alt.name.as_str()));
            }
        }

        let (other_pts, other_name) = best_other?;
        if other_pts > win_pts {
            let deficit = other_pts - win_pts;
            let criterion_name = snapshot
                .criterion(&advantage.criterion_id)
                .map(|c| c.name.clone())?;
            if worst.as_ref().map(|(_, d, _)| deficit > *d).unwrap_or(true) {
                worst = Some((criterion_name, deficit, other_name.to_string()));
            }
        }
    }

    worst.map(|(criterion, deficit, other)| {
        format!(
            ", y aunque en {} queda {} punto(s) por debajo de {}, mantiene la mejor eficiencia costo/unidad",
            criterion, deficit, other
        )
    })
}

/// ES-style currency: decimal comma, no thousands separator, `-` when absent.
fn format_soles(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) if v.is_finite() => {
            let raw = format!("{:.*}", decimals, v);
            format!("S/ {}", raw.replace('.', ","))
        }
        _ => "-".to_string(),
    }
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::CostRatioEngine;
    use crate::domain::foundation::CriterionType;

    fn snapshot() -> CbaSnapshot {
        CbaSnapshot::builder()
            .criterion("c1", "Experiencia", CriterionType::Must)
            .criterion("c2", "Plazo", CriterionType::Want)
            .costed_alternative("a1", "Postor A", 100.0)
            .costed_alternative("a2", "Postor B", 150.0)
            .attribute("c1", "a1", "Excelente")
            .attribute("c1", "a2", "Bueno")
            .attribute("c2", "a1", "Regular")
            .attribute("c2", "a2", "Bueno")
            .advantage_with_description("c1", "a1", 10, "Excelente")
            .advantage_with_description("c2", "a2", 10, "Bueno")
            .build()
    }

    #[test]
    fn recommends_the_lowest_ratio_alternative() {
        let snap = snapshot();
        let ranking = CostRatioEngine::rank(&snap);
        let setup = DecisionSetup::new()
            .with_project_name("Carretera PE-3N")
            .with_objective("Elegir contratista");

        let text = DecisionSummary::render(&setup, &ranking, &snap);

        assert!(text.starts_with("Para el proyecto \"Carretera PE-3N\""));
        assert!(text.contains("cuyo objetivo es \"Elegir contratista\""));
        assert!(text.contains("se recomienda Postor A para cumplirlo"));
        assert!(text.contains("S/ 10,00 por unidad"));
        assert!(text.contains("costo total de S/ 100,00"));
        assert!(text.contains("ahorro de S/ 5,00 (33.33% menos) por unidad"));
        assert!(text.contains("(frente a Postor B, S/ 15,00 por unidad)"));
        assert!(text.ends_with("."));
        // One paragraph, no line breaks.
        assert!(!text.contains('\n'));
    }

    #[test]
    fn mentions_main_advantage_and_deficit() {
        // Tie at best rating: both hold an advantage on the same factor,
        // the runner-up with more points.
        let snap = CbaSnapshot::builder()
            .criterion("c1", "Experiencia", CriterionType::Must)
            .costed_alternative("a1", "Postor A", 100.0)
            .costed_alternative("a2", "Postor B", 150.0)
            .attribute("c1", "a1", "Excelente")
            .attribute("c1", "a2", "Excelente")
            .advantage_with_description("c1", "a1", 80, "Excelente")
            .advantage_with_description("c1", "a2", 90, "Excelente")
            .build();
        let ranking = CostRatioEngine::rank(&snap);
        let text = DecisionSummary::render(&DecisionSetup::new(), &ranking, &snap);

        assert!(text.contains("se recomienda Postor A"));
        assert!(text.contains("su ventaja principal es \"Excelente\" (Criterio: Experiencia · 80 pts)"));
        assert!(text.contains("y aunque en Experiencia queda 10 punto(s) por debajo de Postor B"));
    }

    #[test]
    fn without_ratios_it_asks_for_missing_data() {
        let snap = CbaSnapshot::builder()
            .criterion("c1", "Experiencia", CriterionType::Must)
            .alternative("a1", "Postor A")
            .build();
        let ranking = CostRatioEngine::rank(&snap);
        let text = DecisionSummary::render(&DecisionSetup::new(), &ranking, &snap);

        assert!(text.starts_with("Para este proyecto"));
        assert!(text.contains("se requiere completar costos y/o ventajas"));
    }
}
