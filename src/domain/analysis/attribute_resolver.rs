//! Attribute Resolver - best/worst attribute sets per factor.

use serde::{Deserialize, Serialize};

use crate::domain::cba::{Advantage, Attribute, CbaSnapshot};
use crate::domain::foundation::Rating;

/// Extremes of one factor's recognized ratings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorExtremes {
    pub criterion_id: String,
    /// Highest recognized rating for the factor.
    pub best: Rating,
    /// Lowest recognized rating for the factor.
    pub worst: Rating,
    /// Ordinal gap between the best and the runner-up rating. When every
    /// rated alternative ties at best the gap is 0; when exactly one
    /// alternative is rated the runner-up defaults to `max(1, best - 3)`.
    pub diff: u8,
    /// Alternatives holding the best rating (ties allowed).
    pub best_alternatives: Vec<String>,
    /// Alternatives holding the worst rating (ties allowed).
    pub least_preferred: Vec<String>,
    /// How many attributes carried a recognized rating.
    pub rated_count: usize,
}

/// Stateless resolver for attribute extremes and derived advantages.
///
/// Every function recomputes from scratch over the snapshot; repeated calls
/// on unchanged input return identical output.
pub struct AttributeResolver;

impl AttributeResolver {
    /// Resolves the extremes for a single factor.
    ///
    /// Returns `None` when the factor has no attribute with a recognized
    /// rating (blank and unknown labels carry no score).
    pub fn resolve_factor(snapshot: &CbaSnapshot, criterion_id: &str) -> Option<FactorExtremes> {
        let rated: Vec<(Rating, &Attribute)> = snapshot
            .attributes_for(criterion_id)
            .into_iter()
            .filter_map(|attr| Rating::from_label(&attr.label).map(|r| (r, attr)))
            .collect();

        let best = rated.iter().map(|(r, _)| *r).max()?;
        let worst = rated.iter().map(|(r, _)| *r).min()?;

        let second_best = if rated.iter().any(|(r, _)| *r < best) {
            rated
                .iter()
                .map(|(r, _)| r.value())
                .filter(|v| *v < best.value())
                .max()
                .unwrap_or(1)
        } else if rated.len() > 1 {
            best.value()
        } else {
            best.value().saturating_sub(3).max(1)
        };
        let diff = best.value() - second_best;

        let best_alternatives = rated
            .iter()
            .filter(|(r, _)| *r == best)
            .map(|(_, a)| a.alternative_id.clone())
            .collect();
        let least_preferred = rated
            .iter()
            .filter(|(r, _)| *r == worst)
            .map(|(_, a)| a.alternative_id.clone())
            .collect();

        Some(FactorExtremes {
            criterion_id: criterion_id.to_string(),
            best,
            worst,
            diff,
            best_alternatives,
            least_preferred,
            rated_count: rated.len(),
        })
    }

    /// Resolves all factors in rank order, skipping unrated ones.
    pub fn resolve_all(snapshot: &CbaSnapshot) -> Vec<FactorExtremes> {
        snapshot
            .criteria
            .iter()
            .filter_map(|c| Self::resolve_factor(snapshot, &c.id))
            .collect()
    }

    /// Returns the attribute list with `is_least_preferred` recomputed:
    /// true exactly for attributes holding the minimum recognized rating of
    /// their factor.
    pub fn mark_least_preferred(snapshot: &CbaSnapshot) -> Vec<Attribute> {
        let extremes = Self::resolve_all(snapshot);

        snapshot
            .attributes
            .iter()
            .map(|attr| {
                let worst = extremes
                    .iter()
                    .find(|e| e.criterion_id == attr.criterion_id)
                    .map(|e| e.worst);
                let mut out = attr.clone();
                out.is_least_preferred = match (worst, Rating::from_label(&attr.label)) {
                    (Some(worst), Some(rating)) => rating == worst,
                    _ => false,
                };
                out
            })
            .collect()
    }

    /// Derives the advantage records: one per (factor, best-rated
    /// alternative) cell, ties included. Importance and main flags are
    /// preserved from the snapshot's persisted advantages; the description
    /// follows the attribute label.
    pub fn derive_advantages(snapshot: &CbaSnapshot) -> Vec<Advantage> {
        let mut advantages = Vec::new();

        for extremes in Self::resolve_all(snapshot) {
            for alt_id in &extremes.best_alternatives {
                let previous = snapshot.advantage_for(&extremes.criterion_id, alt_id);
                advantages.push(Advantage {
                    criterion_id: extremes.criterion_id.clone(),
                    alternative_id: alt_id.clone(),
                    description: extremes.best.label().to_string(),
                    importance: previous.map(|a| a.importance).unwrap_or(0),
                    is_main: previous.map(|a| a.is_main).unwrap_or(false),
                });
            }
        }

        advantages
    }

    /// Derives advantages and marks exactly one main advantage per
    /// alternative: its best cell under the highest-ranked factor.
    pub fn assign_main_advantages(snapshot: &CbaSnapshot) -> Vec<Advantage> {
        let mut advantages = Self::derive_advantages(snapshot);

        for alternative in &snapshot.alternatives {
            let chosen = snapshot
                .criteria
                .iter()
                .find_map(|criterion| {
                    advantages.iter().position(|adv| {
                        adv.criterion_id == criterion.id && adv.alternative_id == alternative.id
                    })
                });

            for (pos, adv) in advantages.iter_mut().enumerate() {
                if adv.alternative_id == alternative.id {
                    adv.is_main = Some(pos) == chosen;
                }
            }
        }

        advantages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::CriterionType;

    fn snapshot_with_ratings() -> CbaSnapshot {
        CbaSnapshot::builder()
            .criterion("c1", "Experiencia", CriterionType::Must)
            .criterion("c2", "Plazo", CriterionType::Want)
            .alternative("a1", "Postor A")
            .alternative("a2", "Postor B")
            .alternative("a3", "Postor C")
            .attribute("c1", "a1", "Excelente")
            .attribute("c1", "a2", "Bueno")
            .attribute("c1", "a3", "Cumple")
            .attribute("c2", "a1", "Regular")
            .attribute("c2", "a2", "Regular")
            .attribute("c2", "a3", "Regular")
            .build()
    }

    #[test]
    fn resolve_factor_finds_extremes() {
        let snap = snapshot_with_ratings();
        let extremes = AttributeResolver::resolve_factor(&snap, "c1").unwrap();

        assert_eq!(extremes.best, Rating::Excelente);
        assert_eq!(extremes.worst, Rating::Cumple);
        assert_eq!(extremes.diff, 1); // Excelente(4) vs Bueno(3)
        assert_eq!(extremes.best_alternatives, vec!["a1".to_string()]);
        assert_eq!(extremes.least_preferred, vec!["a3".to_string()]);
        assert_eq!(extremes.rated_count, 3);
    }

    #[test]
    fn all_tied_factor_has_zero_diff_and_everyone_in_both_sets() {
        let snap = snapshot_with_ratings();
        let extremes = AttributeResolver::resolve_factor(&snap, "c2").unwrap();

        assert_eq!(extremes.best, Rating::Regular);
        assert_eq!(extremes.worst, Rating::Regular);
        assert_eq!(extremes.diff, 0);
        assert_eq!(extremes.best_alternatives.len(), 3);
        assert_eq!(extremes.least_preferred.len(), 3);
    }

    #[test]
    fn single_rated_alternative_defaults_to_large_gap() {
        let snap = CbaSnapshot::builder()
            .criterion("c1", "Experiencia", CriterionType::Must)
            .alternative("a1", "Postor A")
            .attribute("c1", "a1", "Excelente")
            .build();

        let extremes = AttributeResolver::resolve_factor(&snap, "c1").unwrap();
        // Runner-up defaults to max(1, 4 - 3) = 1, so the gap is 3.
        assert_eq!(extremes.diff, 3);
        assert_eq!(extremes.best_alternatives, vec!["a1".to_string()]);
        assert_eq!(extremes.least_preferred, vec!["a1".to_string()]);
    }

    #[test]
    fn single_low_rating_has_zero_gap() {
        let snap = CbaSnapshot::builder()
            .criterion("c1", "Experiencia", CriterionType::Must)
            .alternative("a1", "Postor A")
            .attribute("c1", "a1", "Cumple")
            .build();

        let extremes = AttributeResolver::resolve_factor(&snap, "c1").unwrap();
        assert_eq!(extremes.diff, 0);
    }

    #[test]
    fn unrecognized_labels_are_excluded() {
        let snap = CbaSnapshot::builder()
            .criterion("c1", "Experiencia", CriterionType::Must)
            .alternative("a1", "Postor A")
            .alternative("a2", "Postor B")
            .attribute("c1", "a1", "Bueno")
            .attribute("c1", "a2", "no aplica")
            .build();

        let extremes = AttributeResolver::resolve_factor(&snap, "c1").unwrap();
        assert_eq!(extremes.rated_count, 1);
        assert_eq!(extremes.best_alternatives, vec!["a1".to_string()]);
    }

    #[test]
    fn fully_unrated_factor_resolves_to_none() {
        let snap = CbaSnapshot::builder()
            .criterion("c1", "Experiencia", CriterionType::Must)
            .alternative("a1", "Postor A")
            .attribute("c1", "a1", "")
            .build();

        assert!(AttributeResolver::resolve_factor(&snap, "c1").is_none());
        assert!(AttributeResolver::resolve_all(&snap).is_empty());
    }

    #[test]
    fn mark_least_preferred_flags_minimum_cells_only() {
        let snap = snapshot_with_ratings();
        let marked = AttributeResolver::mark_least_preferred(&snap);

        let flag = |crit: &str, alt: &str| {
            marked
                .iter()
                .find(|a| a.criterion_id == crit && a.alternative_id == alt)
                .unwrap()
                .is_least_preferred
        };

        assert!(!flag("c1", "a1"));
        assert!(!flag("c1", "a2"));
        assert!(flag("c1", "a3"));
        // Everyone ties on c2, so everyone is least preferred there.
        assert!(flag("c2", "a1"));
        assert!(flag("c2", "a2"));
        assert!(flag("c2", "a3"));
    }

    #[test]
    fn derive_advantages_covers_best_cells_and_preserves_importance() {
        let snap = CbaSnapshot::builder()
            .criterion("c1", "Experiencia", CriterionType::Must)
            .alternative("a1", "Postor A")
            .alternative("a2", "Postor B")
            .attribute("c1", "a1", "Excelente")
            .attribute("c1", "a2", "Excelente")
            .advantage("c1", "a1", 95)
            .build();

        let advantages = AttributeResolver::derive_advantages(&snap);
        assert_eq!(advantages.len(), 2);

        let a1 = advantages.iter().find(|a| a.alternative_id == "a1").unwrap();
        let a2 = advantages.iter().find(|a| a.alternative_id == "a2").unwrap();
        assert_eq!(a1.importance, 95);
        assert_eq!(a2.importance, 0);
        assert_eq!(a1.description, "Excelente");
    }

    #[test]
    fn assign_main_advantages_picks_highest_ranked_factor() {
        let snap = CbaSnapshot::builder()
            .criterion("c1", "Experiencia", CriterionType::Must)
            .criterion("c2", "Plazo", CriterionType::Want)
            .alternative("a1", "Postor A")
            .alternative("a2", "Postor B")
            // a2 wins c1; both win c2.
            .attribute("c1", "a1", "Bueno")
            .attribute("c1", "a2", "Excelente")
            .attribute("c2", "a1", "Bueno")
            .attribute("c2", "a2", "Bueno")
            .build();

        let advantages = AttributeResolver::assign_main_advantages(&snap);

        let mains: Vec<_> = advantages.iter().filter(|a| a.is_main).collect();
        assert_eq!(mains.len(), 2);
        // a2's main is the rank-1 factor; a1 only has an advantage on c2.
        assert!(mains
            .iter()
            .any(|a| a.alternative_id == "a2" && a.criterion_id == "c1"));
        assert!(mains
            .iter()
            .any(|a| a.alternative_id == "a1" && a.criterion_id == "c2"));
    }

    #[test]
    fn resolver_is_idempotent_on_unchanged_input() {
        let snap = snapshot_with_ratings();
        assert_eq!(
            AttributeResolver::resolve_all(&snap),
            AttributeResolver::resolve_all(&snap)
        );
        assert_eq!(
            AttributeResolver::derive_advantages(&snap),
            AttributeResolver::derive_advantages(&snap)
        );
    }
}
