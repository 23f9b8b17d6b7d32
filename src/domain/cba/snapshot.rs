//! CbaSnapshot - full read of the workflow data at one point in time.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::CriterionType;

use super::{Advantage, Alternative, Attribute, Criterion};

/// Immutable snapshot of the CBA entities an analyzer needs.
///
/// Criteria are ordered: the first is the most important factor and its rank
/// is 1. Analyzers read the snapshot and return new derived views; they never
/// mutate it (persistence applies derived views elsewhere).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CbaSnapshot {
    /// Ordered list of criteria (rank = position + 1).
    pub criteria: Vec<Criterion>,
    /// Alternatives in input order.
    pub alternatives: Vec<Alternative>,
    /// All qualitative ratings.
    pub attributes: Vec<Attribute>,
    /// Persisted advantage records with their importance scores.
    pub advantages: Vec<Advantage>,
}

impl CbaSnapshot {
    /// Creates an empty snapshot.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a builder.
    pub fn builder() -> CbaSnapshotBuilder {
        CbaSnapshotBuilder::default()
    }

    /// Returns the number of criteria.
    pub fn criteria_count(&self) -> usize {
        self.criteria.len()
    }

    /// Returns the 1-based rank of a criterion, if present.
    pub fn rank_of(&self, criterion_id: &str) -> Option<usize> {
        self.criteria
            .iter()
            .position(|c| c.id == criterion_id)
            .map(|pos| pos + 1)
    }

    /// Looks up a criterion by id.
    pub fn criterion(&self, criterion_id: &str) -> Option<&Criterion> {
        self.criteria.iter().find(|c| c.id == criterion_id)
    }

    /// Looks up an alternative by id.
    pub fn alternative(&self, alternative_id: &str) -> Option<&Alternative> {
        self.alternatives.iter().find(|a| a.id == alternative_id)
    }

    /// Returns the display name for an alternative, falling back to its id.
    pub fn alternative_name<'a>(&'a self, alternative_id: &'a str) -> &'a str {
        self.alternative(alternative_id)
            .map(|a| a.name.as_str())
            .unwrap_or(alternative_id)
    }

    /// Returns all attributes recorded under a criterion.
    pub fn attributes_for(&self, criterion_id: &str) -> Vec<&Attribute> {
        self.attributes
            .iter()
            .filter(|a| a.criterion_id == criterion_id)
            .collect()
    }

    /// Returns all advantage records for an alternative.
    pub fn advantages_for(&self, alternative_id: &str) -> Vec<&Advantage> {
        self.advantages
            .iter()
            .filter(|a| a.alternative_id == alternative_id)
            .collect()
    }

    /// Looks up the advantage record for a (criterion, alternative) pair.
    pub fn advantage_for(&self, criterion_id: &str, alternative_id: &str) -> Option<&Advantage> {
        self.advantages
            .iter()
            .find(|a| a.criterion_id == criterion_id && a.alternative_id == alternative_id)
    }

    /// Returns true if the snapshot has no criteria and no alternatives.
    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty() && self.alternatives.is_empty()
    }
}

/// Builder for constructing snapshots, mainly in tests and at the edges.
#[derive(Debug, Default)]
pub struct CbaSnapshotBuilder {
    criteria: Vec<Criterion>,
    alternatives: Vec<Alternative>,
    attributes: Vec<Attribute>,
    advantages: Vec<Advantage>,
}

impl CbaSnapshotBuilder {
    /// Appends a criterion; order of calls defines rank.
    pub fn criterion(
        mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        criterion_type: CriterionType,
    ) -> Self {
        self.criteria.push(Criterion::new(id, name, criterion_type));
        self
    }

    /// Appends an alternative without cost.
    pub fn alternative(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.alternatives.push(Alternative::new(id, name));
        self
    }

    /// Appends an alternative with a cost.
    pub fn costed_alternative(
        mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        cost: f64,
    ) -> Self {
        self.alternatives.push(Alternative::with_cost(id, name, cost));
        self
    }

    /// Appends an attribute rating.
    pub fn attribute(
        mut self,
        criterion_id: impl Into<String>,
        alternative_id: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        self.attributes
            .push(Attribute::new(criterion_id, alternative_id, label));
        self
    }

    /// Appends a persisted advantage record.
    pub fn advantage(
        mut self,
        criterion_id: impl Into<String>,
        alternative_id: impl Into<String>,
        importance: u32,
    ) -> Self {
        self.advantages
            .push(Advantage::new(criterion_id, alternative_id, importance));
        self
    }

    /// Appends a persisted advantage record with its label description.
    pub fn advantage_with_description(
        mut self,
        criterion_id: impl Into<String>,
        alternative_id: impl Into<String>,
        importance: u32,
        description: impl Into<String>,
    ) -> Self {
        self.advantages.push(Advantage::with_description(
            criterion_id,
            alternative_id,
            importance,
            description,
        ));
        self
    }

    /// Builds the snapshot.
    pub fn build(self) -> CbaSnapshot {
        CbaSnapshot {
            criteria: self.criteria,
            alternatives: self.alternatives,
            attributes: self.attributes,
            advantages: self.advantages,
        }
    }
}
