//! Core CBA records: factors, alternatives, attributes, advantages, setup.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::CriterionType;

/// A decision factor. Rank is implicit: the position in the snapshot's
/// ordered criterion list (1 = most important), never a stored field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub id: String,
    pub name: String,
    pub description: String,
    pub criterion_type: CriterionType,
}

impl Criterion {
    /// Creates a new criterion.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        criterion_type: CriterionType,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            criterion_type,
        }
    }

    /// Creates a criterion with a free-text description.
    pub fn with_description(
        id: impl Into<String>,
        name: impl Into<String>,
        criterion_type: CriterionType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            criterion_type,
        }
    }
}

/// A candidate under evaluation, with an optional cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub id: String,
    pub name: String,
    pub cost: Option<f64>,
}

impl Alternative {
    /// Creates an alternative without a cost.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            cost: None,
        }
    }

    /// Creates an alternative with a known cost.
    pub fn with_cost(id: impl Into<String>, name: impl Into<String>, cost: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            cost: Some(cost),
        }
    }
}

/// One qualitative rating of an alternative on a factor.
///
/// `is_least_preferred` is a derived flag: true exactly when this attribute
/// holds the minimum recognized rating for its factor. It is recomputed by
/// the resolver, never authored independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub criterion_id: String,
    pub alternative_id: String,
    pub label: String,
    pub is_least_preferred: bool,
}

impl Attribute {
    /// Creates an attribute with a rating label.
    pub fn new(
        criterion_id: impl Into<String>,
        alternative_id: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            criterion_id: criterion_id.into(),
            alternative_id: alternative_id.into(),
            label: label.into(),
            is_least_preferred: false,
        }
    }
}

/// A derived advantage: for each factor, every alternative holding the top
/// rating gets one of these, carrying the assigned importance score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advantage {
    pub criterion_id: String,
    pub alternative_id: String,
    pub description: String,
    pub importance: u32,
    pub is_main: bool,
}

impl Advantage {
    /// Creates an advantage with an importance score.
    pub fn new(
        criterion_id: impl Into<String>,
        alternative_id: impl Into<String>,
        importance: u32,
    ) -> Self {
        Self {
            criterion_id: criterion_id.into(),
            alternative_id: alternative_id.into(),
            description: String::new(),
            importance,
            is_main: false,
        }
    }

    /// Creates an advantage with a description.
    pub fn with_description(
        criterion_id: impl Into<String>,
        alternative_id: impl Into<String>,
        importance: u32,
        description: impl Into<String>,
    ) -> Self {
        Self {
            criterion_id: criterion_id.into(),
            alternative_id: alternative_id.into(),
            description: description.into(),
            importance,
            is_main: false,
        }
    }
}

/// Free-text setup captured at the start of a session, passed explicitly to
/// the analyzers that need it (never ambient state).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecisionSetup {
    pub project_name: Option<String>,
    pub objective: Option<String>,
    pub sector: Option<String>,
    pub requesting_area: Option<String>,
    pub public_entity: Option<String>,
    pub private_company: Option<String>,
}

impl DecisionSetup {
    /// Creates an empty setup.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the project name.
    pub fn with_project_name(mut self, value: impl Into<String>) -> Self {
        self.project_name = Some(value.into());
        self
    }

    /// Sets the objective.
    pub fn with_objective(mut self, value: impl Into<String>) -> Self {
        self.objective = Some(value.into());
        self
    }

    /// Sets the requesting area (e.g. a role or department).
    pub fn with_requesting_area(mut self, value: impl Into<String>) -> Self {
        self.requesting_area = Some(value.into());
        self
    }

    /// Sets the public entity name.
    pub fn with_public_entity(mut self, value: impl Into<String>) -> Self {
        self.public_entity = Some(value.into());
        self
    }

    /// Sets the private company name.
    pub fn with_private_company(mut self, value: impl Into<String>) -> Self {
        self.private_company = Some(value.into());
        self
    }
}
