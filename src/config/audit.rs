//! Audit heuristics configuration

use serde::Deserialize;

use crate::domain::analysis::CostPolicy;

use super::error::ValidationError;

/// Thresholds for the cost plausibility heuristics.
#[derive(Debug, Clone, Deserialize)]
pub struct AuditConfig {
    /// Ceiling (S/) above which a cost looks high for a person-level
    /// contract. An arbitrary domain heuristic, kept configurable.
    #[serde(default = "default_person_cost_ceiling")]
    pub person_cost_ceiling: f64,
}

impl AuditConfig {
    /// Converts into the domain-level policy value.
    pub fn cost_policy(&self) -> CostPolicy {
        CostPolicy {
            person_cost_ceiling: self.person_cost_ceiling,
        }
    }

    /// Validate audit configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.person_cost_ceiling.is_finite() || self.person_cost_ceiling <= 0.0 {
            return Err(ValidationError::InvalidCostCeiling);
        }
        Ok(())
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            person_cost_ceiling: default_person_cost_ceiling(),
        }
    }
}

fn default_person_cost_ceiling() -> f64 {
    25_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ceiling_matches_the_policy_default() {
        let config = AuditConfig::default();
        assert_eq!(config.person_cost_ceiling, 25_000.0);
        assert_eq!(config.cost_policy(), CostPolicy::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn non_positive_ceiling_fails_validation() {
        let config = AuditConfig {
            person_cost_ceiling: 0.0,
        };
        assert!(config.validate().is_err());
    }
}
