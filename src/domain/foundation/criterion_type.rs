//! Criterion type - MUST/WANT classification of decision factors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a factor is mandatory (MUST) or desirable (WANT).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CriterionType {
    #[default]
    Must,
    Want,
}

impl CriterionType {
    /// Parses a stored type string, tolerant of case and whitespace.
    pub fn from_str_loose(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "MUST" => Some(CriterionType::Must),
            "WANT" => Some(CriterionType::Want),
            _ => None,
        }
    }

    /// Returns the canonical string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            CriterionType::Must => "MUST",
            CriterionType::Want => "WANT",
        }
    }

    /// Returns true for mandatory factors.
    pub fn is_must(&self) -> bool {
        matches!(self, CriterionType::Must)
    }
}

impl fmt::Display for CriterionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_and_loose_forms() {
        assert_eq!(CriterionType::from_str_loose("MUST"), Some(CriterionType::Must));
        assert_eq!(CriterionType::from_str_loose(" want "), Some(CriterionType::Want));
        assert_eq!(CriterionType::from_str_loose("Must"), Some(CriterionType::Must));
        assert_eq!(CriterionType::from_str_loose("other"), None);
        assert_eq!(CriterionType::from_str_loose(""), None);
    }

    #[test]
    fn default_is_must() {
        assert_eq!(CriterionType::default(), CriterionType::Must);
        assert!(CriterionType::default().is_must());
    }

    #[test]
    fn serializes_uppercase() {
        assert_eq!(serde_json::to_string(&CriterionType::Must).unwrap(), "\"MUST\"");
        assert_eq!(serde_json::to_string(&CriterionType::Want).unwrap(), "\"WANT\"");
    }
}
