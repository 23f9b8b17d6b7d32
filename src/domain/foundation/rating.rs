//! Rating value object for the CBA qualitative scale (1 to 4).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// CBA attribute rating: Cumple (1) up to Excelente (4).
///
/// Qualitative labels entered during the guided workflow map onto this
/// ordinal scale. Anything outside the four recognized labels carries no
/// score and is excluded from best/worst comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Rating {
    Cumple = 1,
    Regular = 2,
    Bueno = 3,
    Excelente = 4,
}

impl Rating {
    /// Parses a qualitative label, trimming surrounding whitespace.
    /// Returns `None` for blank or unrecognized labels.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Excelente" => Some(Rating::Excelente),
            "Bueno" => Some(Rating::Bueno),
            "Regular" => Some(Rating::Regular),
            "Cumple" => Some(Rating::Cumple),
            _ => None,
        }
    }

    /// Creates a Rating from its ordinal value, returning error if out of range.
    pub fn try_from_u8(value: u8) -> Result<Self, ValidationError> {
        match value {
            1 => Ok(Rating::Cumple),
            2 => Ok(Rating::Regular),
            3 => Ok(Rating::Bueno),
            4 => Ok(Rating::Excelente),
            _ => Err(ValidationError::out_of_range("rating", 1, 4, value as i32)),
        }
    }

    /// Returns the ordinal value (1..=4).
    pub fn value(&self) -> u8 {
        *self as u8
    }

    /// Returns the display label.
    pub fn label(&self) -> &'static str {
        match self {
            Rating::Cumple => "Cumple",
            Rating::Regular => "Regular",
            Rating::Bueno => "Bueno",
            Rating::Excelente => "Excelente",
        }
    }

    /// Returns true if this is one of the two weak labels (Cumple/Regular).
    pub fn is_weak(&self) -> bool {
        self.value() <= 2
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
