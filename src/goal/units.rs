//! Unit types and conversion constants
//!
//! Provides the display weight unit and the fixed conversion factors used
//! when reconciling raw input into kilogram/centimeter form.

use serde::{Deserialize, Serialize};

// ============================================================================
// Conversion Constants
// ============================================================================

/// Kilograms per pound
pub const KG_PER_LB: f64 = 0.45359237;
/// Pounds per kilogram
pub const LB_PER_KG: f64 = 1.0 / KG_PER_LB;
/// Centimeters per inch
pub const CM_PER_INCH: f64 = 2.54;
/// Inches per foot
pub const INCHES_PER_FOOT: i64 = 12;
/// Energy density of 1 kg of body-mass change (kcal)
pub const KCAL_PER_KG: f64 = 7700.0;

/// Display unit for body weight
///
/// Presentation-only: the stored weight is always kilograms regardless of
/// which unit the user types in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    Kg,
    Lb,
}

impl WeightUnit {
    /// Canonical unit string
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightUnit::Kg => "kg",
            WeightUnit::Lb => "lb",
        }
    }

    /// Parse from string. Total function: unrecognized tokens fall back to
    /// kg, so an unknown unit never propagates as an error.
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "lb" | "lbs" | "pound" | "pounds" => WeightUnit::Lb,
            _ => WeightUnit::Kg,
        }
    }

    /// Whether this token names a unit we recognize
    pub fn is_recognized(s: &str) -> bool {
        matches!(
            s.trim().to_lowercase().as_str(),
            "kg" | "kgs" | "kilogram" | "kilograms" | "lb" | "lbs" | "pound" | "pounds"
        )
    }

    /// Convert a value expressed in this unit to kilograms
    pub fn to_kg(&self, value: f64) -> f64 {
        match self {
            WeightUnit::Kg => value,
            WeightUnit::Lb => value * KG_PER_LB,
        }
    }

    /// Convert a kilogram value to this unit
    pub fn from_kg(&self, kg: f64) -> f64 {
        match self {
            WeightUnit::Kg => kg,
            WeightUnit::Lb => kg * LB_PER_KG,
        }
    }

    /// Format a value in this unit at display precision
    /// (1 decimal place for kg, 2 for lb)
    pub fn format(&self, value: f64) -> String {
        match self {
            WeightUnit::Kg => format!("{:.1}", value),
            WeightUnit::Lb => format!("{:.2}", value),
        }
    }
}
