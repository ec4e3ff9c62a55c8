//! Unit & input normalizer
//!
//! Reconciles raw text input (weight, feet/inches, age) into a complete
//! `BodyProfile`, or reports that the profile is incomplete. Partial
//! profiles never exist: one invalid field invalidates the whole profile.

use serde::{Deserialize, Serialize};

use super::units::{WeightUnit, CM_PER_INCH, INCHES_PER_FOOT};

// Valid ranges after normalization
const WEIGHT_KG_MIN: f64 = 20.0; // exclusive
const WEIGHT_KG_MAX: f64 = 660.0; // exclusive
const HEIGHT_CM_MIN: f64 = 50.0;
const HEIGHT_CM_MAX: f64 = 272.0;
const AGE_MIN: i64 = 10;
const AGE_MAX: i64 = 120;

/// Biological sex for the BMR offset
///
/// Matching is deliberately permissive: any label starting with `m` (in any
/// case) is male, everything else is female. The original data carries
/// free-text labels, so strict validation would reject stored values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }

    /// Parse from a free-text label ("starts with m" rule)
    pub fn from_label(s: &str) -> Self {
        if s.trim().to_lowercase().starts_with('m') {
            Sex::Male
        } else {
            Sex::Female
        }
    }
}

/// Activity level, each mapped to a fixed TDEE multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "very_active",
        }
    }

    /// Parse from string. Total function: unknown keys default to moderate.
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "sedentary" => ActivityLevel::Sedentary,
            "light" | "lightly_active" => ActivityLevel::Light,
            "moderate" | "moderately_active" => ActivityLevel::Moderate,
            "active" => ActivityLevel::Active,
            "very_active" | "veryactive" => ActivityLevel::VeryActive,
            _ => ActivityLevel::Moderate,
        }
    }

    /// Multiplier applied to BMR to estimate maintenance calories
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }
}

/// A complete, range-checked body profile
///
/// Constructed only when weight, height, and age all validate; downstream
/// computation never sees a partially-filled profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BodyProfile {
    pub sex: Sex,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age: i64,
    pub activity: ActivityLevel,
}

impl BodyProfile {
    /// Build a profile from raw text fields
    ///
    /// Returns `None` if any of weight, height, or age fails to parse or
    /// falls outside its documented range.
    pub fn from_raw(
        weight_text: &str,
        weight_unit: WeightUnit,
        feet_text: &str,
        inches_text: &str,
        age_text: &str,
        sex_label: &str,
        activity_label: &str,
    ) -> Option<Self> {
        let weight_kg = parse_weight(weight_text, weight_unit)?;
        let height_cm = parse_height(feet_text, inches_text)?;
        let age = parse_age(age_text)?;

        Some(Self {
            sex: Sex::from_label(sex_label),
            weight_kg,
            height_cm,
            age,
            activity: ActivityLevel::from_str(activity_label),
        })
    }
}

/// Parse a decimal number, accepting `.` or `,` as the separator
fn parse_decimal(text: &str) -> Option<f64> {
    let cleaned = text.trim().replace(',', ".");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a non-negative integer field
fn parse_non_negative_int(text: &str) -> Option<i64> {
    text.trim().parse::<i64>().ok().filter(|v| *v >= 0)
}

/// Parse a weight field into kilograms
///
/// The range check applies to the kg-normalized value, not the display
/// value, so "44.5" lb and "20.18" kg fail identically.
pub fn parse_weight(text: &str, unit: WeightUnit) -> Option<f64> {
    let value = parse_decimal(text)?;
    let kg = unit.to_kg(value);
    if kg > WEIGHT_KG_MIN && kg < WEIGHT_KG_MAX {
        Some(kg)
    } else {
        None
    }
}

/// Parse feet and inches fields into centimeters
///
/// Both fields must parse as non-negative integers; an empty inches field
/// defaults to 0.
pub fn parse_height(feet_text: &str, inches_text: &str) -> Option<f64> {
    let feet = parse_non_negative_int(feet_text)?;
    let inches = if inches_text.trim().is_empty() {
        0
    } else {
        parse_non_negative_int(inches_text)?
    };

    // Checked arithmetic: absurdly large feet text is invalid input, not
    // a crash.
    let total_inches = feet.checked_mul(INCHES_PER_FOOT)?.checked_add(inches)?;
    let cm = total_inches as f64 * CM_PER_INCH;
    if (HEIGHT_CM_MIN..=HEIGHT_CM_MAX).contains(&cm) {
        Some(cm)
    } else {
        None
    }
}

/// Parse an age field
pub fn parse_age(text: &str) -> Option<i64> {
    let age = text.trim().parse::<i64>().ok()?;
    if (AGE_MIN..=AGE_MAX).contains(&age) {
        Some(age)
    } else {
        None
    }
}

/// Result of a display-unit conversion
#[derive(Debug, Clone, PartialEq)]
pub struct WeightConversion {
    /// The rewritten display text (unchanged if the field did not parse)
    pub display_text: String,
    /// The kg value backing the display, when the field parsed
    pub weight_kg: Option<f64>,
}

/// Convert a displayed weight between units
///
/// The displayed value is reinterpreted in the old unit, converted, and the
/// text field is rewritten at the new unit's display precision. When the
/// units are equal (including unrecognized tokens, which both resolve to
/// kg) the text is left untouched and only the unit flag changes.
pub fn convert_weight_text(text: &str, from: WeightUnit, to: WeightUnit) -> WeightConversion {
    let value = match parse_decimal(text) {
        Some(v) => v,
        None => {
            return WeightConversion {
                display_text: text.to_string(),
                weight_kg: None,
            }
        }
    };

    let kg = from.to_kg(value);
    if from == to {
        return WeightConversion {
            display_text: text.to_string(),
            weight_kg: Some(kg),
        };
    }

    WeightConversion {
        display_text: to.format(to.from_kg(kg)),
        weight_kg: Some(kg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_weight_kg() {
        assert_eq!(parse_weight("70", WeightUnit::Kg), Some(70.0));
        assert_eq!(parse_weight(" 70.5 ", WeightUnit::Kg), Some(70.5));
        // Comma decimal separator
        assert_eq!(parse_weight("70,5", WeightUnit::Kg), Some(70.5));
    }

    #[test]
    fn test_parse_weight_lb_normalizes_before_range_check() {
        let kg = parse_weight("154.32", WeightUnit::Lb).unwrap();
        assert!((kg - 70.0).abs() < 0.01);
        // 44 lb is ~19.96 kg, below the kg floor even though 44 > 20
        assert_eq!(parse_weight("44", WeightUnit::Lb), None);
    }

    #[test]
    fn test_parse_weight_out_of_range() {
        assert_eq!(parse_weight("20", WeightUnit::Kg), None); // exclusive bound
        assert_eq!(parse_weight("660", WeightUnit::Kg), None);
        assert_eq!(parse_weight("19.9", WeightUnit::Kg), None);
        assert_eq!(parse_weight("661", WeightUnit::Kg), None);
    }

    #[test]
    fn test_parse_weight_invalid_text() {
        assert_eq!(parse_weight("", WeightUnit::Kg), None);
        assert_eq!(parse_weight("   ", WeightUnit::Kg), None);
        assert_eq!(parse_weight("abc", WeightUnit::Kg), None);
        assert_eq!(parse_weight("7o", WeightUnit::Kg), None);
    }

    #[test]
    fn test_parse_height() {
        let cm = parse_height("5", "7").unwrap();
        assert!((cm - 170.18).abs() < 0.01);
        // Empty inches defaults to 0
        let cm = parse_height("6", "").unwrap();
        assert!((cm - 182.88).abs() < 0.01);
    }

    #[test]
    fn test_parse_height_invalid() {
        assert_eq!(parse_height("", "7"), None);
        assert_eq!(parse_height("-5", "7"), None);
        assert_eq!(parse_height("5", "-1"), None);
        assert_eq!(parse_height("5.5", "0"), None); // must be integers
        assert_eq!(parse_height("1", "0"), None); // 30.48 cm, below range
        assert_eq!(parse_height("9", "0"), None); // 274.32 cm, above range
    }

    #[test]
    fn test_parse_height_huge_values_do_not_overflow() {
        assert_eq!(parse_height("800000000000000000", "0"), None);
        assert_eq!(parse_height("9223372036854775807", "0"), None);
        assert_eq!(parse_height("768614336404564650", "9223372036854775807"), None);
    }

    #[test]
    fn test_parse_age() {
        assert_eq!(parse_age("30"), Some(30));
        assert_eq!(parse_age(" 10 "), Some(10));
        assert_eq!(parse_age("120"), Some(120));
        assert_eq!(parse_age("9"), None);
        assert_eq!(parse_age("121"), None);
        assert_eq!(parse_age("thirty"), None);
        assert_eq!(parse_age(""), None);
    }

    #[test]
    fn test_sex_from_label_permissive() {
        assert_eq!(Sex::from_label("male"), Sex::Male);
        assert_eq!(Sex::from_label("M"), Sex::Male);
        assert_eq!(Sex::from_label(" Man "), Sex::Male);
        assert_eq!(Sex::from_label("female"), Sex::Female);
        assert_eq!(Sex::from_label("other"), Sex::Female);
        assert_eq!(Sex::from_label(""), Sex::Female);
    }

    #[test]
    fn test_activity_level_defaults_to_moderate() {
        assert_eq!(ActivityLevel::from_str("sedentary"), ActivityLevel::Sedentary);
        assert_eq!(ActivityLevel::from_str("Very-Active"), ActivityLevel::VeryActive);
        assert_eq!(ActivityLevel::from_str("couch potato"), ActivityLevel::Moderate);
    }

    #[test]
    fn test_profile_requires_all_fields_valid() {
        let ok = BodyProfile::from_raw("70", WeightUnit::Kg, "5", "7", "30", "male", "moderate");
        assert!(ok.is_some());

        // Any single invalid field kills the whole profile
        assert!(
            BodyProfile::from_raw("", WeightUnit::Kg, "5", "7", "30", "male", "moderate").is_none()
        );
        assert!(
            BodyProfile::from_raw("70", WeightUnit::Kg, "", "7", "30", "male", "moderate").is_none()
        );
        assert!(BodyProfile::from_raw("70", WeightUnit::Kg, "5", "7", "8", "male", "moderate")
            .is_none());
    }

    #[test]
    fn test_convert_weight_text_kg_to_lb() {
        let conv = convert_weight_text("70.0", WeightUnit::Kg, WeightUnit::Lb);
        assert_eq!(conv.display_text, "154.32");
        assert!((conv.weight_kg.unwrap() - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_convert_weight_text_round_trip() {
        // kg -> lb -> kg reproduces the original within display precision
        for w in [55.0_f64, 70.3, 88.8, 120.6] {
            let text = WeightUnit::Kg.format(w);
            let to_lb = convert_weight_text(&text, WeightUnit::Kg, WeightUnit::Lb);
            let back = convert_weight_text(&to_lb.display_text, WeightUnit::Lb, WeightUnit::Kg);
            let final_kg: f64 = back.display_text.parse().unwrap();
            assert!(
                (final_kg - w).abs() < 0.1,
                "round trip drifted: {} -> {}",
                w,
                final_kg
            );
        }
    }

    #[test]
    fn test_convert_weight_text_same_unit_keeps_text() {
        let conv = convert_weight_text("70,5", WeightUnit::Kg, WeightUnit::Kg);
        assert_eq!(conv.display_text, "70,5");
        assert_eq!(conv.weight_kg, Some(70.5));
    }

    #[test]
    fn test_convert_weight_text_unparseable() {
        let conv = convert_weight_text("heavy", WeightUnit::Kg, WeightUnit::Lb);
        assert_eq!(conv.display_text, "heavy");
        assert_eq!(conv.weight_kg, None);
    }
}
