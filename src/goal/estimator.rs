//! Metabolic estimator
//!
//! Basal metabolic rate via the Mifflin-St Jeor equation, scaled by the
//! activity multiplier to estimate maintenance calories.

use super::normalizer::{BodyProfile, Sex};

/// BMR sex offsets (Mifflin-St Jeor)
const MALE_OFFSET: f64 = 5.0;
const FEMALE_OFFSET: f64 = -161.0;

/// Basal metabolic rate in kcal/day
///
/// `10*kg + 6.25*cm - 5*age`, plus 5 for male or minus 161 otherwise.
pub fn bmr(sex: Sex, weight_kg: f64, height_cm: f64, age: i64) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age as f64;
    match sex {
        Sex::Male => base + MALE_OFFSET,
        Sex::Female => base + FEMALE_OFFSET,
    }
}

/// Maintenance calories (total daily energy expenditure) for a profile
///
/// Rounded half-away-from-zero to a whole kcal.
pub fn maintenance_calories(profile: &BodyProfile) -> i64 {
    let tdee = bmr(profile.sex, profile.weight_kg, profile.height_cm, profile.age)
        * profile.activity.multiplier();
    tdee.round() as i64
}
