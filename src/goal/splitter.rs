//! Macro splitter
//!
//! Allocates protein and fat by body-weight ratios, then fills the
//! remaining calories with carbohydrates.

use serde::Serialize;

/// Calories per gram of protein and carbohydrate
const KCAL_PER_G_PROTEIN: i64 = 4;
const KCAL_PER_G_CARBS: i64 = 4;
/// Calories per gram of fat
const KCAL_PER_G_FAT: i64 = 9;

/// Gram allocation for a daily intake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MacroSplit {
    pub protein_g: i64,
    pub fat_g: i64,
    pub carbs_g: i64,
}

impl MacroSplit {
    /// Allocate grams for a suggested intake
    ///
    /// Protein and fat are fixed by body weight; carbs absorb whatever
    /// calories remain. If protein + fat calories already exceed the
    /// intake, carbs go to zero and the split overshoots the calorie
    /// target. That is legal, not an error.
    pub fn allocate(weight_kg: f64, protein_per_kg: f64, fat_per_kg: f64, intake: i64) -> Self {
        let protein_g = (weight_kg * protein_per_kg).round() as i64;
        let fat_g = (weight_kg * fat_per_kg).round() as i64;

        let protein_cal = protein_g * KCAL_PER_G_PROTEIN;
        let fat_cal = fat_g * KCAL_PER_G_FAT;
        let remaining_cal = (intake - protein_cal - fat_cal).max(0);
        let carbs_g = (remaining_cal as f64 / KCAL_PER_G_CARBS as f64).round() as i64;

        Self {
            protein_g,
            fat_g,
            carbs_g,
        }
    }

    /// Total calories this split accounts for
    pub fn calories(&self) -> i64 {
        self.protein_g * KCAL_PER_G_PROTEIN
            + self.fat_g * KCAL_PER_G_FAT
            + self.carbs_g * KCAL_PER_G_CARBS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_reference_profile() {
        // 70 kg, 1.8 g/kg protein, 0.9 g/kg fat, 2507 kcal intake
        let split = MacroSplit::allocate(70.0, 1.8, 0.9, 2507);
        assert_eq!(split.protein_g, 126); // 504 kcal
        assert_eq!(split.fat_g, 63); // 567 kcal
        // round((2507 - 504 - 567) / 4) = round(359.0) = 359
        assert_eq!(split.carbs_g, 359);
    }

    #[test]
    fn test_split_accounts_for_intake_within_rounding() {
        let split = MacroSplit::allocate(82.4, 2.0, 1.0, 2800);
        // Carb rounding can drift by at most 2 kcal
        assert!((split.calories() - 2800).abs() <= 2);
    }

    #[test]
    fn test_overshoot_yields_zero_carbs() {
        // Protein + fat calories exceed a small intake
        let split = MacroSplit::allocate(70.0, 2.4, 1.2, 800);
        assert_eq!(split.carbs_g, 0);
        assert!(split.calories() > 800);
    }

    #[test]
    fn test_never_negative_grams() {
        let split = MacroSplit::allocate(70.0, 2.4, 1.2, 0);
        assert!(split.protein_g >= 0);
        assert!(split.fat_g >= 0);
        assert_eq!(split.carbs_g, 0);
    }

    #[test]
    fn test_gram_rounding_half_away_from_zero() {
        // 70.25 kg * 2.0 = 140.5 -> 141
        let split = MacroSplit::allocate(70.25, 2.0, 1.0, 3000);
        assert_eq!(split.protein_g, 141);
    }
}
