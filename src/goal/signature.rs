//! Change-detection signature
//!
//! A composite key over every tracked input, compared against the stored
//! key to skip recomputation and persistence when nothing changed.

use crate::models::GoalInputs;

/// Field delimiter: the ASCII unit separator, which cannot appear in
/// numeric text fields or enum labels.
const DELIMITER: char = '\u{1f}';

/// Build the composite signature for a set of inputs
///
/// Raw text fields are trimmed; numeric tunables use their shortest exact
/// decimal form so the same value always produces the same signature.
pub fn input_signature(inputs: &GoalInputs) -> String {
    let fields = [
        inputs.weight_text.trim().to_string(),
        inputs.feet_text.trim().to_string(),
        inputs.inches_text.trim().to_string(),
        inputs.age_text.trim().to_string(),
        inputs.weight_unit.trim().to_string(),
        inputs.sex.trim().to_string(),
        inputs.activity_level.trim().to_string(),
        inputs.protein_per_kg.to_string(),
        inputs.fat_per_kg.to_string(),
        inputs.target_rate_kg_per_week.to_string(),
        inputs.goal_mode.trim().to_string(),
    ];
    fields.join(&DELIMITER.to_string())
}
